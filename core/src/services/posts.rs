//! Post endpoints, including the bulk routes.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ServiceError;
use crate::manager::ServiceManager;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub user_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    pub title: String,
    pub body: String,
    pub user_id: u64,
}

/// Partial update. `id` is only meaningful on the bulk route, which
/// addresses records through the body instead of the path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}

/// Post endpoints.
pub struct PostService<'a> {
    manager: &'a ServiceManager,
}

impl ServiceManager {
    pub fn posts(&self) -> PostService<'_> {
        PostService { manager: self }
    }
}

impl PostService<'_> {
    pub async fn get_all(&self) -> Result<Vec<Post>, ServiceError> {
        self.manager.get("/posts").await
    }

    pub async fn get_one(&self, id: u64) -> Result<Post, ServiceError> {
        self.manager.get(&format!("/posts/{id}")).await
    }

    pub async fn get_by_user(&self, user_id: u64) -> Result<Vec<Post>, ServiceError> {
        self.manager.get(&format!("/users/{user_id}/posts")).await
    }

    pub async fn create(&self, post: &CreatePost) -> Result<Post, ServiceError> {
        self.manager.post("/posts", post).await
    }

    pub async fn update(&self, id: u64, data: &UpdatePost) -> Result<Post, ServiceError> {
        self.manager.put(&format!("/posts/{id}"), data).await
    }

    pub async fn patch(&self, id: u64, data: &UpdatePost) -> Result<Post, ServiceError> {
        self.manager.patch(&format!("/posts/{id}"), data).await
    }

    pub async fn delete(&self, id: u64) -> Result<(), ServiceError> {
        self.manager.delete(&format!("/posts/{id}")).await
    }

    // Bulk operations

    pub async fn bulk_create(&self, posts: &[CreatePost]) -> Result<Vec<Post>, ServiceError> {
        self.manager.post("/posts/bulk", posts).await
    }

    pub async fn bulk_update(&self, posts: &[UpdatePost]) -> Result<Vec<Post>, ServiceError> {
        self.manager.patch("/posts/bulk", posts).await
    }

    pub async fn bulk_delete(&self, ids: &[u64]) -> Result<Value, ServiceError> {
        self.manager.post("/posts/bulk-delete", &json!({"ids": ids})).await
    }
}
