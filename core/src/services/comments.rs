//! Comment endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ServiceError;
use crate::manager::ServiceManager;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub body: String,
    pub post_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComment {
    pub name: String,
    pub email: String,
    pub body: String,
    pub post_id: u64,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<u64>,
}

/// Verdict accepted by the moderation route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    Approve,
    Reject,
}

/// Comment endpoints.
pub struct CommentService<'a> {
    manager: &'a ServiceManager,
}

impl ServiceManager {
    pub fn comments(&self) -> CommentService<'_> {
        CommentService { manager: self }
    }
}

impl CommentService<'_> {
    pub async fn get_all(&self) -> Result<Vec<Comment>, ServiceError> {
        self.manager.get("/comments").await
    }

    pub async fn get_one(&self, id: u64) -> Result<Comment, ServiceError> {
        self.manager.get(&format!("/comments/{id}")).await
    }

    pub async fn get_by_post(&self, post_id: u64) -> Result<Vec<Comment>, ServiceError> {
        self.manager.get(&format!("/posts/{post_id}/comments")).await
    }

    pub async fn create(&self, comment: &CreateComment) -> Result<Comment, ServiceError> {
        self.manager.post("/comments", comment).await
    }

    pub async fn update(&self, id: u64, data: &UpdateComment) -> Result<Comment, ServiceError> {
        self.manager.put(&format!("/comments/{id}"), data).await
    }

    pub async fn patch(&self, id: u64, data: &UpdateComment) -> Result<Comment, ServiceError> {
        self.manager.patch(&format!("/comments/{id}"), data).await
    }

    pub async fn delete(&self, id: u64) -> Result<(), ServiceError> {
        self.manager.delete(&format!("/comments/{id}")).await
    }

    // Advanced operations

    pub async fn get_by_email(&self, email: &str) -> Result<Vec<Comment>, ServiceError> {
        self.manager.get(&format!("/comments?email={email}")).await
    }

    pub async fn moderate(&self, id: u64, action: ModerationAction) -> Result<Value, ServiceError> {
        self.manager
            .patch(&format!("/comments/{id}/moderate"), &json!({"action": action}))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Body, HttpMethod};
    use crate::services::testing::harness;

    #[tokio::test]
    async fn get_by_post_and_by_email_build_the_right_urls() {
        let (transport, manager) = harness();
        transport.push_status(200, "[]");
        transport.push_status(200, "[]");

        manager.comments().get_by_post(12).await.unwrap();
        manager.comments().get_by_email("ada@example.com").await.unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].url, "http://localhost:3000/posts/12/comments");
        assert_eq!(
            sent[1].url,
            "http://localhost:3000/comments?email=ada@example.com"
        );
    }

    #[tokio::test]
    async fn moderate_sends_the_lowercase_action() {
        let (transport, manager) = harness();
        transport.push_status(200, "{}");

        manager
            .comments()
            .moderate(5, ModerationAction::Approve)
            .await
            .unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].method, HttpMethod::Patch);
        assert_eq!(sent[0].url, "http://localhost:3000/comments/5/moderate");
        match &sent[0].body {
            Some(Body::Json(value)) => assert_eq!(value["action"], "approve"),
            other => panic!("expected a JSON body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn comment_wire_shape_round_trips() {
        let (transport, manager) = harness();
        transport.push_status(
            200,
            r#"{"id": 3, "name": "n", "email": "e@x.com", "body": "hi", "postId": 12}"#,
        );

        let comment = manager.comments().get_one(3).await.unwrap();
        assert_eq!(comment.post_id, 12);
        assert_eq!(comment.body, "hi");
    }

    #[tokio::test]
    async fn get_all_and_create_map_to_the_comment_collection() {
        let (transport, manager) = harness();
        transport.push_status(200, "[]");
        transport.push_status(
            201,
            r#"{"id": 1, "name": "n", "email": "e@x.com", "body": "hi", "postId": 12}"#,
        );

        assert!(manager.comments().get_all().await.unwrap().is_empty());
        let created = manager
            .comments()
            .create(&CreateComment {
                name: "n".to_string(),
                email: "e@x.com".to_string(),
                body: "hi".to_string(),
                post_id: 12,
            })
            .await
            .unwrap();
        assert_eq!(created.id, 1);

        let sent = transport.requests();
        assert_eq!(sent[0].method, HttpMethod::Get);
        assert_eq!(sent[0].url, "http://localhost:3000/comments");
        assert_eq!(sent[1].method, HttpMethod::Post);
        assert_eq!(sent[1].url, "http://localhost:3000/comments");
        match &sent[1].body {
            Some(Body::Json(value)) => assert_eq!(value["postId"], 12),
            other => panic!("expected a JSON body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_patch_and_delete_address_one_comment() {
        let (transport, manager) = harness();
        transport.push_status(
            200,
            r#"{"id": 3, "name": "n", "email": "e@x.com", "body": "edited", "postId": 12}"#,
        );
        transport.push_status(
            200,
            r#"{"id": 3, "name": "n", "email": "e@x.com", "body": "edited", "postId": 12}"#,
        );
        transport.push_status(204, "");

        let data = UpdateComment {
            body: Some("edited".to_string()),
            ..UpdateComment::default()
        };
        manager.comments().update(3, &data).await.unwrap();
        manager.comments().patch(3, &data).await.unwrap();
        manager.comments().delete(3).await.unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].method, HttpMethod::Put);
        assert_eq!(sent[0].url, "http://localhost:3000/comments/3");
        match &sent[0].body {
            Some(Body::Json(value)) => {
                assert_eq!(value["body"], "edited");
                assert!(value.get("name").is_none());
            }
            other => panic!("expected a JSON body, got {other:?}"),
        }
        assert_eq!(sent[1].method, HttpMethod::Patch);
        assert_eq!(sent[1].url, "http://localhost:3000/comments/3");
        assert_eq!(sent[2].method, HttpMethod::Delete);
        assert!(sent[2].body.is_none());
    }
}
