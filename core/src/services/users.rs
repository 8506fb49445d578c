//! User accounts, authentication and profile endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ServiceError;
use crate::http::{HttpMethod, MultipartForm};
use crate::manager::{RequestOptions, ServiceManager};

/// A user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// Payload for creating a user; the server assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Login payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Successful login reply; pass the token to
/// [`ServiceManager::set_auth_token`] to authenticate later calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub token: String,
}

/// User endpoints.
pub struct UserService<'a> {
    manager: &'a ServiceManager,
}

impl ServiceManager {
    pub fn users(&self) -> UserService<'_> {
        UserService { manager: self }
    }
}

impl UserService<'_> {
    pub async fn get_one(&self, id: u64) -> Result<User, ServiceError> {
        self.manager.get(&format!("/users/{id}")).await
    }

    pub async fn get_all(&self) -> Result<Vec<User>, ServiceError> {
        self.manager.get("/users").await
    }

    pub async fn create(&self, user: &CreateUser) -> Result<User, ServiceError> {
        self.manager.post("/users", user).await
    }

    pub async fn update(&self, id: u64, data: &UpdateUser) -> Result<User, ServiceError> {
        self.manager.put(&format!("/users/{id}"), data).await
    }

    pub async fn delete(&self, id: u64) -> Result<(), ServiceError> {
        self.manager.delete(&format!("/users/{id}")).await
    }

    // Auth

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthToken, ServiceError> {
        self.manager.post("/auth/login", credentials).await
    }

    pub async fn logout(&self) -> Result<Value, ServiceError> {
        self.manager
            .request(HttpMethod::Post, "/auth/logout", RequestOptions::default())
            .await
    }

    pub async fn refresh_token(&self) -> Result<Value, ServiceError> {
        self.manager
            .request(HttpMethod::Post, "/auth/refresh", RequestOptions::default())
            .await
    }

    // Profile

    pub async fn get_profile(&self) -> Result<User, ServiceError> {
        self.manager.get("/users/me").await
    }

    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<Value, ServiceError> {
        self.manager
            .post(
                "/users/change-password",
                &json!({"oldPassword": old_password, "newPassword": new_password}),
            )
            .await
    }

    pub async fn upload_avatar(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<Value, ServiceError> {
        let form = MultipartForm::new().file("avatar", filename, content_type, data);
        self.manager.post_form("/users/me/avatar", form).await
    }

    // Roles

    pub async fn assign_role(&self, user_id: u64, role_id: u64) -> Result<Value, ServiceError> {
        self.manager
            .post(&format!("/users/{user_id}/roles"), &json!({"roleId": role_id}))
            .await
    }

    pub async fn get_roles(&self, user_id: u64) -> Result<Value, ServiceError> {
        self.manager.get(&format!("/users/{user_id}/roles")).await
    }

    // Status

    pub async fn toggle_active(&self, user_id: u64, is_active: bool) -> Result<Value, ServiceError> {
        self.manager
            .patch(&format!("/users/{user_id}/status"), &json!({"isActive": is_active}))
            .await
    }
}
