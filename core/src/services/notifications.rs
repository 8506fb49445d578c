//! Notification endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ServiceError;
use crate::manager::ServiceManager;

/// Severity of a notification; `type` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: u64,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotification {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}

/// Notification endpoints.
pub struct NotificationService<'a> {
    manager: &'a ServiceManager,
}

impl ServiceManager {
    pub fn notifications(&self) -> NotificationService<'_> {
        NotificationService { manager: self }
    }
}

impl NotificationService<'_> {
    pub async fn get_all(&self) -> Result<Vec<Notification>, ServiceError> {
        self.manager.get("/notifications").await
    }

    pub async fn get_one(&self, id: u64) -> Result<Notification, ServiceError> {
        self.manager.get(&format!("/notifications/{id}")).await
    }

    pub async fn get_unread(&self) -> Result<Vec<Notification>, ServiceError> {
        self.manager.get("/notifications/unread").await
    }

    pub async fn get_by_kind(&self, kind: NotificationKind) -> Result<Vec<Notification>, ServiceError> {
        self.manager
            .get(&format!("/notifications/type/{}", kind.as_str()))
            .await
    }

    pub async fn create(&self, notification: &CreateNotification) -> Result<Notification, ServiceError> {
        self.manager.post("/notifications", notification).await
    }

    pub async fn mark_as_read(&self, id: u64) -> Result<Notification, ServiceError> {
        self.manager
            .patch(&format!("/notifications/{id}/read"), &json!({"read": true}))
            .await
    }

    pub async fn mark_all_as_read(&self) -> Result<Value, ServiceError> {
        self.manager
            .patch("/notifications/mark-all-read", &json!({}))
            .await
    }

    pub async fn delete(&self, id: u64) -> Result<(), ServiceError> {
        self.manager.delete(&format!("/notifications/{id}")).await
    }

    pub async fn delete_all(&self) -> Result<(), ServiceError> {
        self.manager.delete("/notifications/all").await
    }

    // Advanced operations

    pub async fn get_stats(&self) -> Result<Value, ServiceError> {
        self.manager.get("/notifications/stats").await
    }

    pub async fn subscribe(&self, topic: &str) -> Result<Value, ServiceError> {
        self.manager
            .post("/notifications/subscribe", &json!({"topic": topic}))
            .await
    }

    pub async fn unsubscribe(&self, topic: &str) -> Result<Value, ServiceError> {
        self.manager
            .post("/notifications/unsubscribe", &json!({"topic": topic}))
            .await
    }
}
