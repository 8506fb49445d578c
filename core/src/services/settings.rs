//! Per-user and global application settings endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ServiceError;
use crate::http::MultipartForm;
use crate::manager::ServiceManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    Auto,
}

/// Full settings record for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub id: u64,
    pub user_id: u64,
    pub theme: Theme,
    pub language: String,
    pub notifications: NotificationPrefs,
    pub privacy: PrivacyPrefs,
    pub preferences: GeneralPrefs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPrefs {
    pub email: bool,
    pub push: bool,
    pub sms: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyPrefs {
    pub public_profile: bool,
    pub show_email: bool,
    pub allow_messages: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralPrefs {
    pub timezone: String,
    pub date_format: String,
    pub currency: String,
}

/// Partial settings update; leaves and whole sections may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<NotificationPrefsUpdate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<PrivacyPrefsUpdate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<GeneralPrefsUpdate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationPrefsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyPrefsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_profile: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_email: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_messages: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralPrefsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Reply of the theme routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSelection {
    pub theme: String,
}

/// Settings endpoints.
pub struct SettingsService<'a> {
    manager: &'a ServiceManager,
}

impl ServiceManager {
    pub fn settings(&self) -> SettingsService<'_> {
        SettingsService { manager: self }
    }
}

impl SettingsService<'_> {
    // User settings

    pub async fn get_user_settings(&self, user_id: u64) -> Result<AppSettings, ServiceError> {
        self.manager.get(&format!("/settings/user/{user_id}")).await
    }

    pub async fn update_user_settings(
        &self,
        user_id: u64,
        settings: &UpdateSettings,
    ) -> Result<AppSettings, ServiceError> {
        self.manager
            .put(&format!("/settings/user/{user_id}"), settings)
            .await
    }

    pub async fn reset_user_settings(&self, user_id: u64) -> Result<Value, ServiceError> {
        self.manager
            .post(&format!("/settings/user/{user_id}/reset"), &json!({}))
            .await
    }

    // Global app settings

    pub async fn get_global_settings(&self) -> Result<Value, ServiceError> {
        self.manager.get("/settings/global").await
    }

    pub async fn update_global_settings(&self, settings: &Value) -> Result<Value, ServiceError> {
        self.manager.put("/settings/global", settings).await
    }

    // Theme management

    pub async fn get_user_theme(&self, user_id: u64) -> Result<ThemeSelection, ServiceError> {
        self.manager
            .get(&format!("/settings/user/{user_id}/theme"))
            .await
    }

    pub async fn update_user_theme(&self, user_id: u64, theme: &str) -> Result<(), ServiceError> {
        self.manager
            .patch::<Value, _>(
                &format!("/settings/user/{user_id}/theme"),
                &json!({"theme": theme}),
            )
            .await
            .map(|_| ())
    }

    // Notification preferences

    pub async fn get_notification_settings(&self, user_id: u64) -> Result<Value, ServiceError> {
        self.manager
            .get(&format!("/settings/user/{user_id}/notifications"))
            .await
    }

    pub async fn update_notification_settings(
        &self,
        user_id: u64,
        settings: &NotificationPrefsUpdate,
    ) -> Result<Value, ServiceError> {
        self.manager
            .put(&format!("/settings/user/{user_id}/notifications"), settings)
            .await
    }

    // Privacy settings

    pub async fn get_privacy_settings(&self, user_id: u64) -> Result<Value, ServiceError> {
        self.manager
            .get(&format!("/settings/user/{user_id}/privacy"))
            .await
    }

    pub async fn update_privacy_settings(
        &self,
        user_id: u64,
        settings: &PrivacyPrefsUpdate,
    ) -> Result<Value, ServiceError> {
        self.manager
            .put(&format!("/settings/user/{user_id}/privacy"), settings)
            .await
    }

    // System operations

    pub async fn export_settings(&self, user_id: u64) -> Result<Value, ServiceError> {
        self.manager
            .get(&format!("/settings/user/{user_id}/export"))
            .await
    }

    pub async fn import_settings(
        &self,
        user_id: u64,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<Value, ServiceError> {
        let form = MultipartForm::new().file("settings", filename, content_type, data);
        self.manager
            .post_form(&format!("/settings/user/{user_id}/import"), form)
            .await
    }
}
