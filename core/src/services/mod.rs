//! Entity endpoints: thin tables over the manager.
//!
//! Each module pairs one resource's DTOs with an accessor struct whose
//! methods map 1:1 onto REST calls. The modules hold no state and no logic;
//! every method borrows the [`ServiceManager`](crate::ServiceManager) and
//! delegates to it.

pub mod comments;
pub mod notifications;
pub mod posts;
pub mod products;
pub mod settings;
pub mod users;

pub use comments::CommentService;
pub use notifications::NotificationService;
pub use posts::PostService;
pub use products::ProductService;
pub use settings::SettingsService;
pub use users::UserService;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use crate::config::ApiConfig;
    use crate::manager::ServiceManager;
    use crate::transport::mock::MockTransport;

    /// Manager wired to a scripted transport, plus the transport for
    /// scripting replies and inspecting sent requests.
    pub(crate) fn harness() -> (Arc<MockTransport>, ServiceManager) {
        let transport = Arc::new(MockTransport::new());
        let config = ApiConfig {
            base_url: "http://localhost:3000".to_string(),
            retries: 0,
            ..ApiConfig::default()
        };
        let manager = ServiceManager::with_transport(config, transport.clone());
        (transport, manager)
    }
}
