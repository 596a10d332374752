use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    // Application lifecycle
    Starting,
    Ready { datasource: String, target: String },
    Shutdown,

    // Configuration
    ConfigLoading { path: String },
    ConfigLoaded { datasource_type: String },
    ConfigCreated { path: String },
    ConfigMigrated { changed_fields: Vec<String> },

    // Errors
    Error { context: String, error: String },
}

pub struct EventBus {
    pub(super) silent_mode: bool,
}
