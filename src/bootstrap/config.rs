use filedock_config::Config;
use filedock_events::{AppEvent, EventBus};
use filedock_filesystem::FileSystem;
use anyhow::Result;
use std::sync::Arc;

pub async fn load(config_path: &str, events: &Arc<EventBus>) -> Result<Config> {
    let abs_config_path = FileSystem::get_absolute_path_string(config_path)?;

    events.emit(AppEvent::ConfigLoading {
        path: abs_config_path.clone(),
    });

    let config_exists = std::path::Path::new(config_path).exists();
    let config = Config::from_file_with_events(config_path, Some(events))
        .await
        .inspect_err(|e| {
            events.emit(AppEvent::Error {
                context: format!("Failed to load {}", abs_config_path),
                error: format!("{:#}", e),
            })
        })?;

    if !config_exists {
        events.emit(AppEvent::ConfigCreated {
            path: abs_config_path,
        });
    }

    events.emit(AppEvent::ConfigLoaded {
        datasource_type: config.datasource.kind.clone(),
    });

    Ok(config)
}
