use filedock_config::Config;
use filedock_datasource::Datasource;
use filedock_events::{AppEvent, EventBus};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Builds the process datasource. An unusable configuration stops startup.
pub async fn initialize(config: &Config, events: &Arc<EventBus>) -> Result<Arc<dyn Datasource>> {
    let datasource = filedock_datasource::global()
        .get_or_init(config)
        .await
        .inspect_err(|e| {
            events.emit(AppEvent::Error {
                context: "Datasource initialization failed".to_string(),
                error: e.to_string(),
            })
        })
        .context("failed to initialize datasource")?;

    events.emit(AppEvent::Ready {
        datasource: datasource.name().to_string(),
        target: datasource.target(),
    });

    Ok(datasource)
}
