use super::models::{AppEvent, EventBus};
use colored::Colorize;
use std::sync::Arc;

impl EventBus {
    pub fn new(silent_mode: bool) -> Arc<Self> {
        Arc::new(Self { silent_mode })
    }

    pub fn emit(&self, event: AppEvent) {
        match event {
            // Application lifecycle
            AppEvent::Starting => {
                if self.silent_mode {
                    return;
                }
                eprintln!("\n{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black());
                eprintln!("  {}", "filedock - file storage toolkit".white().bold());
                eprintln!("  {} {}", "Version".dimmed(), env!("CARGO_PKG_VERSION").cyan());
                eprintln!("{}\n", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black());
            }
            AppEvent::Ready { datasource, target } => {
                if self.silent_mode {
                    return;
                }
                eprintln!("  {} {}({})", "Ready".green(), datasource.cyan(), target.blue());
            }
            AppEvent::Shutdown => {
                tracing::debug!("filedock shutting down");
            }

            // Configuration
            AppEvent::ConfigLoading { path } => {
                if !self.silent_mode {
                    eprintln!("  {} {}", "Loading config".dimmed(), path.cyan());
                }
            }
            AppEvent::ConfigLoaded { datasource_type } => {
                if !self.silent_mode {
                    eprintln!("  {} datasource type {}", "✓".green(), datasource_type.cyan());
                }
            }
            AppEvent::ConfigCreated { path } => {
                tracing::warn!("Configuration file not found");
                tracing::info!("Created default configuration at: {}", path);
            }
            AppEvent::ConfigMigrated { changed_fields } => {
                if !changed_fields.is_empty() && !self.silent_mode {
                    eprintln!(
                        "  {} Config updated: {}",
                        "↻".blue(),
                        changed_fields.join(", ").dimmed()
                    );
                }
            }

            // Errors
            AppEvent::Error { context, error } => {
                tracing::error!("{}: {}", context, error);
            }
        }
    }
}
