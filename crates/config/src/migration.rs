use super::defaults;
use super::errors::ConfigError;
use std::path::Path;
use std::sync::Arc;
use toml_edit::{DocumentMut, Item, Table, Value};

/// Migrates config file to latest format if needed
pub async fn migrate_config_if_needed<P: AsRef<Path>>(
    path: P,
    events: Option<&Arc<filedock_events::EventBus>>,
) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    let mut doc = content.parse::<DocumentMut>()?;

    let changed_fields = migrate_document(&mut doc)?;

    // Only write if something changed
    if !changed_fields.is_empty() {
        tokio::fs::write(path.as_ref(), doc.to_string()).await?;
        tracing::info!(
            "Migrated {} ({} fields updated)",
            path.as_ref().display(),
            changed_fields.len()
        );

        if let Some(event_bus) = events {
            event_bus.emit(filedock_events::AppEvent::ConfigMigrated {
                changed_fields: changed_fields.clone(),
            });
        }
    }

    Ok(())
}

pub(crate) fn migrate_document(doc: &mut DocumentMut) -> Result<Vec<String>, ConfigError> {
    let mut changed_fields = Vec::new();

    migrate_core_section(doc, &mut changed_fields)?;
    migrate_logging_section(doc, &mut changed_fields)?;
    migrate_datasource_section(doc, &mut changed_fields)?;

    Ok(changed_fields)
}

fn migrate_core_section(
    doc: &mut DocumentMut,
    changed_fields: &mut Vec<String>,
) -> Result<(), ConfigError> {
    let core = ensure_table(doc.as_table_mut(), "core", changed_fields)?;
    ensure_field(
        core,
        "request_timeout_secs",
        Value::from(defaults::request_timeout_secs() as i64),
        changed_fields,
    );
    Ok(())
}

fn migrate_logging_section(
    doc: &mut DocumentMut,
    changed_fields: &mut Vec<String>,
) -> Result<(), ConfigError> {
    let logging = ensure_table(doc.as_table_mut(), "logging", changed_fields)?;
    ensure_field(
        logging,
        "level",
        Value::from(defaults::logging_level()),
        changed_fields,
    );
    Ok(())
}

fn migrate_datasource_section(
    doc: &mut DocumentMut,
    changed_fields: &mut Vec<String>,
) -> Result<(), ConfigError> {
    let had_datasource = doc.contains_key("datasource");
    let datasource = ensure_table(doc.as_table_mut(), "datasource", changed_fields)?;
    ensure_field(
        datasource,
        "type",
        Value::from(defaults::datasource_type()),
        changed_fields,
    );

    // A freshly created section falls back to the local datasource
    if !had_datasource {
        let local = ensure_table(datasource, "local", changed_fields)?;
        ensure_field(
            local,
            "directory",
            Value::from(defaults::local_directory()),
            changed_fields,
        );
    }

    // Accept the correctly spelled key for the ddrv parent directory
    if let Some(ddrv) = datasource.get_mut("ddrv").and_then(|d| d.as_table_mut()) {
        if !ddrv.contains_key("parrent_bucket") {
            if let Some(value) = ddrv.remove("parent_bucket") {
                ddrv.insert("parrent_bucket", value);
                changed_fields.push("datasource.ddrv.parent_bucket -> parrent_bucket".to_string());
            }
        }
    }

    Ok(())
}

fn ensure_table<'a>(
    parent: &'a mut Table,
    key: &str,
    changed_fields: &mut Vec<String>,
) -> Result<&'a mut Table, ConfigError> {
    if !parent.contains_key(key) {
        let mut table = Table::new();
        table.set_implicit(true);
        parent.insert(key, Item::Table(table));
        changed_fields.push(key.to_string());
    }

    parent[key]
        .as_table_mut()
        .ok_or_else(|| ConfigError::MigrationError(format!("Invalid [{}] section in config", key)))
}

fn ensure_field(
    table: &mut Table,
    key: &str,
    default_value: Value,
    changed_fields: &mut Vec<String>,
) {
    if !table.contains_key(key) {
        table[key] = Item::Value(default_value);
        changed_fields.push(key.to_string());
    }
}
