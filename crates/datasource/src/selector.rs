use crate::datasource::Datasource;
use crate::ddrv::DdrvDatasource;
use crate::errors::{DatasourceError, Result};
use crate::http;
use crate::kind::DatasourceKind;
use crate::local::LocalDatasource;
use crate::supabase::SupabaseDatasource;
use filedock_config::Config;
use futures::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::OnceCell;

type Constructor = for<'a> fn(&'a Config) -> BoxFuture<'a, Result<Arc<dyn Datasource>>>;

/// One constructor per backend kind
const CONSTRUCTORS: &[(DatasourceKind, Constructor)] = &[
    (DatasourceKind::S3, build_s3),
    (DatasourceKind::Local, build_local),
    (DatasourceKind::Supabase, build_supabase),
    (DatasourceKind::Ddrv, build_ddrv),
];

/// Builds the datasource named by `datasource.type`.
/// Every call builds a new instance; use [`DatasourceHolder`] to share one.
pub async fn build(config: &Config) -> Result<Arc<dyn Datasource>> {
    let kind: DatasourceKind = config.datasource.kind.parse()?;

    let constructor = CONSTRUCTORS
        .iter()
        .find(|(candidate, _)| *candidate == kind)
        .map(|(_, constructor)| *constructor)
        .ok_or_else(|| DatasourceError::UnknownKind(kind.to_string()))?;

    let datasource = constructor(config).await?;
    tracing::info!("using {}({}) datasource", datasource.name(), datasource.target());

    Ok(datasource)
}

/// Lazily built datasource that is constructed at most once.
///
/// A failed build leaves the holder empty, so nothing half-built is kept.
/// Once built, later calls return the same instance whatever config they pass.
pub struct DatasourceHolder {
    cell: OnceCell<Arc<dyn Datasource>>,
}

impl DatasourceHolder {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::const_new(),
        }
    }

    pub async fn get_or_init(&self, config: &Config) -> Result<Arc<dyn Datasource>> {
        self.cell
            .get_or_try_init(|| build(config))
            .await
            .map(Arc::clone)
    }

    /// The datasource, if it has been built
    pub fn get(&self) -> Option<Arc<dyn Datasource>> {
        self.cell.get().cloned()
    }
}

impl Default for DatasourceHolder {
    fn default() -> Self {
        Self::new()
    }
}

static PROCESS_DATASOURCE: DatasourceHolder = DatasourceHolder::new();

/// Process-wide holder for callers that cannot be handed one explicitly
pub fn global() -> &'static DatasourceHolder {
    &PROCESS_DATASOURCE
}

fn missing_section(kind: DatasourceKind) -> DatasourceError {
    DatasourceError::ConfigError(format!(
        "datasource type '{}' selected but [datasource.{}] is missing",
        kind, kind
    ))
}

fn build_local(config: &Config) -> BoxFuture<'_, Result<Arc<dyn Datasource>>> {
    Box::pin(async move {
        let local = config
            .datasource
            .local
            .as_ref()
            .ok_or_else(|| missing_section(DatasourceKind::Local))?;

        let datasource = LocalDatasource::new(&local.directory).await?;
        Ok(Arc::new(datasource) as Arc<dyn Datasource>)
    })
}

fn build_supabase(config: &Config) -> BoxFuture<'_, Result<Arc<dyn Datasource>>> {
    Box::pin(async move {
        let supabase = config
            .datasource
            .supabase
            .clone()
            .ok_or_else(|| missing_section(DatasourceKind::Supabase))?;

        let client = http::build_client(&config.core)?;
        Ok(Arc::new(SupabaseDatasource::with_client(supabase, client)) as Arc<dyn Datasource>)
    })
}

fn build_ddrv(config: &Config) -> BoxFuture<'_, Result<Arc<dyn Datasource>>> {
    Box::pin(async move {
        let ddrv = config
            .datasource
            .ddrv
            .clone()
            .ok_or_else(|| missing_section(DatasourceKind::Ddrv))?;

        let client = http::build_client(&config.core)?;
        Ok(Arc::new(DdrvDatasource::with_client(ddrv, client)) as Arc<dyn Datasource>)
    })
}

#[cfg(feature = "s3")]
fn build_s3(config: &Config) -> BoxFuture<'_, Result<Arc<dyn Datasource>>> {
    Box::pin(async move {
        let s3 = config
            .datasource
            .s3
            .as_ref()
            .ok_or_else(|| missing_section(DatasourceKind::S3))?;

        let datasource = crate::s3::S3Datasource::new(s3).await?;
        Ok(Arc::new(datasource) as Arc<dyn Datasource>)
    })
}

#[cfg(not(feature = "s3"))]
fn build_s3(_config: &Config) -> BoxFuture<'_, Result<Arc<dyn Datasource>>> {
    Box::pin(async move {
        Err(DatasourceError::ConfigError(
            "S3 datasource selected but not compiled. Rebuild with --features s3 to enable S3 support."
                .to_string(),
        ))
    })
}
