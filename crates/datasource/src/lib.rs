mod compat;
mod datasource;
mod ddrv;
mod errors;
mod http;
mod kind;
mod local;
mod selector;
mod supabase;

#[cfg(feature = "s3")]
mod s3;

pub use compat::DatasourceExt;
pub use datasource::{ByteStream, Datasource};
pub use ddrv::{DdrvDatasource, RemoteFile};
pub use errors::*;
pub use kind::DatasourceKind;
pub use local::LocalDatasource;
pub use selector::{build, global, DatasourceHolder};
pub use supabase::SupabaseDatasource;

#[cfg(feature = "s3")]
pub use s3::S3Datasource;
