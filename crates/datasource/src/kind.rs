use crate::errors::DatasourceError;
use std::fmt;
use std::str::FromStr;

/// Backend selected by the `datasource.type` configuration value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasourceKind {
    S3,
    Local,
    Supabase,
    Ddrv,
}

impl DatasourceKind {
    pub const ALL: [DatasourceKind; 4] = [
        DatasourceKind::S3,
        DatasourceKind::Local,
        DatasourceKind::Supabase,
        DatasourceKind::Ddrv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasourceKind::S3 => "s3",
            DatasourceKind::Local => "local",
            DatasourceKind::Supabase => "supabase",
            DatasourceKind::Ddrv => "ddrv",
        }
    }
}

impl FromStr for DatasourceKind {
    type Err = DatasourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DatasourceError::UnknownKind(s.to_string()))
    }
}

impl fmt::Display for DatasourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
