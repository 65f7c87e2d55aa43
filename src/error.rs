use std::collections::TryReserveError;
use thiserror::Error;

/// Errors reported by a clustering session.
#[derive(Error, Debug)]
pub enum Error {
    /// A setting was rejected before any session state was created.
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// Growing the samples or centroids collection failed. The session can not continue.
    #[error("failed to grow {collection} collection: {source}")]
    Allocation {
        collection: &'static str,
        #[source]
        source: TryReserveError,
    },

    #[error("failed to read settings from {path}: {source}")]
    SettingsIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    SettingsParse(#[from] toml::de::Error),

    /// The renderer collaborator failed to present a frame.
    #[error("renderer failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidConfig { field, reason: reason.into() }
    }
}
