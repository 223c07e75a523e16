use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GuardError>;

/// Every failure here is terminal for the invocation: the decision is a
/// pure function of (user, configuration, paths), so nothing is retried
/// and no privileged command is started once an error surfaces.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("failed to read configuration {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse configuration {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("user {user} is not granted any access")]
    NotAuthorized { user: String },

    #[error("{path} is outside the allowed root")]
    PathDenied { path: PathBuf },

    #[error("failed to resolve {path}: {source}")]
    ResolvePath {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("subguard is only meant to be run as root via sudo")]
    NotElevated,

    #[error("SUDO_USER is not set; cannot determine the invoking user")]
    MissingInvokingUser,
}
