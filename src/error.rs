//! Error types for rule generation

use thiserror::Error;

/// The resolved configuration cannot produce a rules file.
///
/// These are caller contract violations: the run aborts and nothing it
/// produced should be treated as usable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required property `{0}` has no value")]
    MissingProperty(String),

    #[error("platform catalog has no supported entries")]
    NoSupportedPlatforms,

    #[error("platform catalog has no stable framework entries")]
    NoStablePlatforms,

    #[error("supported platform with API level {api_level} has no framework version")]
    MissingFramework { api_level: u32 },

    #[error("platform catalog is not in ascending API level order: {previous} followed by {next}")]
    CatalogOrder { previous: u32, next: u32 },

    #[error("install path `{0}` must be relative to the build output directory")]
    AbsoluteInstallPath(String),

    #[error("hook `{name}` is invalid: {reason}")]
    InvalidHook { name: String, reason: String },
}

/// Errors surfaced by a generation run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("rule generator `{name}` failed")]
    Hook {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
