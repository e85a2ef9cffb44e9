//! Navsync runtime — error types.

use navsync_timeline::TimelineError;
use thiserror::Error;

/// Startup and runtime errors of the host process.
#[derive(Debug, Error)]
pub enum AppError {
    /// A configuration value is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The configuration file is not valid YAML for `NavConfig`.
    #[error("configuration file error: {0}")]
    ConfigFile(#[from] serde_yaml::Error),

    /// The page markup does not describe a valid timeline.
    #[error("markup error: {0}")]
    Markup(#[from] TimelineError),

    /// Reading markup, configuration or stdin failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The event loop has already stopped.
    #[error("navigation runtime has stopped")]
    RuntimeStopped,

    /// A simulator command could not be parsed.
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
}
