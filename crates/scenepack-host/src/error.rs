//! Error types for the host service.

use thiserror::Error;

/// Failures at the message-protocol boundary.
///
/// `Malformed` and `UnknownCommand` become error replies; only `Io` (the
/// channel itself failing) stops the service.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Malformed command: {0}")]
    Malformed(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Channel I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error for the `scenepack` binary.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Configuration error: {0}")]
    Config(#[from] scenepack_config::ConfigError),

    #[error(transparent)]
    Bundler(#[from] scenepack_bundler::Error),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("No build command on stdin")]
    EmptyInput,

    #[error("Could not determine working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HostError>;

impl miette::Diagnostic for HostError {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            HostError::Bundler(err) => miette::Diagnostic::code(err),
            HostError::Config(_) => Some(Box::new("CONFIG_ERROR")),
            HostError::Protocol(_) => Some(Box::new("PROTOCOL_ERROR")),
            HostError::EmptyInput => Some(Box::new("EMPTY_INPUT")),
            HostError::WorkingDirectory(_) => Some(Box::new("IO_ERROR")),
            HostError::Json(_) => Some(Box::new("JSON_ERROR")),
        }
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            HostError::Bundler(err) => miette::Diagnostic::help(err),
            HostError::Config(_) => Some(Box::new(
                "Check scenepack.toml / scenepack.json and SCENEPACK_* environment variables.",
            )),
            HostError::EmptyInput => Some(Box::new(
                "Pipe a command such as {\"cmd\":\"build\",\"framework\":\"threejs\",\"entry\":\"/index.js\",\"files\":{...}}",
            )),
            _ => None,
        }
    }
}
