//! Scenepack host - the preview bundler service process.
//!
//! The host owns one [`CommandDispatcher`], which in turn owns the build
//! orchestrator with its cache and stats. Commands arrive as JSON objects
//! over a [`HostChannel`]; in production that is stdin/stdout with one
//! message per line.
//!
//! - [`protocol`] - command and reply shapes
//! - [`dispatcher`] - routes commands and drives the serve loop
//! - [`channel`] - stdio and in-memory transports
//! - [`cli`] / [`commands`] - the `scenepack` binary
//! - [`logger`] - tracing setup from flags and config
//!
//! # Example
//!
//! ```no_run
//! use scenepack_config::ServiceConfig;
//! use scenepack_host::{CommandDispatcher, JsonLinesChannel};
//!
//! # async fn serve() -> scenepack_host::Result<()> {
//! let mut dispatcher = CommandDispatcher::from_config(&ServiceConfig::default())?;
//! dispatcher.run(&mut JsonLinesChannel::stdio()).await?;
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod cli;
pub mod commands;
pub mod dispatcher;
pub mod error;
pub mod logger;
pub mod protocol;

pub use channel::{HostChannel, JsonLinesChannel, MemoryChannel, MemoryHost};
pub use dispatcher::CommandDispatcher;
pub use error::{HostError, ProtocolError, Result};
pub use protocol::{CAPABILITIES, Command, Reply};
