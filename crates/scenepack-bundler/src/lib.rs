#![cfg_attr(docsrs, feature(doc_cfg))]

//! # scenepack-bundler
//!
//! In-memory bundling for live scene previews, built on Rolldown.
//!
//! A [`BuildRequest`] carries a map of virtual files, an entry path and the
//! target [`Framework`]. The [`BuildOrchestrator`] fingerprints the request,
//! answers repeats from its [`BuildCache`], and otherwise compiles the files
//! into a single IIFE script. Bare imports of vendored packages are rewritten
//! to external asset URLs instead of being bundled.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use scenepack_bundler::{
//!     BuildOrchestrator, BuildRequest, Framework, OrchestratorOptions, RolldownEngine, VendorMap,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let vendor = VendorMap::new([("three", "vendor://three.js")])?;
//! let mut orchestrator = BuildOrchestrator::new(
//!     Arc::new(RolldownEngine::new()),
//!     vendor,
//!     OrchestratorOptions::default(),
//! );
//!
//! let request = BuildRequest::new(Framework::ThreeJs, "/src/index.js")
//!     .file("/src/index.js", "import * as THREE from 'three';\nconsole.log(THREE);");
//!
//! let result = orchestrator.build(request).await;
//! println!("{} bytes, cached: {}", result.bytes, result.from_cache);
//! # Ok(()) }
//! ```

pub mod cache;
pub mod diagnostics;
pub mod engine;
pub mod fingerprint;
pub mod framework;
pub mod loader;
pub mod orchestrator;
pub mod request;
pub mod resolver;
pub mod stats;
pub mod vendor;

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging, init_logging_from_env};

pub use cache::{BuildCache, CachedBuild, Clock, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL, ManualClock, SystemClock};
pub use diagnostics::{Diagnostic, Location};
pub use engine::{CompileJob, CompileOutput, CompilerEngine, JsxMode, RolldownEngine};
pub use fingerprint::{Fingerprint, fingerprint};
pub use framework::Framework;
pub use loader::{LoadedModule, Loader, ModuleLoader};
pub use orchestrator::{BuildOrchestrator, OrchestratorOptions};
pub use request::{BuildRequest, BuildResult, BuildStatus};
pub use resolver::{
    Resolution, ResolveError, Resolver, ResolverChain, VendorResolver, VirtualFileSystem,
    VirtualFsResolver,
};
pub use stats::{BuildStats, StatsSnapshot};
pub use vendor::VendorMap;

/// Error types for scenepack-bundler operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request's entry path is not a key of its file map.
    #[error("Entry file not found in virtual file system: {0}")]
    EntryNotFound(String),

    /// No resolver claimed an import specifier.
    #[error(transparent)]
    UnresolvedImport(#[from] ResolveError),

    /// The compiler reported one or more errors.
    #[error("{}", format_compile_errors(.0))]
    CompileDiagnostic(Vec<String>),

    /// The compiler engine itself failed (not a diagnostic about user code).
    #[error("Compiler engine failure: {0}")]
    Engine(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for scenepack-bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

fn format_compile_errors(errors: &[String]) -> String {
    match errors {
        [] => "Build failed".to_string(),
        [single] => single.clone(),
        many => format!("{} errors:\n{}", many.len(), many.join("\n")),
    }
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Error::UnresolvedImport(_) => "UNRESOLVED_IMPORT",
            Error::CompileDiagnostic(_) => "COMPILE_ERROR",
            Error::Engine(_) => "ENGINE_FAILURE",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::EntryNotFound(entry) => Some(Box::new(format!(
                "Add '{}' to the request's files, or point `entry` at an existing file.",
                entry
            ))),
            Error::UnresolvedImport(err) => Some(Box::new(format!(
                "'{}' is neither a vendored package nor a file in the request.",
                err.specifier()
            ))),
            Error::InvalidConfig(msg) => Some(Box::new(format!(
                "Check the vendor table and service settings.\nError: {}",
                msg
            ))),
            _ => None,
        }
    }
}
