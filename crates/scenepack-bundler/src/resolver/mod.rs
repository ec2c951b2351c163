//! Import resolution strategies.
//!
//! Two strategies run in a fixed order: [`VendorResolver`] claims bare
//! imports of vendored packages, then [`VirtualFsResolver`] resolves
//! relative and absolute imports against the request's files. Anything left
//! over is an unresolved import.

mod vendor;
mod virtual_fs;

pub use vendor::VendorResolver;
pub use virtual_fs::{VirtualFileSystem, VirtualFsResolver};

use std::fmt;
use std::sync::Arc;

/// Where an import specifier points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Left out of the bundle and loaded from a vendor asset URL at runtime.
    External { url: String },
    /// A file in the request's virtual file system.
    Virtual { path: String },
}

impl Resolution {
    pub fn id(&self) -> &str {
        match self {
            Resolution::External { url } => url,
            Resolution::Virtual { path } => path,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Resolution::External { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Could not resolve \"{specifier}\"{}: file not found in virtual file system: {path}", importer_suffix(.importer))]
    NotFound {
        specifier: String,
        importer: Option<String>,
        path: String,
    },

    #[error("Could not resolve \"{specifier}\"{}", importer_suffix(.importer))]
    Unresolved {
        specifier: String,
        importer: Option<String>,
    },
}

fn importer_suffix(importer: &Option<String>) -> String {
    importer
        .as_deref()
        .map(|importer| format!(" from {}", importer))
        .unwrap_or_default()
}

impl ResolveError {
    pub fn specifier(&self) -> &str {
        match self {
            ResolveError::NotFound { specifier, .. } | ResolveError::Unresolved { specifier, .. } => {
                specifier
            }
        }
    }
}

/// A single resolution strategy.
pub trait Resolver: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// `Ok(None)` passes the specifier on to the next strategy.
    fn resolve(
        &self,
        specifier: &str,
        importer: Option<&str>,
    ) -> Result<Option<Resolution>, ResolveError>;
}

/// Ordered list of strategies; the first one that answers wins.
#[derive(Debug, Clone, Default)]
pub struct ResolverChain {
    resolvers: Vec<Arc<dyn Resolver>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolvers.push(Arc::new(resolver));
        self
    }

    pub fn resolve(
        &self,
        specifier: &str,
        importer: Option<&str>,
    ) -> Result<Resolution, ResolveError> {
        for resolver in &self.resolvers {
            if let Some(resolution) = resolver.resolve(specifier, importer)? {
                tracing::trace!(
                    resolver = resolver.name(),
                    specifier,
                    id = resolution.id(),
                    "resolved import"
                );
                return Ok(resolution);
            }
        }

        Err(ResolveError::Unresolved {
            specifier: specifier.to_string(),
            importer: importer.map(str::to_string),
        })
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }
}
