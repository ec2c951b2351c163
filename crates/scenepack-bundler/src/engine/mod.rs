//! Compiler engine seam.
//!
//! The orchestrator hands a fully assembled [`CompileJob`] to a
//! [`CompilerEngine`] and gets back output text plus diagnostics. Rolldown is
//! the production engine; anything else only needs to honour the same
//! resolver order and loader selection.

mod plugins;
mod registry;
mod rolldown_engine;

pub use plugins::{ResolvePlugin, VirtualFsPlugin};
pub use rolldown_engine::RolldownEngine;

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::diagnostics::Diagnostic;
use crate::framework::Framework;
use crate::resolver::VirtualFileSystem;
use crate::vendor::VendorMap;

/// How JSX syntax is compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsxMode {
    /// Calls into `react/jsx-runtime`.
    Automatic,
    /// `React.createElement` calls.
    Classic,
}

impl JsxMode {
    pub fn for_framework(framework: &Framework) -> Self {
        if framework.uses_jsx() {
            JsxMode::Automatic
        } else {
            JsxMode::Classic
        }
    }
}

/// Everything an engine needs for one build.
#[derive(Debug, Clone)]
pub struct CompileJob {
    pub entry: String,
    pub framework: Framework,
    pub files: Arc<VirtualFileSystem>,
    pub vendor: Arc<VendorMap>,
    /// Baseline defines already merged with the request's own.
    pub defines: IndexMap<String, String>,
    pub jsx: JsxMode,
    pub minify: bool,
    /// Global variable the IIFE assigns its exports to.
    pub global_name: String,
    pub metafile: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CompileOutput {
    pub code: Option<String>,
    pub warnings: Vec<Diagnostic>,
    pub errors: Vec<Diagnostic>,
    pub metafile: Option<serde_json::Value>,
}

/// A bundler capable of compiling a [`CompileJob`].
///
/// Diagnostics about user code belong in [`CompileOutput::errors`]. An `Err`
/// means the engine itself failed.
#[async_trait]
pub trait CompilerEngine: Send + Sync {
    fn name(&self) -> &'static str;

    async fn compile(&self, job: CompileJob) -> anyhow::Result<CompileOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jsx_runtime_follows_framework() {
        assert_eq!(JsxMode::for_framework(&Framework::ReactThreeFiber), JsxMode::Automatic);
        assert_eq!(JsxMode::for_framework(&Framework::Reactylon), JsxMode::Automatic);
        assert_eq!(JsxMode::for_framework(&Framework::ThreeJs), JsxMode::Classic);
    }
}
