//! Rolldown-backed [`CompilerEngine`].

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use itertools::{Either, Itertools};
use rolldown::{
    BundlerBuilder, BundlerOptions, GlobalsOutputOption, InputItem, OutputFormat, Platform,
    RawMinifyOptions, SourceMapType,
};
use rolldown_common::{BundlerTransformOptions, Output};
use rolldown_error::BuildDiagnostic;
use rustc_hash::FxHashMap;
use serde_json::json;

use super::plugins::{ResolvePlugin, VirtualFsPlugin};
use super::registry::PluginRegistry;
use super::{CompileJob, CompileOutput, CompilerEngine, JsxMode};
use crate::diagnostics::Diagnostic;
use crate::resolver::VirtualFileSystem;
use crate::vendor::VendorMap;

#[derive(Debug, Clone, Copy, Default)]
pub struct RolldownEngine;

impl RolldownEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CompilerEngine for RolldownEngine {
    fn name(&self) -> &'static str {
        "rolldown"
    }

    async fn compile(&self, job: CompileJob) -> anyhow::Result<CompileOutput> {
        let options = bundler_options(&job);

        let mut registry = PluginRegistry::new();
        registry.add(ResolvePlugin::new(Arc::clone(&job.vendor), Arc::clone(&job.files)));
        registry.add(VirtualFsPlugin::new(Arc::clone(&job.files)));
        tracing::debug!(plugins = ?registry.names(), entry = %job.entry, "starting rolldown build");

        let mut bundler = match BundlerBuilder::default()
            .with_options(options)
            .with_plugins(registry.into_rolldown_plugins())
            .build()
        {
            Ok(bundler) => bundler,
            Err(errors) => return Ok(failed(diagnostics(errors.iter(), &job.files))),
        };

        let bundle = match bundler.generate().await {
            Ok(bundle) => bundle,
            Err(errors) => return Ok(failed(diagnostics(errors.iter(), &job.files))),
        };

        let warnings = diagnostics(bundle.warnings.iter(), &job.files);

        let chunk = bundle
            .assets
            .iter()
            .find_map(|asset| match asset {
                Output::Chunk(chunk) if chunk.is_entry => Some(chunk),
                _ => None,
            })
            .ok_or_else(|| anyhow::anyhow!("No entry chunk found in bundle output"))?;

        let metafile = job.metafile.then(|| {
            json!({
                "entry": job.entry,
                "modules": chunk.modules.keys.iter().map(|id| id.to_string()).collect::<Vec<_>>(),
                "externals": chunk.imports.iter().map(|id| id.to_string()).collect::<Vec<_>>(),
            })
        });

        Ok(CompileOutput {
            code: Some(chunk.code.to_string()),
            warnings,
            errors: Vec::new(),
            metafile,
        })
    }
}

fn bundler_options(job: &CompileJob) -> BundlerOptions {
    let jsx = match job.jsx {
        JsxMode::Automatic => "react-jsx",
        JsxMode::Classic => "react",
    };

    BundlerOptions {
        // Module ids are absolute virtual paths; rooting cwd at `/` keeps
        // diagnostics and sourcemap sources independent of the process cwd.
        cwd: Some(PathBuf::from("/")),
        input: Some(vec![InputItem {
            name: None,
            import: job.entry.clone(),
        }]),
        platform: Some(Platform::Browser),
        format: Some(OutputFormat::Iife),
        name: Some(job.global_name.clone()),
        sourcemap: Some(SourceMapType::Inline),
        globals: Some(GlobalsOutputOption::from(vendor_globals(&job.vendor))),
        define: Some(
            job.defines
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        ),
        transform: Some(BundlerTransformOptions {
            jsx: Some(Either::Left(jsx.to_string())),
            ..Default::default()
        }),
        minify: job.minify.then(|| RawMinifyOptions::from(true)),
        ..Default::default()
    }
}

/// External ids are asset URLs, so globals are keyed by URL. Packages sharing
/// a URL share the global of the alphabetically first package, whatever order
/// the table was loaded in.
fn vendor_globals(vendor: &VendorMap) -> FxHashMap<String, String> {
    let mut globals = FxHashMap::default();
    for (package, url) in vendor.iter().sorted_by_key(|(package, _)| *package) {
        globals
            .entry(url.to_string())
            .or_insert_with(|| VendorMap::global_name(package));
    }
    globals
}

fn diagnostics<'a>(
    reported: impl Iterator<Item = &'a BuildDiagnostic>,
    files: &VirtualFileSystem,
) -> Vec<Diagnostic> {
    reported.map(|diagnostic| to_diagnostic(diagnostic, files)).collect()
}

/// Rolldown renders diagnostics as reports; parse them back into structure
/// and point the location at the request's file key.
fn to_diagnostic(diagnostic: &BuildDiagnostic, files: &VirtualFileSystem) -> Diagnostic {
    let mut diagnostic = Diagnostic::from_rendered(&diagnostic.to_diagnostic().to_string());
    if let Some(location) = diagnostic.location.as_mut() {
        if let Some(path) = virtual_path(&location.file, files) {
            location.file = path;
        }
    }
    diagnostic
}

/// Rolldown prints module ids relative to its cwd (`src/a.ts`,
/// `../../src/a.ts`). Map such a name back to the file key it came from.
fn virtual_path(reported: &str, files: &VirtualFileSystem) -> Option<String> {
    if files.contains(reported) {
        return None;
    }

    let mut rest = reported.trim_start_matches('/');
    while let Some(stripped) = rest.strip_prefix("../").or_else(|| rest.strip_prefix("./")) {
        rest = stripped;
    }
    let candidate = format!("/{}", rest);
    files.contains(&candidate).then_some(candidate)
}

fn failed(errors: Vec<Diagnostic>) -> CompileOutput {
    CompileOutput {
        code: None,
        warnings: Vec::new(),
        errors,
        metafile: None,
    }
}
