//! The build pipeline: validate, consult the cache, compile, normalize,
//! record.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use indexmap::IndexMap;

use crate::Error;
use crate::cache::{BuildCache, CachedBuild, Clock, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL};
use crate::diagnostics::Diagnostic;
use crate::engine::{CompileJob, CompileOutput, CompilerEngine, JsxMode};
use crate::fingerprint::fingerprint;
use crate::loader::Loader;
use crate::request::{BuildRequest, BuildResult, BuildStatus};
use crate::resolver::VirtualFileSystem;
use crate::stats::{BuildStats, StatsSnapshot};
use crate::vendor::VendorMap;

/// Default global the IIFE bundle is assigned to.
pub const DEFAULT_GLOBAL_NAME: &str = "__scenepack";

#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    pub global_name: String,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            global_name: DEFAULT_GLOBAL_NAME.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Owns the cache and statistics for one worker and runs builds one at a
/// time. `build` never fails: every problem becomes an error [`BuildResult`].
pub struct BuildOrchestrator {
    engine: Arc<dyn CompilerEngine>,
    vendor: Arc<VendorMap>,
    cache: BuildCache,
    stats: BuildStats,
    global_name: String,
}

impl BuildOrchestrator {
    pub fn new(
        engine: Arc<dyn CompilerEngine>,
        vendor: VendorMap,
        options: OrchestratorOptions,
    ) -> Self {
        let cache = BuildCache::new(options.cache_ttl, options.cache_capacity);
        Self::with_cache(engine, vendor, options.global_name, cache)
    }

    /// Like [`BuildOrchestrator::new`], reading cache freshness from `clock`.
    pub fn with_clock(
        engine: Arc<dyn CompilerEngine>,
        vendor: VendorMap,
        options: OrchestratorOptions,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = BuildCache::with_clock(options.cache_ttl, options.cache_capacity, clock);
        Self::with_cache(engine, vendor, options.global_name, cache)
    }

    fn with_cache(
        engine: Arc<dyn CompilerEngine>,
        vendor: VendorMap,
        global_name: String,
        cache: BuildCache,
    ) -> Self {
        Self {
            engine,
            vendor: Arc::new(vendor),
            cache,
            stats: BuildStats::new(),
            global_name,
        }
    }

    pub async fn build(&mut self, request: BuildRequest) -> BuildResult {
        let started = Instant::now();
        let result = self.run(request, started).await;

        self.stats.record(result.duration_ms, result.from_cache);
        match result.status {
            BuildStatus::Ok => tracing::info!(
                bytes = result.bytes,
                duration_ms = result.duration_ms,
                from_cache = result.from_cache,
                warnings = result.warnings.len(),
                "build succeeded"
            ),
            BuildStatus::Error => tracing::warn!(
                duration_ms = result.duration_ms,
                errors = result.errors.len(),
                "build failed"
            ),
        }

        result
    }

    async fn run(&mut self, request: BuildRequest, started: Instant) -> BuildResult {
        if !request.files.contains_key(&request.entry) {
            let error = Error::EntryNotFound(request.entry.clone());
            return BuildResult::failure(vec![error.to_string()], Vec::new(), elapsed_ms(started));
        }

        let key = fingerprint(&request);
        if let Some(cached) = self.cache.lookup(&key) {
            tracing::debug!(fingerprint = %key, "cache hit");
            return BuildResult {
                status: BuildStatus::Ok,
                bundle_code: Some(cached.bundle_code.clone()),
                warnings: cached.warnings.clone(),
                errors: Vec::new(),
                bytes: cached.bytes,
                duration_ms: elapsed_ms(started),
                from_cache: true,
                metafile: None,
            };
        }

        tracing::debug!(
            fingerprint = %key,
            entry = %request.entry,
            framework = %request.framework,
            loader = Loader::select(&request.entry, &request.framework).as_str(),
            files = request.files.len(),
            "cache miss, compiling"
        );

        let job = self.compile_job(request);
        let compiled = AssertUnwindSafe(self.engine.compile(job)).catch_unwind().await;

        let output = match compiled {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                let error = Error::Engine(format!("{:#}", err));
                tracing::error!(engine = self.engine.name(), "{}", error);
                return BuildResult::failure(vec![error.to_string()], Vec::new(), elapsed_ms(started));
            }
            Err(panic) => {
                let error = Error::Engine(panic_message(panic.as_ref()));
                tracing::error!(engine = self.engine.name(), "{}", error);
                return BuildResult::failure(vec![error.to_string()], Vec::new(), elapsed_ms(started));
            }
        };

        let result = normalize(output, elapsed_ms(started));
        if let (BuildStatus::Ok, Some(code)) = (result.status, &result.bundle_code) {
            self.cache.store(
                key,
                CachedBuild {
                    bundle_code: code.clone(),
                    warnings: result.warnings.clone(),
                    bytes: result.bytes,
                },
            );
        }
        result
    }

    fn compile_job(&self, request: BuildRequest) -> CompileJob {
        let mut defines = baseline_defines();
        defines.extend(request.defines);

        let jsx = JsxMode::for_framework(&request.framework);
        let files = VirtualFileSystem::new(request.files, request.entry.clone(), request.framework.clone());

        CompileJob {
            entry: request.entry,
            framework: request.framework,
            files: Arc::new(files),
            vendor: Arc::clone(&self.vendor),
            defines,
            jsx,
            minify: request.minify,
            global_name: self.global_name.clone(),
            metafile: request.metafile,
        }
    }

    /// Drop every cached build, returning how many there were.
    pub fn clear_cache(&mut self) -> usize {
        let cleared = self.cache.clear();
        tracing::info!(cleared, "build cache cleared");
        cleared
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.cache.len())
    }

    pub fn cache(&self) -> &BuildCache {
        &self.cache
    }

    pub fn vendor(&self) -> &VendorMap {
        &self.vendor
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }
}

/// Defines every build starts from; request defines override these.
fn baseline_defines() -> IndexMap<String, String> {
    IndexMap::from([
        ("process.env.NODE_ENV".to_string(), "\"production\"".to_string()),
        ("global".to_string(), "globalThis".to_string()),
    ])
}

fn normalize(output: CompileOutput, duration_ms: f64) -> BuildResult {
    let warnings: Vec<String> = output.warnings.iter().map(Diagnostic::format).collect();
    let errors: Vec<String> = output.errors.iter().map(Diagnostic::format).collect();

    // Errors win even if the engine also produced output.
    let mut result = match output.code {
        Some(code) if errors.is_empty() => BuildResult::success(code, warnings, duration_ms),
        _ => BuildResult::failure(errors, warnings, duration_ms),
    };
    if result.is_ok() {
        result.metafile = output.metafile;
    }
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("compiler panicked: {}", detail)
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
