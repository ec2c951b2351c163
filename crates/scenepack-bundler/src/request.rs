//! Build request and result contract.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::framework::Framework;
use crate::{Error, Result};

/// A request to bundle a set of in-memory files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequest {
    pub framework: Framework,
    pub entry: String,
    pub files: FxHashMap<String, String>,
    #[serde(default)]
    pub defines: FxHashMap<String, String>,
    #[serde(default)]
    pub minify: bool,
    /// Attach the module graph summary to the result. Not part of the
    /// fingerprint and never served from the cache.
    #[serde(default)]
    pub metafile: bool,
}

impl BuildRequest {
    pub fn new(framework: Framework, entry: impl Into<String>) -> Self {
        Self {
            framework,
            entry: entry.into(),
            files: FxHashMap::default(),
            defines: FxHashMap::default(),
            minify: false,
            metafile: false,
        }
    }

    pub fn file(mut self, path: impl Into<String>, source: impl Into<String>) -> Self {
        self.files.insert(path.into(), source.into());
        self
    }

    pub fn define(mut self, name: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.defines.insert(name.into(), replacement.into());
        self
    }

    pub fn minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    pub fn with_metafile(mut self, metafile: bool) -> Self {
        self.metafile = metafile;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    Ok,
    Error,
}

/// Outcome of a build attempt, in the shape replied to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResult {
    pub status: BuildStatus,
    /// Present iff `status` is `ok`.
    pub bundle_code: Option<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub bytes: usize,
    pub duration_ms: f64,
    pub from_cache: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metafile: Option<serde_json::Value>,
}

impl BuildResult {
    pub fn success(bundle_code: String, warnings: Vec<String>, duration_ms: f64) -> Self {
        Self {
            status: BuildStatus::Ok,
            bytes: bundle_code.len(),
            bundle_code: Some(bundle_code),
            warnings,
            errors: Vec::new(),
            duration_ms,
            from_cache: false,
            metafile: None,
        }
    }

    /// A failed build. An empty error list is replaced with a generic message
    /// so failures always carry at least one error.
    pub fn failure(mut errors: Vec<String>, warnings: Vec<String>, duration_ms: f64) -> Self {
        if errors.is_empty() {
            errors.push("Build failed".to_string());
        }
        Self {
            status: BuildStatus::Error,
            bundle_code: None,
            warnings,
            errors,
            bytes: 0,
            duration_ms,
            from_cache: false,
            metafile: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == BuildStatus::Ok
    }

    /// The bundle text, or the build's errors as an [`Error::CompileDiagnostic`].
    pub fn into_bundle(self) -> Result<String> {
        match (self.status, self.bundle_code) {
            (BuildStatus::Ok, Some(code)) => Ok(code),
            _ => Err(Error::CompileDiagnostic(self.errors)),
        }
    }
}
