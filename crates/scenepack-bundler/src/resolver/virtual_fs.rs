use std::path::Path;
use std::sync::Arc;

use path_clean::PathClean;
use rustc_hash::FxHashMap;

use super::vendor::is_path_like;
use super::{Resolution, ResolveError, Resolver};
use crate::framework::Framework;
use crate::loader::{LoadedModule, Loader, ModuleLoader};

/// Extensions tried, in order, when an import omits one.
const PROBE_EXTENSIONS: [&str; 4] = ["tsx", "ts", "jsx", "js"];

/// The in-memory file set of a single build.
#[derive(Debug, Clone)]
pub struct VirtualFileSystem {
    files: FxHashMap<String, String>,
    entry: String,
    framework: Framework,
}

impl VirtualFileSystem {
    pub fn new(
        files: FxHashMap<String, String>,
        entry: impl Into<String>,
        framework: Framework,
    ) -> Self {
        Self {
            files,
            entry: entry.into(),
            framework,
        }
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn read(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Join `specifier` onto the directory of `base` and normalize to
    /// `/`-separated form with `.` and `..` segments collapsed.
    pub fn join(base: &str, specifier: &str) -> String {
        let dir = Path::new(base).parent().unwrap_or_else(|| Path::new(""));
        let joined = dir.join(specifier).clean();
        joined.to_string_lossy().replace('\\', "/")
    }

    /// Exact key first, then with each probe extension, then as a directory
    /// index.
    fn probe(&self, path: &str) -> Option<String> {
        if self.contains(path) {
            return Some(path.to_string());
        }

        let trimmed = path.trim_end_matches('/');
        PROBE_EXTENSIONS
            .iter()
            .map(|ext| format!("{}.{}", trimmed, ext))
            .chain(
                PROBE_EXTENSIONS
                    .iter()
                    .map(|ext| format!("{}/index.{}", trimmed, ext)),
            )
            .find(|candidate| self.contains(candidate))
    }
}

impl ModuleLoader for VirtualFileSystem {
    fn load(&self, path: &str) -> Option<LoadedModule> {
        self.read(path).map(|code| LoadedModule {
            code: code.to_string(),
            loader: Loader::select(path, &self.framework),
        })
    }
}

/// Resolves relative and absolute imports against a [`VirtualFileSystem`].
///
/// This is the last strategy in the chain: a specifier it cannot place is a
/// [`ResolveError::NotFound`] naming the path that was looked up.
#[derive(Debug, Clone)]
pub struct VirtualFsResolver {
    fs: Arc<VirtualFileSystem>,
}

impl VirtualFsResolver {
    pub fn new(fs: Arc<VirtualFileSystem>) -> Self {
        Self { fs }
    }
}

impl Resolver for VirtualFsResolver {
    fn name(&self) -> &'static str {
        "virtual-fs"
    }

    fn resolve(
        &self,
        specifier: &str,
        importer: Option<&str>,
    ) -> Result<Option<Resolution>, ResolveError> {
        let candidate = if is_path_like(specifier) && !specifier.starts_with('/') {
            let base = importer.unwrap_or(self.fs.entry());
            VirtualFileSystem::join(base, specifier)
        } else {
            specifier.to_string()
        };

        match self.fs.probe(&candidate) {
            Some(path) => Ok(Some(Resolution::Virtual { path })),
            None => Err(ResolveError::NotFound {
                specifier: specifier.to_string(),
                importer: importer.map(str::to_string),
                path: candidate,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fs(framework: Framework) -> Arc<VirtualFileSystem> {
        let mut files = FxHashMap::default();
        for path in [
            "/src/index.tsx",
            "/src/scene/Box.tsx",
            "/src/scene/lights.ts",
            "/src/utils/index.js",
            "/shared/colors.js",
        ] {
            files.insert(path.to_string(), format!("// {}", path));
        }
        Arc::new(VirtualFileSystem::new(files, "/src/index.tsx", framework))
    }

    fn resolve(specifier: &str, importer: Option<&str>) -> Result<Option<Resolution>, ResolveError> {
        VirtualFsResolver::new(fs(Framework::ThreeJs)).resolve(specifier, importer)
    }

    fn path(resolution: Option<Resolution>) -> String {
        resolution.unwrap().id().to_string()
    }

    #[test]
    fn relative_to_importer_directory() {
        let resolved = resolve("./lights.ts", Some("/src/scene/Box.tsx")).unwrap();
        assert_eq!(path(resolved), "/src/scene/lights.ts");

        let resolved = resolve("../../shared/colors.js", Some("/src/scene/Box.tsx")).unwrap();
        assert_eq!(path(resolved), "/shared/colors.js");
    }

    #[test]
    fn entry_directory_without_importer() {
        assert_eq!(path(resolve("./scene/Box.tsx", None).unwrap()), "/src/scene/Box.tsx");
    }

    #[test]
    fn redundant_segments_are_normalized() {
        let resolved = resolve("./scene/../scene/./Box.tsx", Some("/src/index.tsx")).unwrap();
        assert_eq!(path(resolved), "/src/scene/Box.tsx");
    }

    #[test]
    fn absolute_keys_resolve_directly() {
        assert_eq!(path(resolve("/shared/colors.js", None).unwrap()), "/shared/colors.js");
    }

    #[test]
    fn missing_extensions_and_index_files_are_probed() {
        assert_eq!(path(resolve("./scene/Box", None).unwrap()), "/src/scene/Box.tsx");
        assert_eq!(path(resolve("./utils", None).unwrap()), "/src/utils/index.js");
    }

    #[test]
    fn misses_name_the_normalized_path() {
        let err = resolve("./missing", Some("/src/index.tsx")).unwrap_err();
        assert_eq!(
            err,
            ResolveError::NotFound {
                specifier: "./missing".into(),
                importer: Some("/src/index.tsx".into()),
                path: "/src/missing".into(),
            }
        );
        assert!(err.to_string().contains("file not found in virtual file system: /src/missing"));
    }

    #[test]
    fn loads_with_framework_aware_loader() {
        let fs = fs(Framework::ReactThreeFiber);
        assert_eq!(fs.load("/shared/colors.js").unwrap().loader, Loader::Jsx);
        assert_eq!(fs.load("/src/scene/lights.ts").unwrap().loader, Loader::Ts);
        assert!(fs.load("/nope.js").is_none());
    }
}
