//! Loader selection for virtual modules.

use crate::framework::Framework;

/// Syntax the compiler parses a module with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Loader {
    Js,
    Jsx,
    Ts,
    Tsx,
}

impl Loader {
    /// Pick the loader for `path` by extension.
    ///
    /// `.js` and unrecognised extensions are plain JavaScript, except under
    /// React-based frameworks where scene components are routinely written
    /// as JSX in `.js` files.
    pub fn select(path: &str, framework: &Framework) -> Self {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let extension = file_name.rsplit_once('.').map(|(_, ext)| ext);

        match extension {
            Some("tsx") => Loader::Tsx,
            Some("ts") | Some("mts") | Some("cts") => Loader::Ts,
            Some("jsx") => Loader::Jsx,
            _ if framework.uses_jsx() => Loader::Jsx,
            _ => Loader::Js,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Loader::Js => "js",
            Loader::Jsx => "jsx",
            Loader::Ts => "ts",
            Loader::Tsx => "tsx",
        }
    }
}

/// A module's source text together with the loader it should be parsed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedModule {
    pub code: String,
    pub loader: Loader,
}

/// Strategy for producing module sources from resolved paths.
pub trait ModuleLoader: Send + Sync {
    /// Load `path`, or `None` when this loader does not own it.
    fn load(&self, path: &str) -> Option<LoadedModule>;
}
