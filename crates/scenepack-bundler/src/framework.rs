//! Target frameworks a preview can be written for.

use serde::{Deserialize, Serialize};

/// The UI framework the submitted scene code targets.
///
/// Unrecognised names are kept as [`Framework::Other`] and compiled like a
/// plain script framework rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Framework {
    ThreeJs,
    BabylonJs,
    ReactThreeFiber,
    Reactylon,
    AFrame,
    Other(String),
}

impl Framework {
    /// Every framework with built-in support, in announcement order.
    pub fn known() -> [Framework; 5] {
        [
            Framework::ThreeJs,
            Framework::BabylonJs,
            Framework::ReactThreeFiber,
            Framework::Reactylon,
            Framework::AFrame,
        ]
    }

    pub fn as_str(&self) -> &str {
        match self {
            Framework::ThreeJs => "threejs",
            Framework::BabylonJs => "babylonjs",
            Framework::ReactThreeFiber => "reactThreeFiber",
            Framework::Reactylon => "reactylon",
            Framework::AFrame => "aframe",
            Framework::Other(name) => name,
        }
    }

    /// React-based renderers, whose sources are JSX even in `.js` files.
    pub fn uses_jsx(&self) -> bool {
        matches!(self, Framework::ReactThreeFiber | Framework::Reactylon)
    }
}

impl From<&str> for Framework {
    fn from(name: &str) -> Self {
        match name {
            "threejs" => Framework::ThreeJs,
            "babylonjs" => Framework::BabylonJs,
            "reactThreeFiber" => Framework::ReactThreeFiber,
            "reactylon" => Framework::Reactylon,
            "aframe" => Framework::AFrame,
            other => Framework::Other(other.to_string()),
        }
    }
}

impl From<String> for Framework {
    fn from(name: String) -> Self {
        Framework::from(name.as_str())
    }
}

impl From<Framework> for String {
    fn from(framework: Framework) -> Self {
        match framework {
            Framework::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
