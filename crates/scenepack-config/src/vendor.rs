//! Built-in vendor asset table.
//!
//! Bare package imports listed here are never bundled. They are rewritten to
//! a URL under [`VENDOR_SCHEME`], which the app's asset server answers with a
//! pre-built, self-contained bundle for that package.

use indexmap::IndexMap;

/// URL scheme the host's asset server registers for vendor bundles.
pub const VENDOR_SCHEME: &str = "vendor://";

const DEFAULT_VENDORS: &[(&str, &str)] = &[
    ("react", "react.js"),
    ("react-dom", "react-dom.js"),
    ("three", "three.js"),
    ("@react-three/fiber", "react-three-fiber.js"),
    ("@react-three/drei", "react-three-drei.js"),
    ("@babylonjs/core", "babylonjs-core.js"),
    ("@babylonjs/gui", "babylonjs-gui.js"),
    ("@babylonjs/loaders", "babylonjs-loaders.js"),
    ("reactylon", "reactylon.js"),
    ("aframe", "aframe.js"),
];

/// The vendor table shipped with the app.
pub fn default_vendor_table() -> IndexMap<String, String> {
    DEFAULT_VENDORS
        .iter()
        .map(|(name, file)| (name.to_string(), format!("{VENDOR_SCHEME}{file}")))
        .collect()
}
