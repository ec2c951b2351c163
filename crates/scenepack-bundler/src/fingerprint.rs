//! Content-addressed request fingerprints (BLAKE3).
//!
//! The fingerprint covers framework, entry, every file path and content,
//! every define, and the minify flag. Maps are hashed in sorted key order so
//! insertion order never changes the result.

use blake3::Hasher;
use rustc_hash::FxHashMap;

use crate::request::BuildRequest;

/// Bumped whenever the hashed layout changes.
const FINGERPRINT_VERSION: u32 = 1;

/// Cache key for a [`BuildRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn fingerprint(request: &BuildRequest) -> Fingerprint {
    let mut hasher = Hasher::new();

    hasher.update(&FINGERPRINT_VERSION.to_le_bytes());

    hash_str(&mut hasher, request.framework.as_str());
    hash_str(&mut hasher, &request.entry);
    hash_sorted(&mut hasher, b"files", &request.files);
    hash_sorted(&mut hasher, b"defines", &request.defines);
    hasher.update(&[u8::from(request.minify)]);

    Fingerprint(hasher.finalize().to_hex().to_string())
}

/// Length-prefixed so adjacent fields can't bleed into each other.
fn hash_str(hasher: &mut Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

fn hash_sorted(hasher: &mut Hasher, section: &[u8], map: &FxHashMap<String, String>) {
    hasher.update(section);
    hasher.update(&(map.len() as u64).to_le_bytes());

    let mut keys: Vec<_> = map.keys().collect();
    keys.sort();

    for key in keys {
        hash_str(hasher, key);
        hasher.update(blake3::hash(map[key].as_bytes()).as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::Framework;
    use proptest::prelude::*;

    fn base() -> BuildRequest {
        BuildRequest::new(Framework::ThreeJs, "/src/index.js")
            .file("/src/index.js", "import './a.js';")
            .file("/src/a.js", "export const a = 1;")
            .define("DEBUG", "false")
    }

    #[test]
    fn identical_requests_match() {
        assert_eq!(fingerprint(&base()), fingerprint(&base()));
        assert_eq!(fingerprint(&base()).as_hex().len(), 64);
    }

    #[test]
    fn every_field_participates() {
        let original = fingerprint(&base());

        let mut framework = base();
        framework.framework = Framework::BabylonJs;
        assert_ne!(fingerprint(&framework), original);

        let mut entry = base();
        entry.entry = "/src/a.js".into();
        assert_ne!(fingerprint(&entry), original);

        assert_ne!(fingerprint(&base().file("/src/a.js", "export const a = 2;")), original);
        assert_ne!(fingerprint(&base().define("DEBUG", "true")), original);
        assert_ne!(fingerprint(&base().minify(true)), original);
    }

    #[test]
    fn metafile_flag_is_ignored() {
        assert_eq!(fingerprint(&base().with_metafile(true)), fingerprint(&base()));
    }

    #[test]
    fn path_and_content_boundaries_are_distinct() {
        let a = BuildRequest::new(Framework::ThreeJs, "/a").file("/ab", "c");
        let b = BuildRequest::new(Framework::ThreeJs, "/a").file("/a", "bc");
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    proptest! {
        #[test]
        fn insertion_order_is_irrelevant(
            files in prop::collection::vec(("/[a-z]{1,8}\\.js", "[ -~]{0,32}"), 1..12),
            defines in prop::collection::vec(("[A-Z_]{1,8}", "[a-z0-9\"]{0,8}"), 0..6),
        ) {
            let build = |files: &[(String, String)], defines: &[(String, String)]| {
                let mut request = BuildRequest::new(Framework::Reactylon, "/index.js");
                for (path, source) in files {
                    request = request.file(path.clone(), source.clone());
                }
                for (name, value) in defines {
                    request = request.define(name.clone(), value.clone());
                }
                request
            };

            // Dedupe first so reversed insertion keeps the same final values.
            let dedupe = |pairs: Vec<(String, String)>| {
                let mut map = indexmap::IndexMap::new();
                for (k, v) in pairs {
                    map.insert(k, v);
                }
                map.into_iter().collect::<Vec<_>>()
            };
            let files = dedupe(files);
            let defines = dedupe(defines);

            let forward = build(&files, &defines);
            let mut rev_files = files.clone();
            rev_files.reverse();
            let mut rev_defines = defines.clone();
            rev_defines.reverse();
            let reversed = build(&rev_files, &rev_defines);

            prop_assert_eq!(fingerprint(&forward), fingerprint(&reversed));
        }
    }
}
