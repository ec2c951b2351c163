//! Vendor table: package names served as pre-built assets instead of bundled.

use indexmap::IndexMap;

use crate::{Error, Result};

/// Maps bare package names to the asset URL the preview host serves them at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorMap {
    packages: IndexMap<String, String>,
}

impl VendorMap {
    /// Build a vendor map, rejecting entries that could never match a bare
    /// import (empty or path-like names, empty URLs).
    pub fn new<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut packages = IndexMap::new();
        for (name, url) in entries {
            let name = name.into();
            let url = url.into();
            if name.is_empty() || name.starts_with('.') || name.starts_with('/') {
                return Err(Error::InvalidConfig(format!(
                    "vendor package name '{}' is not a bare specifier",
                    name
                )));
            }
            if url.is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "vendor package '{}' has an empty URL",
                    name
                )));
            }
            packages.insert(name, url);
        }
        Ok(Self { packages })
    }

    pub fn get(&self, package: &str) -> Option<&str> {
        self.packages.get(package).map(String::as_str)
    }

    /// Find the vendored package a specifier refers to.
    ///
    /// Exact names match first. Otherwise the longest table key that is a
    /// `/`-separated prefix of the specifier wins, so `@react-three/drei/core`
    /// maps to `@react-three/drei`.
    pub fn lookup<'a>(&'a self, specifier: &str) -> Option<(&'a str, &'a str)> {
        if let Some((name, url)) = self.packages.get_key_value(specifier) {
            return Some((name.as_str(), url.as_str()));
        }

        specifier
            .rmatch_indices('/')
            .filter_map(|(idx, _)| self.packages.get_key_value(&specifier[..idx]))
            .map(|(name, url)| (name.as_str(), url.as_str()))
            .next()
    }

    /// Global variable the IIFE output reads a vendored package from.
    ///
    /// `@react-three/fiber` becomes `ReactThreeFiber`, `three` becomes `Three`.
    pub fn global_name(package: &str) -> String {
        package
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                let mut chars = segment.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.packages.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
