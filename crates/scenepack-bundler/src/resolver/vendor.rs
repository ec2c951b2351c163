use std::sync::Arc;

use super::{Resolution, ResolveError, Resolver};
use crate::vendor::VendorMap;

/// Redirects bare imports of vendored packages to their asset URLs.
#[derive(Debug, Clone)]
pub struct VendorResolver {
    vendor: Arc<VendorMap>,
}

impl VendorResolver {
    pub fn new(vendor: Arc<VendorMap>) -> Self {
        Self { vendor }
    }
}

impl Resolver for VendorResolver {
    fn name(&self) -> &'static str {
        "vendor"
    }

    fn resolve(
        &self,
        specifier: &str,
        _importer: Option<&str>,
    ) -> Result<Option<Resolution>, ResolveError> {
        if is_path_like(specifier) {
            return Ok(None);
        }

        Ok(self.vendor.lookup(specifier).map(|(_, url)| Resolution::External {
            url: url.to_string(),
        }))
    }
}

pub(super) fn is_path_like(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/')
}
