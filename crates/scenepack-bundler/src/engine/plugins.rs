//! Rolldown adapters for the resolver and loader strategies.

use std::borrow::Cow;
use std::sync::Arc;

use rolldown_common::{ModuleType, ResolvedExternal};
use rolldown_plugin::{
    HookLoadArgs, HookLoadOutput, HookLoadReturn, HookResolveIdArgs, HookResolveIdOutput,
    HookResolveIdReturn, HookUsage, Plugin, PluginContext,
};

use super::registry::{PhasedPlugin, PluginPhase};
use crate::loader::{Loader, ModuleLoader};
use crate::resolver::{
    Resolution, ResolverChain, VendorResolver, VirtualFileSystem, VirtualFsResolver,
};
use crate::vendor::VendorMap;

fn resolved(resolution: Resolution) -> HookResolveIdOutput {
    let external = resolution.is_external();
    let id = match resolution {
        Resolution::External { url } => url,
        Resolution::Virtual { path } => path,
    };
    HookResolveIdOutput {
        id: id.into(),
        external: Some(ResolvedExternal::Bool(external)),
        ..Default::default()
    }
}

fn module_type(loader: Loader) -> ModuleType {
    match loader {
        Loader::Js => ModuleType::Js,
        Loader::Jsx => ModuleType::Jsx,
        Loader::Ts => ModuleType::Ts,
        Loader::Tsx => ModuleType::Tsx,
    }
}

/// Ids owned by the engine or other plugins (`\0`-prefixed, `rolldown:`).
fn is_internal_id(id: &str) -> bool {
    id.starts_with('\0') || id.starts_with("rolldown:")
}

/// Resolves every import through a [`ResolverChain`]: vendored packages
/// first, then the request's virtual file system.
///
/// The virtual FS strategy is terminal, so a specifier neither can place
/// fails the build with a "file not found in virtual file system" error.
#[derive(Debug, Clone)]
pub struct ResolvePlugin {
    chain: ResolverChain,
}

impl ResolvePlugin {
    pub fn new(vendor: Arc<VendorMap>, fs: Arc<VirtualFileSystem>) -> Self {
        Self {
            chain: ResolverChain::new()
                .with(VendorResolver::new(vendor))
                .with(VirtualFsResolver::new(fs)),
        }
    }

    pub fn resolver_names(&self) -> Vec<&'static str> {
        self.chain.names()
    }
}

impl Plugin for ResolvePlugin {
    fn name(&self) -> Cow<'static, str> {
        "scenepack:resolve".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::ResolveId
    }

    fn resolve_id(
        &self,
        _ctx: &PluginContext,
        args: &HookResolveIdArgs,
    ) -> impl std::future::Future<Output = HookResolveIdReturn> + Send {
        let result = if is_internal_id(args.specifier) {
            Ok(None)
        } else {
            self.chain.resolve(args.specifier, args.importer).map(Some)
        };

        async move {
            match result {
                Ok(resolution) => Ok(resolution.map(resolved)),
                Err(err) => Err(err.into()),
            }
        }
    }
}

impl PhasedPlugin for ResolvePlugin {
    fn phase(&self) -> PluginPhase {
        PluginPhase::Resolve
    }
}

/// Loads modules from the request's virtual file system, picking the parser
/// per file extension and framework.
#[derive(Debug, Clone)]
pub struct VirtualFsPlugin {
    fs: Arc<VirtualFileSystem>,
}

impl VirtualFsPlugin {
    pub fn new(fs: Arc<VirtualFileSystem>) -> Self {
        Self { fs }
    }
}

impl Plugin for VirtualFsPlugin {
    fn name(&self) -> Cow<'static, str> {
        "scenepack:virtual-fs".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::Load
    }

    fn load(
        &self,
        _ctx: &PluginContext,
        args: &HookLoadArgs<'_>,
    ) -> impl std::future::Future<Output = HookLoadReturn> + Send {
        let loaded = self.fs.load(args.id);

        async move {
            Ok(loaded.map(|module| HookLoadOutput {
                code: module.code.into(),
                module_type: Some(module_type(module.loader)),
                ..Default::default()
            }))
        }
    }
}

impl PhasedPlugin for VirtualFsPlugin {
    fn phase(&self) -> PluginPhase {
        PluginPhase::Load
    }
}
