//! Plugin registry with execution phases.

use std::sync::Arc;

use rolldown_plugin::{__inner::SharedPluginable, Plugin};

/// Plugins run in phase order, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum PluginPhase {
    /// Import resolution (vendor table, then virtual files).
    Resolve = 0,
    /// Module source from the request's virtual file system.
    Load = 10,
}

/// A plugin that knows which phase it belongs to.
pub(crate) trait PhasedPlugin: Plugin {
    fn phase(&self) -> PluginPhase;
}

#[derive(Default)]
pub(crate) struct PluginRegistry {
    plugins: Vec<(PluginPhase, String, SharedPluginable)>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<P: PhasedPlugin + 'static>(&mut self, plugin: P) {
        let phase = plugin.phase();
        let name = plugin.name().into_owned();
        self.plugins.push((phase, name, Arc::new(plugin)));
        // Stable sort: same-phase plugins keep insertion order.
        self.plugins.sort_by_key(|(phase, _, _)| *phase);
    }

    /// Plugin names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|(_, name, _)| name.as_str()).collect()
    }

    pub fn into_rolldown_plugins(self) -> Vec<SharedPluginable> {
        self.plugins.into_iter().map(|(_, _, plugin)| plugin).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::plugins::{ResolvePlugin, VirtualFsPlugin};
    use crate::framework::Framework;
    use crate::resolver::VirtualFileSystem;
    use crate::vendor::VendorMap;

    #[test]
    fn resolution_is_ordered_before_loading() {
        let fs = Arc::new(VirtualFileSystem::new(
            Default::default(),
            "/index.js",
            Framework::ThreeJs,
        ));
        let mut registry = PluginRegistry::new();
        // Added out of order on purpose.
        registry.add(VirtualFsPlugin::new(Arc::clone(&fs)));
        registry.add(ResolvePlugin::new(Arc::new(VendorMap::default()), fs));

        assert_eq!(registry.names(), vec!["scenepack:resolve", "scenepack:virtual-fs"]);
        assert_eq!(registry.into_rolldown_plugins().len(), 2);
    }
}
