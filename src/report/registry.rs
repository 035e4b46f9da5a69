use std::collections::BTreeMap;

use super::{ReportPlugin, UsagePlugin};
use crate::store::Dataset;

/// Factory producing a plugin bound to a loaded dataset
pub type PluginFactory = for<'a> fn(&'a Dataset) -> Box<dyn ReportPlugin + 'a>;

/// Named report plugins.
///
/// Plugins are registered under a short name and instantiated per dataset,
/// so a single registry serves any number of report runs.
pub struct ReportRegistry {
    plugins: BTreeMap<&'static str, PluginFactory>,
}

impl ReportRegistry {
    /// Registry with the built-in plugins
    pub fn new() -> Self {
        let mut registry = Self {
            plugins: BTreeMap::new(),
        };
        registry.register("usage", make_usage);
        registry
    }

    pub fn register(&mut self, name: &'static str, factory: PluginFactory) {
        self.plugins.insert(name, factory);
    }

    /// Instantiate a plugin over a dataset
    pub fn get<'a>(&self, name: &str, data: &'a Dataset) -> Option<Box<dyn ReportPlugin + 'a>> {
        self.plugins.get(name).map(|factory| factory(data))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.keys().copied().collect()
    }
}

impl Default for ReportRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn make_usage(data: &Dataset) -> Box<dyn ReportPlugin + '_> {
    Box::new(UsagePlugin::new(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_usage_plugin() {
        let registry = ReportRegistry::new();
        assert_eq!(registry.names(), ["usage"]);

        let data = Dataset::new();
        assert!(registry.get("usage", &data).is_some());
        assert!(registry.get("nonexistent", &data).is_none());
    }
}
