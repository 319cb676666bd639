//! Lookup of resources by name.

use std::sync::Arc;

use super::{Agreements, Flats, Landlords, Resource, Settlements, Tenants};

/// Registered resources, in registration order.
#[derive(Clone, Default)]
pub struct ResourceRegistry {
    resources: Vec<Arc<dyn Resource>>,
}

impl ResourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the five built-in rental resources.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(Landlords));
        registry.register(Arc::new(Flats));
        registry.register(Arc::new(Tenants));
        registry.register(Arc::new(Agreements));
        registry.register(Arc::new(Settlements));
        registry
    }

    /// Register a resource, replacing any resource with the same name.
    pub fn register(&mut self, resource: Arc<dyn Resource>) {
        if let Some(existing) = self
            .resources
            .iter_mut()
            .find(|r| r.name() == resource.name())
        {
            *existing = resource;
        } else {
            self.resources.push(resource);
        }
    }

    /// Get a resource by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Resource>> {
        self.resources.iter().find(|r| r.name() == name).cloned()
    }

    /// Names of all registered resources.
    pub fn names(&self) -> Vec<&str> {
        self.resources.iter().map(|r| r.name()).collect()
    }

    /// Iterate over registered resources.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Resource>> {
        self.resources.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{FieldDef, FieldType};

    struct Renamed;

    static RENAMED_FIELDS: &[FieldDef] = &[FieldDef::new("id", FieldType::Integer)];

    impl Resource for Renamed {
        fn name(&self) -> &str {
            "flats"
        }

        fn fields(&self) -> &[FieldDef] {
            RENAMED_FIELDS
        }
    }

    #[test]
    fn builtin_names() {
        let registry = ResourceRegistry::builtin();
        assert_eq!(
            registry.names(),
            vec!["landlords", "flats", "tenants", "agreements", "settlements"]
        );
        assert!(registry.get("pictures").is_none());
    }

    #[test]
    fn register_replaces_same_name() {
        let mut registry = ResourceRegistry::builtin();
        registry.register(Arc::new(Renamed));

        assert_eq!(registry.names().len(), 5);
        let flats = registry.get("flats");
        assert!(flats.is_some_and(|r| r.fields().len() == 1));
    }
}
