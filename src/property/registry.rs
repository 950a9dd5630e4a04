//! Name-keyed, insertion-ordered collection of property holders

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::PropertyError;
use crate::property::holder::PropertyHolder;
use crate::store::{ConfigurationContainer, StoreOutcome};

/// Registry of named properties. Registration happens once at setup time;
/// afterwards the registry is the lookup surface the command layer talks to.
/// Listing order is registration order.
#[derive(Default)]
pub struct PropertyRegistry {
    entries: Vec<(String, PropertyHolder)>,
}

impl PropertyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a holder under a unique name. Names are immutable once
    /// registered; a duplicate registration is a setup bug and panics.
    pub fn register(&mut self, name: impl Into<String>, holder: PropertyHolder) {
        let name = name.into();
        assert!(
            !self.entries.iter().any(|(n, _)| *n == name),
            "property '{name}' registered twice"
        );
        self.entries.push((name, holder));
    }

    pub fn get(&self, name: &str) -> Option<&PropertyHolder> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, h)| h)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut PropertyHolder> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, h)| h)
    }

    /// Set a property through its holder's validator. An unregistered name
    /// fails with [`PropertyError::UnknownProperty`] and mutates nothing;
    /// otherwise the holder's result is propagated as-is.
    pub fn set_property(&mut self, name: &str, raw: &str) -> Result<String, PropertyError> {
        match self.get_mut(name) {
            Some(holder) => holder.set_value(raw),
            None => Err(PropertyError::UnknownProperty(name.to_string())),
        }
    }

    /// Re-apply a property's default, subject to normal validation.
    pub fn reset_property(&mut self, name: &str) -> Result<String, PropertyError> {
        match self.get_mut(name) {
            Some(holder) => holder.reset(),
            None => Err(PropertyError::UnknownProperty(name.to_string())),
        }
    }

    /// Properties in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyHolder)> {
        self.entries.iter().map(|(n, h)| (n.as_str(), h))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current canonical value of every holder, keyed by name.
    pub fn current_values(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(n, h)| (n.clone(), h.value().to_string()))
            .collect()
    }

    /// Startup hook: load the container's property map and apply each entry.
    /// Unknown names and invalid values are dropped silently; a stale or
    /// hand-edited config file must never break startup.
    pub fn load_from(&mut self, container: &mut ConfigurationContainer) {
        let stored = container.read_properties(None);
        for (name, raw) in &stored {
            if let Err(err) = self.set_property(name, raw) {
                debug!(%name, %err, "dropping stored property");
            }
        }
    }

    /// Shutdown hook: persist every holder's current value with merge
    /// enabled. Store failures are reported as warnings, never raised.
    pub fn store_to(&self, container: &mut ConfigurationContainer, comment: &str) {
        match container.store_properties(&self.current_values(), true, comment) {
            Ok(StoreOutcome::Written) => debug!("settings persisted"),
            Ok(StoreOutcome::Unchanged) => debug!("settings unchanged, skipping write"),
            Err(err) => warn!(%err, "failed to persist settings"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_registry() -> PropertyRegistry {
        let mut reg = PropertyRegistry::new();
        reg.register("color", PropertyHolder::boolean(true, "colored output"));
        reg.register(
            "format",
            PropertyHolder::enumerated(["table", "vertical", "csv"], "table", "output format"),
        );
        reg.register("prompt", PropertyHolder::string("> ", "prompt text"));
        reg
    }

    #[test]
    fn unknown_property_fails_without_mutation() {
        let mut reg = sample_registry();
        let before = reg.current_values();
        assert_eq!(
            reg.set_property("nope", "x").unwrap_err(),
            PropertyError::UnknownProperty("nope".to_string())
        );
        assert_eq!(reg.current_values(), before);
    }

    #[test]
    fn set_property_delegates_to_holder() {
        let mut reg = sample_registry();
        assert_eq!(reg.set_property("format", "cs").unwrap(), "csv");
        assert_eq!(reg.get("format").unwrap().value(), "csv");
        assert!(matches!(
            reg.set_property("format", "x").unwrap_err(),
            PropertyError::NoMatch { .. }
        ));
    }

    #[test]
    fn iteration_preserves_registration_order() {
        let reg = sample_registry();
        let names: Vec<&str> = reg.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["color", "format", "prompt"]);
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn duplicate_registration_panics() {
        let mut reg = sample_registry();
        reg.register("color", PropertyHolder::boolean(false, "dup"));
    }

    #[test]
    fn reset_property_restores_default() {
        let mut reg = sample_registry();
        reg.set_property("color", "off").unwrap();
        assert_eq!(reg.reset_property("color").unwrap(), "true");
        assert_eq!(reg.get("color").unwrap().value(), "true");
    }
}
