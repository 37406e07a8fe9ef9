// Element registry - Symbolic element names mapped to locator descriptors
//
// One registry per page. It is filled while the page is built and only read
// afterwards, so lookups never wait and never touch a session.

use crate::error::{Error, Result};
use crate::locator::LocatorDescriptor;
use std::collections::HashMap;

/// Mapping from human-readable element names to locator descriptors.
///
/// # Example
///
/// ```ignore
/// use stepwright::{ElementRegistry, LocatorDescriptor};
///
/// let mut registry = ElementRegistry::new("Login");
/// registry.register("Username", LocatorDescriptor::id("username"))?;
/// registry.register("Submit", LocatorDescriptor::id("submit"))?;
///
/// assert_eq!(registry.resolve("Submit")?, &LocatorDescriptor::id("submit"));
/// assert!(registry.register("Submit", LocatorDescriptor::css("#submit")).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ElementRegistry {
    page: String,
    elements: HashMap<String, LocatorDescriptor>,
}

impl ElementRegistry {
    /// Creates an empty registry for the named page
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            elements: HashMap::new(),
        }
    }

    /// Name of the page this registry belongs to
    pub fn page(&self) -> &str {
        &self.page
    }

    /// Adds an element.
    ///
    /// Fails with [`Error::DuplicateName`] if `name` is already registered,
    /// whether or not the descriptors agree. The registry is left unchanged.
    pub fn register(&mut self, name: impl Into<String>, descriptor: LocatorDescriptor) -> Result<()> {
        let name = name.into();
        if let Some(existing) = self.elements.get(&name) {
            return Err(Error::DuplicateName {
                page: self.page.clone(),
                name,
                existing: existing.clone(),
                attempted: descriptor,
            });
        }
        tracing::trace!(page = %self.page, element = %name, locator = %descriptor, "Registered element");
        self.elements.insert(name, descriptor);
        Ok(())
    }

    /// Looks up the descriptor for `name`.
    ///
    /// Fails with [`Error::UnknownElement`] if the page has no such element.
    pub fn resolve(&self, name: &str) -> Result<&LocatorDescriptor> {
        self.elements.get(name).ok_or_else(|| Error::UnknownElement {
            page: self.page.clone(),
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.elements.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Registered element names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.elements.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_registry() -> ElementRegistry {
        let mut registry = ElementRegistry::new("Login");
        registry
            .register("Username", LocatorDescriptor::id("username"))
            .unwrap();
        registry
            .register("Password", LocatorDescriptor::id("password"))
            .unwrap();
        registry
            .register("Submit", LocatorDescriptor::id("submit"))
            .unwrap();
        registry
    }

    #[test]
    fn test_resolve_returns_registered_descriptor() {
        let registry = login_registry();
        let pairs = [
            ("Username", LocatorDescriptor::id("username")),
            ("Password", LocatorDescriptor::id("password")),
            ("Submit", LocatorDescriptor::id("submit")),
        ];
        for (name, descriptor) in pairs {
            assert_eq!(registry.resolve(name).unwrap(), &descriptor);
        }
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names(), vec!["Password", "Submit", "Username"]);
    }

    #[test]
    fn test_duplicate_name_leaves_registry_unchanged() {
        let mut registry = login_registry();

        let err = registry
            .register("Submit", LocatorDescriptor::css("#loop-container button"))
            .unwrap_err();
        match err {
            Error::DuplicateName {
                page,
                name,
                existing,
                attempted,
            } => {
                assert_eq!(page, "Login");
                assert_eq!(name, "Submit");
                assert_eq!(existing, LocatorDescriptor::id("submit"));
                assert_eq!(attempted, LocatorDescriptor::css("#loop-container button"));
            }
            other => panic!("expected DuplicateName, got {other:?}"),
        }

        // Same descriptor again is still a duplicate
        assert!(matches!(
            registry.register("Submit", LocatorDescriptor::id("submit")),
            Err(Error::DuplicateName { .. })
        ));

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.resolve("Submit").unwrap(), &LocatorDescriptor::id("submit"));
    }

    #[test]
    fn test_unknown_element() {
        let registry = login_registry();
        let err = registry.resolve("Logout").unwrap_err();
        assert_eq!(err.to_string(), "Unknown element 'Logout' on page 'Login'");
        assert!(!registry.contains("Logout"));
    }
}
