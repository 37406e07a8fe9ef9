// Page - Generic page object
//
// A page is nothing but a name, where it lives, what its title should be and
// the registry of its elements. Behavior lives in the engine and the step
// vocabulary, never in per-page code.

use crate::error::{Error, Result};
use crate::locator::LocatorDescriptor;
use crate::registry::ElementRegistry;
use serde::Deserialize;

/// A page under test, parameterized only by its element registry.
///
/// # Example
///
/// ```ignore
/// use stepwright::{LocatorDescriptor, Page};
///
/// let login = Page::builder("Login")
///     .url("https://practicetestautomation.com/practice-test-login/")
///     .title("Test Login | Practice Test Automation")
///     .element("Username", LocatorDescriptor::id("username"))
///     .element("Password", LocatorDescriptor::id("password"))
///     .element("Submit", LocatorDescriptor::id("submit"))
///     .build()?;
///
/// assert_eq!(login.registry().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Page {
    name: String,
    url: Option<String>,
    title: Option<String>,
    registry: ElementRegistry,
}

impl Page {
    /// Starts building a page with the given name
    pub fn builder(name: impl Into<String>) -> PageBuilder {
        PageBuilder::new(name)
    }

    /// Wraps an already populated registry; the page takes the registry's name
    pub fn from_registry(registry: ElementRegistry) -> Self {
        Self {
            name: registry.page().to_string(),
            url: None,
            title: None,
            registry,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Expected document title
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Elements of this page. Read-only once the page is built.
    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    /// Resolves a symbolic element name on this page
    pub fn locator(&self, element: &str) -> Result<&LocatorDescriptor> {
        self.registry.resolve(element)
    }
}

/// Builder for [`Page`]
///
/// Element registration errors are deferred to [`PageBuilder::build`] so the
/// builder can be chained.
#[derive(Debug, Clone)]
pub struct PageBuilder {
    name: String,
    url: Option<String>,
    title: Option<String>,
    elements: Vec<(String, LocatorDescriptor)>,
}

impl PageBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
            title: None,
            elements: Vec::new(),
        }
    }

    /// Set the page URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the expected document title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add an element
    pub fn element(mut self, name: impl Into<String>, descriptor: LocatorDescriptor) -> Self {
        self.elements.push((name.into(), descriptor));
        self
    }

    /// Build the page.
    ///
    /// Fails on an unparseable URL or an element name used twice.
    pub fn build(self) -> Result<Page> {
        if let Some(url) = &self.url {
            url::Url::parse(url).map_err(|e| {
                Error::Config(format!("Page '{}' has an invalid URL '{url}': {e}", self.name))
            })?;
        }

        let mut registry = ElementRegistry::new(self.name.clone());
        for (name, descriptor) in self.elements {
            registry.register(name, descriptor)?;
        }

        Ok(Page {
            name: self.name,
            url: self.url,
            title: self.title,
            registry,
        })
    }
}

/// Serialized page definition, as found in locator data files
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageSpec {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub elements: Vec<ElementSpec>,
}

/// Serialized element definition
#[derive(Debug, Clone, Deserialize)]
pub struct ElementSpec {
    pub name: String,
    #[serde(flatten)]
    pub locator: LocatorDescriptor,
}

impl TryFrom<PageSpec> for Page {
    type Error = Error;

    fn try_from(spec: PageSpec) -> Result<Self> {
        let mut builder = Page::builder(spec.name);
        if let Some(url) = spec.url {
            builder = builder.url(url);
        }
        if let Some(title) = spec.title {
            builder = builder.title(title);
        }
        for element in spec.elements {
            builder = builder.element(element.name, element.locator);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_registers_elements() {
        let page = Page::builder("Login")
            .url("https://practicetestautomation.com/practice-test-login/")
            .title("Test Login | Practice Test Automation")
            .element("Username", LocatorDescriptor::id("username"))
            .element("Submit", LocatorDescriptor::id("submit"))
            .build()
            .unwrap();

        assert_eq!(page.name(), "Login");
        assert_eq!(page.registry().page(), "Login");
        assert_eq!(page.locator("Submit").unwrap(), &LocatorDescriptor::id("submit"));
        assert_eq!(page.title(), Some("Test Login | Practice Test Automation"));
    }

    #[test]
    fn test_builder_rejects_conflicting_locators() {
        let result = Page::builder("Login")
            .element("Submit", LocatorDescriptor::id("submit"))
            .element("Submit", LocatorDescriptor::css("#form > button:nth-of-type(1)"))
            .build();
        assert!(matches!(result, Err(Error::DuplicateName { .. })));
    }

    #[test]
    fn test_builder_rejects_invalid_url() {
        let result = Page::builder("Login").url("practice-test-login").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_page_spec_conversion() {
        let spec: PageSpec = serde_json::from_str(
            r#"{
                "name": "Example Domain",
                "url": "https://example.com/",
                "elements": [
                    {"name": "Heading", "strategy": "xpath", "value": "//h1[text()='Example Domain']"},
                    {"name": "More Information", "strategy": "link_text", "value": "More information..."}
                ]
            }"#,
        )
        .unwrap();

        let page = Page::try_from(spec).unwrap();
        assert_eq!(page.registry().len(), 2);
        assert_eq!(
            page.locator("More Information").unwrap(),
            &LocatorDescriptor::link_text("More information...")
        );
        assert!(page.title().is_none());
    }
}
