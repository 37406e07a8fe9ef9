// Locator descriptors - How a symbolic element is found in a session
//
// A descriptor is a selector strategy plus the selector string. It carries no
// behavior; sessions translate it into whatever their driver understands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Selector strategy used to find an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Element `id` attribute
    #[serde(rename = "id")]
    Id,
    /// Element `name` attribute
    #[serde(rename = "name")]
    Name,
    /// CSS selector
    #[serde(rename = "css_selector", alias = "css")]
    CssSelector,
    /// XPath expression
    #[serde(rename = "xpath")]
    XPath,
    /// Exact text of a link
    #[serde(rename = "link_text", alias = "link")]
    LinkText,
}

impl Strategy {
    /// Short prefix used when displaying a descriptor
    pub fn prefix(&self) -> &'static str {
        match self {
            Strategy::Id => "id",
            Strategy::Name => "name",
            Strategy::CssSelector => "css",
            Strategy::XPath => "xpath",
            Strategy::LinkText => "link",
        }
    }
}

/// Selector strategy plus selector string for one element.
///
/// # Example
///
/// ```ignore
/// use stepwright::LocatorDescriptor;
///
/// let submit = LocatorDescriptor::id("submit");
/// assert_eq!(submit.to_string(), "id=submit");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocatorDescriptor {
    strategy: Strategy,
    value: String,
}

impl LocatorDescriptor {
    /// Creates a descriptor from a strategy and selector string
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    pub fn id(value: impl Into<String>) -> Self {
        Self::new(Strategy::Id, value)
    }

    pub fn name(value: impl Into<String>) -> Self {
        Self::new(Strategy::Name, value)
    }

    pub fn css(value: impl Into<String>) -> Self {
        Self::new(Strategy::CssSelector, value)
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, value)
    }

    pub fn link_text(value: impl Into<String>) -> Self {
        Self::new(Strategy::LinkText, value)
    }

    /// Returns the selector strategy
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Returns the selector string
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for LocatorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy.prefix(), self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_short_prefix() {
        assert_eq!(LocatorDescriptor::id("username").to_string(), "id=username");
        assert_eq!(
            LocatorDescriptor::xpath("//h1[text()='Example Domain']").to_string(),
            "xpath=//h1[text()='Example Domain']"
        );
        assert_eq!(
            LocatorDescriptor::link_text("More information...").to_string(),
            "link=More information..."
        );
    }

    #[test]
    fn test_strategy_accepts_aliases() {
        let css: LocatorDescriptor =
            serde_json::from_str(r#"{"strategy": "css", "value": ".error-message"}"#).unwrap();
        assert_eq!(css, LocatorDescriptor::css(".error-message"));

        let link: LocatorDescriptor =
            serde_json::from_str(r#"{"strategy": "link", "value": "Blog"}"#).unwrap();
        assert_eq!(link.strategy(), Strategy::LinkText);

        let json = serde_json::to_value(LocatorDescriptor::css("#btn")).unwrap();
        assert_eq!(json["strategy"], "css_selector");
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let result: Result<LocatorDescriptor, _> =
            serde_json::from_str(r#"{"strategy": "tag", "value": "button"}"#);
        assert!(result.is_err());
    }
}
