// Session - Borrowed handle to a live browser context
//
// The engine never creates or closes sessions. Whoever launched the browser
// owns it; the engine only borrows `&dyn Session` for the duration of a call.
//
// Architecture:
// - `Session` is the seam between stepwright and a concrete browser driver
// - `SessionProvider` launches and closes sessions from `LaunchOptions`
// - Drivers report failures as `SessionError`, which the engine classifies
//   into transient (keep polling) and hard (stop with `NotFound`)

use crate::api::LaunchOptions;
use crate::error::Result;
use crate::locator::LocatorDescriptor;
use async_trait::async_trait;
use thiserror::Error;

/// What a single probe observed about an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    /// No element matches the locator
    Detached,
    /// The element exists but is not rendered visibly
    Hidden,
    /// Visible, but would not accept input (disabled, obscured)
    Visible,
    /// Visible and ready for clicks and typing
    Interactable,
}

impl ElementState {
    pub fn is_present(&self) -> bool {
        !matches!(self, ElementState::Detached)
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, ElementState::Visible | ElementState::Interactable)
    }

    pub fn is_interactable(&self) -> bool {
        matches!(self, ElementState::Interactable)
    }
}

/// Failures reported by a session implementation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// No element matched (yet)
    #[error("no such element")]
    NoSuchElement,

    /// The element was replaced in the DOM between lookup and action
    #[error("stale element reference")]
    StaleElement,

    /// Another element would receive the click (overlay, animation)
    #[error("element is obscured: {0}")]
    Obscured(String),

    /// The driver refused the selector itself
    #[error("invalid locator: {0}")]
    InvalidLocator(String),

    /// The browser or driver connection is gone
    #[error("session disconnected: {0}")]
    Disconnected(String),
}

impl SessionError {
    /// Whether the condition may clear up by itself while polling
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SessionError::NoSuchElement | SessionError::StaleElement | SessionError::Obscured(_)
        )
    }
}

/// Live browser context the engine acts through.
///
/// Implementations answer each call with one round trip and no waiting of
/// their own; explicit waits belong to the engine.
#[async_trait]
pub trait Session: Send + Sync {
    /// Reports the current state of the element matching `locator`
    async fn probe(&self, locator: &LocatorDescriptor) -> std::result::Result<ElementState, SessionError>;

    /// Clicks the element
    async fn click(&self, locator: &LocatorDescriptor) -> std::result::Result<(), SessionError>;

    /// Removes the current content of an editable element
    async fn clear(&self, locator: &LocatorDescriptor) -> std::result::Result<(), SessionError>;

    /// Types `text` into the element
    async fn type_text(
        &self,
        locator: &LocatorDescriptor,
        text: &str,
    ) -> std::result::Result<(), SessionError>;

    /// Rendered text of the element
    async fn text(&self, locator: &LocatorDescriptor) -> std::result::Result<String, SessionError>;

    /// Current `value` of a form field (empty for elements without one)
    async fn value(&self, locator: &LocatorDescriptor) -> std::result::Result<String, SessionError>;

    /// Navigates to `url`
    async fn open(&self, url: &str) -> std::result::Result<(), SessionError>;

    /// Title of the current document
    async fn title(&self) -> std::result::Result<String, SessionError>;

    /// URL of the current document
    async fn current_url(&self) -> std::result::Result<String, SessionError>;
}

/// Launches and closes browser sessions.
///
/// Process lifecycle lives here, outside of the engine.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    type Session: Session;

    /// Starts a browser according to `options`
    async fn launch(&self, options: &LaunchOptions) -> Result<Self::Session>;

    /// Shuts the browser down
    async fn close(&self, session: Self::Session) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_predicates() {
        assert!(!ElementState::Detached.is_present());
        assert!(ElementState::Hidden.is_present());
        assert!(!ElementState::Hidden.is_visible());
        assert!(ElementState::Visible.is_visible());
        assert!(!ElementState::Visible.is_interactable());
        assert!(ElementState::Interactable.is_interactable());
    }

    #[test]
    fn test_transient_classification() {
        assert!(SessionError::NoSuchElement.is_transient());
        assert!(SessionError::StaleElement.is_transient());
        assert!(SessionError::Obscured("div.overlay".into()).is_transient());
        assert!(!SessionError::InvalidLocator("//a[".into()).is_transient());
        assert!(!SessionError::Disconnected("browser closed".into()).is_transient());
    }
}
