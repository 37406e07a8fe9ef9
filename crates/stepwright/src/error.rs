// Error types for stepwright
//
// Only configuration and authoring mistakes are errors. Runtime environment
// variability (an element that never shows up, an overlay that never goes
// away) is reported through `ActionResult` instead.

use crate::locator::LocatorDescriptor;
use thiserror::Error;

/// Result type alias for stepwright operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when building pages, registering steps or running them
#[derive(Debug, Error)]
pub enum Error {
    /// Symbolic element name is not registered for the page
    ///
    /// This is a page-object misconfiguration and is never retried.
    #[error("Unknown element '{name}' on page '{page}'")]
    UnknownElement { page: String, name: String },

    /// Element name registered twice on the same page
    ///
    /// When the two descriptors differ the page carries conflicting locators
    /// for one logical element, which is reported rather than silently
    /// resolved in favor of either.
    #[error("{}", duplicate_message(.page, .name, .existing, .attempted))]
    DuplicateName {
        page: String,
        name: String,
        existing: LocatorDescriptor,
        attempted: LocatorDescriptor,
    },

    /// Two page definitions share the same page name
    #[error("Page '{0}' is defined more than once")]
    DuplicatePage(String),

    /// Page name not present in the catalog
    #[error("Unknown page '{0}'")]
    UnknownPage(String),

    /// An element step ran before any page was selected
    #[error("No active page: open a URL or navigate to a page before interacting with elements")]
    NoActivePage,

    /// No registered step pattern matches the phrase
    ///
    /// The scenario uses a sentence nobody bound to behavior, so the suite
    /// itself is incomplete.
    #[error("No step definition matches: '{0}'")]
    NoMatchingStep(String),

    /// Step pattern could not be compiled
    #[error("Invalid step pattern '{pattern}': {reason}")]
    InvalidStepPattern { pattern: String, reason: String },

    /// The same step pattern was registered twice
    #[error("Step pattern registered more than once: '{0}'")]
    DuplicateStep(String),

    /// Invalid argument provided to a method
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A step finished in a non-success terminal state
    #[error("{state} for element '{element}': {detail}")]
    StepFailed {
        state: &'static str,
        element: String,
        detail: String,
    },

    /// Browser session could not be started
    #[error("Failed to launch browser session: {0}")]
    LaunchFailed(String),

    /// Session-level failure outside of an element interaction (navigation, close)
    #[error("Session error: {0}")]
    Session(String),

    /// Locator data or launch configuration is malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }
}

fn duplicate_message(
    page: &str,
    name: &str,
    existing: &LocatorDescriptor,
    attempted: &LocatorDescriptor,
) -> String {
    if existing == attempted {
        format!("Element '{name}' is already registered on page '{page}' as {existing}")
    } else {
        format!(
            "Conflicting locators for element '{name}' on page '{page}': \
             registered as {existing}, redefined as {attempted}"
        )
    }
}
