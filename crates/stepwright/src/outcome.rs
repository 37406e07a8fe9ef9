// Action results - Typed terminal state of one interaction
//
// Engine calls never fail with transport errors. Whatever happened in the
// browser is collapsed into one of these states so that a scenario can tell
// "failed as expected" apart from "the framework broke".

use crate::error::{Error, Result};
use crate::locator::LocatorDescriptor;
use std::fmt;
use std::time::Duration;

/// Terminal outcome of an interaction or step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    /// The action completed. Carries the text or value read, if any.
    Success(Option<String>),
    /// The session could not evaluate the locator at all (malformed
    /// selector, broken session). The descriptor is echoed for diagnosis.
    NotFound {
        element: String,
        locator: LocatorDescriptor,
        reason: String,
    },
    /// The element never became visible within the wait window.
    TimedOut { element: String, waited: Duration },
    /// The element became visible but never accepted the interaction
    /// (disabled, covered by an overlay) within the wait window.
    NotInteractable { element: String, waited: Duration },
    /// The scenario was aborted while the call was polling.
    Cancelled { element: String },
    /// A value was read successfully but did not satisfy the step's assertion.
    Mismatch {
        element: String,
        expected: String,
        actual: String,
    },
}

impl ActionResult {
    /// Success without a value
    pub fn ok() -> Self {
        ActionResult::Success(None)
    }

    /// Success carrying a value
    pub fn value(value: impl Into<String>) -> Self {
        ActionResult::Success(Some(value.into()))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Success(_))
    }

    /// Name of the terminal state, as shown in failure messages
    pub fn state(&self) -> &'static str {
        match self {
            ActionResult::Success(_) => "Succeeded",
            ActionResult::NotFound { .. } => "NotFound",
            ActionResult::TimedOut { .. } => "TimedOut",
            ActionResult::NotInteractable { .. } => "NotInteractable",
            ActionResult::Cancelled { .. } => "Cancelled",
            ActionResult::Mismatch { .. } => "Mismatch",
        }
    }

    /// Symbolic name of the element involved, if the outcome is a failure
    pub fn element(&self) -> Option<&str> {
        match self {
            ActionResult::Success(_) => None,
            ActionResult::NotFound { element, .. }
            | ActionResult::TimedOut { element, .. }
            | ActionResult::NotInteractable { element, .. }
            | ActionResult::Cancelled { element }
            | ActionResult::Mismatch { element, .. } => Some(element),
        }
    }

    /// Value carried by a success
    pub fn success_value(&self) -> Option<&str> {
        match self {
            ActionResult::Success(value) => value.as_deref(),
            _ => None,
        }
    }

    /// Converts a failure into [`Error::StepFailed`].
    ///
    /// Use this where a scenario should fail on anything but success; the
    /// error message names the terminal state and the element.
    pub fn into_result(self) -> Result<Option<String>> {
        match self {
            ActionResult::Success(value) => Ok(value),
            failure => {
                let state = failure.state();
                let detail = failure.detail();
                let element = failure.element().unwrap_or_default().to_string();
                Err(Error::StepFailed {
                    state,
                    element,
                    detail,
                })
            }
        }
    }

    fn detail(&self) -> String {
        match self {
            ActionResult::Success(Some(value)) => format!("value '{value}'"),
            ActionResult::Success(None) => "completed".to_string(),
            ActionResult::NotFound { locator, reason, .. } => {
                format!("locator {locator} could not be evaluated: {reason}")
            }
            ActionResult::TimedOut { waited, .. } => {
                format!("not visible after {waited:?}")
            }
            ActionResult::NotInteractable { waited, .. } => {
                format!("visible but not interactable after {waited:?}")
            }
            ActionResult::Cancelled { .. } => "scenario aborted while waiting".to_string(),
            ActionResult::Mismatch {
                expected, actual, ..
            } => format!("expected '{expected}', found '{actual}'"),
        }
    }
}

impl fmt::Display for ActionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.element() {
            Some(element) => write!(f, "{} '{}': {}", self.state(), element, self.detail()),
            None => write!(f, "{}: {}", self.state(), self.detail()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_into_result() {
        assert_eq!(ActionResult::ok().into_result().unwrap(), None);
        assert_eq!(
            ActionResult::value("a@b.com").into_result().unwrap(),
            Some("a@b.com".to_string())
        );
    }

    #[test]
    fn test_failure_message_names_state_and_element() {
        let timed_out = ActionResult::TimedOut {
            element: "Submit".into(),
            waited: Duration::from_secs(5),
        };
        let message = timed_out.into_result().unwrap_err().to_string();
        assert!(message.starts_with("TimedOut for element 'Submit'"), "{message}");

        let not_found = ActionResult::NotFound {
            element: "Email".into(),
            locator: LocatorDescriptor::xpath("//input[@"),
            reason: "invalid selector".into(),
        };
        let message = not_found.to_string();
        assert!(message.contains("NotFound 'Email'"), "{message}");
        assert!(message.contains("xpath=//input[@"), "{message}");
    }

    #[test]
    fn test_state_names() {
        let waited = Duration::from_millis(10);
        assert_eq!(ActionResult::ok().state(), "Succeeded");
        assert_eq!(
            ActionResult::NotInteractable {
                element: "Submit".into(),
                waited
            }
            .state(),
            "NotInteractable"
        );
        assert_eq!(
            ActionResult::Cancelled {
                element: "Submit".into()
            }
            .state(),
            "Cancelled"
        );
        assert!(ActionResult::ok().element().is_none());
    }
}
