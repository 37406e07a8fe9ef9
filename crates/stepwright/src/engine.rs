// Interaction engine - Wait-bounded actions on symbolic elements
//
// Resolves a symbolic name through an ElementRegistry, polls the session until
// the element is ready, performs the action and collapses whatever happened
// into an ActionResult.
//
// Per call:
//   Polling -> { Succeeded, TimedOut, NotInteractable, NotFound, Cancelled }
//
// Every terminal state is final. A caller that wants a retry issues a new call.
//
// Timing:
// - One attempt per poll interval, starting immediately
// - Each attempt is bounded by the time left in the wait window, so no call
//   outlives the policy timeout even if the session hangs
// - The last attempt happens at the deadline, never before it
// - Cancelling the engine's token ends an in-flight poll within one tick

use crate::error::Result;
use crate::locator::LocatorDescriptor;
use crate::outcome::ActionResult;
use crate::registry::ElementRegistry;
use crate::session::{ElementState, Session, SessionError};
use crate::wait::WaitPolicy;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Symbolic name reported for page-title waits
pub const PAGE_TITLE: &str = "page title";

/// Symbolic name reported for URL waits
pub const CURRENT_URL: &str = "current URL";

/// Executes interactions against a borrowed session.
///
/// An engine holds no session and no page: both are passed per call, so one
/// engine per scenario is enough and engines never share mutable state.
///
/// # Example
///
/// ```ignore
/// use stepwright::{InteractionEngine, Page, LocatorDescriptor, WaitPolicy};
///
/// let page = Page::builder("Login")
///     .element("Username", LocatorDescriptor::id("username"))
///     .element("Submit", LocatorDescriptor::id("submit"))
///     .build()?;
/// let engine = InteractionEngine::new(WaitPolicy::default());
///
/// engine.set_text(&session, page.registry(), "Username", "student", None).await?;
/// let result = engine.click(&session, page.registry(), "Submit", None).await?;
/// assert!(result.is_success());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InteractionEngine {
    policy: WaitPolicy,
    cancel: CancellationToken,
}

/// What one attempt observed
enum Attempt<T> {
    /// The action went through
    Done(T),
    /// Not ready yet; `visible` records whether the element was seen visible
    Pending {
        visible: bool,
        observed: Option<String>,
    },
    /// The session cannot evaluate this at all
    Hard(SessionError),
}

/// Document-level property a page wait reads
#[derive(Debug, Clone, Copy)]
enum Document {
    Title,
    Url,
}

impl Document {
    fn element(self) -> &'static str {
        match self {
            Document::Title => PAGE_TITLE,
            Document::Url => CURRENT_URL,
        }
    }

    fn locator(self) -> LocatorDescriptor {
        match self {
            Document::Title => LocatorDescriptor::xpath("/html/head/title"),
            Document::Url => LocatorDescriptor::xpath("/html"),
        }
    }

    async fn read(self, session: &dyn Session) -> std::result::Result<String, SessionError> {
        match self {
            Document::Title => session.title().await,
            Document::Url => session.current_url().await,
        }
    }

    /// Titles compare trimmed; URLs also ignore a trailing slash
    fn matches(self, actual: &str, expected: &str) -> bool {
        match self {
            Document::Title => actual.trim() == expected,
            Document::Url => actual.trim().trim_end_matches('/') == expected.trim_end_matches('/'),
        }
    }
}

/// How a wait ended
enum Waited<T> {
    Done(T),
    Hard(SessionError),
    Expired {
        seen_visible: bool,
        observed: Option<String>,
        waited: Duration,
    },
    Cancelled,
}

impl InteractionEngine {
    /// Creates an engine with its own cancellation token
    pub fn new(policy: WaitPolicy) -> Self {
        Self::with_cancellation(policy, CancellationToken::new())
    }

    /// Creates an engine that stops polling when `cancel` is cancelled
    pub fn with_cancellation(policy: WaitPolicy, cancel: CancellationToken) -> Self {
        Self { policy, cancel }
    }

    /// Default wait policy for calls that do not pass their own
    pub fn policy(&self) -> WaitPolicy {
        self.policy
    }

    /// Token that aborts in-flight waits when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Aborts in-flight and future waits on this engine
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits until the element is visible.
    ///
    /// Absence is expected while a page renders and is polled through. Only a
    /// locator the session cannot evaluate, or a broken session, ends the wait
    /// early with `NotFound`.
    pub async fn wait_for_visible(
        &self,
        session: &dyn Session,
        registry: &ElementRegistry,
        name: &str,
        policy: Option<WaitPolicy>,
    ) -> Result<ActionResult> {
        let locator = registry.resolve(name)?;
        let policy = policy.unwrap_or(self.policy);

        let waited = self
            .drive(policy, move || async move {
                match session.probe(locator).await {
                    Ok(state) if state.is_visible() => Attempt::Done(()),
                    Ok(_) => pending(false),
                    Err(e) => transient_or_hard(e, false),
                }
            })
            .await;

        Ok(self.finish(registry, name, locator, waited, |()| ActionResult::ok()))
    }

    /// Clicks the element once it is visible and interactable.
    ///
    /// A click intercepted by another element (an overlay still fading out)
    /// counts as "not interactable yet" and is retried on the next tick.
    /// Ends with `NotInteractable` when the element was seen visible but never
    /// took the click, and `TimedOut` when it never became visible.
    pub async fn click(
        &self,
        session: &dyn Session,
        registry: &ElementRegistry,
        name: &str,
        policy: Option<WaitPolicy>,
    ) -> Result<ActionResult> {
        let locator = registry.resolve(name)?;
        let policy = policy.unwrap_or(self.policy);

        let waited = self
            .drive(policy, move || async move {
                match probe_interactable(session, locator).await {
                    Ok(()) => match session.click(locator).await {
                        Ok(()) => Attempt::Done(()),
                        Err(e) => transient_or_hard(e, true),
                    },
                    Err(attempt) => attempt,
                }
            })
            .await;

        Ok(self.finish(registry, name, locator, waited, |()| ActionResult::ok()))
    }

    /// Replaces the element's content with `value` and reads it back.
    ///
    /// Succeeds with the value the field reports after typing, so callers can
    /// check write fidelity without another round trip.
    pub async fn set_text(
        &self,
        session: &dyn Session,
        registry: &ElementRegistry,
        name: &str,
        value: &str,
        policy: Option<WaitPolicy>,
    ) -> Result<ActionResult> {
        let locator = registry.resolve(name)?;
        let policy = policy.unwrap_or(self.policy);

        let waited = self
            .drive(policy, move || async move {
                if let Err(attempt) = probe_interactable(session, locator).await {
                    return attempt;
                }
                match write_field(session, locator, value).await {
                    Ok(confirmed) => Attempt::Done(confirmed),
                    Err(e) => transient_or_hard(e, true),
                }
            })
            .await;

        Ok(self.finish(registry, name, locator, waited, |value| {
            ActionResult::Success(Some(value))
        }))
    }

    /// Reads the element's text once it is visible.
    ///
    /// Form fields render no text, so an empty text falls back to the field
    /// value.
    pub async fn read_text(
        &self,
        session: &dyn Session,
        registry: &ElementRegistry,
        name: &str,
        policy: Option<WaitPolicy>,
    ) -> Result<ActionResult> {
        let locator = registry.resolve(name)?;
        let policy = policy.unwrap_or(self.policy);

        let waited = self
            .drive(policy, move || async move {
                match session.probe(locator).await {
                    Ok(state) if state.is_visible() => {}
                    Ok(_) => return pending(false),
                    Err(e) => return transient_or_hard(e, false),
                }
                match read_field(session, locator).await {
                    Ok(text) => Attempt::Done(text),
                    Err(e) => transient_or_hard(e, true),
                }
            })
            .await;

        Ok(self.finish(registry, name, locator, waited, |value| {
            ActionResult::Success(Some(value))
        }))
    }

    /// Single probe for the element's presence, without waiting.
    ///
    /// Meant for negative assertions ("error message absent") where waiting
    /// would cost the full timeout in the common case. Session failures read
    /// as absent.
    pub async fn exists(
        &self,
        session: &dyn Session,
        registry: &ElementRegistry,
        name: &str,
    ) -> Result<bool> {
        let locator = registry.resolve(name)?;

        let probed = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            res = tokio::time::timeout(self.policy.timeout(), session.probe(locator)) => res.ok(),
        };

        let present = match probed {
            Some(Ok(state)) => state.is_present(),
            Some(Err(e)) => {
                tracing::debug!(page = registry.page(), element = name, error = %e, "Presence probe failed");
                false
            }
            None => false,
        };
        tracing::debug!(page = registry.page(), element = name, present, "Presence probe");
        Ok(present)
    }

    /// Waits until the document title equals `expected` (both trimmed).
    ///
    /// Ends with `Mismatch` carrying the last title seen when it never
    /// matched.
    pub async fn wait_for_title(
        &self,
        session: &dyn Session,
        expected: &str,
        policy: Option<WaitPolicy>,
    ) -> ActionResult {
        self.wait_for_document(session, Document::Title, expected, policy)
            .await
    }

    /// Waits until the browser's current URL equals `expected`.
    ///
    /// Surrounding whitespace and a trailing slash are ignored. Ends with
    /// `Mismatch` carrying the last URL seen when it never matched, which
    /// covers redirects that land somewhere else.
    pub async fn wait_for_url(
        &self,
        session: &dyn Session,
        expected: &str,
        policy: Option<WaitPolicy>,
    ) -> ActionResult {
        self.wait_for_document(session, Document::Url, expected, policy)
            .await
    }

    async fn wait_for_document(
        &self,
        session: &dyn Session,
        document: Document,
        expected: &str,
        policy: Option<WaitPolicy>,
    ) -> ActionResult {
        let policy = policy.unwrap_or(self.policy);
        let expected = expected.trim();
        let element = document.element();

        let waited = self
            .drive(policy, move || async move {
                match document.read(session).await {
                    Ok(actual) if document.matches(&actual, expected) => Attempt::Done(actual),
                    Ok(actual) => Attempt::Pending {
                        visible: true,
                        observed: Some(actual),
                    },
                    Err(e) => transient_or_hard(e, false),
                }
            })
            .await;

        let result = match waited {
            Waited::Done(actual) => ActionResult::value(actual),
            Waited::Hard(e) => ActionResult::NotFound {
                element: element.to_string(),
                locator: document.locator(),
                reason: e.to_string(),
            },
            Waited::Expired {
                observed: Some(actual),
                ..
            } => ActionResult::Mismatch {
                element: element.to_string(),
                expected: expected.to_string(),
                actual,
            },
            Waited::Expired { waited, .. } => ActionResult::TimedOut {
                element: element.to_string(),
                waited,
            },
            Waited::Cancelled => ActionResult::Cancelled {
                element: element.to_string(),
            },
        };
        tracing::debug!(element, expected, state = result.state(), "Document wait finished");
        result
    }

    /// Runs `attempt` once per poll interval until it finishes, the wait
    /// window closes or the engine is cancelled.
    async fn drive<T, F, Fut>(&self, policy: WaitPolicy, mut attempt: F) -> Waited<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Attempt<T>>,
    {
        let started = Instant::now();
        let deadline = started + policy.timeout();
        let mut seen_visible = false;
        let mut observed = None;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let outcome = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Waited::Cancelled,
                res = tokio::time::timeout(remaining, attempt()) => res,
            };

            match outcome {
                Ok(Attempt::Done(value)) => return Waited::Done(value),
                Ok(Attempt::Hard(e)) => return Waited::Hard(e),
                Ok(Attempt::Pending {
                    visible,
                    observed: latest,
                }) => {
                    seen_visible |= visible;
                    if latest.is_some() {
                        observed = latest;
                    }
                }
                // The session did not answer before the deadline
                Err(_) => {
                    return Waited::Expired {
                        seen_visible,
                        observed,
                        waited: started.elapsed(),
                    };
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Waited::Expired {
                    seen_visible,
                    observed,
                    waited: started.elapsed(),
                };
            }

            let pause = policy.poll_interval().min(deadline - now);
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Waited::Cancelled,
                _ = tokio::time::sleep(pause) => {}
            }
        }
    }

    /// Maps a finished element wait onto its ActionResult and logs it
    fn finish<T>(
        &self,
        registry: &ElementRegistry,
        name: &str,
        locator: &LocatorDescriptor,
        waited: Waited<T>,
        on_success: impl FnOnce(T) -> ActionResult,
    ) -> ActionResult {
        let element = name.to_string();
        let result = match waited {
            Waited::Done(value) => on_success(value),
            Waited::Hard(e) => {
                tracing::warn!(
                    page = registry.page(),
                    element = name,
                    locator = %locator,
                    error = %e,
                    "Session could not evaluate locator"
                );
                ActionResult::NotFound {
                    element,
                    locator: locator.clone(),
                    reason: e.to_string(),
                }
            }
            Waited::Expired {
                seen_visible: true,
                waited,
                ..
            } => ActionResult::NotInteractable { element, waited },
            Waited::Expired { waited, .. } => ActionResult::TimedOut { element, waited },
            Waited::Cancelled => ActionResult::Cancelled { element },
        };
        tracing::debug!(
            page = registry.page(),
            element = name,
            locator = %locator,
            state = result.state(),
            "Interaction finished"
        );
        result
    }
}

fn pending<T>(visible: bool) -> Attempt<T> {
    Attempt::Pending {
        visible,
        observed: None,
    }
}

fn transient_or_hard<T>(error: SessionError, visible: bool) -> Attempt<T> {
    if error.is_transient() {
        tracing::trace!(error = %error, "Transient session error, polling again");
        pending(visible)
    } else {
        Attempt::Hard(error)
    }
}

/// Probes until the element is ready for input; the error side is the
/// attempt to report when it is not.
async fn probe_interactable<T>(
    session: &dyn Session,
    locator: &LocatorDescriptor,
) -> std::result::Result<(), Attempt<T>> {
    match session.probe(locator).await {
        Ok(ElementState::Interactable) => Ok(()),
        Ok(state) => Err(pending(state.is_visible())),
        Err(e) => Err(transient_or_hard(e, false)),
    }
}

/// Clears the field, types `value` and returns what the field now holds
async fn write_field(
    session: &dyn Session,
    locator: &LocatorDescriptor,
    value: &str,
) -> std::result::Result<String, SessionError> {
    session.clear(locator).await?;
    session.type_text(locator, value).await?;
    session.value(locator).await
}

/// Rendered text, or the field value when the element renders none
async fn read_field(
    session: &dyn Session,
    locator: &LocatorDescriptor,
) -> std::result::Result<String, SessionError> {
    let text = session.text(locator).await?;
    if text.trim().is_empty() {
        session.value(locator).await
    } else {
        Ok(text)
    }
}
