// Step dispatcher - Phrases to handlers, first match wins
//
// Bindings are scanned in registration order and the first pattern that
// matches the whole phrase runs. Overlapping patterns are a configuration
// problem of the suite; the dispatcher does not look for a "best" match.
//
// The dispatcher holds no session state. Everything a handler needs arrives
// through the context passed to `dispatch`.

use crate::error::{Error, Result};
use crate::outcome::ActionResult;
use crate::steps::pattern::StepPattern;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by step handlers
pub type StepFuture<'a> = Pin<Box<dyn Future<Output = Result<ActionResult>> + Send + 'a>>;

/// Gherkin keywords stripped from the front of a phrase
const KEYWORDS: [&str; 6] = ["Given ", "When ", "Then ", "And ", "But ", "* "];

/// Behavior bound to a step pattern.
///
/// Closures of the form `|ctx, args| Box::pin(async move { .. })` implement
/// this automatically.
pub trait StepHandler<C>: Send + Sync {
    fn call<'a>(&'a self, ctx: &'a mut C, args: Vec<String>) -> StepFuture<'a>;
}

impl<C, F> StepHandler<C> for F
where
    F: for<'a> Fn(&'a mut C, Vec<String>) -> StepFuture<'a> + Send + Sync,
{
    fn call<'a>(&'a self, ctx: &'a mut C, args: Vec<String>) -> StepFuture<'a> {
        self(ctx, args)
    }
}

struct StepBinding<C> {
    pattern: StepPattern,
    handler: Box<dyn StepHandler<C>>,
}

/// Ordered list of step bindings for a context type `C`.
///
/// # Example
///
/// ```ignore
/// use stepwright::{ActionResult, StepDispatcher};
///
/// let mut steps: StepDispatcher<Vec<String>> = StepDispatcher::new();
/// steps.register("user greets {string}", |seen, args| {
///     Box::pin(async move {
///         seen.extend(args);
///         Ok(ActionResult::ok())
///     })
/// })?;
///
/// let mut seen = Vec::new();
/// steps.dispatch(&mut seen, r#"When user greets "Ada""#).await?;
/// assert_eq!(seen, vec!["Ada"]);
/// ```
pub struct StepDispatcher<C> {
    bindings: Vec<StepBinding<C>>,
}

impl<C> Default for StepDispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> StepDispatcher<C> {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Binds a closure to a pattern.
    ///
    /// Fails with [`Error::InvalidStepPattern`] if the pattern does not
    /// compile and [`Error::DuplicateStep`] if the exact pattern is already
    /// bound.
    pub fn register<F>(&mut self, pattern: &str, handler: F) -> Result<()>
    where
        F: for<'a> Fn(&'a mut C, Vec<String>) -> StepFuture<'a> + Send + Sync + 'static,
    {
        self.register_handler(pattern, handler)
    }

    /// Binds any [`StepHandler`] implementation to a pattern
    pub fn register_handler<H>(&mut self, pattern: &str, handler: H) -> Result<()>
    where
        H: StepHandler<C> + 'static,
    {
        if self.bindings.iter().any(|b| b.pattern.as_str() == pattern) {
            return Err(Error::DuplicateStep(pattern.to_string()));
        }
        let pattern = StepPattern::parse(pattern)?;
        tracing::trace!(pattern = %pattern, "Registered step");
        self.bindings.push(StepBinding {
            pattern,
            handler: Box::new(handler),
        });
        Ok(())
    }

    /// Finds the binding for a phrase without running it.
    ///
    /// Returns the matching pattern and the captured arguments.
    pub fn find(&self, phrase: &str) -> Result<(&StepPattern, Vec<String>)> {
        let text = strip_keyword(phrase);
        self.bindings
            .iter()
            .find_map(|binding| {
                binding
                    .pattern
                    .captures(text)
                    .map(|args| (&binding.pattern, args))
            })
            .ok_or_else(|| Error::NoMatchingStep(phrase.trim().to_string()))
    }

    /// Runs the first binding whose pattern matches `phrase`.
    ///
    /// A leading Gherkin keyword (`Given`, `When`, `Then`, `And`, `But`, `*`)
    /// is ignored. Fails with [`Error::NoMatchingStep`] when nothing matches.
    pub async fn dispatch(&self, ctx: &mut C, phrase: &str) -> Result<ActionResult> {
        let text = strip_keyword(phrase);
        let (binding, args) = self
            .bindings
            .iter()
            .find_map(|binding| binding.pattern.captures(text).map(|args| (binding, args)))
            .ok_or_else(|| Error::NoMatchingStep(phrase.trim().to_string()))?;

        tracing::debug!(step = text, pattern = %binding.pattern, args = ?args, "Dispatching step");
        let result = binding.handler.call(ctx, args).await?;
        tracing::debug!(step = text, state = result.state(), "Step finished");
        Ok(result)
    }

    /// Registered patterns, in matching order
    pub fn patterns(&self) -> impl Iterator<Item = &StepPattern> {
        self.bindings.iter().map(|b| &b.pattern)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

fn strip_keyword(phrase: &str) -> &str {
    let trimmed = phrase.trim();
    KEYWORDS
        .iter()
        .find_map(|keyword| trimmed.strip_prefix(keyword))
        .map(str::trim_start)
        .unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    type Calls = Vec<(&'static str, Vec<String>)>;

    fn recording() -> StepDispatcher<Calls> {
        let mut steps = StepDispatcher::new();
        steps
            .register("user enters {string} into {string}", |calls: &mut Calls, args| {
                Box::pin(async move {
                    calls.push(("enter", args));
                    Ok(ActionResult::ok())
                })
            })
            .unwrap();
        steps
            .register("user clicks the {string}", |calls: &mut Calls, args| {
                Box::pin(async move {
                    calls.push(("click", args));
                    Ok(ActionResult::ok())
                })
            })
            .unwrap();
        steps
            .register("user clicks {}", |calls: &mut Calls, args| {
                Box::pin(async move {
                    calls.push(("click-any", args));
                    Ok(ActionResult::ok())
                })
            })
            .unwrap();
        steps
    }

    #[tokio::test]
    async fn test_dispatch_passes_captures_in_order() {
        let steps = recording();
        let mut calls = Calls::new();

        let result = steps
            .dispatch(&mut calls, r#"user enters "x" into "Email""#)
            .await
            .unwrap();

        assert!(result.is_success());
        assert_eq!(
            calls,
            vec![("enter", vec!["x".to_string(), "Email".to_string()])]
        );
    }

    #[tokio::test]
    async fn test_first_registered_match_wins() {
        let steps = recording();
        let mut calls = Calls::new();

        // Both "user clicks the {string}" and "user clicks {}" match
        steps
            .dispatch(&mut calls, r#"user clicks the "Submit""#)
            .await
            .unwrap();
        steps
            .dispatch(&mut calls, "user clicks anywhere")
            .await
            .unwrap();

        assert_eq!(calls[0], ("click", vec!["Submit".to_string()]));
        assert_eq!(calls[1], ("click-any", vec!["anywhere".to_string()]));
    }

    #[tokio::test]
    async fn test_gherkin_keywords_are_stripped() {
        let steps = recording();
        let mut calls = Calls::new();

        for phrase in [
            r#"When user clicks the "Submit""#,
            r#"  And user clicks the "Submit"  "#,
            r#"* user clicks the "Submit""#,
        ] {
            steps.dispatch(&mut calls, phrase).await.unwrap();
        }
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|(kind, _)| *kind == "click"));
    }

    #[tokio::test]
    async fn test_unmatched_phrase_is_an_error() {
        let steps = recording();
        let mut calls = Calls::new();

        let err = steps
            .dispatch(&mut calls, "Then user sees a rainbow")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoMatchingStep(ref p) if p == "Then user sees a rainbow"));
        assert!(calls.is_empty());
    }

    #[test]
    fn test_duplicate_and_invalid_registration() {
        let mut steps = recording();
        let duplicate = steps.register("user clicks the {string}", |_: &mut Calls, _| {
            Box::pin(async { Ok(ActionResult::ok()) })
        });
        assert!(matches!(duplicate, Err(Error::DuplicateStep(_))));

        let invalid = steps.register("user sees {colour}", |_: &mut Calls, _| {
            Box::pin(async { Ok(ActionResult::ok()) })
        });
        assert!(matches!(invalid, Err(Error::InvalidStepPattern { .. })));
        assert_eq!(steps.len(), 3);
    }

    #[test]
    fn test_find_reports_pattern() {
        let steps = recording();
        let (pattern, args) = steps.find(r#"Given user enters "a" into "b""#).unwrap();
        assert_eq!(pattern.as_str(), "user enters {string} into {string}");
        assert_eq!(args, vec!["a", "b"]);
        assert_eq!(
            steps.patterns().map(StepPattern::as_str).collect::<Vec<_>>(),
            vec![
                "user enters {string} into {string}",
                "user clicks the {string}",
                "user clicks {}"
            ]
        );
    }
}
