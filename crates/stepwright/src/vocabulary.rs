// Step vocabulary - The standard page-agnostic steps
//
// Every step names pages and elements symbolically and resolves them against
// the page currently selected in the scenario. Adding a page to the site
// under test means adding locator data, never adding steps.
//
// Opening a catalog page waits for the page's title when its locator data
// names one, so a step after an open runs against the loaded page.
//
// Phrases:
//   user opens the URL {string}
//   user opens URL {string}
//   user navigates to the {string} page
//   user verifies the {string} page is loaded
//   user verifies the page title is {string}
//   user verifies the current URL is {string}
//   user verifies the URL is {string}
//   user clicks the {string}
//   user enters {string} into the {string}
//   user enters {string} into {string}
//   user verifies the {string} is visible
//   user verifies the {string} is present
//   user verifies the {string} is not present
//   user verifies the {string} text is {string}
//   user verifies the {string} text contains {string}

use crate::catalog::PageCatalog;
use crate::engine::InteractionEngine;
use crate::error::{Error, Result};
use crate::outcome::ActionResult;
use crate::page::Page;
use crate::session::Session;
use crate::steps::{StepDispatcher, StepFuture};
use std::sync::Arc;

/// Per-scenario state the standard steps operate on.
///
/// Holds a shared handle to the session, never ownership of the browser:
/// whoever launched it closes it after the scenario.
pub struct ScenarioContext {
    session: Arc<dyn Session>,
    catalog: Arc<PageCatalog>,
    engine: InteractionEngine,
    current_page: Option<Arc<Page>>,
}

impl ScenarioContext {
    pub fn new(session: Arc<dyn Session>, catalog: Arc<PageCatalog>, engine: InteractionEngine) -> Self {
        Self {
            session,
            catalog,
            engine,
            current_page: None,
        }
    }

    pub fn session(&self) -> &dyn Session {
        self.session.as_ref()
    }

    pub fn catalog(&self) -> &PageCatalog {
        &self.catalog
    }

    pub fn engine(&self) -> &InteractionEngine {
        &self.engine
    }

    /// The page element steps resolve names against.
    ///
    /// Fails with [`Error::NoActivePage`] before any page was selected.
    pub fn current_page(&self) -> Result<Arc<Page>> {
        self.current_page.clone().ok_or(Error::NoActivePage)
    }

    /// Makes the named catalog page current without navigating
    pub fn select_page(&mut self, name: &str) -> Result<Arc<Page>> {
        let page = self.catalog.get(name)?;
        tracing::debug!(page = page.name(), "Selected page");
        self.current_page = Some(Arc::clone(&page));
        Ok(page)
    }

    async fn open(&self, url: &str) -> Result<()> {
        self.session
            .open(url)
            .await
            .map_err(|e| Error::Session(format!("Failed to open {url}: {e}")))
    }
}

/// Builds a dispatcher bound to the standard vocabulary.
///
/// # Example
///
/// ```ignore
/// use stepwright::{vocabulary, InteractionEngine, PageCatalog, ScenarioContext};
///
/// let steps = vocabulary::standard()?;
/// let catalog = Arc::new(PageCatalog::from_glob("tests/pages/*.json")?);
/// let mut ctx = ScenarioContext::new(session, catalog, InteractionEngine::default());
///
/// steps.dispatch(&mut ctx, r#"Given user navigates to the "Login" page"#).await?.into_result()?;
/// steps.dispatch(&mut ctx, r#"When user enters "student" into the "Username""#).await?.into_result()?;
/// steps.dispatch(&mut ctx, r#"And user clicks the "Submit""#).await?.into_result()?;
/// ```
pub fn standard() -> Result<StepDispatcher<ScenarioContext>> {
    let mut steps = StepDispatcher::new();
    register_standard(&mut steps)?;
    Ok(steps)
}

/// Adds the standard vocabulary to an existing dispatcher.
///
/// Steps registered before this call take precedence over the standard ones.
pub fn register_standard(steps: &mut StepDispatcher<ScenarioContext>) -> Result<()> {
    steps.register("user opens the URL {string}", open_url)?;
    steps.register("user opens URL {string}", open_url)?;
    steps.register("user navigates to the {string} page", navigate_to_page)?;
    steps.register("user verifies the {string} page is loaded", verify_page_loaded)?;
    steps.register("user verifies the page title is {string}", verify_title)?;
    steps.register("user verifies the current URL is {string}", verify_url)?;
    steps.register("user verifies the URL is {string}", verify_url)?;
    steps.register("user clicks the {string}", click)?;
    steps.register("user enters {string} into the {string}", enter_text)?;
    steps.register("user enters {string} into {string}", enter_text)?;
    steps.register("user verifies the {string} is visible", verify_visible)?;
    steps.register("user verifies the {string} is present", verify_present)?;
    steps.register("user verifies the {string} is not present", verify_absent)?;
    steps.register("user verifies the {string} text is {string}", verify_text_is)?;
    steps.register("user verifies the {string} text contains {string}", verify_text_contains)?;
    Ok(())
}

fn open_url<'a>(ctx: &'a mut ScenarioContext, args: Vec<String>) -> StepFuture<'a> {
    Box::pin(async move {
        let [url] = take_args(args)?;
        ctx.open(&url).await?;
        ctx.current_page = ctx.catalog.find_by_url(&url);
        match ctx.current_page.clone() {
            Some(page) => {
                tracing::debug!(url = %url, page = page.name(), "Opened catalog page");
                Ok(wait_for_load(ctx, &page).await)
            }
            None => {
                tracing::debug!(url = %url, "Opened URL outside the catalog");
                Ok(ActionResult::ok())
            }
        }
    })
}

fn navigate_to_page<'a>(ctx: &'a mut ScenarioContext, args: Vec<String>) -> StepFuture<'a> {
    Box::pin(async move {
        let [name] = take_args(args)?;
        let page = ctx.catalog.get(&name)?;
        let url = page
            .url()
            .ok_or_else(|| Error::Config(format!("Page '{name}' has no URL to navigate to")))?
            .to_string();
        ctx.open(&url).await?;
        ctx.current_page = Some(Arc::clone(&page));
        Ok(wait_for_load(ctx, &page).await)
    })
}

/// Checks the browser shows the named page, by its title or else its URL,
/// and makes it current once it does
fn verify_page_loaded<'a>(ctx: &'a mut ScenarioContext, args: Vec<String>) -> StepFuture<'a> {
    Box::pin(async move {
        let [name] = take_args(args)?;
        let page = ctx.catalog.get(&name)?;
        let result = match (page.title(), page.url()) {
            (Some(title), _) => ctx.engine.wait_for_title(ctx.session(), title, None).await,
            (None, Some(url)) => ctx.engine.wait_for_url(ctx.session(), url, None).await,
            (None, None) => {
                return Err(Error::Config(format!(
                    "Page '{name}' has neither a title nor a URL to recognize it by"
                )));
            }
        };
        if result.is_success() {
            ctx.current_page = Some(page);
        }
        Ok(result)
    })
}

fn verify_title<'a>(ctx: &'a mut ScenarioContext, args: Vec<String>) -> StepFuture<'a> {
    Box::pin(async move {
        let [expected] = take_args(args)?;
        Ok(ctx.engine.wait_for_title(ctx.session(), &expected, None).await)
    })
}

fn verify_url<'a>(ctx: &'a mut ScenarioContext, args: Vec<String>) -> StepFuture<'a> {
    Box::pin(async move {
        let [expected] = take_args(args)?;
        Ok(ctx.engine.wait_for_url(ctx.session(), &expected, None).await)
    })
}

fn click<'a>(ctx: &'a mut ScenarioContext, args: Vec<String>) -> StepFuture<'a> {
    Box::pin(async move {
        let [element] = take_args(args)?;
        let page = ctx.current_page()?;
        ctx.engine
            .click(ctx.session(), page.registry(), &element, None)
            .await
    })
}

fn enter_text<'a>(ctx: &'a mut ScenarioContext, args: Vec<String>) -> StepFuture<'a> {
    Box::pin(async move {
        let [value, element] = take_args(args)?;
        let page = ctx.current_page()?;
        ctx.engine
            .set_text(ctx.session(), page.registry(), &element, &value, None)
            .await
    })
}

fn verify_visible<'a>(ctx: &'a mut ScenarioContext, args: Vec<String>) -> StepFuture<'a> {
    Box::pin(async move {
        let [element] = take_args(args)?;
        let page = ctx.current_page()?;
        ctx.engine
            .wait_for_visible(ctx.session(), page.registry(), &element, None)
            .await
    })
}

fn verify_present<'a>(ctx: &'a mut ScenarioContext, args: Vec<String>) -> StepFuture<'a> {
    Box::pin(async move {
        let [element] = take_args(args)?;
        presence(ctx, element, true).await
    })
}

fn verify_absent<'a>(ctx: &'a mut ScenarioContext, args: Vec<String>) -> StepFuture<'a> {
    Box::pin(async move {
        let [element] = take_args(args)?;
        presence(ctx, element, false).await
    })
}

fn verify_text_is<'a>(ctx: &'a mut ScenarioContext, args: Vec<String>) -> StepFuture<'a> {
    Box::pin(async move {
        let [element, expected] = take_args(args)?;
        compare_text(ctx, element, expected, |actual, expected| actual == expected).await
    })
}

fn verify_text_contains<'a>(ctx: &'a mut ScenarioContext, args: Vec<String>) -> StepFuture<'a> {
    Box::pin(async move {
        let [element, expected] = take_args(args)?;
        compare_text(ctx, element, expected, |actual, expected| actual.contains(expected)).await
    })
}

/// Waits for the page's title when its locator data names one
async fn wait_for_load(ctx: &ScenarioContext, page: &Page) -> ActionResult {
    match page.title() {
        Some(title) => ctx.engine.wait_for_title(ctx.session(), title, None).await,
        None => ActionResult::ok(),
    }
}

async fn presence(ctx: &ScenarioContext, element: String, expected: bool) -> Result<ActionResult> {
    let page = ctx.current_page()?;
    let present = ctx.engine.exists(ctx.session(), page.registry(), &element).await?;
    if present == expected {
        return Ok(ActionResult::ok());
    }
    let label = |present: bool| if present { "present" } else { "not present" };
    Ok(ActionResult::Mismatch {
        element,
        expected: label(expected).to_string(),
        actual: label(present).to_string(),
    })
}

/// Reads the element's text and checks it with `matches(actual, expected)`,
/// both trimmed
async fn compare_text(
    ctx: &ScenarioContext,
    element: String,
    expected: String,
    matches: fn(&str, &str) -> bool,
) -> Result<ActionResult> {
    let page = ctx.current_page()?;
    let result = ctx
        .engine
        .read_text(ctx.session(), page.registry(), &element, None)
        .await?;

    match result {
        ActionResult::Success(Some(actual)) if matches(actual.trim(), expected.trim()) => {
            Ok(ActionResult::Success(Some(actual)))
        }
        ActionResult::Success(actual) => Ok(ActionResult::Mismatch {
            element,
            expected,
            actual: actual.unwrap_or_default(),
        }),
        failure => Ok(failure),
    }
}

fn take_args<const N: usize>(args: Vec<String>) -> Result<[String; N]> {
    args.try_into().map_err(|args: Vec<String>| {
        Error::InvalidArgument(format!("expected {N} step arguments, got {}", args.len()))
    })
}
