//! stepwright: Declarative page objects and step dispatch for browser end-to-end tests
//!
//! Scenarios are written as natural-language step phrases. Each phrase is
//! bound to one page-agnostic action, elements are named symbolically and
//! resolved through a per-page registry, and every interaction waits
//! explicitly (bounded timeout, fixed poll interval) before it reports a typed
//! [`ActionResult`].
//!
//! # Examples
//!
//! ## Pages and the standard vocabulary
//!
//! ```ignore
//! use std::sync::Arc;
//! use stepwright::{vocabulary, InteractionEngine, PageCatalog, ScenarioContext, WaitPolicy};
//!
//! #[tokio::main]
//! async fn main() -> stepwright::Result<()> {
//!     let catalog = Arc::new(PageCatalog::from_json_str(r#"{
//!         "pages": [{
//!             "name": "Login",
//!             "url": "https://practicetestautomation.com/practice-test-login/",
//!             "elements": [
//!                 {"name": "Username", "strategy": "id", "value": "username"},
//!                 {"name": "Password", "strategy": "id", "value": "password"},
//!                 {"name": "Submit", "strategy": "id", "value": "submit"}
//!             ]
//!         }]
//!     }"#)?);
//!
//!     let session: Arc<dyn stepwright::Session> = connect().await?;
//!     let engine = InteractionEngine::new(WaitPolicy::from_env()?);
//!     let mut ctx = ScenarioContext::new(session, catalog, engine);
//!     let steps = vocabulary::standard()?;
//!
//!     for phrase in [
//!         r#"Given user navigates to the "Login" page"#,
//!         r#"When user enters "student" into the "Username""#,
//!         r#"And user enters "Password123" into the "Password""#,
//!         r#"And user clicks the "Submit""#,
//!     ] {
//!         steps.dispatch(&mut ctx, phrase).await?.into_result()?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Driving the engine directly
//!
//! ```ignore
//! use stepwright::{ActionResult, InteractionEngine, LocatorDescriptor, Page, WaitPolicy};
//! use std::time::Duration;
//!
//! let page = Page::builder("Contact")
//!     .element("Submit", LocatorDescriptor::css("button.wpforms-submit"))
//!     .build()?;
//! let engine = InteractionEngine::default();
//!
//! let patient = WaitPolicy::new(Duration::from_secs(10), Duration::from_millis(250))?;
//! match engine.click(&session, page.registry(), "Submit", Some(patient)).await? {
//!     ActionResult::Success(_) => {}
//!     ActionResult::NotInteractable { waited, .. } => panic!("still covered after {waited:?}"),
//!     other => panic!("{other}"),
//! }
//! ```
//!
//! # Features
//!
//! - `webdriver`: [`WebDriverProvider`] / [`WebDriverSession`], a `Session`
//!   implementation over a W3C WebDriver endpoint (fantoccini)

pub mod api;
pub mod catalog;
pub mod engine;
mod error;
pub mod locator;
pub mod outcome;
pub mod page;
pub mod registry;
pub mod session;
pub mod steps;
pub mod vocabulary;
pub mod wait;
#[cfg(feature = "webdriver")]
pub mod webdriver;

// Re-export error types
pub use error::{Error, Result};

// Re-export element registry and locators
pub use locator::{LocatorDescriptor, Strategy};
pub use registry::ElementRegistry;

// Re-export pages
pub use catalog::PageCatalog;
pub use page::{ElementSpec, Page, PageBuilder, PageSpec};

// Re-export interaction engine and wait configuration
pub use engine::InteractionEngine;
pub use outcome::ActionResult;
pub use wait::{DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, WaitPolicy};

// Re-export session seams
pub use session::{ElementState, Session, SessionError, SessionProvider};

// Re-export step dispatch
pub use steps::{StepDispatcher, StepFuture, StepHandler, StepPattern};
pub use vocabulary::ScenarioContext;

// Re-export launch options
pub use api::{BrowserKind, LaunchOptions, WindowSize};

#[cfg(feature = "webdriver")]
pub use webdriver::{WebDriverProvider, WebDriverSession};
