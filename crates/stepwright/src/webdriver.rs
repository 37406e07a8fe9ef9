// WebDriver session - `Session` over a W3C WebDriver endpoint
//
// Built on fantoccini. Each trait method is one WebDriver round trip (or a
// find followed by one); no method waits on its own.
//
// Error mapping:
// - no such element, stale element reference -> transient, polled through
// - element click intercepted, not interactable -> Obscured, polled through
// - invalid selector -> InvalidLocator, ends the wait with NotFound
// - anything else -> Disconnected

use crate::api::LaunchOptions;
use crate::error::{Error, Result};
use crate::locator::{LocatorDescriptor, Strategy};
use crate::session::{ElementState, Session, SessionError, SessionProvider};
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::{Client, ClientBuilder, Locator};

/// Launches sessions against the WebDriver endpoint named in [`LaunchOptions`].
///
/// The driver process (chromedriver, geckodriver, msedgedriver) must already
/// be listening there.
///
/// # Example
///
/// ```ignore
/// use stepwright::{LaunchOptions, SessionProvider, WebDriverProvider};
///
/// let provider = WebDriverProvider::new();
/// let session = provider.launch(&LaunchOptions::from_env()?).await?;
/// // ... run scenarios ...
/// provider.close(session).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct WebDriverProvider;

impl WebDriverProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SessionProvider for WebDriverProvider {
    type Session = WebDriverSession;

    async fn launch(&self, options: &LaunchOptions) -> Result<WebDriverSession> {
        options.validate()?;
        let endpoint = options.endpoint();
        tracing::debug!(endpoint, browser = %options.browser, "Connecting to WebDriver");

        let client = ClientBuilder::native()
            .capabilities(options.capabilities())
            .connect(endpoint)
            .await
            .map_err(|e| Error::LaunchFailed(format!("{endpoint}: {e}")))?;

        tracing::info!(endpoint, browser = %options.browser, "WebDriver session started");
        Ok(WebDriverSession { client })
    }

    async fn close(&self, session: WebDriverSession) -> Result<()> {
        session
            .client
            .close()
            .await
            .map_err(|e| Error::Session(format!("Failed to close WebDriver session: {e}")))
    }
}

/// A live WebDriver browser session
#[derive(Debug, Clone)]
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Wraps an already connected fantoccini client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Underlying fantoccini client, for anything outside the `Session` trait
    pub fn client(&self) -> &Client {
        &self.client
    }

    async fn find(&self, locator: &LocatorDescriptor) -> std::result::Result<Element, SessionError> {
        let by_name;
        let by = match locator.strategy() {
            Strategy::Id => Locator::Id(locator.value()),
            Strategy::Name => {
                by_name = name_selector(locator.value());
                Locator::Css(&by_name)
            }
            Strategy::CssSelector => Locator::Css(locator.value()),
            Strategy::XPath => Locator::XPath(locator.value()),
            Strategy::LinkText => Locator::LinkText(locator.value()),
        };
        self.client.find(by).await.map_err(session_error)
    }
}

#[async_trait]
impl Session for WebDriverSession {
    async fn probe(&self, locator: &LocatorDescriptor) -> std::result::Result<ElementState, SessionError> {
        let element = match self.find(locator).await {
            Ok(element) => element,
            Err(SessionError::NoSuchElement) => return Ok(ElementState::Detached),
            Err(e) => return Err(e),
        };
        if !element.is_displayed().await.map_err(session_error)? {
            return Ok(ElementState::Hidden);
        }
        if element.is_enabled().await.map_err(session_error)? {
            Ok(ElementState::Interactable)
        } else {
            Ok(ElementState::Visible)
        }
    }

    async fn click(&self, locator: &LocatorDescriptor) -> std::result::Result<(), SessionError> {
        self.find(locator).await?.click().await.map_err(session_error)
    }

    async fn clear(&self, locator: &LocatorDescriptor) -> std::result::Result<(), SessionError> {
        self.find(locator).await?.clear().await.map_err(session_error)
    }

    async fn type_text(
        &self,
        locator: &LocatorDescriptor,
        text: &str,
    ) -> std::result::Result<(), SessionError> {
        self.find(locator)
            .await?
            .send_keys(text)
            .await
            .map_err(session_error)
    }

    async fn text(&self, locator: &LocatorDescriptor) -> std::result::Result<String, SessionError> {
        self.find(locator).await?.text().await.map_err(session_error)
    }

    async fn value(&self, locator: &LocatorDescriptor) -> std::result::Result<String, SessionError> {
        let value = self
            .find(locator)
            .await?
            .prop("value")
            .await
            .map_err(session_error)?;
        Ok(value.unwrap_or_default())
    }

    async fn open(&self, url: &str) -> std::result::Result<(), SessionError> {
        self.client.goto(url).await.map_err(session_error)
    }

    async fn title(&self) -> std::result::Result<String, SessionError> {
        self.client.title().await.map_err(session_error)
    }

    async fn current_url(&self) -> std::result::Result<String, SessionError> {
        let url = self.client.current_url().await.map_err(session_error)?;
        Ok(url.to_string())
    }
}

/// CSS selector matching the `name` attribute
fn name_selector(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
    format!("[name=\"{escaped}\"]")
}

fn session_error(error: CmdError) -> SessionError {
    if error.is_no_such_element() {
        return SessionError::NoSuchElement;
    }
    if let CmdError::Standard(ref wd) = error {
        match wd.error {
            ErrorStatus::NoSuchElement => return SessionError::NoSuchElement,
            ErrorStatus::StaleElementReference => return SessionError::StaleElement,
            ErrorStatus::ElementClickIntercepted | ErrorStatus::ElementNotInteractable => {
                return SessionError::Obscured(wd.message.to_string());
            }
            ErrorStatus::InvalidSelector => {
                return SessionError::InvalidLocator(wd.message.to_string());
            }
            _ => {}
        }
    }
    SessionError::Disconnected(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_selector_escapes_quotes() {
        assert_eq!(name_selector("email"), r#"[name="email"]"#);
        assert_eq!(
            name_selector(r#"wpforms[fields][1]"#),
            r#"[name="wpforms[fields][1]"]"#
        );
        assert_eq!(name_selector(r#"a"b"#), r#"[name="a\"b"]"#);
    }
}
