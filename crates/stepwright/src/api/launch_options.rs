// Launch options for SessionProvider::launch()
//
// Describes which browser to start and how. Providers translate these into
// their own launch parameters; `capabilities()` produces the W3C WebDriver
// form used by the `webdriver` feature.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;
use std::str::FromStr;

/// Default WebDriver endpoint (chromedriver's default port)
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Environment variable selecting the browser kind
pub const BROWSER_ENV: &str = "STEPWRIGHT_BROWSER";

/// Environment variable toggling headless mode (`true`/`false`)
pub const HEADLESS_ENV: &str = "STEPWRIGHT_HEADLESS";

/// Environment variable with the WebDriver endpoint
pub const WEBDRIVER_URL_ENV: &str = "STEPWRIGHT_WEBDRIVER_URL";

/// Browser to launch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chrome,
    Firefox,
    Edge,
}

impl BrowserKind {
    /// W3C `browserName` capability
    pub fn browser_name(&self) -> &'static str {
        match self {
            BrowserKind::Chrome => "chrome",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Edge => "MicrosoftEdge",
        }
    }

    /// Vendor capability key holding browser arguments
    fn options_key(&self) -> &'static str {
        match self {
            BrowserKind::Chrome => "goog:chromeOptions",
            BrowserKind::Firefox => "moz:firefoxOptions",
            BrowserKind::Edge => "ms:edgeOptions",
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BrowserKind::Chrome => "chrome",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Edge => "edge",
        };
        f.write_str(name)
    }
}

impl FromStr for BrowserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" | "chromium" => Ok(BrowserKind::Chrome),
            "firefox" => Ok(BrowserKind::Firefox),
            "edge" | "msedge" | "microsoftedge" => Ok(BrowserKind::Edge),
            other => Err(Error::Config(format!("Unsupported browser: {other}"))),
        }
    }
}

/// Browser window dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

/// Options for launching a browser session
///
/// Unset options fall back to the provider's defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchOptions {
    /// Browser to launch
    #[serde(default)]
    pub browser: BrowserKind,

    /// Run in headless mode (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headless: Option<bool>,

    /// Additional arguments to pass to the browser process
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,

    /// WebDriver endpoint (default: DEFAULT_WEBDRIVER_URL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webdriver_url: Option<String>,

    /// Initial window size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_size: Option<WindowSize>,

    /// Page load timeout in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_load_timeout: Option<u64>,
}

impl LaunchOptions {
    /// Creates a new LaunchOptions with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Options from `STEPWRIGHT_BROWSER`, `STEPWRIGHT_HEADLESS` and
    /// `STEPWRIGHT_WEBDRIVER_URL`; unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();
        if let Some(browser) = read_env(BROWSER_ENV)? {
            options.browser = browser.parse()?;
        }
        if let Some(headless) = read_env(HEADLESS_ENV)? {
            let enabled = headless.trim().parse::<bool>().map_err(|_| {
                Error::Config(format!("{HEADLESS_ENV}='{headless}' must be true or false"))
            })?;
            options.headless = Some(enabled);
        }
        if let Some(endpoint) = read_env(WEBDRIVER_URL_ENV)? {
            options.webdriver_url = Some(endpoint);
        }
        options.validate()?;
        Ok(options)
    }

    /// Set the browser to launch
    pub fn browser(mut self, browser: BrowserKind) -> Self {
        self.browser = browser;
        self
    }

    /// Run in headless mode
    pub fn headless(mut self, enabled: bool) -> Self {
        self.headless = Some(enabled);
        self
    }

    /// Set additional arguments to pass to the browser
    pub fn args(mut self, args: Vec<String>) -> Self {
        self.args = Some(args);
        self
    }

    /// Set the WebDriver endpoint
    pub fn webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = Some(url.into());
        self
    }

    /// Set the initial window size
    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = Some(WindowSize { width, height });
        self
    }

    /// Set the page load timeout in milliseconds
    pub fn page_load_timeout(mut self, ms: u64) -> Self {
        self.page_load_timeout = Some(ms);
        self
    }

    /// WebDriver endpoint, defaulted
    pub fn endpoint(&self) -> &str {
        self.webdriver_url.as_deref().unwrap_or(DEFAULT_WEBDRIVER_URL)
    }

    /// Checks that the endpoint is a usable http(s) URL
    pub fn validate(&self) -> Result<()> {
        let endpoint = url::Url::parse(self.endpoint())
            .map_err(|e| Error::Config(format!("Invalid WebDriver URL '{}': {e}", self.endpoint())))?;
        match endpoint.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(Error::Config(format!(
                "WebDriver URL must use http or https, got '{scheme}'"
            ))),
        }
    }

    /// W3C capabilities for a new WebDriver session
    ///
    /// Headless mode and window size are folded into the vendor argument
    /// list, after any user-supplied arguments.
    pub fn capabilities(&self) -> Map<String, Value> {
        let mut args = self.args.clone().unwrap_or_default();

        if self.headless.unwrap_or(true) {
            let flag = match self.browser {
                BrowserKind::Firefox => "-headless",
                BrowserKind::Chrome | BrowserKind::Edge => "--headless=new",
            };
            args.push(flag.to_string());
        }

        if let Some(size) = self.window_size {
            match self.browser {
                BrowserKind::Firefox => {
                    args.push(format!("--width={}", size.width));
                    args.push(format!("--height={}", size.height));
                }
                BrowserKind::Chrome | BrowserKind::Edge => {
                    args.push(format!("--window-size={},{}", size.width, size.height));
                }
            }
        }

        let mut caps = Map::new();
        caps.insert("browserName".to_string(), json!(self.browser.browser_name()));
        caps.insert(self.browser.options_key().to_string(), json!({ "args": args }));
        if let Some(ms) = self.page_load_timeout {
            caps.insert("timeouts".to_string(), json!({ "pageLoad": ms }));
        }
        caps
    }
}

fn read_env(key: &str) -> Result<Option<String>> {
    match std::env::var(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(Error::Config(format!("{key}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_options_default() {
        let opts = LaunchOptions::default();
        assert_eq!(opts.browser, BrowserKind::Chrome);
        assert!(opts.headless.is_none());
        assert!(opts.args.is_none());
        assert_eq!(opts.endpoint(), DEFAULT_WEBDRIVER_URL);
    }

    #[test]
    fn test_builder_pattern_chaining() {
        let opts = LaunchOptions::new()
            .browser(BrowserKind::Firefox)
            .headless(false)
            .page_load_timeout(30_000)
            .args(vec!["--no-sandbox".to_string()])
            .webdriver_url("http://localhost:4444");

        assert_eq!(opts.browser, BrowserKind::Firefox);
        assert_eq!(opts.headless, Some(false));
        assert_eq!(opts.page_load_timeout, Some(30_000));
        assert_eq!(opts.endpoint(), "http://localhost:4444");
    }

    #[test]
    fn test_chrome_capabilities() {
        let caps = LaunchOptions::default()
            .args(vec![
                "--no-sandbox".to_string(),
                "--disable-dev-shm-usage".to_string(),
            ])
            .window_size(1920, 1080)
            .capabilities();

        assert_eq!(caps["browserName"], "chrome");
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        let args: Vec<_> = args.iter().map(|a| a.as_str().unwrap()).collect();
        assert_eq!(
            args,
            vec![
                "--no-sandbox",
                "--disable-dev-shm-usage",
                "--headless=new",
                "--window-size=1920,1080"
            ]
        );
        assert!(caps.get("timeouts").is_none());
    }

    #[test]
    fn test_firefox_headed_capabilities() {
        let caps = LaunchOptions::default()
            .browser(BrowserKind::Firefox)
            .headless(false)
            .page_load_timeout(30_000)
            .capabilities();

        assert_eq!(caps["browserName"], "firefox");
        assert!(caps["moz:firefoxOptions"]["args"].as_array().unwrap().is_empty());
        assert_eq!(caps["timeouts"]["pageLoad"], 30_000);
    }

    #[test]
    fn test_browser_kind_parsing() {
        assert_eq!("Chrome".parse::<BrowserKind>().unwrap(), BrowserKind::Chrome);
        assert_eq!("msedge".parse::<BrowserKind>().unwrap(), BrowserKind::Edge);
        assert!("safari".parse::<BrowserKind>().is_err());
    }

    #[test]
    fn test_validate_rejects_non_http_endpoint() {
        assert!(LaunchOptions::default().validate().is_ok());
        assert!(
            LaunchOptions::default()
                .webdriver_url("ws://localhost:9515")
                .validate()
                .is_err()
        );
        assert!(
            LaunchOptions::default()
                .webdriver_url("not a url")
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_serde_round_trip_uses_camel_case() {
        let opts = LaunchOptions::default().webdriver_url("http://grid:4444");
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json["webdriverUrl"], "http://grid:4444");
        assert_eq!(json["browser"], "chrome");

        let parsed: LaunchOptions =
            serde_json::from_str(r#"{"browser": "edge", "headless": true}"#).unwrap();
        assert_eq!(parsed.browser, BrowserKind::Edge);
        assert_eq!(parsed.headless, Some(true));
    }
}
