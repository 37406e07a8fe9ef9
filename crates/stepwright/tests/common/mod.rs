// Shared test helpers

// Each test binary compiles this module separately
#![allow(dead_code)]

use std::sync::Once;

static INIT: Once = Once::new();

/// Installs a fmt subscriber honoring `RUST_LOG`, once per test binary
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("stepwright=debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Locator data for the login and contact pages used across tests
pub const SITE: &str = r#"{
    "pages": [
        {
            "name": "Login",
            "url": "https://practicetestautomation.com/practice-test-login/",
            "title": "Test Login | Practice Test Automation",
            "elements": [
                {"name": "Username", "strategy": "id", "value": "username"},
                {"name": "Password", "strategy": "id", "value": "password"},
                {"name": "Submit", "strategy": "id", "value": "submit"},
                {"name": "Error Message", "strategy": "id", "value": "error"}
            ]
        },
        {
            "name": "Logged In Successfully",
            "url": "https://practicetestautomation.com/logged-in-successfully/",
            "title": "Logged In Successfully | Practice Test Automation",
            "elements": [
                {"name": "Heading", "strategy": "css", "value": "h1.post-title"},
                {"name": "Log out", "strategy": "link_text", "value": "Log out"}
            ]
        }
    ]
}"#;
