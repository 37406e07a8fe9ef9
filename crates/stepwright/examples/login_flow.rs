// Login flow example - A scenario driven by step phrases over WebDriver
//
// Shows: locator data, the standard vocabulary, launch options from the
// environment, typed step outcomes
//
// Needs a WebDriver server, e.g. `chromedriver --port=9515`, then:
//
//   cargo run --example login_flow --features webdriver
//
// STEPWRIGHT_BROWSER, STEPWRIGHT_HEADLESS and STEPWRIGHT_WEBDRIVER_URL pick
// the browser; STEPWRIGHT_TIMEOUT_MS and STEPWRIGHT_POLL_INTERVAL_MS tune the
// waits.

use std::sync::Arc;
use stepwright::{
    InteractionEngine, LaunchOptions, PageCatalog, ScenarioContext, SessionProvider, WaitPolicy,
    WebDriverProvider, vocabulary,
};

const PAGES: &str = r#"{
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
            "elements": [
                {"name": "Heading", "strategy": "css", "value": "h1.post-title"},
                {"name": "Log out", "strategy": "link_text", "value": "Log out"}
            ]
        }
    ]
}"#;

const SCENARIO: &[&str] = &[
    r#"Given user navigates to the "Login" page"#,
    r#"Then user verifies the page title is "Test Login | Practice Test Automation""#,
    r#"When user enters "student" into the "Username""#,
    r#"And user enters "Password123" into the "Password""#,
    r#"And user clicks the "Submit""#,
    r#"Then user opens the URL "https://practicetestautomation.com/logged-in-successfully/""#,
    r#"And user verifies the "Heading" text is "Logged In Successfully""#,
    r#"And user verifies the "Log out" is visible"#,
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Arc::new(PageCatalog::from_json_str(PAGES)?);
    let options = LaunchOptions::from_env()?;

    println!("Launching {} via {}", options.browser, options.endpoint());
    let provider = WebDriverProvider::new();
    let session = Arc::new(provider.launch(&options).await?);

    let engine = InteractionEngine::new(WaitPolicy::from_env()?);
    let mut ctx = ScenarioContext::new(session.clone(), catalog, engine);
    let steps = vocabulary::standard()?;

    let mut failed = None;
    for phrase in SCENARIO {
        let result = steps.dispatch(&mut ctx, phrase).await?;
        println!("  {:<16} {phrase}", result.state());
        if !result.is_success() {
            failed = Some(result);
            break;
        }
    }

    drop(ctx);
    match Arc::try_unwrap(session) {
        Ok(session) => provider.close(session).await?,
        Err(_) => eprintln!("Session still shared, leaving the browser open"),
    }

    if let Some(result) = failed {
        result.into_result()?;
    }
    println!("Scenario passed");
    Ok(())
}
