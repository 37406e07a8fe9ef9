// Wait policy - Bounds for explicit waits
//
// Every waiting engine call polls at `poll_interval` until its condition holds
// or `timeout` has elapsed.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default timeout for waiting interactions (5 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Environment variable overriding the default timeout, in milliseconds
pub const TIMEOUT_ENV: &str = "STEPWRIGHT_TIMEOUT_MS";

/// Environment variable overriding the default poll interval, in milliseconds
pub const POLL_INTERVAL_ENV: &str = "STEPWRIGHT_POLL_INTERVAL_MS";

/// Timeout and polling interval for an explicit wait.
///
/// Both values are positive and the poll interval is strictly shorter than
/// the timeout.
///
/// # Example
///
/// ```ignore
/// use stepwright::WaitPolicy;
///
/// let quick = WaitPolicy::from_millis(1_000, 50)?;
/// assert!(WaitPolicy::from_millis(100, 100).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWaitPolicy", into = "RawWaitPolicy")]
pub struct WaitPolicy {
    timeout: Duration,
    poll_interval: Duration,
}

impl WaitPolicy {
    /// Creates a policy, validating `0 < poll_interval < timeout`
    pub fn new(timeout: Duration, poll_interval: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(Error::InvalidArgument(
                "wait timeout must be greater than zero".to_string(),
            ));
        }
        if poll_interval.is_zero() {
            return Err(Error::InvalidArgument(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if poll_interval >= timeout {
            return Err(Error::InvalidArgument(format!(
                "poll interval ({poll_interval:?}) must be shorter than timeout ({timeout:?})"
            )));
        }
        Ok(Self {
            timeout,
            poll_interval,
        })
    }

    pub fn from_millis(timeout_ms: u64, poll_interval_ms: u64) -> Result<Self> {
        Self::new(
            Duration::from_millis(timeout_ms),
            Duration::from_millis(poll_interval_ms),
        )
    }

    /// Default policy with `STEPWRIGHT_TIMEOUT_MS` / `STEPWRIGHT_POLL_INTERVAL_MS` applied
    pub fn from_env() -> Result<Self> {
        let timeout = read_env_millis(TIMEOUT_ENV)?.unwrap_or(DEFAULT_TIMEOUT);
        let poll_interval = read_env_millis(POLL_INTERVAL_ENV)?.unwrap_or(DEFAULT_POLL_INTERVAL);
        Self::new(timeout, poll_interval)
    }

    /// Returns a copy with a different timeout
    pub fn with_timeout(self, timeout: Duration) -> Result<Self> {
        Self::new(timeout, self.poll_interval)
    }

    /// Returns a copy with a different poll interval
    pub fn with_poll_interval(self, poll_interval: Duration) -> Result<Self> {
        Self::new(self.timeout, poll_interval)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

fn read_env_millis(key: &str) -> Result<Option<Duration>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|e| Error::Config(format!("{key}='{raw}' is not a number of milliseconds: {e}"))),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(Error::Config(format!("{key}: {e}"))),
    }
}

/// Serialized form of [`WaitPolicy`]
#[derive(Serialize, Deserialize)]
struct RawWaitPolicy {
    timeout_ms: u64,
    poll_interval_ms: u64,
}

impl TryFrom<RawWaitPolicy> for WaitPolicy {
    type Error = Error;

    fn try_from(raw: RawWaitPolicy) -> Result<Self> {
        WaitPolicy::from_millis(raw.timeout_ms, raw.poll_interval_ms)
    }
}

impl From<WaitPolicy> for RawWaitPolicy {
    fn from(policy: WaitPolicy) -> Self {
        Self {
            timeout_ms: policy.timeout.as_millis() as u64,
            poll_interval_ms: policy.poll_interval.as_millis() as u64,
        }
    }
}
