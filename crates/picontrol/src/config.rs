//! Configuration for the process image client

use crate::error::{Error, Result};
use picontrol_protocol::DEFAULT_DEVICE_PATH;
use std::path::PathBuf;
use std::time::Duration;

/// How variable names that do not fit the driver's name field are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamePolicy {
    /// Cut the name to fit, as the C interface does
    #[default]
    Truncate,
    /// Reject the name before any request is issued
    Reject,
}

/// Configuration for the process image client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Device node of the process image
    pub device_path: PathBuf,

    /// Handling of over-long variable names
    pub name_policy: NamePolicy,

    /// Timeout applied by the async wrapper; blocking calls never time out
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            device_path: PathBuf::from(DEFAULT_DEVICE_PATH),
            name_policy: NamePolicy::Truncate,
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Set the device node path.
    pub fn with_device_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.device_path = path.into();
        self
    }

    /// Set the variable name policy.
    pub fn with_name_policy(mut self, policy: NamePolicy) -> Self {
        self.name_policy = policy;
        self
    }

    /// Reject over-long variable names instead of truncating them.
    pub fn strict_names(self) -> Self {
        self.with_name_policy(NamePolicy::Reject)
    }

    /// Set the timeout used by the async wrapper.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// This will look for:
    /// - `PICONTROL_DEVICE` for the device node path
    /// - `PICONTROL_STRICT_NAMES` (`true`/`false`/`1`/`0`) for the name policy
    /// - `PICONTROL_TIMEOUT_MS` for the async timeout in milliseconds
    ///
    /// # Errors
    ///
    /// Returns an error if `PICONTROL_STRICT_NAMES` or `PICONTROL_TIMEOUT_MS`
    /// is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        use std::env;

        let mut config = Self::default();

        if let Ok(path) = env::var("PICONTROL_DEVICE") {
            config.device_path = PathBuf::from(path);
        }

        if let Ok(strict) = env::var("PICONTROL_STRICT_NAMES") {
            config.name_policy = match strict.trim().to_ascii_lowercase().as_str() {
                "1" | "true" => NamePolicy::Reject,
                "0" | "false" => NamePolicy::Truncate,
                _ => {
                    return Err(Error::Config(format!(
                        "PICONTROL_STRICT_NAMES must be true or false, got: '{}'",
                        strict
                    )));
                }
            };
        }

        // Timeout - return error if invalid
        if let Ok(timeout_str) = env::var("PICONTROL_TIMEOUT_MS") {
            let millis = timeout_str.parse::<u64>().map_err(|_| {
                Error::Config(format!(
                    "PICONTROL_TIMEOUT_MS must be a number of milliseconds, got: '{}'",
                    timeout_str
                ))
            })?;
            config.timeout = Some(Duration::from_millis(millis));
        }

        Ok(config)
    }
}
