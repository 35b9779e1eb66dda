//! Configuration structures for a single invocation.

use std::fmt;
use std::time::Duration;

use crate::error::{AppError, Result};

/// Names under which the connector's parameters are stored.
///
/// The deployment only hands the connector the *names* of its parameters;
/// the values themselves live in the parameter and secret stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterNames {
    /// Root of the parameter hierarchy (the contact-center instance alias)
    pub root: String,
    /// Deployment environment, e.g. `poc`
    pub environment: String,
    pub base_url: String,
    pub phone_service_path: String,
    pub username: String,
    /// Secret id of the CRM password (not prefixed)
    pub password_secret: String,
    pub bucket_name: String,
}

impl ParameterNames {
    /// Read parameter names from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read parameter names through an arbitrary variable lookup.
    ///
    /// The root name has no sensible default and must be present; every other
    /// name falls back to the deployment's standard name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let root = lookup("SSM_PARAM_ROOT_NAME")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::config("SSM_PARAM_ROOT_NAME is not set"))?;

        Ok(Self {
            root,
            environment: read("ENVIRONMENT_NAME", defaults::ENVIRONMENT),
            base_url: read("SSM_PARAM_C4C_BASE_URL", defaults::BASE_URL_PARAM),
            phone_service_path: read(
                "SSM_PARAM_C4C_PHONE_SERVICE_ENDPOINT_PATH",
                defaults::PHONE_SERVICE_PATH_PARAM,
            ),
            username: read("SSM_PARAM_C4C_USERNAME", defaults::USERNAME_PARAM),
            password_secret: read("SECRET_PARAM_C4C_PASSWORD", defaults::PASSWORD_SECRET),
            bucket_name: read("SSM_PARAM_BUCKET_NAME", defaults::BUCKET_NAME_PARAM),
        })
    }

    /// Standard names for the given root and environment.
    pub fn with_root(root: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            environment: environment.into(),
            base_url: defaults::BASE_URL_PARAM.to_string(),
            phone_service_path: defaults::PHONE_SERVICE_PATH_PARAM.to_string(),
            username: defaults::USERNAME_PARAM.to_string(),
            password_secret: defaults::PASSWORD_SECRET.to_string(),
            bucket_name: defaults::BUCKET_NAME_PARAM.to_string(),
        }
    }

    /// Parameter prefix, `/<root>/<environment>/`.
    pub fn prefix(&self) -> String {
        format!(
            "/{}/{}/",
            self.root.trim_matches('/'),
            self.environment.trim_matches('/')
        )
    }

    /// Fully qualified name of a parameter under the prefix.
    pub fn qualified(&self, name: &str) -> String {
        format!("{}{}", self.prefix(), name)
    }
}

/// Resolved connector configuration.
#[derive(Clone)]
pub struct ConnectorConfig {
    /// CRM base URL, always ending in `/`
    pub base_url: String,
    /// Phone service path, always ending in `/`
    pub phone_service_path: String,
    /// Phone call collection path, `<phone_service_path>phoneCalls`
    pub phone_call_path: String,
    pub username: String,
    pub password: String,
    /// Bucket holding the contact analysis documents
    pub bucket_name: String,
}

impl fmt::Debug for ConnectorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorConfig")
            .field("base_url", &self.base_url)
            .field("phone_service_path", &self.phone_service_path)
            .field("phone_call_path", &self.phone_call_path)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("bucket_name", &self.bucket_name)
            .finish()
    }
}

/// Polling schedule for an analysis document whose summary is not written yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of re-reads after the first read
    pub attempts: u32,
    /// Fixed wait before each re-read
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: defaults::RETRY_ATTEMPTS,
            delay: Duration::from_secs(defaults::RETRY_DELAY_SECS),
        }
    }
}

/// Handler behavior settings.
#[derive(Debug, Clone)]
pub struct HandlerSettings {
    /// The only event rule this handler processes
    pub rule_name: String,

    /// Polling for an empty contact summary
    pub summary_retry: RetryPolicy,

    /// Timeout of each CRM request in seconds
    pub crm_timeout_secs: u64,

    /// User-Agent header for CRM requests
    pub user_agent: String,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            rule_name: defaults::RULE_NAME.to_string(),
            summary_retry: RetryPolicy::default(),
            crm_timeout_secs: defaults::CRM_TIMEOUT_SECS,
            user_agent: defaults::user_agent(),
        }
    }
}

impl HandlerSettings {
    /// Settings from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Settings through an arbitrary variable lookup.
    ///
    /// Values that do not parse are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(rule) = lookup("EVENT_RULE_NAME").filter(|v| !v.trim().is_empty()) {
            settings.rule_name = rule;
        }

        if let Some(attempts) = lookup("SUMMARY_RETRY_ATTEMPTS") {
            if let Ok(n) = attempts.parse() {
                settings.summary_retry.attempts = n;
            }
        }

        if let Some(delay) = lookup("SUMMARY_RETRY_DELAY_SECS") {
            if let Ok(secs) = delay.parse() {
                settings.summary_retry.delay = Duration::from_secs(secs);
            }
        }

        if let Some(timeout) = lookup("CRM_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                settings.crm_timeout_secs = secs;
            }
        }

        settings
    }

    /// Validate settings for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.rule_name.trim().is_empty() {
            return Err(AppError::config("rule_name is empty"));
        }
        if self.crm_timeout_secs == 0 {
            return Err(AppError::config("crm_timeout_secs must be > 0"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(AppError::config("user_agent is empty"));
        }
        Ok(())
    }

    /// CRM request timeout.
    pub fn crm_timeout(&self) -> Duration {
        Duration::from_secs(self.crm_timeout_secs)
    }
}

mod defaults {
    pub const ENVIRONMENT: &str = "poc";
    pub const BASE_URL_PARAM: &str = "c4c-base-url";
    pub const PHONE_SERVICE_PATH_PARAM: &str = "c4c-phone-service-endpoint-path";
    pub const USERNAME_PARAM: &str = "c4c-username";
    pub const PASSWORD_SECRET: &str = "Secret-c4c-password";
    pub const BUCKET_NAME_PARAM: &str = "connect-bucket-name";

    pub const RULE_NAME: &str = "SAPPostCallAnalytics";
    pub const RETRY_ATTEMPTS: u32 = 4;
    pub const RETRY_DELAY_SECS: u64 = 30;
    pub const CRM_TIMEOUT_SECS: u64 = 120;

    pub fn user_agent() -> String {
        format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}
