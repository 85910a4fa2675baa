//! Account credentials and client construction options

use std::time::Duration;

use url::Url;

use crate::error::{ApiError, Result};

/// Hosted domain appended to bare account names
const DEFAULT_DOMAIN: &str = "taskboard.io";

/// Credentials for a taskboard account
///
/// The `account` field accepts either a bare account name, expanded to
/// `https://{account}.taskboard.io`, or a full URL (anything containing
/// `://`) which is used as-is. The latter is how self-hosted instances and
/// test servers are addressed.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Account name or full base URL
    pub account: String,
    /// Email used for HTTP basic auth
    pub email: String,
    /// Password used for HTTP basic auth
    pub password: String,
    /// Transport options passed through to the HTTP client
    pub options: ClientOptions,
}

impl Credentials {
    /// Create credentials with default client options
    pub fn new(
        account: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            email: email.into(),
            password: password.into(),
            options: ClientOptions::default(),
        }
    }

    /// Replace the client options
    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Check that all required fields are present
    pub fn validate(&self) -> Result<()> {
        if self.account.trim().is_empty() {
            return Err(ApiError::Config("account must not be empty".to_string()));
        }
        if self.email.trim().is_empty() {
            return Err(ApiError::Config("email must not be empty".to_string()));
        }
        if self.password.trim().is_empty() {
            return Err(ApiError::Config("password must not be empty".to_string()));
        }
        Ok(())
    }

    /// Resolve the base URL all endpoint paths are joined onto
    ///
    /// The returned URL always ends with a trailing slash so joining relative
    /// endpoint paths never drops a path segment the caller provided.
    pub fn base_url(&self) -> Result<Url> {
        self.validate()?;

        let raw = if self.account.contains("://") {
            self.account.clone()
        } else {
            format!("https://{}.{}", self.account, DEFAULT_DOMAIN)
        };

        let mut url = Url::parse(&raw)
            .map_err(|e| ApiError::Config(format!("invalid account URL {raw:?}: {e}")))?;

        if !url.path().ends_with('/') {
            url.set_path(&format!("{}/", url.path()));
        }

        Ok(url)
    }
}

/// Transport options passed through to the HTTP client
///
/// These are opaque to everything above the client: the polling engine never
/// inspects them.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Proxy URL for all requests
    pub proxy: Option<String>,
    /// Per-request timeout
    pub timeout: Option<Duration>,
}

impl ClientOptions {
    /// Create options with no proxy and no timeout
    pub fn new() -> Self {
        Self::default()
    }

    /// Route all requests through the given proxy
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Apply a per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("acme", "https://acme.taskboard.io/")]
    #[case("https://boards.example.com", "https://boards.example.com/")]
    #[case("https://example.com/kanban", "https://example.com/kanban/")]
    #[case("http://127.0.0.1:8080", "http://127.0.0.1:8080/")]
    fn test_base_url_derivation(#[case] account: &str, #[case] expected: &str) {
        let credentials = Credentials::new(account, "kanban@example.com", "trustno1");
        assert_eq!(credentials.base_url().unwrap().as_str(), expected);
    }

    #[test]
    fn test_base_url_rejects_missing_fields() {
        let no_account = Credentials::new("", "kanban@example.com", "trustno1");
        assert!(matches!(no_account.base_url(), Err(ApiError::Config(_))));

        let no_email = Credentials::new("acme", "", "trustno1");
        assert!(matches!(no_email.base_url(), Err(ApiError::Config(_))));

        let no_password = Credentials::new("acme", "kanban@example.com", "");
        assert!(matches!(no_password.base_url(), Err(ApiError::Config(_))));
    }

    #[test]
    fn test_base_url_rejects_malformed_url() {
        let credentials = Credentials::new("not a host://", "kanban@example.com", "trustno1");
        assert!(matches!(credentials.base_url(), Err(ApiError::Config(_))));
    }

    #[test]
    fn test_options_builders() {
        let options = ClientOptions::new()
            .with_proxy("http://proxy.internal:3128")
            .with_timeout(Duration::from_secs(10));

        assert_eq!(options.proxy.as_deref(), Some("http://proxy.internal:3128"));
        assert_eq!(options.timeout, Some(Duration::from_secs(10)));

        let defaults = ClientOptions::default();
        assert!(defaults.proxy.is_none());
        assert!(defaults.timeout.is_none());
    }
}
