use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::domain::{ValidationError, ValidationRule};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, PartialEq, Eq)]
/// Connection settings for the Moov Money API. Immutable once built.
pub struct Config {
    api_url: String,
    username: String,
    password: String,
    test_mode: bool,
    timeout: Duration,
    verify_ssl: bool,
}

impl Config {
    /// Build a config with defaults: live mode, 30 s timeout, TLS verification on.
    pub fn new(
        api_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::builder(api_url, username, password).build()
    }

    pub fn builder(
        api_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> ConfigBuilder {
        ConfigBuilder {
            api_url: api_url.into(),
            username: username.into(),
            password: password.into(),
            test_mode: false,
            timeout: DEFAULT_TIMEOUT,
            verify_ssl: true,
        }
    }

    /// API endpoint, without trailing slash.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn is_test_mode(&self) -> bool {
        self.test_mode
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn verify_ssl(&self) -> bool {
        self.verify_ssl
    }

    /// `base64(username:password)` for the `Authorization: Basic` header.
    pub fn basic_auth_token(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.username, self.password))
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("test_mode", &self.test_mode)
            .field("timeout", &self.timeout)
            .field("verify_ssl", &self.verify_ssl)
            .finish()
    }
}

#[derive(Debug, Clone)]
/// Builder for [`Config`].
pub struct ConfigBuilder {
    api_url: String,
    username: String,
    password: String,
    test_mode: bool,
    timeout: Duration,
    verify_ssl: bool,
}

impl ConfigBuilder {
    /// Mark the config as targeting the test platform.
    pub fn test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// Timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disable only against test servers with self-signed certificates.
    pub fn verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.verify_ssl = verify_ssl;
        self
    }

    /// Strip trailing slashes from the URL, check it is absolute and that a username is set.
    pub fn build(self) -> Result<Config, ValidationError> {
        let api_url = self.api_url.trim_end_matches('/').to_owned();
        if url::Url::parse(&api_url).is_err() {
            return Err(ValidationError::new(
                format!("invalid API URL: {api_url}"),
                "apiUrl",
                Some(Value::from(api_url)),
                ValidationRule::UrlFormat,
            ));
        }
        if self.username.is_empty() {
            return Err(ValidationError::required_field("username"));
        }

        Ok(Config {
            api_url,
            username: self.username,
            password: self.password,
            test_mode: self.test_mode,
            timeout: self.timeout,
            verify_ssl: self.verify_ssl,
        })
    }
}
