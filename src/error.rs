//! Error taxonomy.
//!
//! Every failure surfaced by this crate is one [`MoovMoneyError`]:
//! - [`ValidationError`]: rejected client-side, nothing was sent,
//! - [`AuthenticationError`]: the server refused the credentials,
//! - [`NetworkError`]: no HTTP response was obtained,
//! - [`ApiError`]: application-level failure or a response that could not be understood.
//!
//! All kinds expose a message, a numeric code, an optional `trans-id` and optional
//! error-data so retry and display logic can be written once.

use std::error::Error as StdError;
use std::time::Duration;

use serde_json::Value;

use crate::domain::{ApiResult, ExtendedData, ValidationError};

pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`MoovMoneyClient`](crate::MoovMoneyClient) and its resources.
pub enum MoovMoneyError {
    /// A field was rejected before anything was sent.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// HTTP 401, or a permission failure reported by the caller.
    #[error("authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    /// Connection, TLS, DNS or timeout failure before a response was available.
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// Application-level error status, non-2xx HTTP status or undecodable body.
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

impl MoovMoneyError {
    pub fn code(&self) -> i64 {
        match self {
            Self::Validation(err) => err.code(),
            Self::Authentication(err) => err.code(),
            Self::Network(err) => err.code(),
            Self::Api(err) => err.code(),
        }
    }

    /// Server transaction id attached to the failure, if any.
    pub fn transaction_id(&self) -> Option<&str> {
        match self {
            Self::Api(err) => err.transaction_id(),
            _ => None,
        }
    }

    /// `extended-data` from the failing response, if any.
    pub fn error_data(&self) -> Option<&ExtendedData> {
        match self {
            Self::Api(err) => err.error_data(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthenticationErrorKind {
    InvalidCredentials,
    SessionExpired,
    InsufficientPermissions,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct AuthenticationError {
    kind: AuthenticationErrorKind,
    message: String,
    username: Option<String>,
}

impl AuthenticationError {
    /// `message` replaces the default description when the server provided one.
    pub fn invalid_credentials(username: Option<String>, message: Option<String>) -> Self {
        Self {
            kind: AuthenticationErrorKind::InvalidCredentials,
            message: message.unwrap_or_else(|| {
                "invalid credentials, check your authentication settings".to_owned()
            }),
            username,
        }
    }

    pub fn session_expired(username: Option<String>) -> Self {
        Self {
            kind: AuthenticationErrorKind::SessionExpired,
            message: "session expired, authenticate again".to_owned(),
            username,
        }
    }

    pub fn insufficient_permissions(username: Option<String>, resource: Option<&str>) -> Self {
        let message = match resource {
            Some(resource) => format!("insufficient permissions to access {resource}"),
            None => "insufficient permissions".to_owned(),
        };
        Self {
            kind: AuthenticationErrorKind::InsufficientPermissions,
            message,
            username,
        }
    }

    pub fn kind(&self) -> AuthenticationErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Username the request was authenticated with.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn code(&self) -> i64 {
        match self.kind {
            AuthenticationErrorKind::InsufficientPermissions => 403,
            AuthenticationErrorKind::InvalidCredentials
            | AuthenticationErrorKind::SessionExpired => 401,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkErrorKind {
    Timeout,
    Ssl,
    Dns,
    Connection,
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct NetworkError {
    kind: NetworkErrorKind,
    message: String,
    url: String,
    method: String,
    timeout: Option<Duration>,
    #[source]
    source: Option<BoxError>,
}

/// A failure reported by the HTTP layer before any response was available.
#[derive(Debug)]
pub(crate) struct TransportFailure {
    /// Full error chain, outermost first.
    pub(crate) message: String,
    /// Set when the HTTP library itself knows the request timed out.
    pub(crate) timed_out: bool,
    pub(crate) source: Option<BoxError>,
}

impl NetworkError {
    pub fn connection_timeout(
        url: impl Into<String>,
        method: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let url = url.into();
        Self {
            kind: NetworkErrorKind::Timeout,
            message: format!(
                "timed out connecting to {url} (timeout: {}s)",
                timeout.as_secs_f64()
            ),
            url,
            method: method.into(),
            timeout: Some(timeout),
            source: None,
        }
    }

    pub fn ssl_error(url: impl Into<String>, method: impl Into<String>, detail: &str) -> Self {
        let url = url.into();
        Self {
            kind: NetworkErrorKind::Ssl,
            message: with_detail(format!("SSL error connecting to {url}"), detail),
            url,
            method: method.into(),
            timeout: None,
            source: None,
        }
    }

    pub fn dns_error(url: impl Into<String>, method: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            kind: NetworkErrorKind::Dns,
            message: format!("could not resolve host for {url}"),
            url,
            method: method.into(),
            timeout: None,
            source: None,
        }
    }

    pub fn connection_error(
        url: impl Into<String>,
        method: impl Into<String>,
        detail: &str,
    ) -> Self {
        let url = url.into();
        Self {
            kind: NetworkErrorKind::Connection,
            message: with_detail(format!("connection error to {url}"), detail),
            url,
            method: method.into(),
            timeout: None,
            source: None,
        }
    }

    /// Sub-classify a transport failure. Order matters: timeout, SSL, DNS, then generic.
    ///
    /// The message checks are substring based; `timed_out` lets the HTTP library short-cut
    /// the timeout check with a structured flag.
    pub(crate) fn classify(
        url: &str,
        method: &str,
        timeout: Duration,
        failure: TransportFailure,
    ) -> Self {
        let lowered = failure.message.to_lowercase();
        let classified = if failure.timed_out || failure.message.contains("timeout") {
            Self::connection_timeout(url, method, timeout)
        } else if lowered.contains("ssl") {
            Self::ssl_error(url, method, &failure.message)
        } else if lowered.contains("could not resolve host") || lowered.contains("dns error") {
            Self::dns_error(url, method)
        } else {
            Self::connection_error(url, method, &failure.message)
        };
        classified.with_source(failure.source)
    }

    fn with_source(mut self, source: Option<BoxError>) -> Self {
        self.source = source;
        self
    }

    pub fn kind(&self) -> NetworkErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Configured timeout, set for [`NetworkErrorKind::Timeout`].
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn code(&self) -> i64 {
        match self.kind {
            NetworkErrorKind::Timeout => 408,
            NetworkErrorKind::Ssl => 525,
            NetworkErrorKind::Dns | NetworkErrorKind::Connection => 500,
        }
    }
}

fn with_detail(message: String, detail: &str) -> String {
    if detail.is_empty() {
        message
    } else {
        format!("{message}: {detail}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// The response `status` was present and not zero.
    Application,
    /// Non-2xx HTTP status whose body was not an application error payload.
    HttpStatus,
    /// The body could not be decoded as a JSON object.
    MalformedResponse,
    /// An expected part of a successful response was missing or undecodable.
    MissingData,
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    kind: ApiErrorKind,
    message: String,
    code: i64,
    transaction_id: Option<String>,
    error_data: Option<ExtendedData>,
    #[source]
    source: Option<BoxError>,
}

const UNKNOWN_API_ERROR: &str = "unknown API error";

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>, code: i64) -> Self {
        Self {
            kind,
            message: message.into(),
            code,
            transaction_id: None,
            error_data: None,
            source: None,
        }
    }

    /// Build from an application error payload: code from `status`, message from
    /// `message`/`statusdescription`, plus `trans-id` and `extended-data`.
    pub fn from_response(response: &ApiResult) -> Self {
        Self {
            kind: ApiErrorKind::Application,
            message: response
                .reported_message()
                .unwrap_or(UNKNOWN_API_ERROR)
                .to_owned(),
            code: response.status_code().unwrap_or(0),
            transaction_id: response.transaction_id(),
            error_data: response.extended_data().cloned(),
            source: None,
        }
    }

    pub fn http_status(status: u16, reason: Option<&str>) -> Self {
        let message = match reason {
            Some(reason) => format!("HTTP error: {status} {reason}"),
            None => format!("HTTP error: {status}"),
        };
        Self::new(ApiErrorKind::HttpStatus, message, i64::from(status))
    }

    pub fn malformed_json(err: serde_json::Error) -> Self {
        let mut api_error = Self::new(
            ApiErrorKind::MalformedResponse,
            format!("invalid JSON response: {err}"),
            0,
        );
        api_error.source = Some(Box::new(err));
        api_error
    }

    pub fn missing_data(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::MissingData, message, 0)
    }

    pub(crate) fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub(crate) fn set_message(&mut self, message: String) {
        self.message = message;
    }

    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    pub fn error_data(&self) -> Option<&ExtendedData> {
        self.error_data.as_ref()
    }
}

/// Integer value of a response `status`: numbers as-is, strings by their leading digits.
pub(crate) fn status_to_code(status: &Value) -> i64 {
    match status {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|value| value.trunc() as i64))
            .unwrap_or(0),
        Value::String(text) => leading_integer(text.trim()),
        Value::Bool(true) => 1,
        _ => 0,
    }
}

fn leading_integer(text: &str) -> i64 {
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|value| sign * value).unwrap_or(0)
}
