//! Transport adapter: executes one envelope over HTTP and classifies every failure.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::client::config::Config;
use crate::domain::{ApiResult, CommandId, Envelope};
use crate::error::{ApiError, AuthenticationError, MoovMoneyError, NetworkError, TransportFailure};
use crate::transport::{decode_api_result, decode_error_payload};

/// Boxed, `Send` future returned by transport traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

const METHOD: &str = "POST";

/// Executes commands against the API.
///
/// Implementations must be safe to share between concurrent callers; each call is one
/// independent round trip with no retries.
pub trait ApiTransport: Send + Sync {
    /// Send `envelope` under `command` and return the decoded successful result.
    fn post<'a>(
        &'a self,
        command: CommandId,
        envelope: Envelope,
    ) -> BoxFuture<'a, Result<ApiResult, MoovMoneyError>>;

    /// `true` when the result's `status` is present and not zero.
    fn is_error(&self, result: &ApiResult) -> bool {
        result.is_error()
    }

    /// Last chance to reshape the envelope before it is sent. Identity by default.
    fn format_request_data(&self, envelope: Envelope) -> Envelope {
        envelope
    }
}

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) reason: Option<String>,
    pub(crate) body: String,
}

pub(crate) trait HttpTransport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        headers: Vec<(&'static str, String)>,
        body: &'a Envelope,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportFailure>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        headers: Vec<(&'static str, String)>,
        body: &'a Envelope,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportFailure>> {
        Box::pin(async move {
            let mut request = self.client.post(url);
            for (name, value) in headers {
                request = request.header(name, value);
            }
            let response = request.json(body).send().await.map_err(transport_failure)?;
            let status = response.status();
            let body = response.text().await.map_err(transport_failure)?;
            Ok(HttpResponse {
                status: status.as_u16(),
                reason: status.canonical_reason().map(str::to_owned),
                body,
            })
        })
    }
}

fn transport_failure(err: reqwest::Error) -> TransportFailure {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    TransportFailure {
        message,
        timed_out: err.is_timeout(),
        source: Some(Box::new(err)),
    }
}

#[derive(Clone)]
/// [`ApiTransport`] over `reqwest`, with Basic authentication from [`Config`].
pub struct HttpApiTransport {
    config: Arc<Config>,
    http: Arc<dyn HttpTransport>,
}

impl HttpApiTransport {
    /// Build the HTTP client with the configured timeout and TLS policy.
    pub fn new(config: Arc<Config>) -> Result<Self, MoovMoneyError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(!config.verify_ssl())
            .build()
            .map_err(|err| {
                NetworkError::connection_error(config.api_url(), METHOD, &err.to_string())
            })?;

        Ok(Self {
            config,
            http: Arc::new(ReqwestTransport { client }),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    async fn execute(
        &self,
        command: CommandId,
        envelope: Envelope,
    ) -> Result<ApiResult, MoovMoneyError> {
        let envelope = self.format_request_data(envelope);
        let url = self.config.api_url();
        let headers = vec![
            (
                "Authorization",
                format!("Basic {}", self.config.basic_auth_token()),
            ),
            ("command-id", command.as_str().to_owned()),
            ("Content-Type", "application/json".to_owned()),
        ];

        tracing::debug!(
            command = command.as_str(),
            request_id = envelope.request_id().unwrap_or_default(),
            url,
            "sending command"
        );

        let response = self
            .http
            .post_json(url, headers, &envelope)
            .await
            .map_err(|failure| {
                NetworkError::classify(url, METHOD, self.config.timeout(), failure)
            })?;

        if !(200..=299).contains(&response.status) {
            return Err(self.http_failure(response));
        }

        let result = decode_api_result(&response.body).map_err(ApiError::from)?;
        if self.is_error(&result) {
            return Err(ApiError::from_response(&result).into());
        }

        tracing::debug!(
            command = command.as_str(),
            trans_id = result.transaction_id().as_deref().unwrap_or_default(),
            "command succeeded"
        );
        Ok(result)
    }

    /// 401 is an authentication failure; any other status is an application error when the
    /// body decodes as one, otherwise a plain HTTP error.
    fn http_failure(&self, response: HttpResponse) -> MoovMoneyError {
        if response.status == 401 {
            return AuthenticationError::invalid_credentials(
                Some(self.config.username().to_owned()),
                response.reason,
            )
            .into();
        }

        match decode_error_payload(&response.body) {
            Some(payload) => ApiError::from_response(&payload).into(),
            None => ApiError::http_status(response.status, response.reason.as_deref()).into(),
        }
    }
}

impl std::fmt::Debug for HttpApiTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpApiTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ApiTransport for HttpApiTransport {
    fn post<'a>(
        &'a self,
        command: CommandId,
        envelope: Envelope,
    ) -> BoxFuture<'a, Result<ApiResult, MoovMoneyError>> {
        Box::pin(async move {
            let outcome = self.execute(command, envelope).await;
            if let Err(err) = &outcome {
                tracing::warn!(
                    command = command.as_str(),
                    code = err.code(),
                    error = %err,
                    "command failed"
                );
            }
            outcome
        })
    }
}
