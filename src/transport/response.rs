use serde_json::Value;

use crate::domain::ApiResult;
use crate::error::{ApiError, ApiErrorKind};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response is not a JSON object")]
    NotAnObject,
}

impl From<TransportError> for ApiError {
    fn from(value: TransportError) -> Self {
        match value {
            TransportError::Json(err) => ApiError::malformed_json(err),
            TransportError::NotAnObject => {
                ApiError::new(ApiErrorKind::MalformedResponse, value.to_string(), 0)
            }
        }
    }
}

/// Decode the body of a 2xx response.
pub fn decode_api_result(body: &str) -> Result<ApiResult, TransportError> {
    match serde_json::from_str::<Value>(body)? {
        Value::Object(map) => Ok(ApiResult::new(map)),
        _ => Err(TransportError::NotAnObject),
    }
}

/// Try to read the body of a non-2xx response as an application error payload.
///
/// Anything that is not a JSON object yields `None`; the caller falls back to the HTTP status.
pub fn decode_error_payload(body: &str) -> Option<ApiResult> {
    decode_api_result(body).ok()
}
