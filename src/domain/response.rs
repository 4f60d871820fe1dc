use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::envelope::{EXTENDED_DATA_FIELD, ExtendedData};
use crate::error::{ApiError, ApiErrorKind, status_to_code};

const STATUS_FIELD: &str = "status";
const MESSAGE_FIELD: &str = "message";
const STATUS_DESCRIPTION_FIELD: &str = "statusdescription";
const TRANS_ID_FIELD: &str = "trans-id";
const REQUEST_ID_FIELD: &str = "request-id";
const DATA_FIELD: &str = "data";
const SUBSCRIBER_DETAILS_FIELD: &str = "subscriber-details";

const NO_MESSAGE: &str = "no message available";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
/// Decoded JSON response of one command.
///
/// The document is schema-less on the wire; read it through the accessors below.
pub struct ApiResult(Map<String, Value>);

impl ApiResult {
    pub fn new(body: Map<String, Value>) -> Self {
        Self(body)
    }

    /// Wrap a decoded JSON value. Anything but an object is a malformed response.
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        match value {
            Value::Object(body) => Ok(Self(body)),
            other => Err(ApiError::new(
                ApiErrorKind::MalformedResponse,
                format!("expected a JSON object response, got {}", json_kind(&other)),
                0,
            )),
        }
    }

    /// Raw `status` value; `null` counts as absent.
    pub fn status(&self) -> Option<&Value> {
        self.0.get(STATUS_FIELD).filter(|status| !status.is_null())
    }

    /// Integer form of `status`, used as the error code.
    pub fn status_code(&self) -> Option<i64> {
        self.status().map(status_to_code)
    }

    /// `status` is `"0"` or `0`.
    pub fn is_successful(&self) -> bool {
        self.status().is_some_and(is_zero_status)
    }

    /// `status` is present and is neither `"0"` nor `0`.
    pub fn is_error(&self) -> bool {
        self.status().is_some_and(|status| !is_zero_status(status))
    }

    /// `message`, else `statusdescription`, else a fixed fallback.
    pub fn message(&self) -> &str {
        self.reported_message().unwrap_or(NO_MESSAGE)
    }

    pub(crate) fn reported_message(&self) -> Option<&str> {
        self.string_field(MESSAGE_FIELD)
            .or_else(|| self.string_field(STATUS_DESCRIPTION_FIELD))
    }

    /// Server transaction id (`trans-id`); numeric ids are rendered as text.
    pub fn transaction_id(&self) -> Option<String> {
        match self.0.get(TRANS_ID_FIELD)? {
            Value::String(value) => Some(value.clone()),
            Value::Number(value) => Some(value.to_string()),
            _ => None,
        }
    }

    /// Echoed `request-id`, when the server returns it.
    pub fn request_id(&self) -> Option<&str> {
        self.string_field(REQUEST_ID_FIELD)
    }

    pub fn extended_data(&self) -> Option<&ExtendedData> {
        self.0.get(EXTENDED_DATA_FIELD).and_then(Value::as_object)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Decode `extended-data.data.subscriber-details`, which the server sends as a
    /// JSON-encoded string.
    pub fn subscriber_details(&self) -> Result<Map<String, Value>, ApiError> {
        let encoded = self
            .extended_data()
            .and_then(|data| data.get(DATA_FIELD))
            .and_then(|data| data.get(SUBSCRIBER_DETAILS_FIELD))
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::missing_data("subscriber details not found in response"))?;

        let decoded: Value = serde_json::from_str(encoded).map_err(|err| {
            ApiError::missing_data(format!("could not decode subscriber details: {err}"))
                .with_source(err)
        })?;

        match decoded {
            Value::Object(details) => Ok(details),
            other => Err(ApiError::missing_data(format!(
                "subscriber details must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Borrow `extended-data.data` from a transaction status response.
    pub fn transaction_details(&self) -> Result<&Map<String, Value>, ApiError> {
        self.extended_data()
            .and_then(|data| data.get(DATA_FIELD))
            .and_then(Value::as_object)
            .ok_or_else(|| ApiError::missing_data("transaction details not found in response"))
    }

    fn string_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }
}

/// Re-check a result that did not go through the transport adapter.
///
/// Returns the result unchanged unless its `status` reports a failure.
pub fn process_response(result: ApiResult) -> Result<ApiResult, ApiError> {
    if result.is_error() {
        let code = result.status_code().unwrap_or(0);
        let message = result.reported_message().unwrap_or("unknown error");
        let mut err = ApiError::from_response(&result);
        err.set_message(format!("API error (code {code}): {message}"));
        return Err(err);
    }
    Ok(result)
}

fn is_zero_status(status: &Value) -> bool {
    match status {
        Value::String(text) => text == "0",
        Value::Number(number) => number.as_i64() == Some(0) || number.as_u64() == Some(0),
        _ => false,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
