//! The JSON request body sent with every command.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngExt;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::value::RequestId;

/// Command-specific key/value bag (`extended-data`).
pub type ExtendedData = Map<String, Value>;

/// Body key holding the extended-data bag.
pub const EXTENDED_DATA_FIELD: &str = "extended-data";

/// Generate a request id as `prefix + unix seconds + random 10000..=99999`.
///
/// Two calls within the same second collide with probability 1/90000. Callers that need
/// stronger uniqueness should supply their own request id.
pub fn generate_request_id(prefix: &str) -> RequestId {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    let suffix: u32 = rand::rng().random_range(10_000..=99_999);
    RequestId::generated(format!("{prefix}{timestamp}{suffix}"))
}

/// Merge `supplied` over `base`; supplied keys win. `None` when both are empty.
pub fn merge_extended_data(base: ExtendedData, supplied: ExtendedData) -> Option<ExtendedData> {
    let mut merged = base;
    merged.extend(supplied);
    if merged.is_empty() {
        None
    } else {
        Some(merged)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
/// Outbound request body: `request-id`, core fields and optional `extended-data`.
///
/// Built with [`EnvelopeBuilder`]; immutable afterwards.
pub struct Envelope(Map<String, Value>);

impl Envelope {
    pub fn builder(request_id: RequestId) -> EnvelopeBuilder {
        EnvelopeBuilder::new(request_id)
    }

    pub fn request_id(&self) -> Option<&str> {
        self.0.get(RequestId::FIELD).and_then(Value::as_str)
    }

    /// Top-level field lookup.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn extended_data(&self) -> Option<&ExtendedData> {
        self.0.get(EXTENDED_DATA_FIELD).and_then(Value::as_object)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Serialized JSON body.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct EnvelopeBuilder {
    body: Map<String, Value>,
    extended_data: Option<ExtendedData>,
}

impl EnvelopeBuilder {
    pub fn new(request_id: RequestId) -> Self {
        let mut body = Map::new();
        body.insert(
            RequestId::FIELD.to_owned(),
            Value::String(request_id.as_str().to_owned()),
        );
        Self {
            body,
            extended_data: None,
        }
    }

    /// Set a core field. `request-id` and `extended-data` cannot be overwritten here.
    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        if name != RequestId::FIELD && name != EXTENDED_DATA_FIELD {
            self.body.insert(name.to_owned(), value.into());
        }
        self
    }

    /// Attach extended-data as produced by [`merge_extended_data`].
    pub fn extended_data(mut self, extended_data: Option<ExtendedData>) -> Self {
        self.extended_data = extended_data.filter(|data| !data.is_empty());
        self
    }

    pub fn build(self) -> Envelope {
        let mut body = self.body;
        if let Some(extended_data) = self.extended_data {
            body.insert(EXTENDED_DATA_FIELD.to_owned(), Value::Object(extended_data));
        }
        Envelope(body)
    }
}
