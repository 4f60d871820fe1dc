use std::fmt;

use serde_json::Value;

use crate::domain::validation::ValidationError;
use crate::domain::validator::{
    validate_amount, validate_otp, validate_phone_number, validate_request_id,
};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Subscriber phone number (`destination`, `sender`, `msisdn`).
///
/// Invariant: matches `^\+?[0-9]{8,12}$`. The value is kept exactly as provided.
pub struct Msisdn(String);

impl Msisdn {
    /// Body field name for the receiving party.
    pub const FIELD: &'static str = "destination";

    /// Create a validated [`Msisdn`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        validate_phone_number(&value)?;
        Ok(Self(value))
    }

    /// Borrow the phone number.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Msisdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
/// Monetary amount (`amount`).
///
/// Invariant: finite and strictly positive.
pub struct Amount(f64);

impl Amount {
    /// Body field name (`amount`).
    pub const FIELD: &'static str = "amount";

    /// Create a validated [`Amount`].
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        validate_amount(value)?;
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// JSON form: whole amounts are integers, fractional amounts are floats.
    ///
    /// Whole amounts from 2^63 upwards do not fit an `i64` and stay floats.
    pub fn to_json(self) -> Value {
        // `i64::MAX as f64` rounds up to exactly 2^63.
        if self.0.fract() == 0.0 && self.0 < i64::MAX as f64 {
            Value::from(self.0 as i64)
        } else {
            Value::from(self.0)
        }
    }
}

impl fmt::Display for Amount {
    /// Textual form used by commands that expect a string amount (`1000`, `0.5`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// One-time password entered by the payer.
///
/// Invariant: exactly six ASCII digits.
pub struct Otp(String);

impl Otp {
    /// Extended-data key (`otp`).
    pub const FIELD: &'static str = "otp";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        validate_otp(&value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Client-side correlation id (`request-id`).
///
/// Invariant: 5 to 50 bytes long.
pub struct RequestId(String);

impl RequestId {
    /// Body field name (`request-id`).
    pub const FIELD: &'static str = "request-id";

    /// Create a validated [`RequestId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        validate_request_id(&value)?;
        Ok(Self(value))
    }

    /// Generated ids bypass validation; their length is fixed by the prefix.
    pub(crate) fn generated(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Auto-debit priority (`priority`), sent as `0` or `1`.
pub enum Priority {
    #[default]
    Normal,
    High,
}

impl Priority {
    /// Extended-data key (`priority`).
    pub const FIELD: &'static str = "priority";

    pub fn value(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::High => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Subscriber gender as accepted by registration.
pub enum Gender {
    Homme,
    Femme,
}

impl Gender {
    /// Extended-data key (`gender`).
    pub const FIELD: &'static str = "gender";
    /// Accepted wire values, compared after upper-casing the input.
    pub const ALLOWED: [&'static str; 2] = ["HOMME", "FEMME"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Homme => "HOMME",
            Self::Femme => "FEMME",
        }
    }
}
