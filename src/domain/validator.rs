//! Stateless field-validation rules.
//!
//! Every function either returns `Ok(())` or a [`ValidationError`] naming the field, the
//! rejected value and the rule. Inputs are never trimmed or re-cased.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::domain::validation::{ValidationError, ValidationRule};

// Digit classes are spelled `[0-9]`: `\d` would also accept non-ASCII digits.
type Pattern = LazyLock<Option<Regex>>;

static PHONE_NUMBER: Pattern = LazyLock::new(|| Regex::new(r"^\+?[0-9]{8,12}$").ok());
static OTP: Pattern = LazyLock::new(|| Regex::new(r"^[0-9]{6}$").ok());
static DATE_COMPACT: Pattern = LazyLock::new(|| Regex::new(r"^[0-9]{2}[0-9]{2}[0-9]{4}$").ok());
static DATE_DAY_FIRST: Pattern = LazyLock::new(|| Regex::new(r"^[0-9]{2}-[0-9]{2}-[0-9]{4}$").ok());
static DATE_ISO: Pattern = LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").ok());

/// A pattern that failed to compile matches nothing.
fn matches(pattern: &Pattern, input: &str) -> bool {
    LazyLock::force(pattern)
        .as_ref()
        .is_some_and(|regex| regex.is_match(input))
}

/// Shortest accepted request-id.
pub const REQUEST_ID_MIN_LEN: usize = 5;
/// Longest accepted request-id.
pub const REQUEST_ID_MAX_LEN: usize = 50;

/// Date layouts accepted by [`validate_date_format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateFormat {
    /// `ddMMyyyy`, e.g. `01011990`.
    #[default]
    Compact,
    /// `dd-MM-yyyy`.
    DayFirst,
    /// `yyyy-MM-dd`.
    Iso,
}

impl DateFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "ddMMyyyy",
            Self::DayFirst => "dd-MM-yyyy",
            Self::Iso => "yyyy-MM-dd",
        }
    }

    fn pattern(self) -> &'static Pattern {
        match self {
            Self::Compact => &DATE_COMPACT,
            Self::DayFirst => &DATE_DAY_FIRST,
            Self::Iso => &DATE_ISO,
        }
    }
}

pub fn validate_phone_number(phone_number: &str) -> Result<(), ValidationError> {
    if !matches(&PHONE_NUMBER, phone_number) {
        return Err(ValidationError::invalid_phone_number(phone_number));
    }
    Ok(())
}

/// Rejects zero, negative, NaN and infinite amounts.
pub fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if !(amount.is_finite() && amount > 0.0) {
        return Err(ValidationError::invalid_amount(amount));
    }
    Ok(())
}

pub fn validate_otp(otp: &str) -> Result<(), ValidationError> {
    if !matches(&OTP, otp) {
        return Err(ValidationError::invalid_otp(otp));
    }
    Ok(())
}

/// Length is counted in bytes.
pub fn validate_request_id(request_id: &str) -> Result<(), ValidationError> {
    if !(REQUEST_ID_MIN_LEN..=REQUEST_ID_MAX_LEN).contains(&request_id.len()) {
        return Err(ValidationError::new(
            format!(
                "invalid request id (expected between {REQUEST_ID_MIN_LEN} and {REQUEST_ID_MAX_LEN} characters)"
            ),
            "requestId",
            Some(Value::from(request_id)),
            ValidationRule::Length,
        ));
    }
    Ok(())
}

/// Fails on the first name in `required` that is missing, `null` or an empty string.
pub fn validate_required_fields(
    data: &Map<String, Value>,
    required: &[&str],
) -> Result<(), ValidationError> {
    for field in required {
        match data.get(*field) {
            None | Some(Value::Null) => return Err(ValidationError::required_field(field)),
            Some(Value::String(value)) if value.is_empty() => {
                return Err(ValidationError::required_field(field));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

pub fn validate_date_format(date: &str, format: DateFormat) -> Result<(), ValidationError> {
    if !matches(format.pattern(), date) {
        return Err(ValidationError::new(
            format!("invalid date format (expected {})", format.as_str()),
            "date",
            Some(Value::from(date)),
            ValidationRule::DateFormat,
        ));
    }
    Ok(())
}

/// Case-sensitive membership check.
pub fn validate_enum(value: &str, allowed: &[&str], field: &str) -> Result<(), ValidationError> {
    if !allowed.contains(&value) {
        return Err(ValidationError::new(
            format!(
                "invalid value for '{field}' (allowed: {})",
                allowed.join(", ")
            ),
            field,
            Some(Value::from(value)),
            ValidationRule::Enum,
        ));
    }
    Ok(())
}
