use std::fmt;

use serde_json::Value;

/// Validation rule that rejected a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationRule {
    /// `^\+?[0-9]{8,12}$`.
    PhoneFormat,
    /// Strictly greater than zero.
    Positive,
    /// Exactly six digits.
    OtpFormat,
    /// Length between 5 and 50 bytes.
    Length,
    /// Present and not an empty string.
    Required,
    /// One of the supported date layouts.
    DateFormat,
    /// One of a closed set of values.
    Enum,
    /// Absolute URL.
    UrlFormat,
}

impl ValidationRule {
    /// Rule name as reported to callers (`phoneFormat`, `positive`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PhoneFormat => "phoneFormat",
            Self::Positive => "positive",
            Self::OtpFormat => "otpFormat",
            Self::Length => "length",
            Self::Required => "required",
            Self::DateFormat => "dateFormat",
            Self::Enum => "enum",
            Self::UrlFormat => "urlFormat",
        }
    }
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A client-side validation failure. Never sent over the wire.
///
/// Carries the offending field, the rejected value (when there is one) and the rule that
/// rejected it, so callers can surface the problem next to the right input.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    message: String,
    field: String,
    value: Option<Value>,
    rule: ValidationRule,
}

impl ValidationError {
    /// Numeric code attached to every validation failure.
    pub const CODE: i64 = 400;

    pub fn new(
        message: impl Into<String>,
        field: impl Into<String>,
        value: Option<Value>,
        rule: ValidationRule,
    ) -> Self {
        Self {
            message: message.into(),
            field: field.into(),
            value,
            rule,
        }
    }

    pub fn invalid_phone_number(input: &str) -> Self {
        Self::new(
            format!("invalid phone number: {input} (expected 8-12 digits, optionally prefixed by +)"),
            "phoneNumber",
            Some(Value::from(input)),
            ValidationRule::PhoneFormat,
        )
    }

    pub fn invalid_amount(amount: f64) -> Self {
        Self::new(
            format!("amount must be greater than 0, got {amount}"),
            "amount",
            serde_json::Number::from_f64(amount).map(Value::Number),
            ValidationRule::Positive,
        )
    }

    pub fn invalid_otp(otp: &str) -> Self {
        Self::new(
            "invalid OTP code (expected 6 digits)",
            "otp",
            Some(Value::from(otp)),
            ValidationRule::OtpFormat,
        )
    }

    pub fn required_field(field: &str) -> Self {
        Self::new(
            format!("field '{field}' is required"),
            field,
            None,
            ValidationRule::Required,
        )
    }

    /// Report `value` as the rejected input instead of the value that was checked.
    pub(crate) fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Name of the field that failed validation.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The rejected value, if any.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn rule(&self) -> ValidationRule {
        self.rule
    }

    pub fn code(&self) -> i64 {
        Self::CODE
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}: {}]", self.message, self.field, self.rule)
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::required_field("city");
        assert_eq!(err.to_string(), "field 'city' is required [city: required]");

        let err = ValidationError::invalid_phone_number("123");
        assert_eq!(
            err.to_string(),
            "invalid phone number: 123 (expected 8-12 digits, optionally prefixed by +) [phoneNumber: phoneFormat]"
        );

        let err = ValidationError::invalid_amount(-100.0);
        assert_eq!(
            err.to_string(),
            "amount must be greater than 0, got -100 [amount: positive]"
        );
    }

    #[test]
    fn constructors_carry_context() {
        let err = ValidationError::invalid_otp("12345");
        assert_eq!(err.field(), "otp");
        assert_eq!(err.rule(), ValidationRule::OtpFormat);
        assert_eq!(err.value(), Some(&Value::from("12345")));
        assert_eq!(err.code(), 400);

        let err = ValidationError::required_field("msisdn");
        assert_eq!(err.value(), None);
    }

    #[test]
    fn nan_amount_has_no_value() {
        let err = ValidationError::invalid_amount(f64::NAN);
        assert_eq!(err.value(), None);
        assert_eq!(err.rule().as_str(), "positive");
    }
}
