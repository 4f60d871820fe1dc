//! Domain layer: strong types with validation and invariants (no I/O).

mod envelope;
mod request;
mod response;
mod validation;
pub mod validator;
mod value;

pub use envelope::{
    EXTENDED_DATA_FIELD, Envelope, EnvelopeBuilder, ExtendedData, generate_request_id,
    merge_extended_data,
};
pub use request::{
    AutoDebit, CashTransfer, CheckSubscriber, CheckTransaction, CommandId, CommandOptions,
    CommitOtpPayment, CreateOtpPayment, NewSubscriber, OTP_PAYMENT_MODULE, RegisterSubscriber,
    SUBSCRIBER_REQUIRED_FIELDS, TransferScope, UssdPayment, WALLET_CASH_COMMAND,
};
pub use response::{ApiResult, process_response};
pub use validation::{ValidationError, ValidationRule};
pub use validator::DateFormat;
pub use value::{Amount, Gender, Msisdn, Otp, Priority, RequestId};

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn subscriber() -> ExtendedData {
        NewSubscriber {
            msisdn: "22662356789".to_owned(),
            lastname: "Doe".to_owned(),
            firstname: "John".to_owned(),
            id_number: "123456789".to_owned(),
            id_description: "CARTE DE SEJOUR".to_owned(),
            gender: Gender::Homme,
            date_of_birth: "01011990".to_owned(),
            place_of_birth: "Paris".to_owned(),
            city: "Paris".to_owned(),
        }
        .into()
    }

    #[test]
    fn registration_accepts_complete_details() {
        let request = RegisterSubscriber::new(subscriber()).unwrap();
        assert_eq!(request.details().get("gender"), Some(&json!("HOMME")));
    }

    #[test]
    fn registration_reports_each_missing_field() {
        for field in SUBSCRIBER_REQUIRED_FIELDS {
            let mut details = subscriber();
            details.remove(field);
            let err = RegisterSubscriber::new(details).unwrap_err();
            assert_eq!(err.rule(), ValidationRule::Required);
            assert_eq!(err.field(), field);
        }
    }

    #[test]
    fn registration_treats_empty_string_as_missing() {
        let mut details = subscriber();
        details.insert("city".to_owned(), json!(""));
        let err = RegisterSubscriber::new(details).unwrap_err();
        assert_eq!(err.field(), "city");
        assert_eq!(err.rule(), ValidationRule::Required);
    }

    #[test]
    fn registration_rejects_bad_gender() {
        let mut details = subscriber();
        details.insert("gender".to_owned(), json!("INVALID"));
        let err = RegisterSubscriber::new(details).unwrap_err();
        assert_eq!(err.field(), "gender");
        assert_eq!(err.rule(), ValidationRule::Enum);
    }

    #[test]
    fn registration_upper_cases_gender_only_for_the_check() {
        let mut details = subscriber();
        details.insert("gender".to_owned(), json!("femme"));
        let request = RegisterSubscriber::new(details).unwrap();
        assert_eq!(request.details().get("gender"), Some(&json!("femme")));
    }

    #[test]
    fn gender_error_reports_the_supplied_value() {
        let mut details = subscriber();
        details.insert("gender".to_owned(), json!("homme-x"));
        let err = RegisterSubscriber::new(details).unwrap_err();
        assert_eq!(err.rule(), ValidationRule::Enum);
        assert_eq!(err.value(), Some(&json!("homme-x")));

        // Only ASCII letters are upper-cased.
        let mut details = subscriber();
        details.insert("gender".to_owned(), json!("ｆemme"));
        let err = RegisterSubscriber::new(details).unwrap_err();
        assert_eq!(err.value(), Some(&json!("ｆemme")));
    }

    #[test]
    fn registration_rejects_non_ascii_date_digits() {
        let mut details = subscriber();
        details.insert("dateofbirth".to_owned(), json!("٠١٠١١٩٩٠"));
        let err = RegisterSubscriber::new(details).unwrap_err();
        assert_eq!(err.rule(), ValidationRule::DateFormat);
    }

    #[test]
    fn registration_rejects_bad_date_of_birth() {
        let mut details = subscriber();
        details.insert("dateofbirth".to_owned(), json!("1990-01-01"));
        let err = RegisterSubscriber::new(details).unwrap_err();
        assert_eq!(err.rule(), ValidationRule::DateFormat);
    }

    #[test]
    fn registration_rejects_bad_msisdn() {
        let mut details = subscriber();
        details.insert("msisdn".to_owned(), json!("123"));
        let err = RegisterSubscriber::new(details).unwrap_err();
        assert_eq!(err.rule(), ValidationRule::PhoneFormat);
    }

    #[test]
    fn command_options_validate_request_id() {
        let err = CommandOptions::default().with_request_id("abc").unwrap_err();
        assert_eq!(err.rule(), ValidationRule::Length);

        let options = CommandOptions::default()
            .with_request_id("REQ-0001")
            .unwrap()
            .with_extended_data("note", "x");
        assert_eq!(options.request_id.unwrap().as_str(), "REQ-0001");
        assert_eq!(options.extended_data.get("note"), Some(&Value::from("x")));
    }

    #[test]
    fn otp_commit_validates_each_field() {
        assert_eq!(
            CommitOtpPayment::new("123", 1000.0, "123456", "T", "r")
                .unwrap_err()
                .rule(),
            ValidationRule::PhoneFormat
        );
        assert_eq!(
            CommitOtpPayment::new("22662356789", 0.0, "123456", "T", "r")
                .unwrap_err()
                .rule(),
            ValidationRule::Positive
        );
        assert_eq!(
            CommitOtpPayment::new("22662356789", 1000.0, "12345", "T", "r")
                .unwrap_err()
                .rule(),
            ValidationRule::OtpFormat
        );
    }

    #[test]
    fn cash_transfer_validates_sender() {
        let err = CashTransfer::new(
            TransferScope::Domestic,
            "12",
            "22662356789",
            "0000",
            1000.0,
            "Test Transfer",
        )
        .unwrap_err();
        assert_eq!(err.rule(), ValidationRule::PhoneFormat);
        assert_eq!(err.value(), Some(&json!("12")));
    }

    #[test]
    fn command_ids_match_the_wire() {
        assert_eq!(CommandId::CreateOtpPayment.as_str(), "process-create-mror-otp");
        assert_eq!(CommandId::CommitOtpPayment.as_str(), "process-commit-otppay");
        assert_eq!(CommandId::CrossBorderTransfer.as_str(), "xcash-api-transaction");
    }
}
