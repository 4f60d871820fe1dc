use serde_json::Value;

use crate::domain::envelope::ExtendedData;
use crate::domain::validation::ValidationError;
use crate::domain::validator::{
    DateFormat, validate_date_format, validate_enum, validate_phone_number,
    validate_required_fields,
};
use crate::domain::value::{Amount, Gender, Msisdn, Otp, Priority, RequestId};

/// Extended-data module selecting merchant OTP payments.
pub const OTP_PAYMENT_MODULE: &str = "MERCHOTPPAY";

/// Body `command-id` value carried by cash and cross-border transfers.
pub const WALLET_CASH_COMMAND: &str = "WCASH";

/// Fields every subscriber registration must carry, in validation order.
pub const SUBSCRIBER_REQUIRED_FIELDS: [&str; 9] = [
    "msisdn",
    "lastname",
    "firstname",
    "idnumber",
    "iddescription",
    "gender",
    "dateofbirth",
    "placeofbirth",
    "city",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Server-side operation selected by the `command-id` header.
pub enum CommandId {
    CheckSubscriber,
    RegisterSubscriber,
    CheckTransaction,
    UssdPayment,
    AutoDebit,
    CreateOtpPayment,
    CommitOtpPayment,
    CashTransfer,
    CrossBorderTransfer,
}

impl CommandId {
    /// Header value sent to the API.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CheckSubscriber => "process-check-subscriber",
            Self::RegisterSubscriber => "subscriber-registration",
            Self::CheckTransaction => "process-check-mror-transaction",
            Self::UssdPayment => "mror-transaction-ussd",
            Self::AutoDebit => "auto-debit-async",
            Self::CreateOtpPayment => "process-create-mror-otp",
            Self::CommitOtpPayment => "process-commit-otppay",
            Self::CashTransfer => "transfer-api-transaction",
            Self::CrossBorderTransfer => "xcash-api-transaction",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Per-call options shared by every command.
pub struct CommandOptions {
    /// Caller extended-data, merged over the command defaults (caller keys win).
    pub extended_data: ExtendedData,
    /// Use this request id instead of generating one.
    pub request_id: Option<RequestId>,
}

impl CommandOptions {
    /// Validate and set a caller-supplied request id.
    pub fn with_request_id(
        mut self,
        request_id: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        self.request_id = Some(RequestId::new(request_id)?);
        Ok(self)
    }

    pub fn with_extended_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extended_data.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckSubscriber {
    destination: Msisdn,
}

impl CheckSubscriber {
    pub fn new(destination: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            destination: Msisdn::new(destination)?,
        })
    }

    pub fn destination(&self) -> &Msisdn {
        &self.destination
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Subscriber registration; the whole payload travels as extended-data.
pub struct RegisterSubscriber {
    details: ExtendedData,
}

impl RegisterSubscriber {
    /// Checks, in order: the nine required fields, the `msisdn` format, the gender
    /// (ASCII upper-cased, `HOMME` or `FEMME`) and the `ddMMyyyy` date of birth.
    ///
    /// Values are forwarded exactly as supplied.
    pub fn new(details: ExtendedData) -> Result<Self, ValidationError> {
        validate_required_fields(&details, &SUBSCRIBER_REQUIRED_FIELDS)?;

        validate_phone_number(&text_field(&details, "msisdn"))?;

        let gender = text_field(&details, Gender::FIELD);
        validate_enum(&gender.to_ascii_uppercase(), &Gender::ALLOWED, Gender::FIELD)
            .map_err(|err| err.with_value(Value::from(gender)))?;

        validate_date_format(&text_field(&details, "dateofbirth"), DateFormat::Compact)?;

        Ok(Self { details })
    }

    pub fn details(&self) -> &ExtendedData {
        &self.details
    }
}

fn text_field(details: &ExtendedData, field: &str) -> String {
    match details.get(field) {
        Some(Value::String(value)) => value.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Typed form of the nine registration fields.
///
/// `date_of_birth` is expected as `ddMMyyyy`; it is checked when the registration is built.
pub struct NewSubscriber {
    pub msisdn: String,
    pub lastname: String,
    pub firstname: String,
    pub id_number: String,
    pub id_description: String,
    pub gender: Gender,
    pub date_of_birth: String,
    pub place_of_birth: String,
    pub city: String,
}

impl From<NewSubscriber> for ExtendedData {
    fn from(value: NewSubscriber) -> Self {
        let mut details = ExtendedData::new();
        details.insert("msisdn".to_owned(), value.msisdn.into());
        details.insert("lastname".to_owned(), value.lastname.into());
        details.insert("firstname".to_owned(), value.firstname.into());
        details.insert("idnumber".to_owned(), value.id_number.into());
        details.insert("iddescription".to_owned(), value.id_description.into());
        details.insert(Gender::FIELD.to_owned(), value.gender.as_str().into());
        details.insert("dateofbirth".to_owned(), value.date_of_birth.into());
        details.insert("placeofbirth".to_owned(), value.place_of_birth.into());
        details.insert("city".to_owned(), value.city.into());
        details
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Transaction status lookup by the request id of the original call.
pub struct CheckTransaction {
    request_id: RequestId,
}

impl CheckTransaction {
    pub fn new(request_id: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            request_id: RequestId::new(request_id)?,
        })
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Merchant payment confirmed by the subscriber through a USSD push.
pub struct UssdPayment {
    destination: Msisdn,
    amount: Amount,
    message: String,
    remarks: String,
}

impl UssdPayment {
    pub fn new(
        destination: &str,
        amount: f64,
        message: impl Into<String>,
        remarks: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            destination: Msisdn::new(destination)?,
            amount: Amount::new(amount)?,
            message: message.into(),
            remarks: remarks.into(),
        })
    }

    pub fn destination(&self) -> &Msisdn {
        &self.destination
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Text of the push notification shown to the subscriber.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn remarks(&self) -> &str {
        &self.remarks
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Asynchronous auto-debit.
pub struct AutoDebit {
    destination: Msisdn,
    amount: Amount,
    remarks: String,
    trans_id: String,
    priority: Priority,
}

impl AutoDebit {
    /// `trans_id` is the caller's own transaction reference.
    pub fn new(
        destination: &str,
        amount: f64,
        remarks: impl Into<String>,
        trans_id: impl Into<String>,
        priority: Priority,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            destination: Msisdn::new(destination)?,
            amount: Amount::new(amount)?,
            remarks: remarks.into(),
            trans_id: trans_id.into(),
            priority,
        })
    }

    pub fn destination(&self) -> &Msisdn {
        &self.destination
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn remarks(&self) -> &str {
        &self.remarks
    }

    pub fn trans_id(&self) -> &str {
        &self.trans_id
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }
}

#[derive(Debug, Clone, PartialEq)]
/// First step of an OTP payment; the response `trans-id` must be kept for the commit.
pub struct CreateOtpPayment {
    destination: Msisdn,
    amount: Amount,
    remarks: String,
}

impl CreateOtpPayment {
    pub fn new(
        destination: &str,
        amount: f64,
        remarks: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            destination: Msisdn::new(destination)?,
            amount: Amount::new(amount)?,
            remarks: remarks.into(),
        })
    }

    pub fn destination(&self) -> &Msisdn {
        &self.destination
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn remarks(&self) -> &str {
        &self.remarks
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Second step of an OTP payment.
///
/// Nothing checks that `trans_id` came from a matching [`CreateOtpPayment`]; the server
/// decides.
pub struct CommitOtpPayment {
    destination: Msisdn,
    amount: Amount,
    otp: Otp,
    trans_id: String,
    remarks: String,
}

impl CommitOtpPayment {
    pub fn new(
        destination: &str,
        amount: f64,
        otp: &str,
        trans_id: impl Into<String>,
        remarks: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            destination: Msisdn::new(destination)?,
            amount: Amount::new(amount)?,
            otp: Otp::new(otp)?,
            trans_id: trans_id.into(),
            remarks: remarks.into(),
        })
    }

    pub fn destination(&self) -> &Msisdn {
        &self.destination
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn otp(&self) -> &Otp {
        &self.otp
    }

    pub fn trans_id(&self) -> &str {
        &self.trans_id
    }

    pub fn remarks(&self) -> &str {
        &self.remarks
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferScope {
    Domestic,
    CrossBorder,
}

#[derive(Debug, Clone, PartialEq)]
/// Wallet-to-wallet cash transfer (`WCASH`).
pub struct CashTransfer {
    scope: TransferScope,
    sender: Msisdn,
    destination: Msisdn,
    auth: String,
    amount: Amount,
    remarks: String,
}

impl CashTransfer {
    /// `auth` is the sender's PIN, forwarded as provided.
    pub fn new(
        scope: TransferScope,
        sender: &str,
        destination: &str,
        auth: impl Into<String>,
        amount: f64,
        remarks: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let destination = Msisdn::new(destination)?;
        let amount = Amount::new(amount)?;
        Ok(Self {
            scope,
            sender: Msisdn::new(sender)?,
            destination,
            auth: auth.into(),
            amount,
            remarks: remarks.into(),
        })
    }

    pub fn scope(&self) -> TransferScope {
        self.scope
    }

    pub fn sender(&self) -> &Msisdn {
        &self.sender
    }

    pub fn destination(&self) -> &Msisdn {
        &self.destination
    }

    pub fn auth(&self) -> &str {
        &self.auth
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn remarks(&self) -> &str {
        &self.remarks
    }
}
