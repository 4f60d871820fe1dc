//! Resource objects: one per command family, sharing the client's transport.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::client::http::ApiTransport;
use crate::domain::{
    ApiResult, AutoDebit, CashTransfer, CheckSubscriber, CheckTransaction, CommandOptions,
    CommitOtpPayment, CreateOtpPayment, ExtendedData, Priority, RegisterSubscriber, TransferScope,
    UssdPayment,
};
use crate::error::MoovMoneyError;
use crate::transport::{EncodeCommand, encode_command};

async fn send<C: EncodeCommand>(
    transport: &dyn ApiTransport,
    command: &C,
    options: CommandOptions,
) -> Result<ApiResult, MoovMoneyError> {
    let envelope = encode_command(command, options);
    transport.post(command.command_id(), envelope).await
}

#[derive(Clone)]
/// Subscriber lookup and registration.
pub struct Subscribers {
    transport: Arc<dyn ApiTransport>,
}

impl Subscribers {
    pub(crate) fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// Check the account status of `msisdn` (`process-check-subscriber`).
    pub async fn check_status(
        &self,
        msisdn: &str,
        options: CommandOptions,
    ) -> Result<ApiResult, MoovMoneyError> {
        let request = CheckSubscriber::new(msisdn)?;
        send(self.transport.as_ref(), &request, options).await
    }

    /// Same as [`Subscribers::check_status`], decoded down to the subscriber details.
    pub async fn details(
        &self,
        msisdn: &str,
        options: CommandOptions,
    ) -> Result<Map<String, Value>, MoovMoneyError> {
        let result = self.check_status(msisdn, options).await?;
        Ok(result.subscriber_details()?)
    }

    /// Register a subscriber (`subscriber-registration`).
    ///
    /// `details` must hold the nine fields of [`crate::domain::SUBSCRIBER_REQUIRED_FIELDS`];
    /// [`crate::domain::NewSubscriber`] converts into the expected shape. Extended-data from
    /// `options` is merged over `details` and validated with them.
    pub async fn register(
        &self,
        details: impl Into<ExtendedData>,
        mut options: CommandOptions,
    ) -> Result<ApiResult, MoovMoneyError> {
        let mut details = details.into();
        details.extend(std::mem::take(&mut options.extended_data));
        let request = RegisterSubscriber::new(details)?;
        send(self.transport.as_ref(), &request, options).await
    }
}

#[derive(Clone)]
/// Transaction status, USSD payments and auto-debits.
pub struct Transactions {
    transport: Arc<dyn ApiTransport>,
}

impl Transactions {
    pub(crate) fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// Look up a transaction by the request id of the call that created it.
    pub async fn check_status(&self, request_id: &str) -> Result<ApiResult, MoovMoneyError> {
        let request = CheckTransaction::new(request_id)?;
        send(self.transport.as_ref(), &request, CommandOptions::default()).await
    }

    pub async fn details(&self, request_id: &str) -> Result<Map<String, Value>, MoovMoneyError> {
        let result = self.check_status(request_id).await?;
        Ok(result.transaction_details()?.clone())
    }

    /// Push a payment request to the subscriber's handset; `message` is the notification text.
    pub async fn initiate_ussd_payment(
        &self,
        msisdn: &str,
        amount: f64,
        message: &str,
        remarks: &str,
        options: CommandOptions,
    ) -> Result<ApiResult, MoovMoneyError> {
        let request = UssdPayment::new(msisdn, amount, message, remarks)?;
        send(self.transport.as_ref(), &request, options).await
    }

    /// Queue an asynchronous auto-debit identified by the caller's `trans_id`.
    pub async fn setup_auto_debit(
        &self,
        msisdn: &str,
        amount: f64,
        remarks: &str,
        trans_id: &str,
        priority: Priority,
        options: CommandOptions,
    ) -> Result<ApiResult, MoovMoneyError> {
        let request = AutoDebit::new(msisdn, amount, remarks, trans_id, priority)?;
        send(self.transport.as_ref(), &request, options).await
    }
}

#[derive(Clone)]
/// Two-step merchant payments confirmed with a one-time password.
///
/// [`OtpPayments::create`] opens the payment and returns the `trans-id` to keep;
/// [`OtpPayments::validate`] commits it with the OTP the subscriber received. No state is
/// kept between the two calls.
pub struct OtpPayments {
    transport: Arc<dyn ApiTransport>,
}

impl OtpPayments {
    pub(crate) fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    pub async fn create(
        &self,
        msisdn: &str,
        amount: f64,
        remarks: &str,
        options: CommandOptions,
    ) -> Result<ApiResult, MoovMoneyError> {
        let request = CreateOtpPayment::new(msisdn, amount, remarks)?;
        send(self.transport.as_ref(), &request, options).await
    }

    pub async fn validate(
        &self,
        msisdn: &str,
        amount: f64,
        otp: &str,
        trans_id: &str,
        remarks: &str,
        options: CommandOptions,
    ) -> Result<ApiResult, MoovMoneyError> {
        let request = CommitOtpPayment::new(msisdn, amount, otp, trans_id, remarks)?;
        send(self.transport.as_ref(), &request, options).await
    }
}

#[derive(Clone)]
/// Wallet cash transfers, domestic and cross-border.
pub struct CashTransfers {
    transport: Arc<dyn ApiTransport>,
}

impl CashTransfers {
    pub(crate) fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// Transfer `amount` from `sender` (authorised by its PIN `auth`) to `msisdn`.
    pub async fn transfer(
        &self,
        sender: &str,
        auth: &str,
        msisdn: &str,
        amount: f64,
        remarks: &str,
        options: CommandOptions,
    ) -> Result<ApiResult, MoovMoneyError> {
        self.send_transfer(TransferScope::Domestic, sender, auth, msisdn, amount, remarks, options)
            .await
    }

    pub async fn cross_border_transfer(
        &self,
        sender: &str,
        auth: &str,
        msisdn: &str,
        amount: f64,
        remarks: &str,
        options: CommandOptions,
    ) -> Result<ApiResult, MoovMoneyError> {
        self.send_transfer(
            TransferScope::CrossBorder,
            sender,
            auth,
            msisdn,
            amount,
            remarks,
            options,
        )
        .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn send_transfer(
        &self,
        scope: TransferScope,
        sender: &str,
        auth: &str,
        msisdn: &str,
        amount: f64,
        remarks: &str,
        options: CommandOptions,
    ) -> Result<ApiResult, MoovMoneyError> {
        let request = CashTransfer::new(scope, sender, msisdn, auth, amount, remarks)?;
        send(self.transport.as_ref(), &request, options).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use crate::client::http::BoxFuture;
    use crate::domain::{CommandId, Envelope, ValidationRule};

    use super::*;

    #[derive(Default)]
    struct RecordingTransport {
        calls: Mutex<Vec<(CommandId, Envelope)>>,
        response: Mutex<Option<Value>>,
    }

    impl RecordingTransport {
        fn replying(response: Value) -> Arc<Self> {
            let transport = Self::default();
            *transport.response.lock().unwrap() = Some(response);
            Arc::new(transport)
        }

        fn calls(&self) -> Vec<(CommandId, Envelope)> {
            self.calls.lock().unwrap().clone()
        }

        fn last(&self) -> (CommandId, Envelope) {
            self.calls().pop().unwrap()
        }
    }

    impl ApiTransport for RecordingTransport {
        fn post<'a>(
            &'a self,
            command: CommandId,
            envelope: Envelope,
        ) -> BoxFuture<'a, Result<ApiResult, MoovMoneyError>> {
            Box::pin(async move {
                self.calls.lock().unwrap().push((command, envelope));
                let response = self
                    .response
                    .lock()
                    .unwrap()
                    .clone()
                    .unwrap_or_else(|| json!({"status": "0"}));
                Ok(ApiResult::from_value(response).unwrap())
            })
        }
    }

    fn ok() -> Value {
        json!({"status": "0", "message": "OK"})
    }

    fn subscriber_details() -> ExtendedData {
        json!({
            "msisdn": "22662356789",
            "lastname": "Doe",
            "firstname": "John",
            "idnumber": "123456789",
            "iddescription": "CARTE DE SEJOUR",
            "gender": "HOMME",
            "dateofbirth": "01011990",
            "placeofbirth": "Paris",
            "city": "Paris"
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    fn validation_rule(err: MoovMoneyError) -> ValidationRule {
        match err {
            MoovMoneyError::Validation(err) => err.rule(),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn subscriber_check_status_posts_destination() {
        let transport = RecordingTransport::replying(json!({
            "status": "0",
            "trans-id": "CHKSUB220107.0453.J00004",
            "extended-data": {
                "data": {
                    "subscriber-details": "{\"msisdn\":\"22662356789\",\"status\":\"ACTIVE\"}"
                }
            }
        }));
        let subscribers = Subscribers::new(transport.clone());

        let details = subscribers
            .details("22662356789", CommandOptions::default())
            .await
            .unwrap();
        assert_eq!(details.get("status"), Some(&json!("ACTIVE")));

        let (command, envelope) = transport.last();
        assert_eq!(command, CommandId::CheckSubscriber);
        assert_eq!(envelope.get("destination"), Some(&json!("22662356789")));
        assert!(envelope.request_id().unwrap().starts_with("MobileAccountStatus-"));
    }

    #[tokio::test]
    async fn subscriber_registration_sends_details_as_extended_data() {
        let transport = RecordingTransport::replying(ok());
        let subscribers = Subscribers::new(transport.clone());

        subscribers
            .register(subscriber_details(), CommandOptions::default())
            .await
            .unwrap();

        let (command, envelope) = transport.last();
        assert_eq!(command, CommandId::RegisterSubscriber);
        assert_eq!(envelope.extended_data(), Some(&subscriber_details()));
    }

    #[tokio::test]
    async fn invalid_registration_never_reaches_the_transport() {
        let transport = RecordingTransport::replying(ok());
        let subscribers = Subscribers::new(transport.clone());

        let mut missing = subscriber_details();
        missing.remove("placeofbirth");
        let err = subscribers
            .register(missing, CommandOptions::default())
            .await
            .unwrap_err();
        match err {
            MoovMoneyError::Validation(err) => {
                assert_eq!(err.rule(), ValidationRule::Required);
                assert_eq!(err.field(), "placeofbirth");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let mut gender = subscriber_details();
        gender.insert("gender".to_owned(), json!("INVALID"));
        let err = subscribers
            .register(gender, CommandOptions::default())
            .await
            .unwrap_err();
        assert_eq!(validation_rule(err), ValidationRule::Enum);

        let mut date = subscriber_details();
        date.insert("dateofbirth".to_owned(), json!("1990-01-01"));
        let err = subscribers
            .register(date, CommandOptions::default())
            .await
            .unwrap_err();
        assert_eq!(validation_rule(err), ValidationRule::DateFormat);

        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn registration_validates_extended_data_overrides() {
        let transport = RecordingTransport::replying(ok());
        let subscribers = Subscribers::new(transport.clone());

        let err = subscribers
            .register(
                subscriber_details(),
                CommandOptions::default().with_extended_data("msisdn", "123"),
            )
            .await
            .unwrap_err();
        assert_eq!(validation_rule(err), ValidationRule::PhoneFormat);

        let err = subscribers
            .register(
                subscriber_details(),
                CommandOptions::default().with_extended_data("gender", "INVALID"),
            )
            .await
            .unwrap_err();
        assert_eq!(validation_rule(err), ValidationRule::Enum);

        let err = subscribers
            .register(
                subscriber_details(),
                CommandOptions::default().with_extended_data("dateofbirth", "1990-01-01"),
            )
            .await
            .unwrap_err();
        assert_eq!(validation_rule(err), ValidationRule::DateFormat);

        let err = subscribers
            .register(
                subscriber_details(),
                CommandOptions::default().with_extended_data("city", ""),
            )
            .await
            .unwrap_err();
        assert_eq!(validation_rule(err), ValidationRule::Required);

        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn registration_sends_valid_extended_data_overrides() {
        let transport = RecordingTransport::replying(ok());
        let subscribers = Subscribers::new(transport.clone());

        subscribers
            .register(
                subscriber_details(),
                CommandOptions::default()
                    .with_extended_data("msisdn", "22670000000")
                    .with_extended_data("agent", "A1"),
            )
            .await
            .unwrap();

        let (_, envelope) = transport.last();
        let extended = envelope.extended_data().unwrap();
        assert_eq!(extended.get("msisdn"), Some(&json!("22670000000")));
        assert_eq!(extended.get("agent"), Some(&json!("A1")));
        assert_eq!(extended.get("city"), Some(&json!("Paris")));
    }

    #[tokio::test]
    async fn transaction_check_status_uses_caller_request_id() {
        let transport = RecordingTransport::replying(json!({
            "status": "0",
            "extended-data": {"data": {"status": "SUCCESS"}}
        }));
        let transactions = Transactions::new(transport.clone());

        let details = transactions
            .details("TESTACCOUNT-620200521000000123")
            .await
            .unwrap();
        assert_eq!(details.get("status"), Some(&json!("SUCCESS")));

        let (command, envelope) = transport.last();
        assert_eq!(command, CommandId::CheckTransaction);
        assert_eq!(envelope.request_id(), Some("TESTACCOUNT-620200521000000123"));
        assert_eq!(envelope.as_map().len(), 1);
    }

    #[tokio::test]
    async fn ussd_payment_body() {
        let transport = RecordingTransport::replying(ok());
        let transactions = Transactions::new(transport.clone());

        transactions
            .initiate_ussd_payment(
                "22662356789",
                1000.0,
                "PAYMENT OF 1000 TO TEST MERCHANT",
                "Test USSD Payment",
                CommandOptions::default(),
            )
            .await
            .unwrap();

        let (command, envelope) = transport.last();
        assert_eq!(command.as_str(), "mror-transaction-ussd");
        assert_eq!(envelope.get("amount"), Some(&json!(1000)));
        assert_eq!(
            envelope.get("message"),
            Some(&json!("PAYMENT OF 1000 TO TEST MERCHANT"))
        );
        assert_eq!(envelope.get("remarks"), Some(&json!("Test USSD Payment")));
    }

    #[tokio::test]
    async fn ussd_payment_validates_before_sending() {
        let transport = RecordingTransport::replying(ok());
        let transactions = Transactions::new(transport.clone());

        let err = transactions
            .initiate_ussd_payment("123", 1000.0, "m", "r", CommandOptions::default())
            .await
            .unwrap_err();
        assert_eq!(validation_rule(err), ValidationRule::PhoneFormat);

        let err = transactions
            .initiate_ussd_payment("22662356789", -100.0, "m", "r", CommandOptions::default())
            .await
            .unwrap_err();
        assert_eq!(validation_rule(err), ValidationRule::Positive);

        let err = transactions
            .initiate_ussd_payment(
                "22662356789",
                f64::INFINITY,
                "m",
                "r",
                CommandOptions::default(),
            )
            .await
            .unwrap_err();
        assert_eq!(validation_rule(err), ValidationRule::Positive);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn auto_debit_extended_data() {
        let transport = RecordingTransport::replying(ok());
        let transactions = Transactions::new(transport.clone());

        transactions
            .setup_auto_debit(
                "22662356789",
                1000.0,
                "Test Auto Debit",
                "DEBIT123",
                Priority::High,
                CommandOptions::default(),
            )
            .await
            .unwrap();

        let (command, envelope) = transport.last();
        assert_eq!(command.as_str(), "auto-debit-async");
        let extended = envelope.extended_data().unwrap();
        assert_eq!(extended.get("trans-id"), Some(&json!("DEBIT123")));
        assert_eq!(extended.get("priority"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn otp_payment_create_then_validate() {
        let transport = RecordingTransport::replying(json!({
            "status": "0",
            "trans-id": "OMROR241120.1439.J00022"
        }));
        let payments = OtpPayments::new(transport.clone());

        let created = payments
            .create("22662356789", 1000.0, "Test OTP", CommandOptions::default())
            .await
            .unwrap();
        let (command, envelope) = transport.last();
        assert_eq!(command, CommandId::CreateOtpPayment);
        assert_eq!(
            envelope.extended_data().and_then(|data| data.get("module")),
            Some(&json!("MERCHOTPPAY"))
        );

        let trans_id = created.transaction_id().unwrap();
        payments
            .validate(
                "22662356789",
                1000.0,
                "123456",
                &trans_id,
                "Validation OTP",
                CommandOptions::default(),
            )
            .await
            .unwrap();

        let (command, envelope) = transport.last();
        assert_eq!(command, CommandId::CommitOtpPayment);
        assert_eq!(envelope.get("amount"), Some(&json!("1000")));
        assert_eq!(envelope.get("remarks"), Some(&json!("Validation OTP")));
        let extended = envelope.extended_data().unwrap();
        assert_eq!(extended.get("otp"), Some(&json!("123456")));
        assert_eq!(extended.get("trans-id"), Some(&json!("OMROR241120.1439.J00022")));
        assert_eq!(extended.get("module"), Some(&json!("MERCHOTPPAY")));
        assert!(envelope.request_id().unwrap().starts_with("Commit-OTP-"));
    }

    #[tokio::test]
    async fn otp_validate_rejects_bad_otp() {
        let transport = RecordingTransport::replying(ok());
        let payments = OtpPayments::new(transport.clone());

        let err = payments
            .validate("22662356789", 1000.0, "abcdef", "T", "r", CommandOptions::default())
            .await
            .unwrap_err();
        assert_eq!(validation_rule(err), ValidationRule::OtpFormat);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn cash_transfers_select_command_by_scope() {
        let transport = RecordingTransport::replying(json!({
            "status": "0",
            "statusdescription": "SUCCESS",
            "trans-id": "125020200525BC3946BA"
        }));
        let transfers = CashTransfers::new(transport.clone());

        let result = transfers
            .transfer(
                "22601234561",
                "0000",
                "22662356789",
                1000.0,
                "Test Transfer",
                CommandOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(result.message(), "SUCCESS");
        let (command, envelope) = transport.last();
        assert_eq!(command.as_str(), "transfer-api-transaction");
        assert_eq!(envelope.get("command-id"), Some(&json!("WCASH")));
        assert!(envelope.request_id().unwrap().starts_with("CashTransfer-"));

        transfers
            .cross_border_transfer(
                "22601234561",
                "0000",
                "22662356789",
                1000.0,
                "Test Cross Border Transfer",
                CommandOptions::default().with_request_id("XCASH-0001").unwrap(),
            )
            .await
            .unwrap();
        let (command, envelope) = transport.last();
        assert_eq!(command.as_str(), "xcash-api-transaction");
        assert_eq!(envelope.request_id(), Some("XCASH-0001"));
        assert_eq!(envelope.get("sender"), Some(&json!("22601234561")));
    }
}
