use serde_json::Value;

use crate::domain::{
    AutoDebit, CashTransfer, CheckSubscriber, CheckTransaction, CommandId, CommandOptions,
    CommitOtpPayment, CreateOtpPayment, Envelope, EnvelopeBuilder, ExtendedData, Otp,
    OTP_PAYMENT_MODULE, Priority, RegisterSubscriber, RequestId, TransferScope, UssdPayment,
    WALLET_CASH_COMMAND, generate_request_id, merge_extended_data,
};

const DESTINATION: &str = "destination";
const AMOUNT: &str = "amount";
const REMARKS: &str = "remarks";
const MESSAGE: &str = "message";
const SENDER: &str = "sender";
const AUTH: &str = "auth";
const COMMAND_ID: &str = "command-id";
const MODULE: &str = "module";
const TRANS_ID: &str = "trans-id";
const CUSTOM_MESSAGE: &str = "custommessge";
const EXT2: &str = "ext2";

/// Wire shape of one command: header id, request-id prefix, core fields and the
/// extended-data policy.
pub trait EncodeCommand {
    fn command_id(&self) -> CommandId;

    fn request_id_prefix(&self) -> &'static str;

    fn core_fields(&self, builder: EnvelopeBuilder) -> EnvelopeBuilder {
        builder
    }

    /// Default policy: caller data only, omitted when empty.
    fn extended_data(&self, supplied: ExtendedData) -> Option<ExtendedData> {
        merge_extended_data(ExtendedData::new(), supplied)
    }

    /// A request id fixed by the command itself, overriding options and generation.
    fn own_request_id(&self) -> Option<&RequestId> {
        None
    }
}

pub fn encode_command<C: EncodeCommand>(command: &C, options: CommandOptions) -> Envelope {
    let request_id = match (command.own_request_id(), options.request_id) {
        (Some(own), _) => own.clone(),
        (None, Some(supplied)) => supplied,
        (None, None) => generate_request_id(command.request_id_prefix()),
    };
    let builder = command.core_fields(Envelope::builder(request_id));
    builder
        .extended_data(command.extended_data(options.extended_data))
        .build()
}

fn object(entries: impl IntoIterator<Item = (&'static str, Value)>) -> ExtendedData {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
}

impl EncodeCommand for CheckSubscriber {
    fn command_id(&self) -> CommandId {
        CommandId::CheckSubscriber
    }

    fn request_id_prefix(&self) -> &'static str {
        "MobileAccountStatus-"
    }

    fn core_fields(&self, builder: EnvelopeBuilder) -> EnvelopeBuilder {
        builder.field(DESTINATION, self.destination().as_str())
    }
}

impl EncodeCommand for RegisterSubscriber {
    fn command_id(&self) -> CommandId {
        CommandId::RegisterSubscriber
    }

    fn request_id_prefix(&self) -> &'static str {
        "SubscriberReg-"
    }

    /// The validated details only. Caller data must be merged before construction.
    fn extended_data(&self, _supplied: ExtendedData) -> Option<ExtendedData> {
        merge_extended_data(self.details().clone(), ExtendedData::new())
    }
}

impl EncodeCommand for CheckTransaction {
    fn command_id(&self) -> CommandId {
        CommandId::CheckTransaction
    }

    fn request_id_prefix(&self) -> &'static str {
        ""
    }

    fn own_request_id(&self) -> Option<&RequestId> {
        Some(self.request_id())
    }
}

impl EncodeCommand for UssdPayment {
    fn command_id(&self) -> CommandId {
        CommandId::UssdPayment
    }

    fn request_id_prefix(&self) -> &'static str {
        "USSDPayment-"
    }

    fn core_fields(&self, builder: EnvelopeBuilder) -> EnvelopeBuilder {
        builder
            .field(DESTINATION, self.destination().as_str())
            .field(AMOUNT, self.amount().to_json())
            .field(MESSAGE, self.message())
            .field(REMARKS, self.remarks())
    }
}

impl EncodeCommand for AutoDebit {
    fn command_id(&self) -> CommandId {
        CommandId::AutoDebit
    }

    fn request_id_prefix(&self) -> &'static str {
        "AutoDebit-"
    }

    fn core_fields(&self, builder: EnvelopeBuilder) -> EnvelopeBuilder {
        builder
            .field(DESTINATION, self.destination().as_str())
            .field(AMOUNT, self.amount().to_json())
            .field(REMARKS, self.remarks())
    }

    fn extended_data(&self, supplied: ExtendedData) -> Option<ExtendedData> {
        let base = object([
            (TRANS_ID, Value::from(self.trans_id())),
            (Priority::FIELD, Value::from(self.priority().value())),
        ]);
        merge_extended_data(base, supplied)
    }
}

impl EncodeCommand for CreateOtpPayment {
    fn command_id(&self) -> CommandId {
        CommandId::CreateOtpPayment
    }

    fn request_id_prefix(&self) -> &'static str {
        "OTPMerchantPayment-"
    }

    fn core_fields(&self, builder: EnvelopeBuilder) -> EnvelopeBuilder {
        builder
            .field(DESTINATION, self.destination().as_str())
            .field(AMOUNT, self.amount().to_json())
            .field(REMARKS, self.remarks())
    }

    fn extended_data(&self, supplied: ExtendedData) -> Option<ExtendedData> {
        let base = object([(MODULE, Value::from(OTP_PAYMENT_MODULE))]);
        merge_extended_data(base, supplied)
    }
}

impl EncodeCommand for CommitOtpPayment {
    fn command_id(&self) -> CommandId {
        CommandId::CommitOtpPayment
    }

    fn request_id_prefix(&self) -> &'static str {
        "Commit-OTP-"
    }

    // The commit command takes the amount as text.
    fn core_fields(&self, builder: EnvelopeBuilder) -> EnvelopeBuilder {
        builder
            .field(DESTINATION, self.destination().as_str())
            .field(AMOUNT, self.amount().to_string())
            .field(REMARKS, self.remarks())
    }

    fn extended_data(&self, supplied: ExtendedData) -> Option<ExtendedData> {
        let base = object([
            (MODULE, Value::from(OTP_PAYMENT_MODULE)),
            (Otp::FIELD, Value::from(self.otp().as_str())),
            (TRANS_ID, Value::from(self.trans_id())),
        ]);
        merge_extended_data(base, supplied)
    }
}

impl EncodeCommand for CashTransfer {
    fn command_id(&self) -> CommandId {
        match self.scope() {
            TransferScope::Domestic => CommandId::CashTransfer,
            TransferScope::CrossBorder => CommandId::CrossBorderTransfer,
        }
    }

    fn request_id_prefix(&self) -> &'static str {
        match self.scope() {
            TransferScope::Domestic => "CashTransfer-",
            TransferScope::CrossBorder => "XCashTransfer-",
        }
    }

    fn core_fields(&self, builder: EnvelopeBuilder) -> EnvelopeBuilder {
        builder
            .field(COMMAND_ID, WALLET_CASH_COMMAND)
            .field(SENDER, self.sender().as_str())
            .field(DESTINATION, self.destination().as_str())
            .field(AUTH, self.auth())
            .field(AMOUNT, self.amount().to_json())
            .field(REMARKS, self.remarks())
    }

    /// Caller data is sent unchanged; the defaults only fill an empty bag.
    fn extended_data(&self, supplied: ExtendedData) -> Option<ExtendedData> {
        if supplied.is_empty() {
            return Some(object([
                (CUSTOM_MESSAGE, Value::from(self.remarks())),
                (EXT2, Value::from("")),
            ]));
        }
        Some(supplied)
    }
}
