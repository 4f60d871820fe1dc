//! Typed Rust client for the Moov Money (Moov Africa) mobile-money HTTP API.
//!
//! The crate is split the usual way: a domain layer of validated types, a transport
//! layer for the JSON envelope, and a client layer that runs one HTTP round trip per
//! command.
//!
//! ```rust,no_run
//! use moovmoney::{CommandOptions, Config, MoovMoneyClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), moovmoney::MoovMoneyError> {
//!     let config = Config::new("https://testapimarchand2.moov-africa.bf:2010/", "user", "pass")?;
//!     let client = MoovMoneyClient::new(config)?;
//!
//!     let created = client
//!         .otp_payments()
//!         .create("22670123456", 1000.0, "order 42", CommandOptions::default())
//!         .await?;
//!     let trans_id = created.transaction_id().unwrap_or_default();
//!
//!     let confirmed = client
//!         .otp_payments()
//!         .validate(
//!             "22670123456",
//!             1000.0,
//!             "123456",
//!             &trans_id,
//!             "order 42",
//!             CommandOptions::default(),
//!         )
//!         .await?;
//!     println!("{}", confirmed.message());
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod error;
mod transport;

pub use client::{
    ApiTransport, BoxFuture, CashTransfers, Config, ConfigBuilder, HttpApiTransport,
    MoovMoneyClient, OtpPayments, Subscribers, Transactions,
};
pub use domain::{
    ApiResult, CommandId, CommandOptions, DateFormat, Envelope, ExtendedData, Gender,
    NewSubscriber, Priority, RequestId, ValidationError, ValidationRule, process_response,
};
pub use error::{
    ApiError, ApiErrorKind, AuthenticationError, AuthenticationErrorKind, MoovMoneyError,
    NetworkError, NetworkErrorKind,
};
