//! Client layer: configuration, the HTTP transport and the resource objects built on it.

use std::sync::Arc;

use crate::error::MoovMoneyError;

mod config;
mod http;
mod resources;

pub use config::{Config, ConfigBuilder};
pub use http::{ApiTransport, BoxFuture, HttpApiTransport};
pub use resources::{CashTransfers, OtpPayments, Subscribers, Transactions};

#[derive(Clone)]
/// High-level Moov Money client.
///
/// Owns one shared [`ApiTransport`] and exposes the API through four resources:
/// - [`MoovMoneyClient::subscribers`] for account checks and KYC registration,
/// - [`MoovMoneyClient::transactions`] for status lookups, USSD payments and auto-debits,
/// - [`MoovMoneyClient::otp_payments`] for two-step OTP merchant payments,
/// - [`MoovMoneyClient::cash_transfers`] for domestic and cross-border wallet transfers.
///
/// Every call is a single round trip; the client keeps no state between calls and can be
/// cloned cheaply and shared between tasks.
pub struct MoovMoneyClient {
    config: Arc<Config>,
    transport: Arc<dyn ApiTransport>,
    subscribers: Subscribers,
    transactions: Transactions,
    otp_payments: OtpPayments,
    cash_transfers: CashTransfers,
}

impl MoovMoneyClient {
    /// Create a client talking HTTP to `config.api_url()`.
    pub fn new(config: Config) -> Result<Self, MoovMoneyError> {
        let config = Arc::new(config);
        let transport = Arc::new(HttpApiTransport::new(Arc::clone(&config))?);
        Ok(Self::assemble(config, transport))
    }

    /// Create a client over a custom transport, e.g. a test double.
    pub fn with_transport(config: Config, transport: Arc<dyn ApiTransport>) -> Self {
        Self::assemble(Arc::new(config), transport)
    }

    fn assemble(config: Arc<Config>, transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            subscribers: Subscribers::new(Arc::clone(&transport)),
            transactions: Transactions::new(Arc::clone(&transport)),
            otp_payments: OtpPayments::new(Arc::clone(&transport)),
            cash_transfers: CashTransfers::new(Arc::clone(&transport)),
            config,
            transport,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &Arc<dyn ApiTransport> {
        &self.transport
    }

    pub fn subscribers(&self) -> &Subscribers {
        &self.subscribers
    }

    pub fn transactions(&self) -> &Transactions {
        &self.transactions
    }

    pub fn otp_payments(&self) -> &OtpPayments {
        &self.otp_payments
    }

    pub fn cash_transfers(&self) -> &CashTransfers {
        &self.cash_transfers
    }
}

impl std::fmt::Debug for MoovMoneyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoovMoneyClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
