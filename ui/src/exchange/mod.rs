//! The purchase workflow: balance and rate polling, the quote, purchase
//! submission and the refreshes that follow it.

pub mod quote;
pub mod tx_status;

use std::cell::Cell;
use std::time::Duration;

use api::config::ExchangeConfig;
use api::contract::ContractError;
use api::contract::ExchangeContract;
use api::rates::ExchangeRatesTable;
use api::units::format_token_amount;
use api::units::to_smallest_unit;
use api::units::AmountError;
use api::Address;
use api::TxHash;
use api::U256;
use dioxus_logger::tracing::debug;
use dioxus_logger::tracing::error;
use dioxus_logger::tracing::info;
use dioxus_logger::tracing::warn;
use thiserror::Error;
use tokio::sync::watch;

use crate::compat;
use crate::compat::interval::Interval;
use crate::connection::ConnectionState;
pub use quote::compute_token_amount;
pub use tx_status::InvalidTransition;
pub use tx_status::TransactionStatus;

const ZERO_BALANCE: &str = "0";
const ZERO_INPUT: &str = "0";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionTiming {
    /// Background refresh period while the connection is ready.
    pub poll_interval: Duration,
    /// How long a success or error banner stays up.
    pub status_display: Duration,
    /// Waits between balance reads after a purchase, starting at the
    /// acknowledgment.
    pub post_purchase_delays: Vec<Duration>,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(15),
            status_display: Duration::from_secs(5),
            post_purchase_delays: [0, 2, 3, 5].into_iter().map(Duration::from_secs).collect(),
        }
    }
}

#[derive(Error, Debug)]
pub enum PurchaseError {
    #[error("wallet is not connected to the supported network")]
    NotReady,
    #[error("no quote for this amount at the current rate")]
    NoQuote,
    #[error(transparent)]
    Amount(#[from] AmountError),
    #[error("a purchase is already in progress: {0}")]
    Busy(#[from] InvalidTransition),
    #[error("purchase failed: {0}")]
    Contract(#[from] ContractError),
}

/// Everything the exchange form renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeSnapshot {
    /// Decimal token balance, `"0"` until read.
    pub balance: String,
    pub rates: ExchangeRatesTable,
    pub usd_input: String,
    /// A refresh is in flight.
    pub loading: bool,
    pub status: TransactionStatus,
    token_symbol: String,
    quote_decimals: u8,
}

impl ExchangeSnapshot {
    pub fn new(token_symbol: impl Into<String>, quote_decimals: u8) -> Self {
        Self {
            balance: ZERO_BALANCE.to_string(),
            rates: ExchangeRatesTable::default(),
            usd_input: ZERO_INPUT.to_string(),
            loading: false,
            status: TransactionStatus::Idle,
            token_symbol: token_symbol.into(),
            quote_decimals,
        }
    }

    /// USDC per purchased token, `"0"` until the rates list it.
    pub fn usdc_rate(&self) -> &str {
        self.rates.rate_for(&self.token_symbol)
    }

    /// The input in payment-token smallest units, if it is a nonzero
    /// amount the contract can record.
    pub fn purchase_amount(&self) -> Option<U256> {
        to_smallest_unit(&self.usd_input, self.quote_decimals)
            .ok()
            .filter(|amount| !amount.is_zero())
    }

    /// Empty unless the input is purchasable at a loaded rate.
    pub fn token_amount(&self) -> String {
        if self.purchase_amount().is_none() {
            return String::new();
        }
        compute_token_amount(&self.usd_input, self.usdc_rate())
    }

    pub fn rate_loaded(&self) -> bool {
        quote::parse_positive(self.usdc_rate()).is_some()
    }

    pub fn can_buy(&self) -> bool {
        self.status.is_idle() && !self.token_amount().is_empty()
    }

    fn clear_account_data(&mut self) {
        self.balance = ZERO_BALANCE.to_string();
        self.usd_input = ZERO_INPUT.to_string();
        self.loading = false;
        self.status = TransactionStatus::Idle;
    }
}

/// Drives the exchange form for whatever account the connection reports.
///
/// Reads connection state through a watch receiver and never writes it.
/// Every chain read is gated on a ready connection and falls back to a safe
/// default.
pub struct ExchangeSession<C> {
    contract: Option<C>,
    connection: watch::Receiver<ConnectionState>,
    target_chain_id: u64,
    token_decimals: u8,
    rate_decimals: u8,
    quote_decimals: u8,
    payment_symbol: String,
    timing: SessionTiming,
    state: watch::Sender<ExchangeSnapshot>,
    // bumped on every reset; work started under an older value must not
    // write its results.
    generation: Cell<u64>,
    // generation of the refresh in flight, if any.
    refreshing: Cell<Option<u64>>,
    status_epoch: Cell<u64>,
}

impl<C: ExchangeContract> ExchangeSession<C> {
    pub fn new(
        contract: Option<C>,
        connection: watch::Receiver<ConnectionState>,
        config: &ExchangeConfig,
    ) -> Self {
        Self {
            contract,
            connection,
            target_chain_id: config.network.chain_id,
            token_decimals: config.token_decimals,
            rate_decimals: config.rate_decimals,
            quote_decimals: config.quote_decimals,
            payment_symbol: config.payment_symbol.clone(),
            timing: SessionTiming::default(),
            state: watch::Sender::new(ExchangeSnapshot::new(
                config.token_symbol.clone(),
                config.quote_decimals,
            )),
            generation: Cell::new(0),
            refreshing: Cell::new(None),
            status_epoch: Cell::new(0),
        }
    }

    pub fn with_timing(mut self, timing: SessionTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn snapshot(&self) -> ExchangeSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ExchangeSnapshot> {
        self.state.subscribe()
    }

    /// The account to act for, when connected on the target network with a
    /// contract handle.
    fn ready_account(&self) -> Option<Address> {
        self.contract.as_ref()?;
        let connection = self.connection.borrow();
        if connection.gate(self.target_chain_id).is_ready() {
            connection.account
        } else {
            None
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready_account().is_some()
    }

    /// The decimal token balance of the connected account, or `"0"`.
    pub async fn fetch_token_balance(&self) -> String {
        let (Some(contract), Some(account)) = (&self.contract, self.ready_account()) else {
            return ZERO_BALANCE.to_string();
        };

        let raw = match contract.balance_of(account).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("failed to fetch token balance: {e}");
                return ZERO_BALANCE.to_string();
            }
        };
        format_token_amount(raw, self.token_decimals).unwrap_or_else(|e| {
            warn!("failed to format token balance {raw}: {e}");
            ZERO_BALANCE.to_string()
        })
    }

    /// The current rates table, or an empty one.
    pub async fn fetch_exchange_rates(&self) -> ExchangeRatesTable {
        let Some(contract) = self.contract.as_ref().filter(|_| self.is_ready()) else {
            return ExchangeRatesTable::default();
        };

        let (tokens, raw_rates) = match contract.supported_tokens_and_rates().await {
            Ok(result) => result,
            Err(e) => {
                warn!("failed to fetch exchange rates: {e}");
                return ExchangeRatesTable::default();
            }
        };
        ExchangeRatesTable::from_raw(tokens, &raw_rates, self.rate_decimals).unwrap_or_else(|e| {
            warn!("failed to convert exchange rates: {e}");
            ExchangeRatesTable::default()
        })
    }

    /// Reads the balance, then the rates, and publishes both. Returns `false`
    /// without reading when another refresh is already in flight.
    pub async fn refresh_data(&self) -> bool {
        let Some(guard) = RefreshGuard::acquire(self) else {
            debug!("refresh already in flight, skipping");
            return false;
        };

        let balance = self.fetch_token_balance().await;
        if guard.is_current() {
            self.state.send_modify(|s| s.balance = balance);
        }

        let rates = self.fetch_exchange_rates().await;
        if guard.is_current() {
            self.state.send_modify(|s| s.rates = rates);
        }
        true
    }

    /// Re-reads the balance alone.
    pub async fn refresh_balance(&self) {
        let generation = self.generation.get();
        let balance = self.fetch_token_balance().await;
        if self.generation.get() == generation {
            self.state.send_modify(|s| s.balance = balance);
        }
    }

    pub fn set_usd_input(&self, input: impl Into<String>) {
        let input = input.into();
        self.state.send_modify(|s| s.usd_input = input);
    }

    /// Records a purchase for `usd_amount` USD.
    ///
    /// On acknowledgment the form is cleared and the balance is re-read on
    /// the post-purchase schedule. Either way the banner clears after the
    /// status display time. Resolves once all of that has happened.
    pub async fn submit_purchase(&self, usd_amount: &str) -> Result<TxHash, PurchaseError> {
        let (Some(contract), Some(account)) = (&self.contract, self.ready_account()) else {
            return Err(PurchaseError::NotReady);
        };
        let rate = self.state.borrow().usdc_rate().to_string();
        let token_amount = compute_token_amount(usd_amount, &rate);
        if token_amount.is_empty() {
            return Err(PurchaseError::NoQuote);
        }
        let amount = to_smallest_unit(usd_amount, self.quote_decimals)?;
        if amount.is_zero() {
            return Err(AmountError::NotPositive.into());
        }

        let generation = self.generation.get();
        self.transition(TransactionStatus::begin)?;
        info!("buying {token_amount} tokens for {usd_amount} {}", self.payment_symbol);

        let result = contract
            .record_exchange(account, &self.payment_symbol, amount, true)
            .await;
        if self.generation.get() != generation {
            info!("session was reset while the purchase was pending");
            return result.map_err(PurchaseError::from);
        }

        match result {
            Ok(hash) => {
                info!("purchase acknowledged: {hash}");
                let epoch = self.transition(|s| s.succeed(&token_amount))?;
                self.state.send_modify(|s| s.usd_input = ZERO_INPUT.to_string());
                futures::join!(self.post_purchase_refresh(), self.reset_status_after(epoch));
                Ok(hash)
            }
            Err(e) => {
                error!("purchase failed: {e}");
                let epoch = self.transition(TransactionStatus::fail)?;
                self.reset_status_after(epoch).await;
                Err(e.into())
            }
        }
    }

    /// Re-reads the balance after each post-purchase delay, so a slow
    /// confirmation still shows up. Stops if the session is reset.
    pub async fn post_purchase_refresh(&self) {
        let generation = self.generation.get();
        for delay in &self.timing.post_purchase_delays {
            if !delay.is_zero() {
                compat::sleep(*delay).await;
            }
            if self.generation.get() != generation {
                debug!("session reset, abandoning post-purchase refresh");
                return;
            }
            self.refresh_balance().await;
        }
    }

    /// Returns the banner to idle after the display time, unless something
    /// newer has replaced the status entered at `epoch`.
    async fn reset_status_after(&self, epoch: u64) {
        compat::sleep(self.timing.status_display).await;
        if self.status_epoch.get() != epoch {
            debug!("status reset superseded");
            return;
        }
        if let Err(e) = self.transition(TransactionStatus::expire) {
            debug!("status reset skipped: {e}");
        }
    }

    fn transition(
        &self,
        next: impl FnOnce(&TransactionStatus) -> Result<TransactionStatus, InvalidTransition>,
    ) -> Result<u64, InvalidTransition> {
        let status = next(&self.state.borrow().status)?;
        let epoch = self.status_epoch.get() + 1;
        self.status_epoch.set(epoch);
        self.state.send_modify(|s| s.status = status);
        Ok(epoch)
    }

    /// Drops everything that belongs to the previous account.
    pub fn reset(&self) {
        self.generation.set(self.generation.get() + 1);
        self.status_epoch.set(self.status_epoch.get() + 1);
        self.state.send_modify(ExchangeSnapshot::clear_account_data);
    }

    /// Refreshes now and then on every poll interval, for as long as the
    /// connection stays ready.
    pub async fn poll_while_ready(&self) {
        if !self.is_ready() {
            return;
        }
        let mut interval = Interval::new(self.timing.poll_interval);
        loop {
            self.refresh_data().await;
            interval.tick().await;
            if !self.is_ready() {
                return;
            }
        }
    }

    /// Follows the connection: resets on an account or chain change and
    /// polls while ready. Runs until the connection manager goes away.
    pub async fn run(&self) {
        let mut connection = self.connection.clone();
        let mut observed = connection.borrow_and_update().clone();

        loop {
            let ready = self.is_ready();
            let poll = self.poll_while_ready();
            tokio::pin!(poll);

            loop {
                tokio::select! {
                    _ = &mut poll, if ready => break,
                    changed = connection.changed() => {
                        if changed.is_err() {
                            return;
                        }
                        let current = connection.borrow_and_update().clone();
                        let switched = current.account != observed.account
                            || current.chain_id != observed.chain_id;
                        observed = current;
                        if switched {
                            info!("connection changed, resetting exchange session");
                            self.reset();
                            break;
                        }
                        if self.is_ready() != ready {
                            break;
                        }
                    }
                }
            }
        }
    }
}

/// Marks a refresh as in flight. The flag and the loading indicator are
/// cleared on drop, including when the refresh is cancelled.
struct RefreshGuard<'a, C> {
    session: &'a ExchangeSession<C>,
    generation: u64,
}

impl<'a, C> RefreshGuard<'a, C> {
    fn acquire(session: &'a ExchangeSession<C>) -> Option<Self> {
        let generation = session.generation.get();
        if session.refreshing.get() == Some(generation) {
            return None;
        }
        session.refreshing.set(Some(generation));
        session.state.send_modify(|s| s.loading = true);
        Some(Self {
            session,
            generation,
        })
    }

    fn is_current(&self) -> bool {
        self.session.generation.get() == self.generation
    }
}

impl<C> Drop for RefreshGuard<'_, C> {
    fn drop(&mut self) {
        if self.session.refreshing.get() == Some(self.generation) {
            self.session.refreshing.set(None);
            self.session.state.send_modify(|s| s.loading = false);
        }
    }
}
