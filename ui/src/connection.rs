//! Wallet connection lifecycle: detection, authorization, network selection
//! and provider notifications.

use api::chain::to_hex_chain_id;
use api::config::ExchangeConfig;
use api::config::NetworkConfig;
use api::contract::FanRatingContract;
use api::eip1193::Eip1193Provider;
use api::eip1193::ProviderEvent;
use api::eip1193::ProviderEvents;
use api::wallet::Wallet;
use api::Address;
use dioxus_logger::tracing::info;
use dioxus_logger::tracing::warn;
use strum::EnumIs;
use tokio::sync::watch;

use crate::compat;

/// What the rest of the application may do with the current connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIs)]
pub enum SessionGate {
    /// No wallet was detected.
    WalletUnavailable,
    /// A wallet exists but has not granted an account.
    Unauthorized,
    /// An account is connected on some other network.
    WrongNetwork,
    Ready,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionState {
    pub provider_available: bool,
    pub account: Option<Address>,
    /// May be known before any account is authorized.
    pub chain_id: Option<u64>,
    /// A connect or switch request is in flight.
    pub loading: bool,
}

impl ConnectionState {
    pub fn connected(&self) -> bool {
        self.account.is_some()
    }

    pub fn gate(&self, target_chain_id: u64) -> SessionGate {
        if !self.provider_available {
            SessionGate::WalletUnavailable
        } else if !self.connected() {
            SessionGate::Unauthorized
        } else if self.chain_id != Some(target_chain_id) {
            SessionGate::WrongNetwork
        } else {
            SessionGate::Ready
        }
    }
}

/// Owns the single wallet session.
///
/// State is published through a watch channel; readers hold a receiver and
/// never mutate it.
pub struct ConnectionManager<P> {
    wallet: Option<Wallet<P>>,
    network: NetworkConfig,
    contract_address: Address,
    state: watch::Sender<ConnectionState>,
}

impl<P: Eip1193Provider> ConnectionManager<P> {
    pub fn new(provider: Option<P>, config: &ExchangeConfig) -> Self {
        Self {
            wallet: provider.map(Wallet::new),
            network: config.network.clone(),
            contract_address: config.contract_address,
            state: watch::Sender::new(ConnectionState::default()),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    pub fn target_chain_id(&self) -> u64 {
        self.network.chain_id
    }

    /// A contract handle bound to the wallet, if there is one.
    pub fn contract(&self) -> Option<FanRatingContract<P>> {
        self.wallet
            .as_ref()
            .map(|wallet| FanRatingContract::new(wallet.clone(), self.contract_address))
    }

    /// Reads the current chain and any already authorized account, then
    /// subscribes to provider notifications.
    ///
    /// Returns `None` when no wallet is available. Never prompts the user.
    pub async fn initialize(&self) -> Option<ProviderEvents> {
        let Some(wallet) = &self.wallet else {
            info!("no wallet provider detected");
            return None;
        };
        info!("wallet provider detected");
        self.state.send_modify(|s| s.provider_available = true);

        match wallet.chain_id().await {
            Ok(chain_id) => self.state.send_modify(|s| s.chain_id = Some(chain_id)),
            Err(e) => warn!("could not read chain id: {e}"),
        }

        match wallet.accounts().await {
            Ok(accounts) => {
                if let Some(account) = accounts.first().copied() {
                    info!("found authorized account {account}");
                    self.state.send_modify(|s| s.account = Some(account));
                }
            }
            Err(e) => warn!("could not read authorized accounts: {e}"),
        }

        Some(wallet.subscribe())
    }

    /// Prompts the user for account access. Failures leave the state as it was.
    pub async fn connect_wallet(&self) {
        let Some(wallet) = &self.wallet else {
            warn!("connect requested without a wallet provider");
            return;
        };
        let _busy = Busy::start(&self.state);

        match wallet.request_accounts().await {
            Ok(accounts) => match accounts.first().copied() {
                Some(account) => {
                    info!("wallet connected: {account}");
                    self.state.send_modify(|s| s.account = Some(account));
                }
                None => warn!("wallet granted access to no accounts"),
            },
            Err(e) if e.is_user_rejected() => {
                info!("user rejected the connection request")
            }
            Err(e) => warn!("failed to connect wallet: {e}"),
        }
    }

    /// Asks the wallet to switch to `target_chain_id`. A wallet that does not
    /// know the network is asked to add it instead; the switch is not retried.
    pub async fn switch_to_supported_network(&self, target_chain_id: u64) {
        let Some(wallet) = &self.wallet else {
            warn!("network switch requested without a wallet provider");
            return;
        };
        let _busy = Busy::start(&self.state);

        match wallet.switch_chain(target_chain_id).await {
            Ok(()) => info!("switched to chain {target_chain_id}"),
            Err(e) if e.is_unrecognized_chain() => {
                info!("wallet does not know chain {target_chain_id}, proposing it");
                let mut params = self.network.add_chain_parameter();
                params.chain_id = to_hex_chain_id(target_chain_id);
                if let Err(e) = wallet.add_chain(&params).await {
                    warn!("failed to add chain {target_chain_id}: {e}");
                }
            }
            Err(e) => warn!("failed to switch network: {e}"),
        }
    }

    pub fn handle_event(&self, event: ProviderEvent) {
        match event {
            ProviderEvent::AccountsChanged(accounts) => {
                let account = accounts.first().copied();
                match account {
                    Some(account) => info!("account changed to {account}"),
                    None => info!("wallet disconnected all accounts"),
                }
                self.state.send_modify(|s| s.account = account);
            }
            ProviderEvent::ChainChanged(chain_id) => {
                info!("chain changed to {chain_id}");
                self.state.send_modify(|s| s.chain_id = Some(chain_id));
            }
        }
    }

    /// Applies notifications until the subscription closes. A chain change
    /// reloads the page where there is one to reload.
    pub async fn run_events(&self, mut events: ProviderEvents) {
        while let Some(event) = events.next().await {
            let chain_changed = event.is_chain_changed();
            self.handle_event(event);
            if chain_changed && compat::reload_page() {
                break;
            }
        }
    }
}

struct Busy<'a>(&'a watch::Sender<ConnectionState>);

impl<'a> Busy<'a> {
    fn start(state: &'a watch::Sender<ConnectionState>) -> Self {
        state.send_modify(|s| s.loading = true);
        Self(state)
    }
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        self.0.send_modify(|s| s.loading = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::address;
    use api::eip1193::ProviderRpcError;
    use api::mock::MockProvider;
    use serde_json::json;

    const ALICE: Address = address!("00000000000000000000000000000000000a11ce");
    const BOB: Address = address!("0000000000000000000000000000000000000b0b");
    const SEPOLIA: u64 = 11_155_111;

    fn manager(provider: &MockProvider) -> ConnectionManager<MockProvider> {
        ConnectionManager::new(Some(provider.clone()), &ExchangeConfig::default())
    }

    fn on_sepolia() -> MockProvider {
        let provider = MockProvider::new();
        provider.respond("eth_chainId", json!("0xaa36a7"));
        provider
    }

    #[tokio::test]
    async fn missing_wallet_is_not_fatal() {
        let manager = ConnectionManager::<MockProvider>::new(None, &ExchangeConfig::default());

        assert!(manager.initialize().await.is_none());
        assert_eq!(manager.state(), ConnectionState::default());
        assert!(manager.state().gate(SEPOLIA).is_wallet_unavailable());
        assert!(manager.contract().is_none());

        manager.connect_wallet().await;
        assert!(!manager.state().connected());
    }

    #[tokio::test]
    async fn initialize_picks_up_authorized_account_without_prompting() {
        let provider = on_sepolia();
        provider.respond("eth_accounts", json!([ALICE, BOB]));
        let manager = manager(&provider);

        let events = manager.initialize().await;

        assert!(events.is_some());
        let state = manager.state();
        assert!(state.provider_available);
        assert_eq!(state.account, Some(ALICE));
        assert_eq!(state.chain_id, Some(SEPOLIA));
        assert!(state.gate(SEPOLIA).is_ready());
        assert!(provider.requests_for("eth_requestAccounts").is_empty());
        assert_eq!(provider.listener_count(), 1);
    }

    #[tokio::test]
    async fn chain_is_known_before_authorization() {
        let provider = on_sepolia();
        provider.respond("eth_accounts", json!([]));
        let manager = manager(&provider);

        let _events = manager.initialize().await;

        let state = manager.state();
        assert!(!state.connected());
        assert_eq!(state.chain_id, Some(SEPOLIA));
        assert!(state.gate(SEPOLIA).is_unauthorized());
    }

    #[tokio::test]
    async fn failed_reads_leave_state_empty() {
        let provider = MockProvider::new();
        provider.fail_transport("eth_chainId", "offline");
        provider.fail_transport("eth_accounts", "offline");
        let manager = manager(&provider);

        let _events = manager.initialize().await;

        let state = manager.state();
        assert!(state.provider_available);
        assert_eq!(state.account, None);
        assert_eq!(state.chain_id, None);
    }

    #[tokio::test]
    async fn connect_wallet_sets_account_and_clears_loading() {
        let provider = on_sepolia();
        provider.respond("eth_accounts", json!([]));
        provider.respond("eth_requestAccounts", json!([BOB]));
        let manager = manager(&provider);
        let _events = manager.initialize().await;
        let mut rx = manager.subscribe();
        rx.borrow_and_update();

        manager.connect_wallet().await;

        let state = manager.state();
        assert_eq!(state.account, Some(BOB));
        assert!(!state.loading);
        assert!(rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn rejected_connect_leaves_state_unchanged() {
        let provider = on_sepolia();
        provider.respond("eth_accounts", json!([]));
        provider.fail(
            "eth_requestAccounts",
            ProviderRpcError::new(ProviderRpcError::USER_REJECTED, "User rejected the request."),
        );
        let manager = manager(&provider);
        let _events = manager.initialize().await;
        let before = manager.state();

        manager.connect_wallet().await;

        assert_eq!(manager.state(), before);
        assert_eq!(provider.requests_for("eth_requestAccounts").len(), 1);
    }

    #[tokio::test]
    async fn switch_network_requests_the_target_chain() {
        let provider = MockProvider::new();
        provider.respond("wallet_switchEthereumChain", json!(null));
        let manager = manager(&provider);

        manager.switch_to_supported_network(SEPOLIA).await;

        let requests = provider.requests_for("wallet_switchEthereumChain");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].params, json!([{ "chainId": "0xaa36a7" }]));
        assert!(provider.requests_for("wallet_addEthereumChain").is_empty());
        assert!(!manager.state().loading);
    }

    #[tokio::test]
    async fn unknown_network_is_added_but_not_switched_again() {
        let provider = MockProvider::new();
        provider.fail(
            "wallet_switchEthereumChain",
            ProviderRpcError::new(ProviderRpcError::UNRECOGNIZED_CHAIN, "Unrecognized chain ID"),
        );
        provider.respond("wallet_addEthereumChain", json!(null));
        let manager = manager(&provider);

        manager.switch_to_supported_network(SEPOLIA).await;

        assert_eq!(provider.requests_for("wallet_switchEthereumChain").len(), 1);
        let added = provider.requests_for("wallet_addEthereumChain");
        assert_eq!(added.len(), 1);
        let params = &added[0].params[0];
        assert_eq!(params["chainId"], "0xaa36a7");
        assert_eq!(params["chainName"], "Sepolia Testnet");
        assert_eq!(params["nativeCurrency"]["symbol"], "ETH");
        assert_eq!(params["nativeCurrency"]["decimals"], 18);
        assert_eq!(params["blockExplorerUrls"][0], "https://sepolia.etherscan.io");
        assert!(!manager.state().loading);
    }

    #[tokio::test]
    async fn other_switch_failures_do_not_add_the_network() {
        let provider = MockProvider::new();
        provider.fail(
            "wallet_switchEthereumChain",
            ProviderRpcError::new(ProviderRpcError::USER_REJECTED, "User rejected the request."),
        );
        let manager = manager(&provider);

        manager.switch_to_supported_network(SEPOLIA).await;

        assert!(provider.requests_for("wallet_addEthereumChain").is_empty());
        assert_eq!(manager.state(), ConnectionState::default());
    }

    #[tokio::test]
    async fn events_update_account_and_chain() {
        let provider = on_sepolia();
        provider.respond("eth_accounts", json!([ALICE]));
        let manager = manager(&provider);
        let _events = manager.initialize().await;

        manager.handle_event(ProviderEvent::AccountsChanged(vec![BOB]));
        assert_eq!(manager.state().account, Some(BOB));

        manager.handle_event(ProviderEvent::ChainChanged(1));
        assert_eq!(manager.state().chain_id, Some(1));
        assert!(manager.state().gate(SEPOLIA).is_wrong_network());

        manager.handle_event(ProviderEvent::AccountsChanged(vec![]));
        assert!(!manager.state().connected());
        assert!(manager.state().gate(SEPOLIA).is_unauthorized());
    }

    #[tokio::test]
    async fn dropping_the_event_loop_unsubscribes() {
        let provider = on_sepolia();
        provider.respond("eth_accounts", json!([ALICE]));
        let manager = manager(&provider);
        let events = manager.initialize().await.unwrap();
        assert_eq!(provider.listener_count(), 1);

        tokio::select! {
            biased;
            _ = manager.run_events(events) => panic!("subscription closed early"),
            _ = async {
                provider.emit(ProviderEvent::AccountsChanged(vec![BOB]));
                provider.emit(ProviderEvent::ChainChanged(1));
                tokio::task::yield_now().await;
            } => {}
        }

        let state = manager.state();
        assert_eq!(state.account, Some(BOB));
        assert_eq!(state.chain_id, Some(1));
        assert_eq!(provider.listener_count(), 0);
    }
}
