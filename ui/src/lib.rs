// The client-side Dioxus application logic.

use dioxus::prelude::*;

mod app_state;
mod app_state_mut;
pub mod compat;
mod components;
pub mod connection;
mod currency;
pub mod exchange;
pub mod hooks;
mod screens;

use api::config::ExchangeConfig;
use api::Address;
use app_state::AppState;
use components::pico::Container;
use connection::SessionGate;
use hooks::use_wallet_session::use_wallet_session;
use screens::connect::ConnectScreen;
use screens::exchange::ExchangeScreen;
use screens::wrong_network::WrongNetworkScreen;

const PICO_CSS: &str = "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.cyan.min.css";

//=============================================================================
// MAIN APPLICATION COMPONENT (Client-side)
//=============================================================================

#[allow(non_snake_case)]
pub fn App() -> Element {
    let responsive_css = r#"
    * { box-sizing: border-box; }

    .app-main-container {
        max-width: 480px;
        margin: 0 auto;
        padding: 1rem;
    }

    .app-main-container header nav {
        --pico-nav-element-spacing-vertical: 0.5rem;
    }

    .app-main-container .account {
        font-family: var(--pico-font-family-monospace);
        color: var(--pico-muted-color);
    }
"#;

    rsx! {
        document::Meta {
            name: "viewport",
            content: "width=device-width, initial-scale=1.0",
        }
        document::Link {
            rel: "stylesheet",
            href: PICO_CSS,
        }
        style {
            "{responsive_css}"
        }
        LoadedApp {}
    }
}

/// Owns the wallet session and picks the screen the connection allows.
#[component]
fn LoadedApp() -> Element {
    let app_state = use_hook(|| AppState::new(ExchangeConfig::default()));
    use_context_provider(|| app_state.clone());

    let app_state_mut = use_wallet_session(app_state.clone());
    use_context_provider(|| app_state_mut);

    let connection = app_state_mut.connection.read().clone();
    let gate = connection.gate(app_state.target_chain_id());

    rsx! {
        div {
            class: "app-main-container",
            Container {
                header {
                    nav {
                        ul {
                            li {
                                strong { "FanRating Exchange" }
                            }
                        }
                        ul {
                            if let Some(account) = connection.account {
                                li {
                                    class: "account",
                                    title: "{account}",
                                    "{short_address(&account)}"
                                }
                            }
                        }
                    }
                }
                div {
                    class: "content",
                    match gate {
                        SessionGate::WalletUnavailable | SessionGate::Unauthorized => rsx! {
                            ConnectScreen {}
                        },
                        SessionGate::WrongNetwork => rsx! {
                            WrongNetworkScreen {}
                        },
                        SessionGate::Ready => rsx! {
                            ExchangeScreen {}
                        },
                    }
                }
            }
        }
    }
}

fn short_address(account: &Address) -> String {
    let full = account.to_string();
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}
