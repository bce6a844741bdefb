//=============================================================================
// File: src/screens/connect.rs
//=============================================================================
use dioxus::prelude::*;

use crate::app_state::AppState;
use crate::app_state_mut::AppStateMut;
use crate::components::empty_state::EmptyState;
use crate::components::pico::Button;
use crate::components::pico::Card;

/// Shown while there is no authorized account.
#[component]
pub fn ConnectScreen() -> Element {
    let app_state = use_context::<AppState>();
    let app_state_mut = use_context::<AppStateMut>();
    let connection = app_state_mut.connection.read().clone();

    if !connection.provider_available {
        return rsx! {
            Card {
                EmptyState {
                    title: "No wallet detected".to_string(),
                    description: Some("Install an Ethereum browser wallet such as MetaMask, then reload this page.".to_string()),
                    icon: rsx! { "👛" },
                }
            }
        };
    }

    let connect = move |_: MouseEvent| {
        let app_state = app_state.clone();
        spawn(async move {
            app_state.manager.connect_wallet().await;
        });
    };

    rsx! {
        Card {
            EmptyState {
                title: "Connect your wallet to buy Fanrating tokens".to_string(),
                description: Some("You need to connect your Ethereum wallet to use this application".to_string()),
                icon: rsx! { "🔌" },
                primary_action: rsx! {
                    Button {
                        loading: connection.loading,
                        on_click: connect,
                        "Connect Wallet"
                    }
                },
            }
        }
    }
}
