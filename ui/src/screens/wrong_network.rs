//=============================================================================
// File: src/screens/wrong_network.rs
//=============================================================================
use dioxus::prelude::*;

use crate::app_state::AppState;
use crate::app_state_mut::AppStateMut;
use crate::components::empty_state::EmptyState;
use crate::components::pico::Button;
use crate::components::pico::Card;

/// Blocks the exchange until the wallet is on the target network.
#[component]
pub fn WrongNetworkScreen() -> Element {
    let app_state = use_context::<AppState>();
    let app_state_mut = use_context::<AppStateMut>();
    let loading = app_state_mut.connection.read().loading;
    let chain_name = app_state.config.network.chain_name.clone();
    let label = if loading {
        "Switching...".to_string()
    } else {
        format!("Switch to {chain_name}")
    };

    let switch = move |_: MouseEvent| {
        let app_state = app_state.clone();
        spawn(async move {
            let target = app_state.target_chain_id();
            app_state.manager.switch_to_supported_network(target).await;
        });
    };

    rsx! {
        Card {
            EmptyState {
                title: "Wrong Network!".to_string(),
                description: Some(format!("Please switch to {chain_name}. This application requires the {chain_name}.")),
                icon: rsx! { "⛓" },
                warning: true,
                primary_action: rsx! {
                    Button {
                        loading,
                        on_click: switch,
                        "{label}"
                    }
                },
            }
        }
    }
}
