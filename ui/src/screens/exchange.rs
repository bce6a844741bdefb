//=============================================================================
// File: src/screens/exchange.rs
//=============================================================================
use dioxus::prelude::*;
use dioxus_logger::tracing::warn;

use crate::app_state::AppState;
use crate::app_state_mut::AppStateMut;
use crate::components::pico::Button;
use crate::components::pico::Card;
use crate::components::pico::Input;
use crate::components::status_banner::StatusBanner;
use crate::currency::format_balance;

/// The purchase form: balance, USD input, quote, status and Buy.
#[component]
pub fn ExchangeScreen() -> Element {
    let app_state = use_context::<AppState>();
    let app_state_mut = use_context::<AppStateMut>();
    let snapshot = app_state_mut.exchange.read().clone();

    let balance = format_balance(&snapshot.balance);
    let token_amount = snapshot.token_amount();
    let rate_line = if snapshot.rate_loaded() {
        format!(
            "1 {} = {} {}",
            app_state.config.token_symbol,
            snapshot.usdc_rate(),
            app_state.config.payment_symbol
        )
    } else {
        "Loading exchange rates...".to_string()
    };

    let refresh = {
        let app_state = app_state.clone();
        move |evt: MouseEvent| {
            evt.prevent_default();
            let app_state = app_state.clone();
            spawn(async move {
                app_state.session.refresh_data().await;
            });
        }
    };

    let on_usd_input = {
        let app_state = app_state.clone();
        move |value: String| app_state.session.set_usd_input(value)
    };

    let buy = move |_: MouseEvent| {
        let app_state = app_state.clone();
        let usd_amount = app_state_mut.exchange.peek().usd_input.clone();
        spawn(async move {
            if let Err(e) = app_state.session.submit_purchase(&usd_amount).await {
                warn!("purchase not completed: {e}");
            }
        });
    };

    rsx! {
        Card {
            header {
                a {
                    href: "#",
                    title: "Refresh",
                    "aria-busy": snapshot.loading,
                    onclick: refresh,
                    if !snapshot.loading { "⟳" }
                }
                " Current balance: {balance} tokens"
            }
            Input {
                label: "USD Amount".to_string(),
                name: "usd-amount".to_string(),
                input_type: "number".to_string(),
                placeholder: "0.00".to_string(),
                value: snapshot.usd_input.clone(),
                on_input: on_usd_input,
            }
            div {
                style: "text-align: center; margin-bottom: 1rem;",
                "⇅"
            }
            Input {
                label: "Fanrating Tokens".to_string(),
                name: "fanrating-amount".to_string(),
                placeholder: "0.00".to_string(),
                value: token_amount,
                readonly: true,
            }
            StatusBanner { status: snapshot.status.clone() }
            Button {
                on_click: buy,
                loading: snapshot.status.is_loading(),
                disabled: !snapshot.can_buy(),
                "Buy"
            }
            footer {
                small { "{rate_line}" }
            }
        }
    }
}
