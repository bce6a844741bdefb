use dioxus::prelude::*;

use crate::exchange::TransactionStatus;

/// The purchase status line. Renders nothing while idle.
#[component]
pub fn StatusBanner(status: TransactionStatus) -> Element {
    let (icon, color) = match &status {
        TransactionStatus::Idle => return rsx! {},
        TransactionStatus::Loading { .. } => ("", "var(--pico-muted-color)"),
        TransactionStatus::Success { .. } => ("✔", "var(--pico-ins-color)"),
        TransactionStatus::Error { .. } => ("⚠", "var(--pico-del-color)"),
    };

    rsx! {
        div {
            role: "status",
            "aria-busy": status.is_loading(),
            style: "display: flex; gap: 0.5rem; align-items: center; margin-bottom: 1rem; color: {color};",
            if !icon.is_empty() {
                span { "{icon}" }
            }
            strong { "{status.label()}" }
            span { "{status.message()}" }
        }
    }
}
