//=============================================================================
// File: src/hooks/use_wallet_session.rs
//=============================================================================
use dioxus::prelude::*;
use tokio::sync::watch;

use crate::app_state::AppState;
use crate::app_state_mut::AppStateMut;

/// Starts the wallet session for the lifetime of the calling component.
///
/// Initializes the connection, follows provider notifications, runs the
/// exchange session driver and mirrors both state channels into signals.
/// All of it is torn down with the component.
pub fn use_wallet_session(app_state: AppState) -> AppStateMut {
    let connection = use_signal(|| app_state.manager.state());
    let exchange = use_signal(|| app_state.session.snapshot());

    let state = app_state.clone();
    use_coroutine(move |_rx: UnboundedReceiver<()>| {
        let state = state.clone();
        async move {
            if let Some(events) = state.manager.initialize().await {
                state.manager.run_events(events).await;
            }
        }
    });

    let state = app_state.clone();
    use_coroutine(move |_rx: UnboundedReceiver<()>| {
        let state = state.clone();
        async move {
            state.session.run().await;
        }
    });

    let state = app_state.clone();
    use_coroutine(move |_rx: UnboundedReceiver<()>| {
        let rx = state.manager.subscribe();
        mirror(rx, connection)
    });

    let state = app_state;
    use_coroutine(move |_rx: UnboundedReceiver<()>| {
        let rx = state.session.subscribe();
        mirror(rx, exchange)
    });

    AppStateMut {
        connection,
        exchange,
    }
}

async fn mirror<T: Clone + PartialEq + 'static>(
    mut rx: watch::Receiver<T>,
    mut signal: Signal<T>,
) {
    loop {
        let value = rx.borrow_and_update().clone();
        if *signal.peek() != value {
            signal.set(value);
        }
        if rx.changed().await.is_err() {
            break;
        }
    }
}
