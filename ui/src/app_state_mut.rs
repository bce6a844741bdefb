//! Defines the mutable, reactive state for the application's UI.

use dioxus::prelude::*;

use crate::connection::ConnectionState;
use crate::exchange::ExchangeSnapshot;

/// A reactive state provided as a Dioxus context for mutable UI data.
///
/// The signals mirror the watch channels owned by the connection manager and
/// the exchange session; components read them and never write them.
#[derive(Clone, Copy)]
pub struct AppStateMut {
    pub connection: Signal<ConnectionState>,
    pub exchange: Signal<ExchangeSnapshot>,
}
