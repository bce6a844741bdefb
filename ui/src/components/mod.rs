//! Shared components: the Pico.css building blocks and the panels the
//! screens are assembled from.
pub mod empty_state;
pub mod pico;
pub mod status_banner;
