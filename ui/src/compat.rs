// Re-export the public API from the appropriate module
#[cfg(target_arch = "wasm32")]
pub use wasm32::*;

#[cfg(not(target_arch = "wasm32"))]
pub use non_wasm32::*;

use std::time::Duration;

/// Browser timers take a `u32` of milliseconds; longer periods saturate.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn timer_millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

#[cfg(target_arch = "wasm32")]
pub mod wasm32 {
    use std::time::Duration;

    use api::config::ExchangeConfig;
    use api::injected::InjectedProvider;

    /// The wallet transport available on this platform.
    pub type PlatformProvider = InjectedProvider;

    pub mod interval {
        use std::time::Duration;
        use tokio::sync::mpsc;

        /// A periodic timer whose first tick fires one `duration` after creation.
        ///
        /// Dropping it cancels the underlying browser interval.
        pub struct Interval {
            inner: Option<gloo_timers::callback::Interval>,
            rx: mpsc::UnboundedReceiver<()>,
        }

        impl Interval {
            pub fn new(duration: Duration) -> Self {
                let (tx, rx) = mpsc::unbounded_channel();
                let millis = crate::compat::timer_millis(duration);
                let gloo_interval = gloo_timers::callback::Interval::new(millis, move || {
                    let _ = tx.send(());
                });

                Self {
                    inner: Some(gloo_interval),
                    rx,
                }
            }

            pub async fn tick(&mut self) {
                let _ = self.rx.recv().await;
            }
        }

        impl Drop for Interval {
            fn drop(&mut self) {
                if let Some(inner) = self.inner.take() {
                    inner.cancel();
                }
            }
        }
    }

    pub async fn sleep(duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }

    pub fn detect_provider(_config: &ExchangeConfig) -> Option<PlatformProvider> {
        InjectedProvider::detect()
    }

    /// Reloads the whole page. Returns `true` when a reload was issued.
    pub fn reload_page() -> bool {
        match web_sys::window().map(|win| win.location().reload()) {
            Some(Ok(())) => true,
            Some(Err(e)) => {
                dioxus_logger::tracing::error!("page reload failed: {e:?}");
                false
            }
            None => false,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub mod non_wasm32 {
    use std::time::Duration;

    use api::config::ExchangeConfig;
    use api::http::HttpProvider;

    /// The wallet transport available on this platform.
    pub type PlatformProvider = HttpProvider;

    pub mod interval {
        use tokio::time::{self, Duration, Instant, MissedTickBehavior};

        /// A periodic timer whose first tick fires one `duration` after creation.
        pub struct Interval {
            inner: tokio::time::Interval,
        }
        impl Interval {
            pub fn new(duration: Duration) -> Self {
                let mut interval = time::interval_at(Instant::now() + duration, duration);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                Self { inner: interval }
            }
            pub async fn tick(&mut self) {
                self.inner.tick().await;
            }
        }
    }

    pub async fn sleep(duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Native builds talk to a JSON-RPC node; there is always a provider.
    pub fn detect_provider(config: &ExchangeConfig) -> Option<PlatformProvider> {
        Some(HttpProvider::new(config.local_rpc_url.clone()))
    }

    /// There is no page to reload natively; the caller resets in place.
    pub fn reload_page() -> bool {
        false
    }
}
