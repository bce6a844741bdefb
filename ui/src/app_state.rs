use std::ops::Deref;
use std::rc::Rc;

use api::config::ExchangeConfig;
use api::contract::FanRatingContract;

use crate::compat;
use crate::compat::PlatformProvider;
use crate::connection::ConnectionManager;
use crate::exchange::ExchangeSession;

pub type Manager = ConnectionManager<PlatformProvider>;
pub type Session = ExchangeSession<FanRatingContract<PlatformProvider>>;

pub struct AppStateData {
    pub config: ExchangeConfig,
    pub manager: Manager,
    pub session: Session,
}

/// The long-lived, non-reactive application objects, shared through context.
#[derive(Clone)]
pub struct AppState(Rc<AppStateData>);

impl PartialEq for AppState {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for AppState {
    type Target = AppStateData;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AppState {
    pub fn new(config: ExchangeConfig) -> Self {
        let manager = ConnectionManager::new(compat::detect_provider(&config), &config);
        let session = ExchangeSession::new(manager.contract(), manager.subscribe(), &config);
        Self(Rc::new(AppStateData {
            config,
            manager,
            session,
        }))
    }

    pub fn target_chain_id(&self) -> u64 {
        self.config.network.chain_id
    }
}
