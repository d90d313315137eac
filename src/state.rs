use crate::config::AppConfig;
use crate::storage::UserStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn from_parts(users: Arc<dyn UserStore>, config: Arc<AppConfig>) -> Self {
        Self { users, config }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::with_store(Arc::new(crate::storage::fakes::MemoryUserStore::default()))
    }

    #[cfg(test)]
    pub fn with_store(users: Arc<dyn UserStore>) -> Self {
        let config = AppConfig::from_lookup(|_| None).expect("defaults are valid");
        Self::from_parts(users, Arc::new(config))
    }
}
