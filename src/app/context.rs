use std::sync::Arc;

use crate::api::{SharedApi, XApiClient};
use crate::app::error::Result;
use crate::config::Config;
use crate::store::{JsonStateStore, StateStore};

/// Everything a command needs, built once at startup.
pub struct AppContext {
    pub api: SharedApi,
    pub state: Arc<dyn StateStore>,
    pub config: Arc<Config>,
}

impl AppContext {
    /// Resolves credentials and the state file location. Fails before any
    /// network call when credentials are missing.
    pub fn new(config: Config) -> Result<Self> {
        let credentials = config.credentials()?;
        let api: SharedApi = Arc::new(XApiClient::new(credentials, &config.api)?);

        let state_path = match &config.state_file {
            Some(p) => p.clone(),
            None => JsonStateStore::default_path()?,
        };
        let state: Arc<dyn StateStore> = Arc::new(JsonStateStore::new(state_path));

        Ok(Self::with_parts(api, state, config))
    }

    pub fn with_parts(api: SharedApi, state: Arc<dyn StateStore>, config: Config) -> Self {
        Self {
            api,
            state,
            config: Arc::new(config),
        }
    }
}
