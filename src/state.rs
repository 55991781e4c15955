use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    ActivityLogger, AuthService, PasswordService, SeaOrmAuthService, SeaOrmUserService,
    UserService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub passwords: Arc<PasswordService>,

    pub activity: ActivityLogger,

    pub auth_service: Arc<dyn AuthService>,

    pub user_service: Arc<dyn UserService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::from_config(&config.general).await?;
        Self::with_store(config, store)
    }

    /// Wires the services around an already connected store.
    pub fn with_store(config: Config, store: Store) -> anyhow::Result<Self> {
        let passwords = Arc::new(PasswordService::new(&config.security)?);
        let activity = ActivityLogger::new(store.clone());

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            passwords.clone(),
            activity.clone(),
        )) as Arc<dyn AuthService>;

        let user_service = Arc::new(SeaOrmUserService::new(
            store.clone(),
            passwords.clone(),
            activity.clone(),
        )) as Arc<dyn UserService>;

        Ok(Self {
            config: Arc::new(config),
            store,
            passwords,
            activity,
            auth_service,
            user_service,
        })
    }
}
