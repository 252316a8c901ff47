use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AccountService, Argon2Credentials, Credentials, FeedService, ModerationService,
    RatingService, SeaOrmAccountService, SeaOrmFeedService, SeaOrmModerationService,
    SeaOrmRatingService, SeaOrmSocialService, SocialService,
};

/// Everything an inbound operation needs, cheap to clone per request.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub account_service: Arc<dyn AccountService>,

    pub feed_service: Arc<dyn FeedService>,

    pub moderation_service: Arc<dyn ModerationService>,

    pub rating_service: Arc<dyn RatingService>,

    pub social_service: Arc<dyn SocialService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    /// Wires the services over an already-open store with argon2 credentials.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let credentials = Arc::new(Argon2Credentials::new(config.security.clone()));
        Self::with_credentials(config, store, credentials)
    }

    #[must_use]
    pub fn with_credentials(
        config: Config,
        store: Store,
        credentials: Arc<dyn Credentials>,
    ) -> Self {
        let feed_service: Arc<dyn FeedService> =
            Arc::new(SeaOrmFeedService::new(store.clone(), config.feed.clone()));

        let account_service = Arc::new(SeaOrmAccountService::new(
            store.clone(),
            credentials,
            config.security.clone(),
        )) as Arc<dyn AccountService>;

        let moderation_service = Arc::new(SeaOrmModerationService::new(
            store.clone(),
            feed_service.clone(),
        )) as Arc<dyn ModerationService>;

        let rating_service =
            Arc::new(SeaOrmRatingService::new(store.clone())) as Arc<dyn RatingService>;

        let social_service = Arc::new(SeaOrmSocialService::new(
            store.clone(),
            feed_service.clone(),
        )) as Arc<dyn SocialService>;

        Self {
            config: Arc::new(RwLock::new(config)),
            store,
            account_service,
            feed_service,
            moderation_service,
            rating_service,
            social_service,
        }
    }
}
