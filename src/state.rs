use std::sync::Arc;

use campusmart_auth::TokenService;
use campusmart_config::{CorsConfig, JwtConfig, OAuthConfig, ServerConfig};
use campusmart_db::postgres::{
    PgBorrowRequestStore, PgListingStore, PgNightMarketStore, PgUserStore,
};
use campusmart_db::{PgPool, UserStore};
use campusmart_models::{BorrowRequest, Listing, NightMarketPost};

use crate::modules::auth::google::GoogleIdentityProvider;
use crate::modules::auth::identity::IdentityProvider;
use crate::modules::resource::ResourceService;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub listings: ResourceService<Listing>,
    pub borrow_requests: ResourceService<BorrowRequest>,
    pub night_market: ResourceService<NightMarketPost>,
    pub tokens: TokenService,
    pub server_config: Arc<ServerConfig>,
    pub cors_config: CorsConfig,
    /// `None` when Google sign-in is not configured
    pub identity_provider: Option<Arc<dyn IdentityProvider>>,
}

impl AppState {
    /// Postgres-backed state.
    pub fn with_pool(
        pool: PgPool,
        jwt_config: JwtConfig,
        server_config: ServerConfig,
        cors_config: CorsConfig,
        oauth_config: Option<OAuthConfig>,
    ) -> Self {
        let identity_provider = oauth_config
            .map(|config| Arc::new(GoogleIdentityProvider::new(config)) as Arc<dyn IdentityProvider>);

        Self {
            users: Arc::new(PgUserStore::new(pool.clone())),
            listings: ResourceService::new(Arc::new(PgListingStore::new(pool.clone()))),
            borrow_requests: ResourceService::new(Arc::new(PgBorrowRequestStore::new(pool.clone()))),
            night_market: ResourceService::new(Arc::new(PgNightMarketStore::new(pool))),
            tokens: TokenService::new(jwt_config),
            server_config: Arc::new(server_config),
            cors_config,
            identity_provider,
        }
    }

    /// State over the in-memory stores, for tests and local demos.
    #[cfg(feature = "test-utils")]
    pub fn in_memory(
        db: &campusmart_db::memory::MemoryDatabase,
        jwt_config: JwtConfig,
        server_config: ServerConfig,
    ) -> Self {
        let cors_config = CorsConfig {
            allowed_origins: vec![server_config.frontend_url.clone()],
        };

        Self {
            users: db.users.clone(),
            listings: ResourceService::new(db.listings.clone()),
            borrow_requests: ResourceService::new(db.borrow_requests.clone()),
            night_market: ResourceService::new(db.night_market.clone()),
            tokens: TokenService::new(jwt_config),
            server_config: Arc::new(server_config),
            cors_config,
            identity_provider: None,
        }
    }

    pub fn with_identity_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.identity_provider = Some(provider);
        self
    }
}

/// Reads every configuration object from the environment and connects the
/// database. Any missing or invalid setting aborts startup.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let jwt_config = JwtConfig::from_env()?;
    let server_config = ServerConfig::from_env()?;
    let cors_config = CorsConfig::from_env();
    let oauth_config = OAuthConfig::from_env()?;

    let pool = campusmart_db::init_db_pool().await?;
    campusmart_db::run_migrations(&pool).await?;

    Ok(AppState::with_pool(
        pool,
        jwt_config,
        server_config,
        cors_config,
        oauth_config,
    ))
}
