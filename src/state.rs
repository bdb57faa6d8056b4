use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use crate::auth::{AuthError, TokenService};
use crate::config::AppConfig;
use crate::services::aggregate_service::AggregateService;
use crate::services::geocoder::{self, GeocodeError, Geocoder};
use crate::services::mailer::{LogMailer, Mailer};

/// Configuration that cannot back a running server
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Security(#[from] AuthError),

    #[error(transparent)]
    Geocoder(#[from] GeocodeError),
}

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub tokens: Arc<TokenService>,
    pub geocoder: Arc<dyn Geocoder>,
    pub mailer: Arc<dyn Mailer>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Result<Self, StateError> {
        Ok(Self {
            pool,
            tokens: Arc::new(TokenService::from_config(&config)?),
            geocoder: geocoder::from_config(&config.geocoder, config.environment)?,
            mailer: Arc::new(LogMailer::new(&config.mail)),
            config: Arc::new(config),
        })
    }

    pub fn with_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = geocoder;
        self
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }

    pub fn aggregates(&self) -> AggregateService {
        AggregateService::new(self.pool.clone())
    }
}
