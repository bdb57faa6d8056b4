use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub filter: FilterConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub geocoder: GeocoderConfig,
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub default_limit: i64,
    pub max_limit: Option<i64>,
    pub debug_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub migrate_on_start: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub prefix: String,
    pub file_upload_path: String,
    pub max_file_upload_bytes: usize,
    pub enable_cors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_days: i64,
    pub cookie_expiry_days: i64,
    pub secure_cookies: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Mean Earth radius in the unit radius-search distances are given in (miles)
    pub earth_radius: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub from_name: String,
    pub from_email: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Filter overrides
        if let Ok(v) = env::var("FILTER_DEFAULT_LIMIT") {
            self.filter.default_limit = v.parse().unwrap_or(self.filter.default_limit);
        }
        if let Ok(v) = env::var("FILTER_MAX_LIMIT") {
            self.filter.max_limit = v.parse().ok();
        }
        if let Ok(v) = env::var("FILTER_DEBUG_LOGGING") {
            self.filter.debug_logging = v.parse().unwrap_or(self.filter.debug_logging);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_MIGRATE_ON_START") {
            self.database.migrate_on_start = v.parse().unwrap_or(self.database.migrate_on_start);
        }

        // API overrides
        if let Ok(v) = env::var("PORT") {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("FILE_UPLOAD_PATH") {
            self.api.file_upload_path = v;
        }
        if let Ok(v) = env::var("MAX_FILE_UPLOAD") {
            self.api.max_file_upload_bytes = v.parse().unwrap_or(self.api.max_file_upload_bytes);
        }
        if let Ok(v) = env::var("API_ENABLE_CORS") {
            self.api.enable_cors = v.parse().unwrap_or(self.api.enable_cors);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRE_DAYS") {
            self.security.jwt_expiry_days = v.parse().unwrap_or(self.security.jwt_expiry_days);
        }
        if let Ok(v) = env::var("JWT_COOKIE_EXPIRE_DAYS") {
            self.security.cookie_expiry_days = v.parse().unwrap_or(self.security.cookie_expiry_days);
        }

        // Collaborators
        if let Ok(v) = env::var("GEOCODER_BASE_URL") {
            self.geocoder.base_url = v;
        }
        if let Ok(v) = env::var("GEOCODER_API_KEY") {
            self.geocoder.api_key = Some(v).filter(|k| !k.is_empty());
        }
        if let Ok(v) = env::var("MAIL_FROM_NAME") {
            self.mail.from_name = v;
        }
        if let Ok(v) = env::var("MAIL_FROM_EMAIL") {
            self.mail.from_email = v;
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            filter: FilterConfig {
                default_limit: 25,
                max_limit: Some(1000),
                debug_logging: true,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
                migrate_on_start: true,
            },
            api: ApiConfig {
                port: 5000,
                prefix: "/api/v1".to_string(),
                file_upload_path: "./public/uploads".to_string(),
                max_file_upload_bytes: 1_000_000,
                enable_cors: true,
            },
            security: SecurityConfig {
                jwt_secret: "development-secret-change-me".to_string(),
                jwt_expiry_days: 30,
                cookie_expiry_days: 30,
                secure_cookies: false,
            },
            geocoder: GeocoderConfig::default(),
            mail: MailConfig::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            filter: FilterConfig {
                default_limit: 25,
                max_limit: Some(500),
                debug_logging: false,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
                migrate_on_start: true,
            },
            api: ApiConfig {
                port: 5000,
                prefix: "/api/v1".to_string(),
                file_upload_path: "./public/uploads".to_string(),
                max_file_upload_bytes: 1_000_000,
                enable_cors: true,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_days: 30,
                cookie_expiry_days: 30,
                secure_cookies: false,
            },
            geocoder: GeocoderConfig::default(),
            mail: MailConfig::default(),
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            filter: FilterConfig {
                default_limit: 25,
                max_limit: Some(100),
                debug_logging: false,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
                migrate_on_start: false,
            },
            api: ApiConfig {
                port: 5000,
                prefix: "/api/v1".to_string(),
                file_upload_path: "./public/uploads".to_string(),
                max_file_upload_bytes: 1_000_000,
                enable_cors: false,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_days: 30,
                cookie_expiry_days: 30,
                secure_cookies: true,
            },
            geocoder: GeocoderConfig::default(),
            mail: MailConfig::default(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.mapquestapi.com/geocoding/v1/address".to_string(),
            api_key: None,
            earth_radius: 3963.0,
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from_name: "DevCamper".to_string(),
            from_email: "noreply@devcamper.io".to_string(),
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
