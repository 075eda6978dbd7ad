/// Configuration management for cookBook Service
///
/// Loads configuration from environment variables (after `.env`, if present).
use anyhow::{bail, Context, Result};
use feed_ranking::{FeedFailurePolicy, PreferredOrder};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Session token settings
    pub auth: AuthConfig,
    /// Feed ranking settings
    pub feed: FeedConfig,
    /// Group chat settings
    pub chat: ChatConfig,
    /// Media upload settings
    pub upload: UploadConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
    /// Emit JSON logs instead of human-readable lines
    pub json_logs: bool,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}

/// Session token configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret, at least 32 bytes
    pub session_secret: String,
    /// Expected `iss` claim, if any
    pub issuer: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("session_secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .finish()
    }
}

/// Feed ranking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Serve an empty feed instead of an error when assembly fails
    pub fail_open: bool,
    /// `recency` or `popularity`
    pub preferred_order: String,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl FeedConfig {
    pub fn failure_policy(&self) -> FeedFailurePolicy {
        FeedFailurePolicy::from_fail_open(self.fail_open)
    }

    pub fn preferred_order(&self) -> PreferredOrder {
        self.preferred_order.parse().unwrap_or_default()
    }
}

/// Group chat configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Messages returned by `/chat/history`
    pub history_limit: i64,
    /// Broadcast channel capacity; slow sessions skip older events
    pub channel_capacity: usize,
}

/// Media upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
    /// URL prefix under which stored files are served
    pub public_prefix: String,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    2
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("COOKBOOK_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_or("COOKBOOK_SERVICE_PORT", 8080),
            json_logs: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        };

        let cors = {
            let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                Ok(value) => value,
                Err(_) if app.is_production() => {
                    bail!("CORS_ALLOWED_ORIGINS must be set in production")
                }
                Err(_) => "http://localhost:3000".to_string(),
            };

            if app.is_production() && allowed_origins.trim() == "*" {
                bail!("CORS_ALLOWED_ORIGINS cannot be '*' in production");
            }

            CorsConfig { allowed_origins }
        };

        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/cookbook".to_string()),
            max_connections: env_or("DB_MAX_CONNECTIONS", default_max_connections()),
            min_connections: env_or("DB_MIN_CONNECTIONS", default_min_connections()),
            connect_timeout_secs: env_or("DB_CONNECT_TIMEOUT_SECS", 5),
            acquire_timeout_secs: env_or("DB_ACQUIRE_TIMEOUT_SECS", 10),
        };

        let auth = AuthConfig {
            session_secret: std::env::var("SESSION_SECRET")
                .context("SESSION_SECRET environment variable not set")?,
            issuer: std::env::var("SESSION_ISSUER").ok().filter(|s| !s.trim().is_empty()),
        };
        if auth.session_secret.len() < actix_middleware::jwt_auth::MIN_SECRET_LEN {
            bail!("SESSION_SECRET must be at least 32 bytes");
        }

        let feed = FeedConfig {
            fail_open: env_or("FEED_FAIL_OPEN", true),
            preferred_order: {
                let raw = std::env::var("FEED_PREFERRED_ORDER").unwrap_or_else(|_| "recency".to_string());
                raw.parse::<PreferredOrder>()
                    .with_context(|| format!("invalid FEED_PREFERRED_ORDER '{}'", raw))?;
                raw.trim().to_ascii_lowercase()
            },
            default_page_size: env_or("FEED_DEFAULT_PAGE_SIZE", 20),
            max_page_size: env_or("FEED_MAX_PAGE_SIZE", 100),
        };

        let chat = ChatConfig {
            history_limit: env_or("CHAT_HISTORY_LIMIT", 20),
            channel_capacity: env_or::<usize>("CHAT_CHANNEL_CAPACITY", 256).max(1),
        };

        let upload = UploadConfig {
            dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./uploads")),
            max_bytes: env_or("UPLOAD_MAX_BYTES", 10 * 1024 * 1024),
            public_prefix: std::env::var("UPLOAD_PUBLIC_PREFIX")
                .unwrap_or_else(|_| "/uploads".to_string()),
        };

        Ok(Config {
            app,
            cors,
            database,
            auth,
            feed,
            chat,
            upload,
        })
    }
}
