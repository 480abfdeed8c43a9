use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub feed: FeedConfig,
    pub app: AppConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

/// Live update feed settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Length of the recent-updates list pushed to dashboard sockets.
    pub recent_cap: usize,
    /// Capacity of the in-process change broadcast channel.
    pub channel_capacity: usize,
    /// Default length of the notifications listing.
    pub notifications_limit: i64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            recent_cap: 5,
            channel_capacity: 256,
            notifications_limit: 50,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(val) => val
            .trim()
            .parse()
            .with_context(|| format!("Failed to parse {}", name)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Server configuration
        let host = parse_var("SERVER_HOST", IpAddr::from([0, 0, 0, 0]))?;
        let port = parse_var("SERVER_PORT", 8000_u16)?;

        // Database configuration
        let db_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let max_connections = parse_var("DATABASE_MAX_CONNECTIONS", 10_u32)?;
        let min_connections = parse_var("DATABASE_MIN_CONNECTIONS", 1_u32)?;

        // Feed configuration
        let defaults = FeedConfig::default();
        let feed = FeedConfig {
            recent_cap: parse_var("FEED_RECENT_CAP", defaults.recent_cap)?,
            channel_capacity: parse_var("FEED_CHANNEL_CAPACITY", defaults.channel_capacity)?,
            notifications_limit: parse_var("NOTIFICATIONS_LIMIT", defaults.notifications_limit)?,
        };

        // App configuration
        let environment = env::var("APP_ENVIRONMENT")
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or_default();
        let name = env::var("APP_NAME")
            .unwrap_or_else(|_| "Disaster Management Training Tracker".to_string());

        Ok(Config {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: db_url,
                max_connections: Some(max_connections),
                min_connections: Some(min_connections),
            },
            feed,
            app: AppConfig { name, environment },
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            "development" => Ok(Environment::Development),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn init() -> Result<&'static Config> {
    CONFIG.get_or_try_init(Config::from_env)
}
