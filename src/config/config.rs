use dotenv::dotenv;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::env;

pub struct Config {
    pub port: u16,
    pub log_level: String,
    /// Upper bound accepted for any single expense or payment amount.
    pub max_amount: Decimal,
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("max_amount", &self.max_amount.to_string())
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();

        Self {
            port: env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(3000),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            max_amount: env::var("MAX_AMOUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| Decimal::from(1_000_000)),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
