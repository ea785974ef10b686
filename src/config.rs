// src/config.rs

use std::env;
use std::str::FromStr;

use dotenvy::dotenv;

/// Per-question time budget the client countdown starts from.
/// Used to derive "time used" from the reported time remaining.
pub const DEFAULT_QUESTION_TIME_LIMIT_SECS: i64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub log_dir: String,
    pub cors_origins: Vec<String>,
    pub question_time_limit_secs: i64,
    pub seed_demo_scores: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            rust_log: "info".to_string(),
            log_dir: "logs".to_string(),
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            question_time_limit_secs: DEFAULT_QUESTION_TIME_LIMIT_SECS,
            seed_demo_scores: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port),
            rust_log: env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            log_dir: env::var("LOG_DIR").unwrap_or(defaults.log_dir),
            cors_origins,
            question_time_limit_secs: parse_var(
                "QUESTION_TIME_LIMIT_SECS",
                defaults.question_time_limit_secs,
            ),
            seed_demo_scores: parse_var("SEED_DEMO_SCORES", defaults.seed_demo_scores),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Reads and parses an env var, keeping `default` when it is unset or malformed.
fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid value for {}: {:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}
