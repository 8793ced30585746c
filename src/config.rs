use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Which broker carries email jobs from the service to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueBackend {
    /// In-process channel; the server runs the worker itself.
    Memory,
    Redis,
}

/// How the worker delivers mail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailBackend {
    /// Log the message and report success.
    Log,
    Smtp,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub queue_backend: QueueBackend,
    pub redis_url: String,
    pub queue_name: String,
    pub mail_backend: MailBackend,
    pub smtp: SmtpConfig,
    pub worker_poll_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let queue_backend = match var_or("QUEUE_BACKEND", "memory").as_str() {
            "memory" => QueueBackend::Memory,
            "redis" => QueueBackend::Redis,
            other => {
                return Err(ConfigError::Invalid {
                    name: "QUEUE_BACKEND",
                    value: other.to_string(),
                })
            }
        };
        let mail_backend = match var_or("MAIL_BACKEND", "log").as_str() {
            "log" => MailBackend::Log,
            "smtp" => MailBackend::Smtp,
            other => {
                return Err(ConfigError::Invalid {
                    name: "MAIL_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            database_url: var_or("DATABASE_URL", "sqlite://rentdesk.db"),
            server_port: parse_var("SERVER_PORT", 8080)?,
            server_host: var_or("SERVER_HOST", "127.0.0.1"),
            jwt_secret: env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?,
            token_ttl_hours: parse_var("TOKEN_TTL_HOURS", 24)?,
            bcrypt_cost: parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            queue_backend,
            redis_url: var_or("REDIS_URL", "redis://127.0.0.1:6379/0"),
            queue_name: var_or("QUEUE_NAME", "rentdesk:email"),
            mail_backend,
            smtp: SmtpConfig {
                host: var_or("SMTP_HOST", "localhost"),
                port: parse_var("SMTP_PORT", 1025)?,
                username: env::var("SMTP_USERNAME").ok(),
                password: env::var("SMTP_PASSWORD").ok(),
                from_address: var_or("MAIL_FROM", "noreply@rentdesk.local"),
            },
            worker_poll_interval: Duration::from_millis(parse_var("WORKER_POLL_INTERVAL_MS", 500)?),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
