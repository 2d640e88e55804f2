use crate::error::{ConsoleError, Result};
use log::info;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_SERVER: &str = "http://localhost:5000";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: Url,
    pub poll_interval: Duration,
    pub recent_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = lookup("CONSOLE_SERVER").unwrap_or_else(|| DEFAULT_SERVER.to_string());
        let interval_ms = parse_var(&lookup, "POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)?;
        Ok(Config {
            server: parse_server(&server)?,
            poll_interval: interval(interval_ms)?,
            recent_limit: parse_var(&lookup, "RECENT_LIMIT", DEFAULT_RECENT_LIMIT)?,
        })
    }

    pub fn with_server(mut self, server: &str) -> Result<Self> {
        self.server = parse_server(server)?;
        Ok(self)
    }

    pub fn with_poll_interval_ms(mut self, ms: u64) -> Result<Self> {
        self.poll_interval = interval(ms)?;
        Ok(self)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConsoleError::Config(format!("{} has invalid value '{}'", key, raw))),
        None => {
            info!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}

fn parse_server(raw: &str) -> Result<Url> {
    // Relative joins drop the last path segment unless it ends in '/'.
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&normalized).map_err(|e| ConsoleError::InvalidUrl(raw.to_string(), e))
}

fn interval(ms: u64) -> Result<Duration> {
    if ms == 0 {
        return Err(ConsoleError::Config(
            "poll interval must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_millis(ms))
}
