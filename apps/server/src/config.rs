use std::str::FromStr;
use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use chrono_tz::Tz;
use youinc_core::constants::{DECAY_WAKE_GRACE_MS, DEFAULT_ACCOUNT_ID};
use youinc_core::utils::time_utils::DEFAULT_MARKET_TZ;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub account_id: String,
    pub market_tz: Tz,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub decay_grace: Duration,
    pub decay_scheduler: bool,
}

impl Config {
    /// Reads the configuration from `YOUINC_*` variables. `main` loads `.env` beforehand.
    ///
    /// Only an unparsable listen address is fatal; other bad values fall back
    /// to their defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let listen_addr: SocketAddr = std::env::var("YOUINC_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid YOUINC_LISTEN_ADDR")?;
        let db_path = std::env::var("YOUINC_DB_PATH").unwrap_or_else(|_| "./db/youinc.db".into());
        let account_id = std::env::var("YOUINC_ACCOUNT_ID")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_ACCOUNT_ID.to_string());
        let market_tz = parse_or_default("YOUINC_MARKET_TZ", DEFAULT_MARKET_TZ);
        let cors_allow = std::env::var("YOUINC_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = parse_or_default("YOUINC_REQUEST_TIMEOUT_MS", 30_000);
        let grace_ms: u64 = parse_or_default("YOUINC_DECAY_GRACE_MS", DECAY_WAKE_GRACE_MS);
        let decay_scheduler = parse_or_default("YOUINC_DECAY_SCHEDULER", true);

        Ok(Self {
            listen_addr,
            db_path,
            account_id,
            market_tz,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            decay_grace: Duration::from_millis(grace_ms),
            decay_scheduler,
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
