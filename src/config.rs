//! Relay configuration parsed from environment variables.

use std::time::Duration;

pub const DEFAULT_SIGNALING_PORT: u16 = 4000;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_SINK_TIMEOUT_MS: u64 = 3000;
pub const DEFAULT_WAIT_MINUTES: u32 = 5;
pub const DEFAULT_PEER_QUEUE_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub bind_addr: String,
    pub port: u16,
    /// `None` disables the handover sink; boundary calls fall back to defaults.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub sink_timeout: Duration,
    pub default_wait_minutes: u32,
    /// `None` leaves rooms unbounded.
    pub room_capacity: Option<usize>,
    pub peer_queue_capacity: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_SIGNALING_PORT,
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            sink_timeout: Duration::from_millis(DEFAULT_SINK_TIMEOUT_MS),
            default_wait_minutes: DEFAULT_WAIT_MINUTES,
            room_capacity: None,
            peer_queue_capacity: DEFAULT_PEER_QUEUE_CAPACITY,
        }
    }
}

impl RelayConfig {
    /// Build typed config from environment variables.
    ///
    /// - `SIGNALING_PORT` (falls back to `PORT`): default 4000
    /// - `BIND_ADDR`: default `0.0.0.0`
    /// - `DATABASE_URL`: optional
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `SINK_TIMEOUT_MS`: default 3000
    /// - `DEFAULT_WAIT_MINUTES`: default 5
    /// - `ROOM_CAPACITY`: optional, `0` or unset means unbounded
    /// - `PEER_QUEUE_CAPACITY`: default 256
    #[must_use]
    pub fn from_env() -> Self {
        let port = env_parse("SIGNALING_PORT", env_parse("PORT", DEFAULT_SIGNALING_PORT));
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let room_capacity = match env_parse("ROOM_CAPACITY", 0_usize) {
            0 => None,
            n => Some(n),
        };

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            port,
            database_url,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            sink_timeout: Duration::from_millis(env_parse("SINK_TIMEOUT_MS", DEFAULT_SINK_TIMEOUT_MS)),
            default_wait_minutes: env_parse("DEFAULT_WAIT_MINUTES", DEFAULT_WAIT_MINUTES),
            room_capacity,
            peer_queue_capacity: env_parse("PEER_QUEUE_CAPACITY", DEFAULT_PEER_QUEUE_CAPACITY).max(1),
        }
    }

    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
