use std::time::Duration;

const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_CACHE_CAPACITY: u64 = 32;
const DEFAULT_REFRESH_SECS: u64 = 60;

/// Runtime settings read from the environment.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
    pub refresh_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            cache_capacity: DEFAULT_CACHE_CAPACITY as usize,
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            cache_ttl: Duration::from_secs(env_u64(
                "MATCHDAY_CACHE_TTL_SECS",
                DEFAULT_CACHE_TTL_SECS,
            )),
            cache_capacity: env_u64("MATCHDAY_CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY) as usize,
            refresh_interval: Duration::from_secs(env_u64(
                "MATCHDAY_REFRESH_SECS",
                DEFAULT_REFRESH_SECS,
            )),
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    parse_u64(std::env::var(name).ok(), default)
}

fn parse_u64(value: Option<String>, default: u64) -> u64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
