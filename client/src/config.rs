//! Client configuration
use std::env;
use std::time::Duration;

/// Public PokeAPI root
pub const POKEAPI_URL: &str = "https://pokeapi.co/api/v2";

/// How the data source retries transient failures
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one (at least 1)
    pub max_attempts: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Never retry
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay to wait after `delay`, capped at `max_delay`
    pub fn next_delay(&self, delay: Duration) -> Duration {
        Duration::from_secs_f64(delay.as_secs_f64() * self.backoff_multiplier).min(self.max_delay)
    }
}

/// Arena client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaConfig {
    /// Root of the species API, without trailing slash
    pub api_url: String,

    pub request_timeout: Duration,

    /// Random opponents are drawn from dex ids `1..=max_species_id`
    pub max_species_id: u32,

    pub retry: RetryPolicy,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            api_url: POKEAPI_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            max_species_id: 151,
            retry: RetryPolicy::default(),
        }
    }
}

impl ArenaConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `POKEARENA_API_URL` - species API root (default: PokeAPI v2)
    /// - `POKEARENA_TIMEOUT_SECS` - per-request timeout (default: 10)
    /// - `POKEARENA_MAX_SPECIES_ID` - highest dex id for random opponents (default: 151)
    /// - `POKEARENA_RETRY_ATTEMPTS` - total fetch attempts (default: 3)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("POKEARENA_API_URL")
            && !url.trim().is_empty()
        {
            config.api_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(secs) = read_env::<u64>("POKEARENA_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs.max(1));
        }

        if let Some(max) = read_env::<u32>("POKEARENA_MAX_SPECIES_ID") {
            config.max_species_id = max.max(1);
        }

        if let Some(attempts) = read_env::<usize>("POKEARENA_RETRY_ATTEMPTS") {
            config.retry.max_attempts = attempts.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
