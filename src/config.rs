use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://fantasy.premierleague.com/api";
pub const DEFAULT_PHOTO_URL: &str =
    "https://resources.premierleague.com/premierleague/photos/players/110x140";

const MAX_BACKOFF_MS: u64 = 8_000;

/// Runtime settings. Built from the environment, then overridden by CLI flags.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub photo_url: String,
    pub fetch: FetchConfig,
    pub output_dir: PathBuf,
    pub season_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub parallelism: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per request, including the first one.
    pub attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Delay to sleep after the given failed attempt (1-based). Doubles each time.
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        let delay = self.initial_backoff.saturating_mul(1u32 << shift);
        delay.min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_millis(MAX_BACKOFF_MS),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
            parallelism: 6,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            photo_url: DEFAULT_PHOTO_URL.to_string(),
            fetch: FetchConfig::default(),
            output_dir: PathBuf::from("."),
            season_file: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_string)
    }

    /// Build from any key lookup; unset or unparsable keys keep the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse = |key: &str| lookup(key).and_then(|val| val.trim().parse::<u64>().ok());
        let defaults = Self::default();
        let timeout_secs = parse("REQUEST_TIMEOUT_SECS")
            .unwrap_or(defaults.fetch.timeout.as_secs())
            .clamp(1, 120);
        let attempts = parse("FETCH_RETRIES")
            .and_then(|val| u32::try_from(val).ok())
            .unwrap_or(defaults.fetch.retry.attempts)
            .clamp(1, 10);
        let backoff_ms = parse("RETRY_BACKOFF_MS")
            .unwrap_or(defaults.fetch.retry.initial_backoff.as_millis() as u64)
            .min(MAX_BACKOFF_MS);
        let parallelism = parse("FETCH_PARALLELISM")
            .and_then(|val| usize::try_from(val).ok())
            .unwrap_or(defaults.fetch.parallelism)
            .clamp(1, 32);

        Self {
            base_url: lookup("FPL_BASE_URL").unwrap_or(defaults.base_url),
            photo_url: lookup("FPL_PHOTO_URL").unwrap_or(defaults.photo_url),
            fetch: FetchConfig {
                timeout: Duration::from_secs(timeout_secs),
                retry: RetryPolicy {
                    attempts,
                    initial_backoff: Duration::from_millis(backoff_ms),
                    max_backoff: defaults.fetch.retry.max_backoff,
                },
                parallelism,
            },
            output_dir: lookup("FPL_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            season_file: lookup("FPL_SEASON_FILE").map(PathBuf::from),
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
