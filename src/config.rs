use std::env;
use std::time::Duration;

pub const DEFAULT_LEAGUE_ID: u32 = 854;
pub const DEFAULT_API_BASE: &str = "https://fantasy.premierleague.com/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub league_id: u32,
    pub api_base: String,
    pub http_timeout: Duration,
    pub fetch_parallelism: usize,
    pub http_cache: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup so tests don't have to touch the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let league_id = lookup("FPL_LEAGUE_ID")
            .and_then(|val| val.trim().parse::<u32>().ok())
            .filter(|id| *id > 0)
            .unwrap_or(DEFAULT_LEAGUE_ID);
        let api_base = lookup("FPL_API_BASE")
            .map(|val| val.trim().trim_end_matches('/').to_string())
            .filter(|val| !val.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let http_timeout = Duration::from_secs(
            lookup("HTTP_TIMEOUT_SECS")
                .and_then(|val| val.trim().parse::<u64>().ok())
                .unwrap_or(10)
                .clamp(2, 120),
        );
        let fetch_parallelism = lookup("FETCH_PARALLELISM")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(6)
            .clamp(2, 32);
        let http_cache = lookup("FPL_HTTP_CACHE")
            .map(|val| {
                !matches!(
                    val.trim().to_ascii_lowercase().as_str(),
                    "0" | "false" | "off" | "no"
                )
            })
            .unwrap_or(true);

        Self {
            league_id,
            api_base,
            http_timeout,
            fetch_parallelism,
            http_cache,
        }
    }
}
