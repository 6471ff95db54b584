use std::env;
use std::fs;
use std::path::PathBuf;

/// Default minimum games for a provider matchup entry to count as significant.
const DEFAULT_PROVIDER_MIN_GAMES: u32 = 100;
/// Default minimum games for a dataset matchup pair to survive aggregation.
const DEFAULT_DATASET_MIN_GAMES: u32 = 5;
const DEFAULT_CACHE_TTL_HOURS: i64 = 6;
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub region: String,
    pub data_dir: PathBuf,
    pub dataset_path: PathBuf,
    pub provider_min_games: u32,
    pub dataset_min_games: u32,
    pub cache_ttl_hours: i64,
    pub provider_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_key = env::var("RIOT_API_KEY").ok().filter(|k| !k.is_empty());
        let region = env::var("RIOT_REGION").unwrap_or_else(|_| "euw1".to_string());

        let data_dir = env::var("DRAFTWISE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".draftwise")
            });
        let _ = fs::create_dir_all(&data_dir);

        let dataset_path = env::var("DRAFTWISE_DATASET")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("master_dataset.csv"));

        Config {
            api_key,
            region,
            dataset_path,
            provider_min_games: env_number("PROVIDER_MIN_GAMES", DEFAULT_PROVIDER_MIN_GAMES),
            dataset_min_games: env_number("DATASET_MIN_GAMES", DEFAULT_DATASET_MIN_GAMES),
            cache_ttl_hours: env_number("CACHE_TTL_HOURS", DEFAULT_CACHE_TTL_HOURS),
            provider_timeout_secs: env_number(
                "PROVIDER_TIMEOUT_SECS",
                DEFAULT_PROVIDER_TIMEOUT_SECS,
            ),
            data_dir,
        }
    }

    pub fn matchup_cache_path(&self) -> PathBuf {
        self.data_dir.join("matchup_cache.json")
    }

    pub fn provider_cache_path(&self) -> PathBuf {
        self.data_dir.join("lolalytics_cache.json")
    }

    pub fn masteries_path(&self) -> PathBuf {
        self.data_dir.join("masteries.json")
    }
}

fn env_number<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
