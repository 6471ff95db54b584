use crate::config::Config;
use crate::error::AppError;
use crate::matchup::dataset;
use crate::matchup::table::{MatchupProfile, MatchupTable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

/// Durable form of the table. Profiles embed their own key fields so the
/// cache stays a flat JSON array rather than a struct-keyed map.
#[derive(Debug, Serialize, Deserialize)]
struct TableCacheFile {
    built_at: DateTime<Utc>,
    total_games: u64,
    #[serde(default)]
    ban_counts: HashMap<String, u64>,
    profiles: Vec<MatchupProfile>,
}

struct Snapshot {
    table: Arc<MatchupTable>,
    built_at: Option<DateTime<Utc>>,
}

/// Process-wide holder of the current matchup table. Readers clone the Arc;
/// a rebuild installs a fresh table in one swap, so concurrent readers see
/// either the old or the new table, never a partial one.
pub struct MatchupStore {
    cache_path: PathBuf,
    ttl_hours: i64,
    state: RwLock<Snapshot>,
}

impl MatchupStore {
    pub fn new(cache_path: PathBuf, ttl_hours: i64) -> Self {
        MatchupStore {
            cache_path,
            ttl_hours,
            state: RwLock::new(Snapshot {
                table: Arc::new(MatchupTable::new()),
                built_at: None,
            }),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        MatchupStore::new(config.matchup_cache_path(), config.cache_ttl_hours)
    }

    pub fn snapshot(&self) -> Arc<MatchupTable> {
        let guard = self
            .state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard.table)
    }

    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        let guard = self
            .state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.built_at
    }

    /// Swap in a freshly built table, stamped now.
    pub fn install(&self, table: MatchupTable) {
        self.swap(table, Utc::now());
    }

    fn swap(&self, table: MatchupTable, built_at: DateTime<Utc>) {
        let mut guard = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.table = Arc::new(table);
        guard.built_at = Some(built_at);
    }

    pub fn is_stale(&self) -> bool {
        match self.built_at() {
            None => true,
            Some(built_at) => {
                let age = Utc::now().signed_duration_since(built_at);
                age.num_minutes() > self.ttl_hours * 60
            }
        }
    }

    /// Load the durable cache if present. `Ok(false)` means no cache file;
    /// a corrupt file is an error so the caller can decide to rebuild.
    pub fn load_cache(&self) -> Result<bool, AppError> {
        let content = match fs::read_to_string(&self.cache_path) {
            Ok(content) => content,
            Err(_) => return Ok(false),
        };
        let file: TableCacheFile = serde_json::from_str(&content)
            .map_err(|e| AppError::JsonError(format!("Failed to parse matchup cache: {}", e)))?;

        let mut table = MatchupTable::new();
        for profile in file.profiles {
            table.insert(profile);
        }
        table.set_total_games(file.total_games);
        table.set_ban_counts(file.ban_counts);
        info!(
            profiles = table.len(),
            built_at = %file.built_at,
            "matchup table loaded from cache"
        );
        self.swap(table, file.built_at);
        Ok(true)
    }

    /// Persist the current snapshot. Compact JSON, the table can hold tens of
    /// thousands of records.
    pub fn save_cache(&self) -> Result<(), AppError> {
        let (table, built_at) = {
            let guard = self
                .state
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            (Arc::clone(&guard.table), guard.built_at)
        };
        let file = TableCacheFile {
            built_at: built_at.unwrap_or_else(Utc::now),
            total_games: table.total_games(),
            ban_counts: table.ban_counts().clone(),
            profiles: table.profiles().cloned().collect(),
        };
        if let Some(parent) = self.cache_path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let json = serde_json::to_string(&file)
            .map_err(|e| AppError::JsonError(format!("Failed to serialize matchup cache: {}", e)))?;
        fs::write(&self.cache_path, json)
            .map_err(|e| AppError::IoError(format!("Failed to write matchup cache: {}", e)))?;
        Ok(())
    }

    /// Cache-first startup path: use the durable cache when fresh within the
    /// TTL, otherwise rebuild from the dataset and rewrite the cache. A
    /// rebuild failure falls back to a stale cached table instead of leaving
    /// the process with nothing.
    pub fn load_or_build(
        &self,
        dataset_path: &Path,
        min_games: u32,
        force: bool,
    ) -> Result<Arc<MatchupTable>, AppError> {
        let mut have_cache = false;
        if !force {
            match self.load_cache() {
                Ok(found) => have_cache = found,
                Err(e) => warn!("ignoring unreadable matchup cache: {}", e),
            }
            if have_cache && !self.is_stale() {
                return Ok(self.snapshot());
            }
        }

        match dataset::build_from_csv(dataset_path, min_games) {
            Ok(table) => {
                self.install(table);
                if let Err(e) = self.save_cache() {
                    warn!("could not persist matchup cache: {}", e);
                }
                Ok(self.snapshot())
            }
            Err(e) if have_cache => {
                warn!("rebuild failed, serving stale matchup table: {}", e);
                Ok(self.snapshot())
            }
            Err(e) => Err(e),
        }
    }
}
