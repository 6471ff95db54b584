use crate::api::models::MasteryDto;
use crate::champions::ChampionRegistry;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// One champion-proficiency row. The engine only ever reads these; refresh
/// happens through the Riot collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasteryRecord {
    pub champion_id: i32,
    pub champion_name: String,
    pub champion_level: u32,
    pub champion_points: u64,
    #[serde(default)]
    pub last_play_time: Option<i64>,
}

impl MasteryRecord {
    pub fn from_dto(dto: &MasteryDto, registry: &ChampionRegistry) -> Self {
        MasteryRecord {
            champion_id: dto.champion_id,
            champion_name: registry.name_of(dto.champion_id),
            champion_level: dto.champion_level,
            champion_points: dto.champion_points,
            last_play_time: dto.last_play_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerMasteries {
    pub puuid: String,
    pub masteries: Vec<MasteryRecord>,
    pub updated_at: DateTime<Utc>,
}

/// JSON-file store of mastery snapshots keyed by riot id (lowercased).
/// Last write wins; a whole-file rewrite is the only granularity.
#[derive(Debug)]
pub struct MasteryStore {
    path: PathBuf,
    players: HashMap<String, PlayerMasteries>,
}

impl MasteryStore {
    /// Missing or unreadable files start an empty store.
    pub fn load(path: PathBuf) -> Self {
        let players = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => HashMap::new(),
        };
        MasteryStore { path, players }
    }

    pub fn save(&self) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let json = serde_json::to_string_pretty(&self.players)
            .map_err(|e| AppError::JsonError(format!("Failed to serialize masteries: {}", e)))?;
        fs::write(&self.path, json)
            .map_err(|e| AppError::IoError(format!("Failed to write masteries: {}", e)))?;
        Ok(())
    }

    fn key(riot_id: &str) -> String {
        riot_id.trim().to_lowercase()
    }

    pub fn upsert(&mut self, riot_id: &str, puuid: String, masteries: Vec<MasteryRecord>) {
        self.players.insert(
            Self::key(riot_id),
            PlayerMasteries {
                puuid,
                masteries,
                updated_at: Utc::now(),
            },
        );
    }

    pub fn get(&self, riot_id: &str) -> Option<&PlayerMasteries> {
        self.players.get(&Self::key(riot_id))
    }

    pub fn masteries(&self, riot_id: &str) -> Result<&[MasteryRecord], AppError> {
        self.get(riot_id)
            .map(|p| p.masteries.as_slice())
            .ok_or_else(|| AppError::MasteriesNotFound(riot_id.to_string()))
    }

    /// Top N records by points, highest first.
    pub fn top(&self, riot_id: &str, n: usize) -> Result<Vec<MasteryRecord>, AppError> {
        let mut records = self.masteries(riot_id)?.to_vec();
        records.sort_by(|a, b| b.champion_points.cmp(&a.champion_points));
        records.truncate(n);
        Ok(records)
    }
}
