use crate::error::AppError;
use crate::matchup::table::{MatchupKey, MatchupProfile, MatchupRecord, MatchupTable};
use crate::role::Role;
use indicatif::ProgressBar;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

// Seasonal freshness rule: prefer current-season rows, widen the cutoff when
// the dataset has none instead of failing.
const SEASON_CUTOFF: i32 = 2026;
const FALLBACK_SEASON_CUTOFF: i32 = 2024;

/// One team row of the processed pro-play dataset (Oracle's Elixir shape):
/// five picks encoded `"Champion.role"`, five plain ban names, a 0/1 result.
/// The `position` column is dropped by the preprocessing step; when it is
/// still present only `"team"` rows are aggregated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamRow {
    #[serde(default)]
    pub gameid: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub side: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub ban1: Option<String>,
    #[serde(default)]
    pub ban2: Option<String>,
    #[serde(default)]
    pub ban3: Option<String>,
    #[serde(default)]
    pub ban4: Option<String>,
    #[serde(default)]
    pub ban5: Option<String>,
    #[serde(default)]
    pub pick1: Option<String>,
    #[serde(default)]
    pub pick2: Option<String>,
    #[serde(default)]
    pub pick3: Option<String>,
    #[serde(default)]
    pub pick4: Option<String>,
    #[serde(default)]
    pub pick5: Option<String>,
    #[serde(default)]
    pub result: Option<f64>,
}

impl TeamRow {
    fn year(&self) -> Option<i32> {
        self.date.get(0..4).and_then(|y| y.parse().ok())
    }

    fn won(&self) -> bool {
        self.result == Some(1.0)
    }

    /// Decoded picks; entries without the `.role` suffix are skipped.
    fn picks(&self) -> Vec<(String, Role)> {
        [
            &self.pick1,
            &self.pick2,
            &self.pick3,
            &self.pick4,
            &self.pick5,
        ]
        .into_iter()
        .flatten()
        .filter_map(|pick| {
            let (name, role) = pick.split_once('.')?;
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), Role::normalize(role)))
        })
        .collect()
    }

    fn bans(&self) -> impl Iterator<Item = &str> {
        [&self.ban1, &self.ban2, &self.ban3, &self.ban4, &self.ban5]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .filter(|ban| !ban.is_empty())
    }
}

struct OpponentAcc {
    display: String,
    games: u32,
    wins: u32,
}

struct SubjectAcc {
    display: String,
    games: u32,
    wins: u32,
    vs: HashMap<MatchupKey, OpponentAcc>,
}

/// Read the dataset CSV. Malformed rows are skipped with a warning rather
/// than aborting a multi-million-row pass.
pub fn load_rows(path: &Path) -> Result<Vec<TeamRow>, AppError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| AppError::DatasetError(format!("cannot open {}: {}", path.display(), e)))?;

    let mut rows = Vec::new();
    let mut skipped = 0u64;
    for record in reader.deserialize() {
        match record {
            Ok(row) => rows.push(row),
            Err(e) => {
                if skipped == 0 {
                    warn!("skipping malformed dataset row: {}", e);
                }
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        warn!(skipped, "dataset rows skipped");
    }
    Ok(rows)
}

pub fn build_from_csv(path: &Path, min_games: u32) -> Result<MatchupTable, AppError> {
    let rows = load_rows(path)?;
    info!(rows = rows.len(), path = %path.display(), "dataset loaded");
    Ok(build_from_rows(&rows, min_games))
}

/// Aggregate team rows into a champion-vs-champion table. Every game
/// contributes both perspectives per pick pair, with the win flag inverted
/// for the losing side. Pairs below `min_games` are dropped after the pass;
/// subject profiles are kept even when all of their pairs fall below it.
pub fn build_from_rows(rows: &[TeamRow], min_games: u32) -> MatchupTable {
    let mut selected: Vec<&TeamRow> = season_rows(rows, SEASON_CUTOFF);
    if selected.is_empty() {
        debug!(
            "no rows dated {} or later, widening cutoff to {}",
            SEASON_CUTOFF, FALLBACK_SEASON_CUTOFF
        );
        selected = season_rows(rows, FALLBACK_SEASON_CUTOFF);
    }

    let mut games: HashMap<&str, Vec<&TeamRow>> = HashMap::new();
    for row in selected {
        if row.gameid.is_empty() {
            continue;
        }
        games.entry(row.gameid.as_str()).or_default().push(row);
    }

    let pb = ProgressBar::new(games.len() as u64);
    pb.set_message("Aggregating matchups");

    let mut table = MatchupTable::new();
    let mut subjects: HashMap<MatchupKey, SubjectAcc> = HashMap::new();
    let mut total_games: u64 = 0;

    for rows in games.values() {
        pb.inc(1);
        // a usable game is exactly one row per side
        if rows.len() != 2 {
            continue;
        }
        let (first, second) = (rows[0], rows[1]);
        let first_picks = first.picks();
        let second_picks = second.picks();
        let first_won = first.won();

        total_games += 1;
        for ban in first.bans().chain(second.bans()) {
            table.record_ban(ban);
        }

        record_team(&mut subjects, &first_picks, &second_picks, first_won);
        record_team(&mut subjects, &second_picks, &first_picks, !first_won);
    }

    for (key, acc) in subjects {
        let vs: Vec<MatchupRecord> = acc
            .vs
            .into_iter()
            .filter(|(_, opponent)| opponent.games >= min_games)
            .map(|(vs_key, opponent)| {
                MatchupRecord::new(&opponent.display, vs_key.role, opponent.games, opponent.wins)
            })
            .collect();
        table.insert(MatchupProfile::new(
            &acc.display,
            key.role,
            acc.games,
            acc.wins,
            vs,
        ));
    }
    table.set_total_games(total_games);

    pb.finish_with_message("✓ Matchup table built");
    info!(
        profiles = table.len(),
        games = total_games,
        "matchup aggregation complete"
    );
    table
}

fn season_rows(rows: &[TeamRow], cutoff: i32) -> Vec<&TeamRow> {
    rows.iter()
        .filter(|row| row.year().map_or(false, |year| year >= cutoff))
        .filter(|row| row.position.as_deref().map_or(true, |p| p == "team"))
        .collect()
}

fn record_team(
    subjects: &mut HashMap<MatchupKey, SubjectAcc>,
    own: &[(String, Role)],
    opposing: &[(String, Role)],
    won: bool,
) {
    for (own_name, own_role) in own {
        let key = MatchupKey::new(own_name, *own_role);
        let acc = subjects.entry(key).or_insert_with(|| SubjectAcc {
            display: own_name.clone(),
            games: 0,
            wins: 0,
            vs: HashMap::new(),
        });
        acc.games += 1;
        if won {
            acc.wins += 1;
        }
        for (opp_name, opp_role) in opposing {
            let vs_key = MatchupKey::new(opp_name, *opp_role);
            let opponent = acc.vs.entry(vs_key).or_insert_with(|| OpponentAcc {
                display: opp_name.clone(),
                games: 0,
                wins: 0,
            });
            opponent.games += 1;
            if won {
                opponent.wins += 1;
            }
        }
    }
}
