use crate::role::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Composite (champion, role) key. Champion names are lowercased on
/// construction so lookups are case-insensitive without string concatenation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchupKey {
    pub champion: String,
    pub role: Role,
}

impl MatchupKey {
    pub fn new(champion: &str, role: Role) -> Self {
        MatchupKey {
            champion: champion.to_lowercase(),
            role,
        }
    }
}

/// One directed matchup observation: how the profile's subject fared against
/// this opposing (champion, role) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupRecord {
    pub champion: String,
    pub role: Role,
    pub games: u32,
    pub wins: u32,
    pub winrate: f64,
}

impl MatchupRecord {
    pub fn new(champion: &str, role: Role, games: u32, wins: u32) -> Self {
        let winrate = if games > 0 {
            round1(100.0 * wins as f64 / games as f64)
        } else {
            0.0
        };
        MatchupRecord {
            champion: champion.to_string(),
            role,
            games,
            wins,
            winrate,
        }
    }
}

/// Full matchup profile of one (champion, role): overall record plus every
/// significant opposing pair, sorted by sample size descending so the first
/// role-agnostic hit for an opponent is also the best-observed one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupProfile {
    pub champion: String,
    pub role: Role,
    pub games: u32,
    pub wins: u32,
    pub winrate: f64,
    pub vs: Vec<MatchupRecord>,
}

impl MatchupProfile {
    pub fn new(champion: &str, role: Role, games: u32, wins: u32, mut vs: Vec<MatchupRecord>) -> Self {
        vs.sort_by(|a, b| {
            b.games
                .cmp(&a.games)
                .then_with(|| a.champion.cmp(&b.champion))
                .then_with(|| a.role.as_str().cmp(b.role.as_str()))
        });
        let winrate = if games > 0 {
            round1(100.0 * wins as f64 / games as f64)
        } else {
            0.0
        };
        MatchupProfile {
            champion: champion.to_string(),
            role,
            games,
            wins,
            winrate,
            vs,
        }
    }

    pub fn key(&self) -> MatchupKey {
        MatchupKey::new(&self.champion, self.role)
    }

    /// Role-agnostic opponent lookup: any role the opponent was observed in,
    /// preferring the most-observed record.
    pub fn against(&self, enemy: &str) -> Option<&MatchupRecord> {
        let needle = enemy.to_lowercase();
        self.vs
            .iter()
            .find(|record| record.champion.to_lowercase() == needle)
    }

}

/// Aggregated champion-vs-champion winrate table. Built once from a dataset
/// pass (or loaded from the durable cache) and read-only afterwards; refresh
/// replaces the whole table through [`crate::matchup::MatchupStore`].
#[derive(Debug, Clone, Default)]
pub struct MatchupTable {
    profiles: HashMap<MatchupKey, MatchupProfile>,
    ban_counts: HashMap<String, u64>,
    total_games: u64,
}

impl MatchupTable {
    pub fn new() -> Self {
        MatchupTable::default()
    }

    pub fn insert(&mut self, profile: MatchupProfile) {
        self.profiles.insert(profile.key(), profile);
    }

    pub fn set_total_games(&mut self, total: u64) {
        self.total_games = total;
    }

    pub fn record_ban(&mut self, champion: &str) {
        *self.ban_counts.entry(champion.to_lowercase()).or_insert(0) += 1;
    }

    pub fn set_ban_counts(&mut self, counts: HashMap<String, u64>) {
        self.ban_counts = counts;
    }

    /// Exact (champion, role) lookup with a fallback to any role recorded for
    /// the champion; absence is `None`, callers substitute neutral defaults.
    pub fn lookup(&self, champion: &str, role: Role) -> Option<&MatchupProfile> {
        let key = MatchupKey::new(champion, role);
        if let Some(profile) = self.profiles.get(&key) {
            return Some(profile);
        }
        let mut fallback: Vec<&MatchupProfile> = self
            .profiles
            .iter()
            .filter(|(k, _)| k.champion == key.champion)
            .map(|(_, profile)| profile)
            .collect();
        fallback.sort_by(|a, b| {
            b.games
                .cmp(&a.games)
                .then_with(|| a.role.as_str().cmp(b.role.as_str()))
        });
        fallback.into_iter().next()
    }

    pub fn profiles(&self) -> impl Iterator<Item = &MatchupProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn total_games(&self) -> u64 {
        self.total_games
    }

    pub fn ban_count(&self, champion: &str) -> u64 {
        self.ban_counts
            .get(&champion.to_lowercase())
            .copied()
            .unwrap_or(0)
    }

    pub fn ban_counts(&self) -> &HashMap<String, u64> {
        &self.ban_counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> MatchupTable {
        let mut table = MatchupTable::new();
        table.insert(MatchupProfile::new(
            "Aatrox",
            Role::Top,
            40,
            22,
            vec![
                MatchupRecord::new("Gnar", Role::Top, 12, 7),
                MatchupRecord::new("Rumble", Role::Top, 8, 3),
            ],
        ));
        table.insert(MatchupProfile::new(
            "Aatrox",
            Role::Mid,
            6,
            2,
            vec![MatchupRecord::new("Ahri", Role::Mid, 6, 2)],
        ));
        table.set_total_games(46);
        table
    }

    #[test]
    fn exact_lookup_prefers_requested_role() {
        let table = sample_table();
        let profile = table.lookup("Aatrox", Role::Mid).unwrap();
        assert_eq!(profile.role, Role::Mid);
        assert_eq!(profile.games, 6);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let table = sample_table();
        assert!(table.lookup("aatrox", Role::Top).is_some());
        assert!(table.lookup("AATROX", Role::Top).is_some());
    }

    #[test]
    fn missing_role_falls_back_to_most_observed() {
        let table = sample_table();
        let profile = table.lookup("Aatrox", Role::Support).unwrap();
        assert_eq!(profile.role, Role::Top);
    }

    #[test]
    fn unknown_champion_is_absent_not_error() {
        let table = sample_table();
        assert!(table.lookup("Zilean", Role::Mid).is_none());
    }

    #[test]
    fn winrate_is_rounded_to_one_decimal() {
        let record = MatchupRecord::new("Gnar", Role::Top, 3, 1);
        assert_eq!(record.winrate, 33.3);
        let profile = MatchupProfile::new("Aatrox", Role::Top, 3, 2, vec![]);
        assert_eq!(profile.winrate, 66.7);
    }

    #[test]
    fn profile_vs_is_sorted_by_sample_size() {
        let profile = MatchupProfile::new(
            "Aatrox",
            Role::Top,
            20,
            10,
            vec![
                MatchupRecord::new("Rumble", Role::Top, 5, 2),
                MatchupRecord::new("Gnar", Role::Top, 15, 8),
            ],
        );
        assert_eq!(profile.vs[0].champion, "Gnar");
        assert_eq!(profile.against("gnar").unwrap().games, 15);
    }

    #[test]
    fn role_agnostic_enemy_match_prefers_best_observed() {
        let profile = MatchupProfile::new(
            "Aatrox",
            Role::Top,
            30,
            15,
            vec![
                MatchupRecord::new("Pantheon", Role::Support, 4, 1),
                MatchupRecord::new("Pantheon", Role::Top, 20, 11),
            ],
        );
        let record = profile.against("Pantheon").unwrap();
        assert_eq!(record.role, Role::Top);
        assert_eq!(record.games, 20);
    }
}
