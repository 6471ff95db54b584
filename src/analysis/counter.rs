use crate::api::stats::{profile_matchups, MatchupData};
use crate::matchup::MatchupTable;
use crate::role::Role;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Scores a champion against the announced enemy picks, 0-100.
///
/// Each enemy contributes the champion's winrate in that matchup; enemies
/// with no recorded matchup count as a neutral 50. The average is then
/// stretched so that 45% maps to 0 and 55% to 100.
pub fn counter_score(matchups: Option<&MatchupData>, enemies: &[String]) -> f64 {
    if enemies.is_empty() {
        return 50.0;
    }
    let Some(data) = matchups else {
        return 50.0;
    };

    let mut winrates: HashMap<String, f64> = HashMap::new();
    for entry in data.counters.iter().chain(data.weak_against.iter()) {
        winrates
            .entry(entry.champion.to_lowercase())
            .or_insert(entry.winrate);
    }

    let total: f64 = enemies
        .iter()
        .map(|enemy| {
            winrates
                .get(&enemy.trim().to_lowercase())
                .copied()
                .unwrap_or(50.0)
        })
        .sum();
    let avg = total / enemies.len() as f64;

    ((avg - 45.0) * 10.0).clamp(0.0, 100.0)
}

/// Best answers to an enemy composition from the aggregated table: every
/// champion seen in `role`, ranked by counter score. Ties break on name so
/// the ranking is reproducible.
pub fn best_counters(
    table: &MatchupTable,
    role: Role,
    enemies: &[String],
    top_n: usize,
) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = table
        .profiles()
        .filter(|profile| profile.role == role)
        .map(|profile| {
            let data = profile_matchups(profile);
            let score = counter_score(Some(&data), enemies);
            (profile.champion.clone(), score)
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked.truncate(top_n);
    ranked
}
