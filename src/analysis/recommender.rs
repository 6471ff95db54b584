use crate::analysis::blind::blindpick_score;
use crate::analysis::counter::counter_score;
use crate::analysis::tier::Tier;
use crate::api::stats::StatsProvider;
use crate::mastery::MasteryRecord;
use crate::role::Role;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

/// Only the player's top champions are worth scoring; past this depth the
/// proficiency signal is noise.
const CANDIDATE_CAP: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendMode {
    Balanced,
    Counter,
    Blind,
    Comfort,
}

impl RecommendMode {
    /// Tolerant parse: anything unrecognized falls back to balanced.
    pub fn parse(value: &str) -> RecommendMode {
        match value.trim().to_lowercase().as_str() {
            "counter" => RecommendMode::Counter,
            "blind" => RecommendMode::Blind,
            "comfort" => RecommendMode::Comfort,
            _ => RecommendMode::Balanced,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendMode::Balanced => "balanced",
            RecommendMode::Counter => "counter",
            RecommendMode::Blind => "blind",
            RecommendMode::Comfort => "comfort",
        }
    }
}

impl fmt::Display for RecommendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How much each signal weighs in the final score. Always sums to 1.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub mastery: f64,
    pub meta: f64,
    pub counter: f64,
}

impl ScoreWeights {
    /// Counter mode only makes sense once enemies are known; without them it
    /// degrades to the balanced profile.
    pub fn for_mode(mode: RecommendMode, has_enemies: bool) -> ScoreWeights {
        match mode {
            RecommendMode::Counter if has_enemies => ScoreWeights {
                mastery: 0.15,
                meta: 0.20,
                counter: 0.65,
            },
            RecommendMode::Blind => ScoreWeights {
                mastery: 0.25,
                meta: 0.45,
                counter: 0.30,
            },
            RecommendMode::Comfort => ScoreWeights {
                mastery: 0.55,
                meta: 0.25,
                counter: 0.20,
            },
            _ => ScoreWeights {
                mastery: 0.25,
                meta: 0.30,
                counter: 0.45,
            },
        }
    }
}

/// What is already locked or removed from the draft.
#[derive(Debug, Clone, Default)]
pub struct DraftContext {
    pub enemies: Vec<String>,
    pub allies: Vec<String>,
    pub bans: Vec<String>,
}

impl DraftContext {
    /// Champions that cannot be recommended: banned, or already picked on
    /// either team.
    pub fn exclusions(&self) -> HashSet<String> {
        self.bans
            .iter()
            .chain(self.allies.iter())
            .chain(self.enemies.iter())
            .map(|name| name.trim().to_lowercase())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct RecommendOptions {
    pub role: Role,
    pub mode: RecommendMode,
    pub top_n: usize,
    /// Percent floor below which a champion is too fringe to recommend.
    pub min_pickrate: f64,
    pub context: DraftContext,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        RecommendOptions {
            role: Role::Unknown,
            mode: RecommendMode::Balanced,
            top_n: 5,
            min_pickrate: 0.5,
            context: DraftContext::default(),
        }
    }
}

/// One recommendation, fully scored and explained.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredPick {
    pub champion: String,
    pub role: Role,
    pub score: f64,
    pub winrate: f64,
    pub pickrate: f64,
    pub tier: Tier,
    pub mastery_level: u32,
    pub mastery_points: u64,
    pub counter_score: f64,
    pub blindpick_score: Option<f64>,
    pub games_in_meta: u64,
    pub reason: String,
    pub mode: RecommendMode,
}

/// Blends proficiency, meta strength and draft fit into one ranking over the
/// player's champion pool.
pub struct RecommendationEngine<'a, P: StatsProvider + ?Sized> {
    provider: &'a P,
}

impl<'a, P: StatsProvider + ?Sized> RecommendationEngine<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        RecommendationEngine { provider }
    }

    pub fn recommend(
        &self,
        masteries: &[MasteryRecord],
        options: &RecommendOptions,
    ) -> Vec<ScoredPick> {
        if masteries.is_empty() || options.role == Role::Unknown {
            return Vec::new();
        }

        let enemies = &options.context.enemies;
        let weights = ScoreWeights::for_mode(options.mode, !enemies.is_empty());
        let excluded = options.context.exclusions();

        let candidates = &masteries[..masteries.len().min(CANDIDATE_CAP)];
        let max_points = candidates
            .iter()
            .map(|m| m.champion_points)
            .max()
            .unwrap_or(1)
            .max(1);

        let mut picks = Vec::new();
        for record in candidates {
            if excluded.contains(&record.champion_name.to_lowercase()) {
                continue;
            }

            let meta = self
                .provider
                .champion_stats(&record.champion_name, options.role);
            if meta.pickrate < options.min_pickrate {
                continue;
            }

            let meta_score = ((meta.winrate - 45.0) / 15.0).clamp(0.0, 1.0);
            let tier = Tier::classify(meta.winrate);

            let mut mastery_score = 0.0;
            if record.champion_level > 0 {
                mastery_score = (f64::from(record.champion_level) / 10.0).min(0.7)
                    + (record.champion_points as f64 / max_points as f64) * 0.3;
            }

            let matchups = self
                .provider
                .champion_matchups(&record.champion_name, options.role);
            let use_blind = options.mode == RecommendMode::Blind || enemies.is_empty();
            let (counter_component, blind_value) = if use_blind {
                let blind = blindpick_score(matchups.as_ref()) / 100.0;
                (blind, Some(blind))
            } else {
                (counter_score(matchups.as_ref(), enemies) / 100.0, None)
            };

            let mut score = mastery_score * weights.mastery
                + meta_score * weights.meta
                + counter_component * weights.counter;

            if record.champion_level >= 5 && meta.winrate >= 51.0 {
                score *= 1.10;
            }
            if counter_component >= 0.7 && !enemies.is_empty() {
                score *= 1.15;
            }

            let reason = build_reason(
                options.mode,
                enemies,
                counter_component,
                blind_value,
                tier,
                meta.winrate,
                record.champion_level,
                record.champion_points,
            );

            picks.push(ScoredPick {
                champion: record.champion_name.clone(),
                role: options.role,
                score: round3(score),
                winrate: round1(meta.winrate),
                pickrate: meta.pickrate,
                tier,
                mastery_level: record.champion_level,
                mastery_points: record.champion_points,
                counter_score: round1(counter_component * 100.0),
                blindpick_score: if options.mode == RecommendMode::Blind {
                    blind_value.map(|b| round1(b * 100.0))
                } else {
                    None
                },
                games_in_meta: meta.games,
                reason,
                mode: options.mode,
            });
        }

        picks.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        picks.truncate(options.top_n);
        picks
    }
}

#[allow(clippy::too_many_arguments)]
fn build_reason(
    mode: RecommendMode,
    enemies: &[String],
    counter_component: f64,
    blind_value: Option<f64>,
    tier: Tier,
    winrate: f64,
    level: u32,
    points: u64,
) -> String {
    let mut reasons: Vec<String> = Vec::new();

    if !enemies.is_empty() && counter_component >= 0.6 {
        let named: Vec<&str> = enemies.iter().take(2).map(String::as_str).collect();
        reasons.push(format!("🎯 Counter vs {}", named.join(", ")));
    } else if mode == RecommendMode::Blind && blind_value.is_some_and(|b| b >= 0.7) {
        reasons.push("🛡️ Safe blind pick".to_string());
    }

    if matches!(tier, Tier::S | Tier::A) {
        reasons.push(format!("Tier {}", tier));
    }
    if winrate >= 52.0 {
        reasons.push(format!("{:.1}% WR", winrate));
    }

    if level >= 7 {
        reasons.push(format!("M{} ({} pts)", level, format_points(points)));
    } else if level >= 5 {
        reasons.push(format!("M{}", level));
    }

    if reasons.is_empty() {
        reasons.push("Solid pick".to_string());
    }
    reasons.join(" • ")
}

pub(crate) fn format_points(points: u64) -> String {
    let digits = points.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stats::{ChampionMeta, MatchupData, MatchupEntry};
    use std::collections::HashMap;

    struct StubProvider {
        stats: HashMap<String, ChampionMeta>,
        matchups: HashMap<String, MatchupData>,
    }

    impl StubProvider {
        fn new() -> Self {
            StubProvider {
                stats: HashMap::new(),
                matchups: HashMap::new(),
            }
        }

        fn with_stats(mut self, champion: &str, winrate: f64, pickrate: f64, games: u64) -> Self {
            self.stats.insert(
                champion.to_lowercase(),
                ChampionMeta {
                    winrate,
                    pickrate,
                    banrate: 0.0,
                    games,
                },
            );
            self
        }

        fn with_matchups(mut self, champion: &str, winrate: f64, opponents: &[(&str, f64)]) -> Self {
            let entries: Vec<MatchupEntry> = opponents
                .iter()
                .map(|(name, wr)| MatchupEntry {
                    champion: name.to_string(),
                    winrate: *wr,
                    games: 1000,
                })
                .collect();
            let (counters, weak_against) = entries.into_iter().partition(|e| e.winrate < 50.0);
            self.matchups.insert(
                champion.to_lowercase(),
                MatchupData {
                    winrate,
                    counters,
                    weak_against,
                },
            );
            self
        }
    }

    impl StatsProvider for StubProvider {
        fn champion_stats(&self, champion: &str, _role: Role) -> ChampionMeta {
            self.stats
                .get(&champion.to_lowercase())
                .cloned()
                .unwrap_or_default()
        }

        fn champion_matchups(&self, champion: &str, _role: Role) -> Option<MatchupData> {
            self.matchups.get(&champion.to_lowercase()).cloned()
        }
    }

    fn mastery(name: &str, level: u32, points: u64) -> MasteryRecord {
        MasteryRecord {
            champion_id: 0,
            champion_name: name.to_string(),
            champion_level: level,
            champion_points: points,
            last_play_time: None,
        }
    }

    fn options(role: Role, mode: RecommendMode) -> RecommendOptions {
        RecommendOptions {
            role,
            mode,
            min_pickrate: 0.0,
            ..RecommendOptions::default()
        }
    }

    #[test]
    fn weights_always_sum_to_one() {
        for mode in [
            RecommendMode::Balanced,
            RecommendMode::Counter,
            RecommendMode::Blind,
            RecommendMode::Comfort,
        ] {
            for has_enemies in [false, true] {
                let w = ScoreWeights::for_mode(mode, has_enemies);
                assert!((w.mastery + w.meta + w.counter - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn counter_mode_without_enemies_degrades_to_balanced() {
        let degraded = ScoreWeights::for_mode(RecommendMode::Counter, false);
        let balanced = ScoreWeights::for_mode(RecommendMode::Balanced, false);
        assert_eq!(degraded.mastery, balanced.mastery);
        assert_eq!(degraded.counter, balanced.counter);
    }

    #[test]
    fn mode_parsing_is_tolerant() {
        assert_eq!(RecommendMode::parse("counter"), RecommendMode::Counter);
        assert_eq!(RecommendMode::parse("BLIND"), RecommendMode::Blind);
        assert_eq!(RecommendMode::parse(" comfort "), RecommendMode::Comfort);
        assert_eq!(RecommendMode::parse("balanced"), RecommendMode::Balanced);
        assert_eq!(RecommendMode::parse("aggressive"), RecommendMode::Balanced);
        assert_eq!(RecommendMode::parse(""), RecommendMode::Balanced);
    }

    #[test]
    fn empty_pool_or_unknown_role_yields_nothing() {
        let provider = StubProvider::new();
        let engine = RecommendationEngine::new(&provider);

        assert!(engine
            .recommend(&[], &options(Role::Mid, RecommendMode::Balanced))
            .is_empty());
        assert!(engine
            .recommend(
                &[mastery("Ahri", 7, 100)],
                &options(Role::Unknown, RecommendMode::Balanced)
            )
            .is_empty());
    }

    #[test]
    fn balanced_scoring_matches_the_formula_end_to_end() {
        // Ashe, M7 at the pool's max points, 52% winrate, no matchup data.
        // meta (52-45)/15, mastery 0.7 + 0.3, blind default 60 because no
        // enemies are known; the M5+/51% bonus applies:
        // (1.0*0.25 + 7/15*0.30 + 0.6*0.45) * 1.10 = 0.726
        let provider = StubProvider::new().with_stats("Ashe", 52.0, 5.0, 10000);
        let engine = RecommendationEngine::new(&provider);

        let picks = engine.recommend(
            &[mastery("Ashe", 7, 500_000)],
            &options(Role::Bottom, RecommendMode::Balanced),
        );
        assert_eq!(picks.len(), 1);
        let pick = &picks[0];

        assert_eq!(pick.score, 0.726);
        assert_eq!(pick.winrate, 52.0);
        assert_eq!(pick.counter_score, 60.0);
        assert_eq!(pick.blindpick_score, None);
        assert_eq!(pick.tier, Tier::A);
        assert_eq!(pick.games_in_meta, 10000);
        assert_eq!(pick.reason, "Tier A • 52.0% WR • M7 (500,000 pts)");
    }

    #[test]
    fn counter_mode_rewards_winning_matchups() {
        let provider = StubProvider::new()
            .with_stats("Quinn", 52.0, 3.0, 8000)
            .with_matchups("Quinn", 52.0, &[("Darius", 55.0)]);
        let engine = RecommendationEngine::new(&provider);

        let mut opts = options(Role::Top, RecommendMode::Counter);
        opts.context.enemies = vec!["Darius".to_string()];

        let picks = engine.recommend(&[mastery("Quinn", 7, 300_000)], &opts);
        assert_eq!(picks.len(), 1);
        let pick = &picks[0];

        // counter (55-45)*10 = 100 -> component 1.0; weights .15/.20/.65;
        // both bonuses stack: (0.15 + 7/15*0.20 + 0.65) * 1.10 * 1.15
        assert_eq!(pick.score, 1.13);
        assert_eq!(pick.counter_score, 100.0);
        assert_eq!(pick.blindpick_score, None);
        assert!(pick.reason.starts_with("🎯 Counter vs Darius"));
    }

    #[test]
    fn blind_mode_reports_its_score_and_reason() {
        let provider = StubProvider::new()
            .with_stats("Ornn", 53.0, 4.0, 9000)
            .with_matchups("Ornn", 53.0, &[("Garen", 55.0)]);
        let engine = RecommendationEngine::new(&provider);

        let picks = engine.recommend(
            &[mastery("Ornn", 7, 400_000)],
            &options(Role::Top, RecommendMode::Blind),
        );
        assert_eq!(picks.len(), 1);
        let pick = &picks[0];

        // blind: 70 - 0 + (53-50)*2 = 76 -> component 0.76; weights
        // .25/.45/.30; only the M5+/51% bonus (no enemies):
        // (0.25 + 8/15*0.45 + 0.76*0.30) * 1.10 = 0.79
        assert_eq!(pick.score, 0.79);
        assert_eq!(pick.blindpick_score, Some(76.0));
        assert_eq!(pick.counter_score, 76.0);
        assert_eq!(pick.tier, Tier::S);
        assert!(pick.reason.contains("🛡️ Safe blind pick"));
        assert!(pick.reason.contains("Tier S"));
    }

    #[test]
    fn drafted_and_banned_champions_are_excluded() {
        let provider = StubProvider::new()
            .with_stats("Thresh", 53.0, 10.0, 9000)
            .with_stats("Lulu", 51.0, 8.0, 7000)
            .with_stats("Nami", 50.0, 6.0, 6000);
        let engine = RecommendationEngine::new(&provider);

        let mut opts = options(Role::Support, RecommendMode::Balanced);
        opts.context.enemies = vec!["Thresh".to_string()];
        opts.context.bans = vec!["nami".to_string()];

        let picks = engine.recommend(
            &[
                mastery("Thresh", 7, 500_000),
                mastery("Lulu", 6, 200_000),
                mastery("Nami", 5, 100_000),
            ],
            &opts,
        );
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].champion, "Lulu");
    }

    #[test]
    fn fringe_picks_fall_below_the_pickrate_floor() {
        let provider = StubProvider::new()
            .with_stats("Azir", 51.0, 0.4, 2000)
            .with_stats("Ahri", 51.0, 9.0, 20000);
        let engine = RecommendationEngine::new(&provider);

        let mut opts = options(Role::Mid, RecommendMode::Balanced);
        opts.min_pickrate = 0.5;

        let picks = engine.recommend(
            &[mastery("Azir", 7, 600_000), mastery("Ahri", 6, 300_000)],
            &opts,
        );
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].champion, "Ahri");
    }

    #[test]
    fn pool_depth_is_capped_before_anything_else() {
        let mut pool: Vec<MasteryRecord> = (0..CANDIDATE_CAP)
            .map(|i| mastery(&format!("Filler{}", i), 5, 1_000))
            .collect();
        pool.push(mastery("Desirable", 7, 9_000_000));

        let provider = StubProvider::new();
        let engine = RecommendationEngine::new(&provider);

        let mut opts = options(Role::Mid, RecommendMode::Balanced);
        opts.top_n = 50;

        let picks = engine.recommend(&pool, &opts);
        assert_eq!(picks.len(), CANDIDATE_CAP);
        assert!(picks.iter().all(|p| p.champion != "Desirable"));
    }

    #[test]
    fn provider_outage_degrades_to_neutral_scores() {
        // Stub knows nothing, so stats come back at the neutral defaults:
        // meta (50-45)/15 = 1/3, blind 60, no mastery component at level 0.
        let provider = StubProvider::new();
        let engine = RecommendationEngine::new(&provider);

        let picks = engine.recommend(
            &[mastery("Ahri", 0, 0)],
            &options(Role::Mid, RecommendMode::Balanced),
        );
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].score, 0.37);
        assert_eq!(picks[0].reason, "Solid pick");
        assert_eq!(picks[0].games_in_meta, 0);
    }

    #[test]
    fn equal_scores_keep_pool_order() {
        let provider = StubProvider::new()
            .with_stats("Ahri", 50.0, 5.0, 1000)
            .with_stats("Zed", 50.0, 5.0, 1000);
        let engine = RecommendationEngine::new(&provider);

        let picks = engine.recommend(
            &[mastery("Ahri", 4, 50_000), mastery("Zed", 4, 50_000)],
            &options(Role::Mid, RecommendMode::Balanced),
        );
        assert_eq!(picks.len(), 2);
        assert_eq!(picks[0].score, picks[1].score);
        assert_eq!(picks[0].champion, "Ahri");
        assert_eq!(picks[1].champion, "Zed");
    }

    #[test]
    fn results_are_ranked_and_truncated() {
        let provider = StubProvider::new()
            .with_stats("Ahri", 54.0, 8.0, 9000)
            .with_stats("Zed", 49.0, 7.0, 8000)
            .with_stats("Lux", 52.0, 6.0, 7000);
        let engine = RecommendationEngine::new(&provider);

        let mut opts = options(Role::Mid, RecommendMode::Balanced);
        opts.top_n = 2;

        let picks = engine.recommend(
            &[
                mastery("Zed", 6, 200_000),
                mastery("Ahri", 6, 200_000),
                mastery("Lux", 6, 200_000),
            ],
            &opts,
        );
        assert_eq!(picks.len(), 2);
        assert_eq!(picks[0].champion, "Ahri");
        assert_eq!(picks[1].champion, "Lux");
        assert!(picks[0].score >= picks[1].score);
    }

    #[test]
    fn thousands_are_grouped_in_mastery_reasons() {
        assert_eq!(format_points(999), "999");
        assert_eq!(format_points(1_234), "1,234");
        assert_eq!(format_points(500_000), "500,000");
        assert_eq!(format_points(12_345_678), "12,345,678");
    }
}
