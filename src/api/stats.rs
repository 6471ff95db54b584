use crate::champions::ChampionRegistry;
use crate::config::Config;
use crate::matchup::{MatchupProfile, MatchupTable};
use crate::role::Role;
use chrono::{DateTime, Utc};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use super::models::LolalyticsResponse;

const BASE_URL: &str = "https://a1.lolalytics.com/mega/";
const PATCH: &str = "14";
const MATCHUP_LIST_CAP: usize = 15;
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Aggregate meta numbers for one champion on one lane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChampionMeta {
    pub winrate: f64,
    pub pickrate: f64,
    pub banrate: f64,
    pub games: u64,
}

impl Default for ChampionMeta {
    fn default() -> Self {
        ChampionMeta {
            winrate: 50.0,
            pickrate: 0.0,
            banrate: 0.0,
            games: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupEntry {
    pub champion: String,
    pub winrate: f64,
    pub games: u64,
}

/// A champion's matchup spread: opponents it loses to (`counters`) and
/// opponents it beats (`weak_against`), plus its own global winrate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupData {
    pub winrate: f64,
    pub counters: Vec<MatchupEntry>,
    pub weak_against: Vec<MatchupEntry>,
}

impl Default for MatchupData {
    fn default() -> Self {
        MatchupData {
            winrate: 50.0,
            counters: Vec::new(),
            weak_against: Vec::new(),
        }
    }
}

/// The seam the scoring engine consumes. `champion_stats` is total and
/// degrades to neutral numbers; `champion_matchups` signals absence with
/// `None` so callers can tell "no data at all" from "data but no opponents".
pub trait StatsProvider {
    fn champion_stats(&self, champion: &str, role: Role) -> ChampionMeta;
    fn champion_matchups(&self, champion: &str, role: Role) -> Option<MatchupData>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProviderEntry {
    winrate: f64,
    pickrate: f64,
    banrate: f64,
    games: u64,
    counters: Vec<MatchupEntry>,
    weak_against: Vec<MatchupEntry>,
}

impl Default for ProviderEntry {
    fn default() -> Self {
        ProviderEntry {
            winrate: 50.0,
            pickrate: 0.0,
            banrate: 0.0,
            games: 0,
            counters: Vec::new(),
            weak_against: Vec::new(),
        }
    }
}

/// On-disk provider cache. One shared timestamp covers all entries, matching
/// the refresh-everything-together policy of the upstream scrape cadence.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ProviderCache {
    #[serde(default)]
    fetched_at: Option<DateTime<Utc>>,
    #[serde(default)]
    entries: HashMap<String, ProviderEntry>,
}

fn cache_is_fresh(fetched_at: Option<DateTime<Utc>>, ttl_hours: i64) -> bool {
    match fetched_at {
        None => false,
        Some(at) => Utc::now().signed_duration_since(at).num_minutes() < ttl_hours * 60,
    }
}

/// HTTP client for the lolalytics counters endpoint, with a TTL disk cache.
/// Every failure path degrades to empty data; scoring never sees an error
/// from here.
pub struct LolalyticsClient {
    agent: ureq::Agent,
    registry: ChampionRegistry,
    min_games: u32,
    cache_path: PathBuf,
    cache_ttl_hours: i64,
    cache: Mutex<ProviderCache>,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl LolalyticsClient {
    pub fn new(config: &Config, registry: ChampionRegistry) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.provider_timeout_secs))
            .build();
        let cache_path = config.provider_cache_path();
        let cache = Self::load_cache(&cache_path);
        // stay polite, the provider is an unofficial endpoint
        let rate_limiter = RateLimiter::direct(Quota::per_second(NonZeroU32::new(5).unwrap()));
        LolalyticsClient {
            agent,
            registry,
            min_games: config.provider_min_games,
            cache_path,
            cache_ttl_hours: config.cache_ttl_hours,
            cache: Mutex::new(cache),
            rate_limiter,
        }
    }

    fn load_cache(path: &PathBuf) -> ProviderCache {
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(cache) => cache,
                Err(e) => {
                    debug!("ignoring unreadable provider cache: {}", e);
                    ProviderCache::default()
                }
            },
            Err(_) => ProviderCache::default(),
        }
    }

    fn persist(&self, cache: &ProviderCache) {
        if let Some(parent) = self.cache_path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string(cache) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.cache_path, json) {
                    warn!("could not persist provider cache: {}", e);
                }
            }
            Err(e) => warn!("could not serialize provider cache: {}", e),
        }
    }

    fn fetch(&self, champion: &str, role: Role) -> ProviderEntry {
        let lane = role.lane();
        let key = format!("{}_{}", champion.to_lowercase(), lane);

        {
            let cache = self
                .cache
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if cache_is_fresh(cache.fetched_at, self.cache_ttl_hours) {
                if let Some(entry) = cache.entries.get(&key) {
                    return entry.clone();
                }
            }
        }

        match self.fetch_remote(champion, lane) {
            Some(entry) => {
                let mut cache = self
                    .cache
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                cache.entries.insert(key, entry.clone());
                cache.fetched_at = Some(Utc::now());
                self.persist(&cache);
                entry
            }
            None => ProviderEntry::default(),
        }
    }

    fn fetch_remote(&self, champion: &str, lane: &str) -> Option<ProviderEntry> {
        while self.rate_limiter.check().is_err() {
            thread::sleep(Duration::from_millis(50));
        }

        // the endpoint wants bare lowercase names: "Kai'Sa" -> "kaisa"
        let champ_param = champion.replace([' ', '\''], "").to_lowercase();
        debug!(champion, lane, "fetching provider stats");

        let response = self
            .agent
            .get(BASE_URL)
            .query("ep", "counter")
            .query("p", "d")
            .query("v", "1")
            .query("patch", PATCH)
            .query("c", &champ_param)
            .query("lane", lane)
            .query("tier", "emerald_plus")
            .query("queue", "420")
            .query("region", "all")
            .set("User-Agent", BROWSER_USER_AGENT)
            .set("Accept", "application/json, text/plain, */*")
            .set("Accept-Language", "en-US,en;q=0.9")
            .set("Referer", "https://lolalytics.com/")
            .set("Origin", "https://lolalytics.com")
            .call();

        let payload: LolalyticsResponse = match response {
            Ok(resp) => match resp.into_json() {
                Ok(payload) => payload,
                Err(e) => {
                    warn!(champion, lane, "provider payload unreadable: {}", e);
                    return None;
                }
            },
            Err(e) => {
                warn!(champion, lane, "provider request failed: {}", e);
                return None;
            }
        };

        Some(self.parse_response(payload))
    }

    fn parse_response(&self, payload: LolalyticsResponse) -> ProviderEntry {
        let mut entry = ProviderEntry::default();
        if let Some(stats) = payload.stats {
            entry.winrate = stats.wr;
            entry.pickrate = stats.pr;
            entry.banrate = stats.br;
            entry.games = stats.analysed;
        }

        for matchup in payload.counters {
            if matchup.n < u64::from(self.min_games) {
                continue;
            }
            let record = MatchupEntry {
                champion: self.registry.name_of(matchup.cid),
                winrate: round2(matchup.vs_wr),
                games: matchup.n,
            };
            if matchup.vs_wr >= 52.0 {
                entry.weak_against.push(record);
            } else if matchup.vs_wr <= 48.0 {
                entry.counters.push(record);
            }
        }

        // worst matchups first, best matchups first
        entry
            .counters
            .sort_by(|a, b| a.winrate.partial_cmp(&b.winrate).unwrap_or(Ordering::Equal));
        entry
            .weak_against
            .sort_by(|a, b| b.winrate.partial_cmp(&a.winrate).unwrap_or(Ordering::Equal));
        entry.counters.truncate(MATCHUP_LIST_CAP);
        entry.weak_against.truncate(MATCHUP_LIST_CAP);
        entry
    }
}

impl StatsProvider for LolalyticsClient {
    fn champion_stats(&self, champion: &str, role: Role) -> ChampionMeta {
        let entry = self.fetch(champion, role);
        ChampionMeta {
            winrate: entry.winrate,
            pickrate: entry.pickrate,
            banrate: entry.banrate,
            games: entry.games,
        }
    }

    fn champion_matchups(&self, champion: &str, role: Role) -> Option<MatchupData> {
        let entry = self.fetch(champion, role);
        if entry.games == 0 {
            return None;
        }
        Some(MatchupData {
            winrate: entry.winrate,
            counters: entry.counters,
            weak_against: entry.weak_against,
        })
    }
}

/// Projects a table profile into the provider shape: one entry per opponent,
/// split into unfavorable and favorable sides.
pub fn profile_matchups(profile: &MatchupProfile) -> MatchupData {
    let mut counters = Vec::new();
    let mut weak_against = Vec::new();
    let mut seen = HashSet::new();
    // vs is sorted by sample size, so the first hit per opponent is the
    // best-observed role for that opponent
    for record in &profile.vs {
        if !seen.insert(record.champion.to_lowercase()) {
            continue;
        }
        let entry = MatchupEntry {
            champion: record.champion.clone(),
            winrate: record.winrate,
            games: u64::from(record.games),
        };
        if record.winrate < 50.0 {
            counters.push(entry);
        } else {
            weak_against.push(entry);
        }
    }
    counters.sort_by(|a, b| a.winrate.partial_cmp(&b.winrate).unwrap_or(Ordering::Equal));
    weak_against.sort_by(|a, b| b.winrate.partial_cmp(&a.winrate).unwrap_or(Ordering::Equal));

    MatchupData {
        winrate: profile.winrate,
        counters,
        weak_against,
    }
}

/// Offline provider backed by the aggregated matchup table, so
/// recommendations work with no network at all. Pickrate and banrate are
/// derived from the table's game totals.
pub struct TableStatsProvider {
    table: Arc<MatchupTable>,
}

impl TableStatsProvider {
    pub fn new(table: Arc<MatchupTable>) -> Self {
        TableStatsProvider { table }
    }
}

impl StatsProvider for TableStatsProvider {
    fn champion_stats(&self, champion: &str, role: Role) -> ChampionMeta {
        match self.table.lookup(champion, role) {
            None => ChampionMeta::default(),
            Some(profile) => {
                let total = self.table.total_games().max(1) as f64;
                ChampionMeta {
                    winrate: profile.winrate,
                    pickrate: round2(100.0 * f64::from(profile.games) / total),
                    banrate: round2(100.0 * self.table.ban_count(&profile.champion) as f64 / total),
                    games: u64::from(profile.games),
                }
            }
        }
    }

    fn champion_matchups(&self, champion: &str, role: Role) -> Option<MatchupData> {
        self.table.lookup(champion, role).map(profile_matchups)
    }
}
