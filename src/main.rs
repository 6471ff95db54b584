use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use draftwise::analysis::counter::best_counters;
use draftwise::analysis::recommender::{
    DraftContext, RecommendMode, RecommendOptions, RecommendationEngine,
};
use draftwise::api::stats::{LolalyticsClient, StatsProvider, TableStatsProvider};
use draftwise::api::{fetch_champion_data, parse_riot_id, RiotClient};
use draftwise::champions::ChampionRegistry;
use draftwise::config::Config;
use draftwise::display::output::{
    display_best_counters, display_champion_meta, display_error, display_info,
    display_masteries, display_matchup_profile, display_recommendations, display_success,
};
use draftwise::mastery::{MasteryRecord, MasteryStore};
use draftwise::matchup::{MatchupStore, MatchupTable};
use draftwise::role::Role;

#[derive(Parser, Debug)]
#[command(name = "draftwise")]
#[command(about = "Draft-phase pick recommendations from mastery, meta and matchup data", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recommend picks for a role from a player's champion pool
    Recommend {
        /// Riot ID, as GameName#TAG
        riot_id: String,

        /// Role to fill (top, jungle, mid, bottom, support)
        role: String,

        /// Scoring mode: balanced, counter, blind or comfort
        #[arg(short, long, default_value = "balanced")]
        mode: String,

        /// Number of picks to display
        #[arg(short, long, default_value = "5")]
        top_n: usize,

        /// Pickrate floor in percent; fringe picks below it are skipped
        #[arg(long, default_value = "1.0")]
        min_pickrate: f64,

        /// Enemy champions already revealed, comma separated
        #[arg(short, long, value_delimiter = ',')]
        enemies: Vec<String>,

        /// Ally champions already locked, comma separated
        #[arg(short, long, value_delimiter = ',')]
        allies: Vec<String>,

        /// Banned champions, comma separated
        #[arg(short, long, value_delimiter = ',')]
        bans: Vec<String>,

        /// Score against the local matchup table instead of the live provider
        #[arg(long)]
        offline: bool,

        /// Refresh the mastery snapshot from the Riot API first
        #[arg(long)]
        refresh: bool,
    },

    /// Show a player's champion mastery snapshot
    Mastery {
        /// Riot ID, as GameName#TAG
        riot_id: String,

        /// Number of champions to display
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Refresh from the Riot API even when a snapshot exists
        #[arg(long)]
        refresh: bool,
    },

    /// Build the matchup table from a competitive dataset
    BuildTable {
        /// CSV path; defaults to the configured dataset
        #[arg(short, long)]
        dataset: Option<PathBuf>,

        /// Rebuild even when the cached table is fresh
        #[arg(long)]
        force: bool,
    },

    /// Show a champion's matchup profile from the local table
    Matchups {
        champion: String,
        role: String,
    },

    /// Show a champion's meta stats and matchup spread
    ChampionStats {
        champion: String,
        role: String,

        /// Use the local matchup table instead of the live provider
        #[arg(long)]
        offline: bool,
    },

    /// Rank the best answers to an enemy composition from the local table
    Counters {
        /// Role to pick from
        role: String,

        /// Enemy champions, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        enemies: Vec<String>,

        /// Number of champions to display
        #[arg(short, long, default_value = "5")]
        top_n: usize,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::from_env();

    match args.command {
        Command::Recommend {
            riot_id,
            role,
            mode,
            top_n,
            min_pickrate,
            enemies,
            allies,
            bans,
            offline,
            refresh,
        } => {
            let options = RecommendOptions {
                role: Role::normalize(&role),
                mode: RecommendMode::parse(&mode),
                top_n,
                min_pickrate,
                context: DraftContext {
                    enemies,
                    allies,
                    bans,
                },
            };
            cmd_recommend(&config, &riot_id, options, offline, refresh)
        }
        Command::Mastery {
            riot_id,
            limit,
            refresh,
        } => cmd_mastery(&config, &riot_id, limit, refresh),
        Command::BuildTable { dataset, force } => cmd_build_table(&config, dataset, force),
        Command::Matchups { champion, role } => cmd_matchups(&config, &champion, &role),
        Command::ChampionStats {
            champion,
            role,
            offline,
        } => cmd_champion_stats(&config, &champion, &role, offline),
        Command::Counters {
            role,
            enemies,
            top_n,
        } => cmd_counters(&config, &role, enemies, top_n),
    }
}

/// Built-in champion list, refreshed from Data Dragon when we are online.
/// The refresh is best effort; the built-in list already covers every
/// champion the bundled datasets mention.
fn load_registry(config: &Config, online: bool) -> ChampionRegistry {
    let mut registry = ChampionRegistry::builtin();
    if online {
        match fetch_champion_data(config.provider_timeout_secs) {
            Ok(data) => {
                let merged = registry.merge_data_dragon(&data);
                debug!(
                    merged,
                    champions = registry.len(),
                    "champion registry refreshed from Data Dragon"
                );
            }
            Err(e) => warn!("champion registry refresh failed, using built-in list: {}", e),
        }
    }
    registry
}

/// Stored mastery snapshot for the player, fetching from the Riot API when
/// there is none (or when a refresh is requested).
fn load_masteries(
    config: &Config,
    riot_id: &str,
    refresh: bool,
) -> anyhow::Result<Vec<MasteryRecord>> {
    let mut store = MasteryStore::load(config.masteries_path());
    if !refresh {
        if let Some(player) = store.get(riot_id) {
            return Ok(player.masteries.clone());
        }
        display_info("No stored mastery snapshot, fetching from the Riot API");
    }

    let (game_name, tag_line) = parse_riot_id(riot_id)?;
    let client = RiotClient::new(config).context("cannot refresh masteries")?;
    let account = client.get_account(game_name, tag_line)?;
    let registry = load_registry(config, true);
    let records: Vec<MasteryRecord> = client
        .get_masteries(&account.puuid)?
        .iter()
        .map(|dto| MasteryRecord::from_dto(dto, &registry))
        .collect();

    store.upsert(riot_id, account.puuid, records.clone());
    store.save()?;
    display_success(&format!(
        "Stored {} mastery records for {}",
        records.len(),
        riot_id
    ));
    Ok(records)
}

fn load_table(config: &Config, force: bool) -> anyhow::Result<Arc<MatchupTable>> {
    let store = MatchupStore::from_config(config);
    store
        .load_or_build(&config.dataset_path, config.dataset_min_games, force)
        .context("matchup table unavailable")
}

fn cmd_recommend(
    config: &Config,
    riot_id: &str,
    options: RecommendOptions,
    offline: bool,
    refresh: bool,
) -> anyhow::Result<()> {
    let masteries = load_masteries(config, riot_id, refresh)?;

    let picks = if offline {
        let provider = TableStatsProvider::new(load_table(config, false)?);
        RecommendationEngine::new(&provider).recommend(&masteries, &options)
    } else {
        let provider = LolalyticsClient::new(config, load_registry(config, true));
        RecommendationEngine::new(&provider).recommend(&masteries, &options)
    };

    display_recommendations(riot_id, &picks);
    Ok(())
}

fn cmd_mastery(config: &Config, riot_id: &str, limit: usize, refresh: bool) -> anyhow::Result<()> {
    load_masteries(config, riot_id, refresh)?;
    let store = MasteryStore::load(config.masteries_path());
    let records = store.top(riot_id, limit)?;
    display_masteries(riot_id, &records);
    Ok(())
}

fn cmd_build_table(config: &Config, dataset: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let dataset_path = dataset.unwrap_or_else(|| config.dataset_path.clone());
    display_info(&format!(
        "Building matchup table from {}",
        dataset_path.display()
    ));

    let store = MatchupStore::from_config(config);
    let table = store
        .load_or_build(&dataset_path, config.dataset_min_games, force)
        .context("matchup table build failed")?;

    display_success(&format!(
        "Matchup table ready: {} profiles over {} games",
        table.len(),
        table.total_games()
    ));
    Ok(())
}

fn cmd_matchups(config: &Config, champion: &str, role: &str) -> anyhow::Result<()> {
    let role = Role::normalize(role);
    let table = load_table(config, false)?;

    match table.lookup(champion, role) {
        Some(profile) => display_matchup_profile(profile),
        None => display_info(&format!("No matchup data recorded for {}", champion)),
    }
    Ok(())
}

fn cmd_champion_stats(
    config: &Config,
    champion: &str,
    role: &str,
    offline: bool,
) -> anyhow::Result<()> {
    let role = Role::normalize(role);

    let (meta, matchups) = if offline {
        let provider = TableStatsProvider::new(load_table(config, false)?);
        (
            provider.champion_stats(champion, role),
            provider.champion_matchups(champion, role),
        )
    } else {
        let provider = LolalyticsClient::new(config, load_registry(config, true));
        (
            provider.champion_stats(champion, role),
            provider.champion_matchups(champion, role),
        )
    };

    display_champion_meta(champion, role, &meta, matchups.as_ref());
    Ok(())
}

fn cmd_counters(
    config: &Config,
    role: &str,
    enemies: Vec<String>,
    top_n: usize,
) -> anyhow::Result<()> {
    let role = Role::normalize(role);
    let table = load_table(config, false)?;
    let ranked = best_counters(&table, role, &enemies, top_n);
    display_best_counters(role, &enemies, &ranked);
    Ok(())
}
