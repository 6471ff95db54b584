use crate::analysis::recommender::{format_points, ScoredPick};
use crate::analysis::tier::Tier;
use crate::api::stats::{ChampionMeta, MatchupData};
use crate::mastery::MasteryRecord;
use crate::matchup::MatchupProfile;
use crate::role::Role;
use chrono::DateTime;
use colored::*;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct RecommendRow {
    #[tabled(rename = "#")]
    rank: String,
    champion: String,
    score: String,
    tier: String,
    winrate: String,
    pickrate: String,
    mastery: String,
    reason: String,
}

#[derive(Tabled)]
struct MatchupRow {
    opponent: String,
    role: String,
    games: String,
    winrate: String,
}

#[derive(Tabled)]
struct OpponentRow {
    champion: String,
    winrate: String,
    games: String,
}

#[derive(Tabled)]
struct MasteryRow {
    #[tabled(rename = "#")]
    rank: String,
    champion: String,
    level: String,
    points: String,
    last_played: String,
}

#[derive(Tabled)]
struct CounterPickRow {
    #[tabled(rename = "#")]
    rank: String,
    champion: String,
    score: String,
}

fn tier_label(tier: Tier) -> String {
    match tier {
        Tier::S => "S".green().bold().to_string(),
        Tier::A => "A".cyan().to_string(),
        Tier::B => "B".to_string(),
        Tier::C => "C".yellow().to_string(),
        Tier::D => "D".red().to_string(),
    }
}

fn colored_winrate(winrate: f64) -> String {
    let text = format!("{:.1}%", winrate);
    if winrate >= 52.0 {
        text.green().to_string()
    } else if winrate <= 48.0 {
        text.red().to_string()
    } else {
        text
    }
}

pub fn display_recommendations(riot_id: &str, picks: &[ScoredPick]) {
    println!(
        "\n{}",
        format!("🎯 PICK RECOMMENDATIONS for {}", riot_id)
            .bold()
            .cyan()
    );
    println!("{}\n", "=".repeat(70).cyan());

    if picks.is_empty() {
        println!(
            "{}",
            "No recommendations available (empty champion pool or unknown role)".yellow()
        );
        return;
    }

    println!(
        "{} {} | {} {}\n",
        "Role:".bold(),
        picks[0].role,
        "Mode:".bold(),
        picks[0].mode
    );

    let mut rows = vec![];
    for (idx, pick) in picks.iter().enumerate() {
        rows.push(RecommendRow {
            rank: format!("#{}", idx + 1),
            champion: pick.champion.clone(),
            score: format!("{:.3}", pick.score),
            tier: tier_label(pick.tier),
            winrate: format!("{:.1}%", pick.winrate),
            pickrate: format!("{:.1}%", pick.pickrate),
            mastery: format!("M{}", pick.mastery_level),
            reason: pick.reason.clone(),
        });
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    if let Some(best) = picks.first() {
        println!("\n{}", "Best Pick".bold().green());
        println!(
            "  {} (score {:.3}, {} games in meta)",
            best.champion, best.score, best.games_in_meta
        );
        println!("  {}", best.reason);
    }

    println!();
}

pub fn display_matchup_profile(profile: &MatchupProfile) {
    println!(
        "\n{}",
        format!("⚔️  MATCHUPS: {} ({})", profile.champion, profile.role)
            .bold()
            .cyan()
    );
    println!("{}\n", "=".repeat(60).cyan());
    println!(
        "{} {} games, {} win rate\n",
        "Overall:".bold(),
        profile.games,
        colored_winrate(profile.winrate)
    );

    if profile.vs.is_empty() {
        println!(
            "{}",
            "No matchups above the sample floor for this champion".yellow()
        );
        return;
    }

    let mut rows = vec![];
    for record in &profile.vs {
        rows.push(MatchupRow {
            opponent: record.champion.clone(),
            role: record.role.to_string(),
            games: record.games.to_string(),
            winrate: colored_winrate(record.winrate),
        });
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_champion_meta(
    champion: &str,
    role: Role,
    meta: &ChampionMeta,
    matchups: Option<&MatchupData>,
) {
    println!(
        "\n{}",
        format!("📊 CHAMPION STATS: {} ({})", champion, role)
            .bold()
            .cyan()
    );
    println!("{}\n", "=".repeat(60).cyan());

    println!(
        "{} {}   {} {}",
        "Win rate:".bold(),
        colored_winrate(meta.winrate),
        "Tier:".bold(),
        tier_label(Tier::classify(meta.winrate))
    );
    println!(
        "{} {:.1}%   {} {:.1}%   {} {}",
        "Pick rate:".bold(),
        meta.pickrate,
        "Ban rate:".bold(),
        meta.banrate,
        "Games:".bold(),
        meta.games
    );

    let Some(data) = matchups else {
        println!("\n{}", "No matchup data available".yellow());
        return;
    };

    if !data.counters.is_empty() {
        println!("\n{}", "😨 Toughest opponents".bold().red());
        let rows: Vec<OpponentRow> = data
            .counters
            .iter()
            .map(|m| OpponentRow {
                champion: m.champion.clone(),
                winrate: colored_winrate(m.winrate),
                games: m.games.to_string(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{}", table);
    }

    if !data.weak_against.is_empty() {
        println!("\n{}", "💪 Favorable matchups".bold().green());
        let rows: Vec<OpponentRow> = data
            .weak_against
            .iter()
            .map(|m| OpponentRow {
                champion: m.champion.clone(),
                winrate: colored_winrate(m.winrate),
                games: m.games.to_string(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{}", table);
    }

    println!();
}

fn format_last_played(millis: Option<i64>) -> String {
    millis
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn display_masteries(riot_id: &str, records: &[MasteryRecord]) {
    println!(
        "\n{}",
        format!("🏆 CHAMPION MASTERY for {}", riot_id).bold().cyan()
    );
    println!("{}\n", "=".repeat(60).cyan());

    if records.is_empty() {
        println!("{}", "No mastery data for this player".yellow());
        return;
    }

    let mut rows = vec![];
    for (idx, record) in records.iter().enumerate() {
        rows.push(MasteryRow {
            rank: format!("#{}", idx + 1),
            champion: record.champion_name.clone(),
            level: format!("M{}", record.champion_level),
            points: format_points(record.champion_points),
            last_played: format_last_played(record.last_play_time),
        });
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_best_counters(role: Role, enemies: &[String], ranked: &[(String, f64)]) {
    println!(
        "\n{}",
        format!("🎯 BEST ANSWERS ({}) vs {}", role, enemies.join(", "))
            .bold()
            .cyan()
    );
    println!("{}\n", "=".repeat(60).cyan());

    if ranked.is_empty() {
        println!("{}", "No champions recorded for this role".yellow());
        return;
    }

    let mut rows = vec![];
    for (idx, (champion, score)) in ranked.iter().enumerate() {
        rows.push(CounterPickRow {
            rank: format!("#{}", idx + 1),
            champion: champion.clone(),
            score: format!("{:.1}", score),
        });
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}
