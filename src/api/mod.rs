pub mod client;
pub mod models;
pub mod stats;

pub use client::{fetch_champion_data, parse_riot_id, RiotClient};
