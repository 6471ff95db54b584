use serde::Deserialize;

// Account V1 response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
    pub game_name: String,
    pub tag_line: String,
}

// Champion Mastery V4 response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryDto {
    pub champion_id: i32,
    pub champion_level: u32,
    pub champion_points: u64,
    #[serde(default)]
    pub last_play_time: Option<i64>,
}

// Data Dragon champion.json
#[derive(Debug, Deserialize)]
pub struct DataDragonChampions {
    pub data: std::collections::HashMap<String, ChampionInfo>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChampionInfo {
    pub id: String,
    pub name: String,
    pub key: String,
}

// Lolalytics counters endpoint. The payload carries far more than we read;
// unknown fields are ignored by serde.
#[derive(Debug, Deserialize, Default)]
pub struct LolalyticsResponse {
    #[serde(default)]
    pub stats: Option<LolalyticsStats>,
    #[serde(default)]
    pub counters: Vec<LolalyticsCounter>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LolalyticsStats {
    #[serde(default)]
    pub wr: f64,
    #[serde(default)]
    pub pr: f64,
    #[serde(default)]
    pub br: f64,
    #[serde(default)]
    pub analysed: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LolalyticsCounter {
    pub cid: i32,
    #[serde(default)]
    pub n: u64,
    #[serde(rename = "vsWr", default)]
    pub vs_wr: f64,
}
