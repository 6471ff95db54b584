use crate::config::Config;
use crate::error::AppError;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;
use tracing::warn;

use super::models::*;

const MAX_RETRIES: u32 = 3;
const USER_AGENT: &str = concat!("draftwise/", env!("CARGO_PKG_VERSION"));
const DDRAGON_CHAMPIONS_URL: &str =
    "https://ddragon.leagueoflegends.com/cdn/14.24.1/data/en_US/champion.json";

/// Split a `Name#TAG` Riot ID into its two halves.
pub fn parse_riot_id(input: &str) -> Result<(&str, &str), AppError> {
    match input.trim().split_once('#') {
        Some((name, tag)) if !name.is_empty() && !tag.is_empty() => Ok((name, tag)),
        _ => Err(AppError::InvalidRiotId),
    }
}

/// Data Dragon is a static CDN, no key or rate limit applies.
pub fn fetch_champion_data(timeout_secs: u64) -> Result<DataDragonChampions, AppError> {
    let agent = ureq::AgentBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .build();
    let body = agent
        .get(DDRAGON_CHAMPIONS_URL)
        .set("User-Agent", USER_AGENT)
        .call()
        .map_err(|e| AppError::HttpError(e.to_string()))?
        .into_string()
        .map_err(|e| AppError::HttpError(e.to_string()))?;

    serde_json::from_str(&body).map_err(|e| AppError::JsonError(e.to_string()))
}

pub struct RiotClient {
    agent: ureq::Agent,
    api_key: String,
    region: String,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl RiotClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            AppError::ConfigError(
                "RIOT_API_KEY is not set. Add it to your environment or .env file".to_string(),
            )
        })?;
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.provider_timeout_secs))
            .build();
        // Riot development keys allow 20 requests per second
        let rate_limiter = RateLimiter::direct(Quota::per_second(NonZeroU32::new(20).unwrap()));
        Ok(RiotClient {
            agent,
            api_key,
            region: config.region.clone(),
            rate_limiter,
        })
    }

    fn routing(&self) -> &'static str {
        match self.region.as_str() {
            "na1" | "br1" | "la1" | "la2" => "americas",
            "kr" | "jp1" => "asia",
            "oc1" | "ph2" | "sg2" | "th2" | "tw2" | "vn2" => "sea",
            _ => "europe",
        }
    }

    fn execute(&self, url: &str) -> Result<String, AppError> {
        while self.rate_limiter.check().is_err() {
            thread::sleep(Duration::from_millis(50));
        }

        let mut retries = 0;
        loop {
            let response = self
                .agent
                .get(url)
                .set("X-Riot-Token", &self.api_key)
                .set("User-Agent", USER_AGENT)
                .call();

            match response {
                Ok(resp) => {
                    return resp
                        .into_string()
                        .map_err(|e| AppError::HttpError(e.to_string()));
                }
                Err(ureq::Error::Status(404, _)) => return Err(AppError::NotFound),
                Err(ureq::Error::Status(429, _)) => {
                    if retries >= MAX_RETRIES {
                        return Err(AppError::RateLimited);
                    }
                    let wait_ms = 2000 * (retries + 1) as u64;
                    warn!(wait_ms, "rate limited by Riot API, backing off");
                    thread::sleep(Duration::from_millis(wait_ms));
                    retries += 1;
                }
                Err(ureq::Error::Status(code, _)) => {
                    return Err(AppError::HttpError(format!("Riot API returned HTTP {}", code)));
                }
                Err(e) => return Err(AppError::HttpError(e.to_string())),
            }
        }
    }

    pub fn get_account(&self, game_name: &str, tag_line: &str) -> Result<AccountDto, AppError> {
        let url = format!(
            "https://{}.api.riotgames.com/riot/account/v1/accounts/by-riot-id/{}/{}",
            self.routing(),
            game_name.replace(' ', "%20"),
            tag_line
        );

        let body = match self.execute(&url) {
            Err(AppError::NotFound) => {
                return Err(AppError::PlayerNotFound(format!("{}#{}", game_name, tag_line)))
            }
            other => other?,
        };
        serde_json::from_str(&body).map_err(|e| AppError::JsonError(e.to_string()))
    }

    pub fn get_masteries(&self, puuid: &str) -> Result<Vec<MasteryDto>, AppError> {
        let url = format!(
            "https://{}.api.riotgames.com/lol/champion-mastery/v4/champion-masteries/by-puuid/{}",
            self.region, puuid
        );

        let body = match self.execute(&url) {
            Err(AppError::NotFound) => {
                return Err(AppError::PlayerNotFound(puuid.to_string()))
            }
            other => other?,
        };
        serde_json::from_str(&body).map_err(|e| AppError::JsonError(e.to_string()))
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn riot_id_splits_on_hash() {
        assert_eq!(parse_riot_id("Faker#KR1").unwrap(), ("Faker", "KR1"));
        assert_eq!(
            parse_riot_id("  Hide on bush#KR1 ").unwrap(),
            ("Hide on bush", "KR1")
        );
    }

    #[test]
    fn riot_id_rejects_malformed_input() {
        assert!(matches!(parse_riot_id("Faker"), Err(AppError::InvalidRiotId)));
        assert!(matches!(parse_riot_id("#KR1"), Err(AppError::InvalidRiotId)));
        assert!(matches!(parse_riot_id("Faker#"), Err(AppError::InvalidRiotId)));
        assert!(matches!(parse_riot_id(""), Err(AppError::InvalidRiotId)));
    }
}
