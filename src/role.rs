use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical team positions. Free-text role strings from the dataset, the
/// Riot API and user input all funnel through [`Role::normalize`] before any
/// lookup, so downstream code never sees raw synonyms like "adc" or "utility".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Top,
    Jungle,
    Mid,
    Bottom,
    Support,
    #[default]
    Unknown,
}

impl Role {
    /// Total, case-insensitive mapping; anything unrecognized is `Unknown`.
    pub fn normalize(raw: &str) -> Role {
        match raw.trim().to_lowercase().as_str() {
            "top" => Role::Top,
            "jng" | "jungle" => Role::Jungle,
            "mid" | "middle" => Role::Mid,
            "bot" | "adc" | "bottom" => Role::Bottom,
            "sup" | "support" | "utility" => Role::Support,
            _ => Role::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Top => "top",
            Role::Jungle => "jungle",
            Role::Mid => "mid",
            Role::Bottom => "bottom",
            Role::Support => "support",
            Role::Unknown => "unknown",
        }
    }

    /// Lane name the stats provider expects in its query string.
    pub fn lane(&self) -> &'static str {
        match self {
            Role::Top => "top",
            Role::Jungle => "jungle",
            Role::Mid => "middle",
            Role::Bottom => "bottom",
            Role::Support => "support",
            Role::Unknown => "middle",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
