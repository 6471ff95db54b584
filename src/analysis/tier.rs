use serde::{Deserialize, Serialize};
use std::fmt;

/// Meta-strength band derived from a champion's winrate in the current patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
}

impl Tier {
    pub fn classify(winrate: f64) -> Tier {
        if winrate >= 53.0 {
            Tier::S
        } else if winrate >= 51.0 {
            Tier::A
        } else if winrate >= 49.0 {
            Tier::B
        } else if winrate >= 47.0 {
            Tier::C
        } else {
            Tier::D
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::S => "S",
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
