pub mod dataset;
pub mod store;
pub mod table;

pub use store::MatchupStore;
pub use table::{MatchupKey, MatchupProfile, MatchupRecord, MatchupTable};
