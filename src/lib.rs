pub mod analysis;
pub mod api;
pub mod champions;
pub mod config;
pub mod display;
pub mod error;
pub mod mastery;
pub mod matchup;
pub mod role;

pub use error::AppError;
