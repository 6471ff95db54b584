pub mod blind;
pub mod counter;
pub mod recommender;
pub mod tier;
