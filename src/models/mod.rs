pub mod audit;
pub mod auth;
pub mod common;
pub mod match_record;
pub mod player;
pub mod stats;
pub mod user;
