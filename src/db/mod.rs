pub mod audit;
pub mod helpers;
pub mod matches;
pub mod players;
pub mod pool;
pub mod stats;
pub mod users;
