pub mod auth_service;
pub mod export_service;
pub mod match_service;
pub mod roster_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use match_service::MatchService;
pub use roster_service::RosterService;
pub use user_service::UserService;
