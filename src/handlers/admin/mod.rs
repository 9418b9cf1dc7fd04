pub mod audit_handler;
pub mod match_handler;
pub mod user_handler;
