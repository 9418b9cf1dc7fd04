pub mod access;
pub mod jwt;
pub mod throttle;

pub use access::AccessScope;
pub use jwt::Claims;
pub use throttle::LoginThrottle;
