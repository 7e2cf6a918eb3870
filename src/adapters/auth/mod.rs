//! Authentication adapters.
//!
//! - `jwt` - HS256 session tokens, issued at login and checked per request
//! - `mock` - Token table for tests

mod jwt;
mod mock;

pub use jwt::JwtSessions;
pub use mock::MockSessionValidator;
