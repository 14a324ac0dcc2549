//! Demo handlers exercising `LogManager::context`/`stat`/`track` from inside
//! a request

pub mod greet;
pub mod health;

pub use greet::greet;
pub use health::{health_check, metrics};
