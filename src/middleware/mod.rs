//! Custom middleware implementations for the API.
//!
//! Request IDs, metrics collection and the rate limit guard.

pub mod metrics;
pub mod rate_limit;
pub mod request_id;

pub use metrics::*;
pub use rate_limit::*;
pub use request_id::*;
