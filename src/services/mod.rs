//! Business logic and service layer modules.
//!
//! The rate limiter, its counter store and sweeper, and metrics collection.

pub mod metrics;
pub mod rate_limit;
pub mod rate_limit_store;
pub mod sweeper;

pub use metrics::*;
pub use rate_limit::*;
pub use rate_limit_store::*;
pub use sweeper::*;
