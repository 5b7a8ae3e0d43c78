//! Configuration structures and loading utilities.
//!
//! Every structure has a `Default` and a `from_env()` constructor; values are
//! read once at startup and never change while the server runs.

pub mod metrics;
pub mod rate_limit;
pub mod server;

pub use metrics::*;
pub use rate_limit::*;
pub use server::*;
