//! Utility functions and helper modules.
//!
//! Request identity extraction and the clock abstraction shared by the
//! rate limiter.

pub mod build_info;
pub mod clock;
pub mod http;
pub mod route;

pub use clock::*;
pub use http::*;
pub use route::*;
