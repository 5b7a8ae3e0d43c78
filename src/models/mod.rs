//! Data models and schemas for the API.
//!
//! Request/response bodies serialized with serde and described in the
//! OpenAPI document through paperclip.

pub mod api;

pub use api::*;
