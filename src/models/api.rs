//! API response models for standard endpoints.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Response model for the health check endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response model for the version information endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct VersionResponse {
    pub version: String,
    pub commit: String,
    pub build_time: String,
}

/// Error body shared by rejected and failed requests
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Quota and live counter count for one rate limit policy
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct RateLimitPolicyStatus {
    pub policy: String,
    /// Admitted requests per window
    pub limit: u32,
    pub window_ms: u64,
    /// Counters currently held, including expired ones not yet swept
    pub tracked_keys: u64,
}

/// Response model for the rate limit policy listing
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct RateLimitStatusResponse {
    pub policies: Vec<RateLimitPolicyStatus>,
}
