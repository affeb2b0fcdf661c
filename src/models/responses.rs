use crate::models::RankedResult;
use serde::{Deserialize, Serialize};

/// Response for the discovery endpoints: the revealed slice of the ranked
/// list plus cursor context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryResponse {
    pub results: Vec<RankedResult>,
    #[serde(rename = "visibleCount")]
    pub visible_count: usize,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Response for reverse location lookup. Resolution failures are reported as
/// notices here, not as HTTP errors: manual city selection always remains
/// available to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReverseLocationResponse {
    /// Resolved `"City, ST"`, when resolution succeeded
    pub city: Option<String>,
    /// Whether the resolved city has registered caregivers
    #[serde(rename = "knownCity")]
    pub known_city: bool,
    pub notice: String,
}
