use thiserror::Error;

/// Failures of non-critical collaborators (geolocation, notification).
/// Always absorbed before they reach the primary request path.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Geolocation lookup failed: {0}")]
    GeoLookup(String),

    #[error("Notification delivery failed: {0}")]
    Notification(String),

    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
