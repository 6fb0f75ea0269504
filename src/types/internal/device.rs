use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse device class parsed from the user-agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Desktop,
    Mobile,
    Tablet,
    Other,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Desktop => "desktop",
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::Other => "other",
        }
    }

    pub fn parse(s: &str) -> DeviceType {
        match s {
            "desktop" => DeviceType::Desktop,
            "mobile" => DeviceType::Mobile,
            "tablet" => DeviceType::Tablet,
            _ => DeviceType::Other,
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse geolocation derived from the client IP.
///
/// `local()` is the placeholder for private/loopback addresses that never go
/// through the upstream lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub city: String,
    pub region: String,
    pub country: String,
    pub isp: String,
}

impl GeoLocation {
    pub fn local() -> Self {
        GeoLocation {
            city: "Local".to_string(),
            region: "Local".to_string(),
            country: "Local".to_string(),
            isp: "Local".to_string(),
        }
    }
}

/// Everything the resolver learned about the requesting device.
///
/// `location: None` means the upstream lookup failed or timed out; session
/// creation proceeds with the degraded record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub fingerprint: String,
    pub device_type: DeviceType,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub location: Option<GeoLocation>,
}

/// Serialized blob stored in the session metadata column. Revocation appends
/// a reason without touching the resolver-provided fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub location: Option<GeoLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation_reason: Option<String>,
}

impl SessionMetadata {
    pub fn from_device(device: &DeviceInfo) -> Self {
        SessionMetadata {
            brand: device.brand.clone(),
            model: device.model.clone(),
            user_agent: device.user_agent.clone(),
            location: device.location.clone(),
            revocation_reason: None,
        }
    }

    pub fn to_json(&self) -> String {
        // Serialization of this shape cannot fail; fall back to an empty blob
        // rather than blocking the session write.
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Tolerant parse: a corrupt blob yields the default rather than an error,
    /// metadata is descriptive only.
    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_round_trip_keeps_location() {
        let device = DeviceInfo {
            fingerprint: "fp-1".to_string(),
            device_type: DeviceType::Mobile,
            brand: Some("Apple".to_string()),
            model: Some("iPhone".to_string()),
            ip_address: "203.0.113.7".to_string(),
            user_agent: Some("Mozilla/5.0 (iPhone)".to_string()),
            location: Some(GeoLocation {
                city: "Berlin".to_string(),
                region: "Berlin".to_string(),
                country: "Germany".to_string(),
                isp: "ExampleNet".to_string(),
            }),
        };

        let meta = SessionMetadata::from_device(&device);
        let restored = SessionMetadata::from_json(&meta.to_json());

        assert_eq!(restored.location, device.location);
        assert_eq!(restored.brand.as_deref(), Some("Apple"));
        assert!(restored.revocation_reason.is_none());
    }

    #[test]
    fn test_metadata_tolerates_corrupt_blob() {
        let meta = SessionMetadata::from_json("not json at all");
        assert!(meta.location.is_none());
        assert!(meta.user_agent.is_none());
    }

    #[test]
    fn test_null_location_survives_round_trip() {
        let meta = SessionMetadata {
            user_agent: Some("curl/8.0".to_string()),
            ..Default::default()
        };
        let restored = SessionMetadata::from_json(&meta.to_json());
        assert!(restored.location.is_none());
    }
}
