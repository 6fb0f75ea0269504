use async_trait::async_trait;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;
use tracing::debug;

use crate::errors::internal::UpstreamError;
use crate::types::internal::GeoLocation;

/// Upstream geolocation lookup. Implementations must be cheap to call and
/// bounded in time; callers absorb failures and continue without a location.
#[async_trait]
pub trait GeoProvider: Send + Sync {
    async fn lookup(&self, ip: &str) -> Result<GeoLocation, UpstreamError>;
}

/// Returns true for addresses that never resolve to a useful location:
/// loopback, RFC 1918 ranges, link-local and unparseable strings.
pub fn is_non_routable(ip: &str) -> bool {
    match ip.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => {
            v4.is_loopback() || v4.is_private() || v4.is_link_local() || v4.is_unspecified()
        }
        Ok(IpAddr::V6(v6)) => v6.is_loopback() || v6.is_unspecified(),
        Err(_) => true,
    }
}

#[derive(Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    city: String,
    #[serde(default, rename = "regionName")]
    region_name: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    isp: String,
    #[serde(default)]
    message: Option<String>,
}

/// Client for the ip-api.com JSON endpoint.
pub struct IpApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl IpApiClient {
    pub fn new(timeout: Duration) -> Result<Self, UpstreamError> {
        Self::with_base_url("http://ip-api.com".to_string(), timeout)
    }

    pub fn with_base_url(base_url: String, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl GeoProvider for IpApiClient {
    async fn lookup(&self, ip: &str) -> Result<GeoLocation, UpstreamError> {
        if is_non_routable(ip) {
            debug!(ip = %ip, "Non-routable address, skipping geolocation lookup");
            return Ok(GeoLocation::local());
        }

        let url = format!(
            "{}/json/{}?fields=status,message,city,regionName,country,isp",
            self.base_url, ip
        );

        let response = self.client.get(&url).send().await?;
        let body: IpApiResponse = response.json().await?;

        if body.status != "success" {
            return Err(UpstreamError::GeoLookup(
                body.message.unwrap_or_else(|| "lookup refused".to_string()),
            ));
        }

        Ok(GeoLocation {
            city: body.city,
            region: body.region_name,
            country: body.country,
            isp: body.isp,
        })
    }
}

/// Provider used when geolocation is disabled by configuration.
pub struct NullGeoProvider;

#[async_trait]
impl GeoProvider for NullGeoProvider {
    async fn lookup(&self, _ip: &str) -> Result<GeoLocation, UpstreamError> {
        Err(UpstreamError::GeoLookup("geolocation disabled".to_string()))
    }
}
