use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::types::internal::{DeviceInfo, DeviceType};

type HmacSha256 = Hmac<Sha256>;

/// Raw per-request inputs before resolution. All optional; the resolver
/// produces a usable identity from whatever subset is present.
#[derive(Debug, Default, Clone)]
pub struct RequestContext {
    pub client_fingerprint: Option<String>,
    pub user_agent: Option<String>,
    pub forwarded_for: Option<String>,
    pub real_ip: Option<String>,
    pub remote_addr: Option<String>,
}

/// Resolves the requesting device's identity: fingerprint, coarse device
/// class and client IP. A client-supplied fingerprint is trusted as-is;
/// otherwise a keyed digest of the user-agent stands in. The IP is kept out
/// of the digest so the fallback fingerprint survives address churn.
pub struct DeviceResolver {
    fingerprint_key: String,
}

impl DeviceResolver {
    pub fn new(fingerprint_key: String) -> Self {
        Self { fingerprint_key }
    }

    pub fn resolve(&self, ctx: &RequestContext) -> DeviceInfo {
        let ip_address = self.client_ip(ctx);
        let (device_type, brand, model) = parse_user_agent(ctx.user_agent.as_deref());

        let fingerprint = match ctx.client_fingerprint.as_deref() {
            Some(fp) if !fp.trim().is_empty() => fp.trim().to_owned(),
            _ => self.derived_fingerprint(ctx.user_agent.as_deref()),
        };

        DeviceInfo {
            fingerprint,
            device_type,
            brand,
            model,
            ip_address,
            user_agent: ctx.user_agent.clone(),
            location: None,
        }
    }

    /// Proxy-aware client IP: first X-Forwarded-For entry, then X-Real-IP,
    /// then the socket peer address, then loopback.
    fn client_ip(&self, ctx: &RequestContext) -> String {
        if let Some(forwarded) = ctx.forwarded_for.as_deref() {
            if let Some(first) = forwarded.split(',').next() {
                let first = first.trim();
                if !first.is_empty() {
                    return first.to_owned();
                }
            }
        }
        if let Some(real_ip) = ctx.real_ip.as_deref() {
            let real_ip = real_ip.trim();
            if !real_ip.is_empty() {
                return real_ip.to_owned();
            }
        }
        if let Some(remote) = ctx.remote_addr.as_deref() {
            // Strip a port suffix if the transport handed us host:port
            let host = remote.rsplit_once(':').map_or(remote, |(h, p)| {
                if p.chars().all(|c| c.is_ascii_digit()) {
                    h
                } else {
                    remote
                }
            });
            let host = host.trim();
            if !host.is_empty() {
                return host.to_owned();
            }
        }
        "127.0.0.1".to_owned()
    }

    fn derived_fingerprint(&self, user_agent: Option<&str>) -> String {
        // Key length is unrestricted for HMAC, new_from_slice cannot fail
        let mut mac = HmacSha256::new_from_slice(self.fingerprint_key.as_bytes())
            .unwrap_or_else(|_| HmacSha256::new_from_slice(b"fallback").unwrap());
        mac.update(user_agent.unwrap_or("").as_bytes());
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }
}

/// Coarse user-agent classification. This is intentionally shallow: enough
/// to render a recognizable session list, nothing more.
fn parse_user_agent(user_agent: Option<&str>) -> (DeviceType, Option<String>, Option<String>) {
    let Some(ua) = user_agent else {
        return (DeviceType::Other, None, None);
    };
    let lower = ua.to_lowercase();

    if lower.contains("ipad") {
        return (DeviceType::Tablet, Some("Apple".into()), Some("iPad".into()));
    }
    if lower.contains("iphone") {
        return (
            DeviceType::Mobile,
            Some("Apple".into()),
            Some("iPhone".into()),
        );
    }
    if lower.contains("android") {
        let device_type = if lower.contains("mobile") {
            DeviceType::Mobile
        } else {
            DeviceType::Tablet
        };
        return (device_type, Some("Android".into()), None);
    }
    if lower.contains("windows") {
        return (DeviceType::Desktop, Some("Windows".into()), None);
    }
    if lower.contains("macintosh") || lower.contains("mac os x") {
        return (DeviceType::Desktop, Some("Apple".into()), Some("Mac".into()));
    }
    if lower.contains("linux") || lower.contains("x11") {
        return (DeviceType::Desktop, Some("Linux".into()), None);
    }

    (DeviceType::Other, None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> DeviceResolver {
        DeviceResolver::new("test-fingerprint-key".to_string())
    }

    #[test]
    fn test_forwarded_for_wins_over_other_sources() {
        let ctx = RequestContext {
            forwarded_for: Some("203.0.113.7, 10.0.0.1".to_string()),
            real_ip: Some("198.51.100.2".to_string()),
            remote_addr: Some("192.0.2.1:44122".to_string()),
            ..Default::default()
        };
        let device = resolver().resolve(&ctx);
        assert_eq!(device.ip_address, "203.0.113.7");
    }

    #[test]
    fn test_real_ip_then_remote_addr_fallback() {
        let ctx = RequestContext {
            real_ip: Some("198.51.100.2".to_string()),
            remote_addr: Some("192.0.2.1:44122".to_string()),
            ..Default::default()
        };
        assert_eq!(resolver().resolve(&ctx).ip_address, "198.51.100.2");

        let ctx = RequestContext {
            remote_addr: Some("192.0.2.1:44122".to_string()),
            ..Default::default()
        };
        assert_eq!(resolver().resolve(&ctx).ip_address, "192.0.2.1");
    }

    #[test]
    fn test_no_sources_defaults_to_loopback() {
        let device = resolver().resolve(&RequestContext::default());
        assert_eq!(device.ip_address, "127.0.0.1");
    }

    #[test]
    fn test_client_fingerprint_is_trusted() {
        let ctx = RequestContext {
            client_fingerprint: Some("client-fp-abc".to_string()),
            ..Default::default()
        };
        assert_eq!(resolver().resolve(&ctx).fingerprint, "client-fp-abc");
    }

    #[test]
    fn test_derived_fingerprint_is_stable_per_device() {
        let ctx = RequestContext {
            user_agent: Some("Mozilla/5.0 (Windows NT 10.0)".to_string()),
            remote_addr: Some("192.0.2.1:1000".to_string()),
            ..Default::default()
        };
        let a = resolver().resolve(&ctx);
        let b = resolver().resolve(&ctx);
        assert_eq!(a.fingerprint, b.fingerprint);

        let other = RequestContext {
            user_agent: Some("Mozilla/5.0 (iPhone)".to_string()),
            remote_addr: Some("192.0.2.1:1000".to_string()),
            ..Default::default()
        };
        assert_ne!(a.fingerprint, resolver().resolve(&other).fingerprint);
    }

    #[test]
    fn test_derived_fingerprint_survives_ip_change() {
        // Same browser roaming between networks stays the same device
        let home = RequestContext {
            user_agent: Some("Mozilla/5.0 (Windows NT 10.0)".to_string()),
            forwarded_for: Some("203.0.113.7".to_string()),
            ..Default::default()
        };
        let mobile = RequestContext {
            user_agent: Some("Mozilla/5.0 (Windows NT 10.0)".to_string()),
            forwarded_for: Some("198.51.100.9".to_string()),
            ..Default::default()
        };

        let a = resolver().resolve(&home);
        let b = resolver().resolve(&mobile);
        assert_ne!(a.ip_address, b.ip_address);
        assert_eq!(a.fingerprint, b.fingerprint);
    }

    #[test]
    fn test_user_agent_classification() {
        let cases = [
            ("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0)", DeviceType::Mobile),
            ("Mozilla/5.0 (iPad; CPU OS 17_0)", DeviceType::Tablet),
            ("Mozilla/5.0 (Linux; Android 14; Pixel 8) Mobile", DeviceType::Mobile),
            ("Mozilla/5.0 (Windows NT 10.0; Win64; x64)", DeviceType::Desktop),
            ("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)", DeviceType::Desktop),
            ("curl/8.4.0", DeviceType::Other),
        ];
        for (ua, expected) in cases {
            let ctx = RequestContext {
                user_agent: Some(ua.to_string()),
                ..Default::default()
            };
            assert_eq!(resolver().resolve(&ctx).device_type, expected, "ua: {}", ua);
        }
    }
}
