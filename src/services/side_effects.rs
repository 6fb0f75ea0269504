use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for swallowed side-effect failures.
///
/// Geo lookups, audit writes and notification fan-out never fail the primary
/// request; these counters keep the failures visible to operators instead of
/// silently discarding them.
#[derive(Debug, Default)]
pub struct SideEffectCounters {
    geo_lookup_failures: AtomicU64,
    audit_write_failures: AtomicU64,
    notify_failures: AtomicU64,
    mail_failures: AtomicU64,
}

impl SideEffectCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_geo_failure(&self) {
        self.geo_lookup_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_audit_failure(&self) {
        self.audit_write_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_notify_failure(&self) {
        self.notify_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_mail_failure(&self) {
        self.mail_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn geo_lookup_failures(&self) -> u64 {
        self.geo_lookup_failures.load(Ordering::Relaxed)
    }

    pub fn audit_write_failures(&self) -> u64 {
        self.audit_write_failures.load(Ordering::Relaxed)
    }

    pub fn notify_failures(&self) -> u64 {
        self.notify_failures.load(Ordering::Relaxed)
    }

    pub fn mail_failures(&self) -> u64 {
        self.mail_failures.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate_independently() {
        let counters = SideEffectCounters::new();
        counters.record_geo_failure();
        counters.record_geo_failure();
        counters.record_notify_failure();

        assert_eq!(counters.geo_lookup_failures(), 2);
        assert_eq!(counters.notify_failures(), 1);
        assert_eq!(counters.audit_write_failures(), 0);
        assert_eq!(counters.mail_failures(), 0);
    }
}
