use std::fmt;

/// Derived session status.
///
/// Never persisted: always recomputed from the two governing timestamps so a
/// stored flag can never drift from them. Revocation wins over expiry because
/// it records an explicit action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Revoked,
    Expired,
}

impl SessionStatus {
    /// Pure function over the two nullable timestamps.
    pub fn derive(revoked_at: Option<i64>, expires_at: i64, now: i64) -> SessionStatus {
        if revoked_at.is_some() {
            SessionStatus::Revoked
        } else if expires_at < now {
            SessionStatus::Expired
        } else {
            SessionStatus::Active
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Revoked => "revoked",
            SessionStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_statuses_are_mutually_exclusive_and_exhaustive() {
        let cases = [
            (None, NOW + 100, SessionStatus::Active),
            (None, NOW - 1, SessionStatus::Expired),
            (Some(NOW - 50), NOW + 100, SessionStatus::Revoked),
            // revocation wins even when the expiry has also passed
            (Some(NOW - 50), NOW - 10, SessionStatus::Revoked),
        ];

        for (revoked_at, expires_at, expected) in cases {
            let status = SessionStatus::derive(revoked_at, expires_at, NOW);
            assert_eq!(status, expected);

            let revoked = revoked_at.is_some();
            let expired = !revoked && expires_at < NOW;
            let active = !revoked && !expired;
            assert_eq!(status.is_active(), active);
            assert_eq!(status == SessionStatus::Revoked, revoked);
            assert_eq!(status == SessionStatus::Expired, expired);
        }
    }

    #[test]
    fn test_boundary_expiry_is_still_active() {
        // expires_at == now is not yet expired (strict less-than)
        assert_eq!(
            SessionStatus::derive(None, NOW, NOW),
            SessionStatus::Active
        );
    }
}
