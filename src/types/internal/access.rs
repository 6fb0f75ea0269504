use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Protected resource categories, one permission set each.
///
/// Closed enum: the grants map always carries every category, so an absent
/// key can never be confused with an empty set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    Users,
    WorkspaceAccounts,
    Reporting,
    Releases,
    Tracks,
    Videos,
    Ringtones,
    Artists,
    Performers,
    Engineers,
    Writers,
    Publishers,
    Labels,
    Transactions,
    Withdrawals,
    Consumption,
    Engagement,
    Revenue,
    Geo,
    RightsManagement,
}

impl ResourceCategory {
    pub const ALL: [ResourceCategory; 20] = [
        ResourceCategory::Users,
        ResourceCategory::WorkspaceAccounts,
        ResourceCategory::Reporting,
        ResourceCategory::Releases,
        ResourceCategory::Tracks,
        ResourceCategory::Videos,
        ResourceCategory::Ringtones,
        ResourceCategory::Artists,
        ResourceCategory::Performers,
        ResourceCategory::Engineers,
        ResourceCategory::Writers,
        ResourceCategory::Publishers,
        ResourceCategory::Labels,
        ResourceCategory::Transactions,
        ResourceCategory::Withdrawals,
        ResourceCategory::Consumption,
        ResourceCategory::Engagement,
        ResourceCategory::Revenue,
        ResourceCategory::Geo,
        ResourceCategory::RightsManagement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceCategory::Users => "users",
            ResourceCategory::WorkspaceAccounts => "workspace_accounts",
            ResourceCategory::Reporting => "reporting",
            ResourceCategory::Releases => "releases",
            ResourceCategory::Tracks => "tracks",
            ResourceCategory::Videos => "videos",
            ResourceCategory::Ringtones => "ringtones",
            ResourceCategory::Artists => "artists",
            ResourceCategory::Performers => "performers",
            ResourceCategory::Engineers => "engineers",
            ResourceCategory::Writers => "writers",
            ResourceCategory::Publishers => "publishers",
            ResourceCategory::Labels => "labels",
            ResourceCategory::Transactions => "transactions",
            ResourceCategory::Withdrawals => "withdrawals",
            ResourceCategory::Consumption => "consumption",
            ResourceCategory::Engagement => "engagement",
            ResourceCategory::Revenue => "revenue",
            ResourceCategory::Geo => "geo",
            ResourceCategory::RightsManagement => "rights_management",
        }
    }

    pub fn parse(s: &str) -> Option<ResourceCategory> {
        ResourceCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Permission level within one resource category.
///
/// Levels cascade for UI purposes only. The stored set is explicit and the
/// evaluator does plain membership checks, never ordering comparisons.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    View,
    Create,
    Update,
    Delete,
}

impl PermissionLevel {
    pub const ALL: [PermissionLevel; 4] = [
        PermissionLevel::View,
        PermissionLevel::Create,
        PermissionLevel::Update,
        PermissionLevel::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionLevel::View => "view",
            PermissionLevel::Create => "create",
            PermissionLevel::Update => "update",
            PermissionLevel::Delete => "delete",
        }
    }

    pub fn parse(s: &str) -> Option<PermissionLevel> {
        PermissionLevel::ALL.iter().copied().find(|l| l.as_str() == s)
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-category permission sets for one system user.
///
/// Every category is always present (possibly empty). Sets round-trip through
/// JSON exactly as stored: no implicit expansion of cascading levels.
/// Deliberately not `Deserialize`: `from_json` is the only parse path, and it
/// normalizes missing categories so `levels` always has a set to return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionGrants(BTreeMap<ResourceCategory, BTreeSet<PermissionLevel>>);

impl PermissionGrants {
    /// All categories present, all sets empty
    pub fn empty() -> Self {
        let mut map = BTreeMap::new();
        for category in ResourceCategory::ALL {
            map.insert(category, BTreeSet::new());
        }
        PermissionGrants(map)
    }

    /// Build from explicit (category, levels) pairs; unlisted categories get
    /// empty sets so the fixed schema holds.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (ResourceCategory, Vec<PermissionLevel>)>,
    {
        let mut grants = PermissionGrants::empty();
        for (category, levels) in pairs {
            grants.0.insert(category, levels.into_iter().collect());
        }
        grants
    }

    pub fn set(&mut self, category: ResourceCategory, levels: Vec<PermissionLevel>) {
        self.0.insert(category, levels.into_iter().collect());
    }

    pub fn levels(&self, category: ResourceCategory) -> &BTreeSet<PermissionLevel> {
        // Every category is inserted at construction; the expect is unreachable
        // for any value built through this type's constructors.
        self.0
            .get(&category)
            .expect("grants map always carries all categories")
    }

    /// Membership check. No ordering logic: holding UPDATE does not imply VIEW
    /// here, only the stored set counts.
    pub fn contains(&self, category: ResourceCategory, level: PermissionLevel) -> bool {
        self.0
            .get(&category)
            .map(|levels| levels.contains(&level))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|levels| levels.is_empty())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a stored grants column. Categories missing from the stored blob
    /// (older rows, manual edits) are normalized to empty sets; unknown keys
    /// are rejected by the closed enum.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let parsed: BTreeMap<ResourceCategory, BTreeSet<PermissionLevel>> =
            serde_json::from_str(raw)?;
        let mut grants = PermissionGrants::empty();
        for (category, levels) in parsed {
            grants.0.insert(category, levels);
        }
        Ok(grants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_grants_carry_all_twenty_categories() {
        let grants = PermissionGrants::empty();
        for category in ResourceCategory::ALL {
            assert!(grants.levels(category).is_empty());
        }
        assert_eq!(ResourceCategory::ALL.len(), 20);
    }

    #[test]
    fn test_membership_is_explicit_not_cascading() {
        let grants = PermissionGrants::from_pairs([(
            ResourceCategory::Tracks,
            vec![PermissionLevel::Update],
        )]);

        assert!(grants.contains(ResourceCategory::Tracks, PermissionLevel::Update));
        // UPDATE does not imply VIEW at evaluation time
        assert!(!grants.contains(ResourceCategory::Tracks, PermissionLevel::View));
        assert!(!grants.contains(ResourceCategory::Releases, PermissionLevel::Update));
    }

    #[test]
    fn test_json_round_trip_is_exact() {
        let grants = PermissionGrants::from_pairs([(
            ResourceCategory::Users,
            vec![PermissionLevel::View, PermissionLevel::Create],
        )]);

        let raw = grants.to_json().unwrap();
        let restored = PermissionGrants::from_json(&raw).unwrap();

        assert_eq!(grants, restored);
        let levels = restored.levels(ResourceCategory::Users);
        assert_eq!(levels.len(), 2);
        assert!(levels.contains(&PermissionLevel::View));
        assert!(levels.contains(&PermissionLevel::Create));
        // No implicit expansion or contraction
        assert!(!levels.contains(&PermissionLevel::Update));
    }

    #[test]
    fn test_from_json_normalizes_missing_categories() {
        let raw = r#"{"reporting":["view"]}"#;
        let grants = PermissionGrants::from_json(raw).unwrap();

        assert!(grants.contains(ResourceCategory::Reporting, PermissionLevel::View));
        assert!(grants.levels(ResourceCategory::Geo).is_empty());
    }

    #[test]
    fn test_from_json_rejects_unknown_category() {
        let raw = r#"{"spaceships":["view"]}"#;
        assert!(PermissionGrants::from_json(raw).is_err());
    }

    #[test]
    fn test_category_string_round_trip() {
        for category in ResourceCategory::ALL {
            assert_eq!(ResourceCategory::parse(category.as_str()), Some(category));
        }
        assert_eq!(ResourceCategory::parse("nope"), None);
    }
}
