//! Port traits for collaborators the planner reads from.

use crate::ids::AppId;
use crate::version::ReleaseRecord;
use semver::Version;
use std::collections::BTreeMap;

/// Release history for applications, e.g. read from repository tags.
pub trait ReleaseHistory {
    /// Release state for an application, `None` when it is unknown.
    fn lookup(&self, app_id: &AppId) -> Option<ReleaseRecord>;

    fn has_release(&self, app_id: &AppId) -> bool {
        self.lookup(app_id).is_some_and(|r| r.has_release)
    }

    fn last_version(&self, app_id: &AppId) -> Option<Version> {
        self.lookup(app_id).and_then(|r| r.version)
    }
}

/// In-memory release history.
#[derive(Debug, Clone, Default)]
pub struct StaticReleaseHistory {
    records: BTreeMap<AppId, ReleaseRecord>,
}

impl StaticReleaseHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_release(mut self, app_id: impl Into<AppId>, version: Version) -> Self {
        self.records
            .insert(app_id.into(), ReleaseRecord::released(version));
        self
    }

    pub fn insert(&mut self, app_id: impl Into<AppId>, record: ReleaseRecord) {
        self.records.insert(app_id.into(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<(AppId, ReleaseRecord)> for StaticReleaseHistory {
    fn from_iter<I: IntoIterator<Item = (AppId, ReleaseRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl ReleaseHistory for StaticReleaseHistory {
    fn lookup(&self, app_id: &AppId) -> Option<ReleaseRecord> {
        self.records.get(app_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_history_lookup() {
        let mut history = StaticReleaseHistory::new().with_release("core", Version::new(1, 4, 9));
        history.insert("web", ReleaseRecord::unreleased());

        assert!(history.has_release(&AppId::new("core")));
        assert_eq!(
            history.last_version(&AppId::new("core")),
            Some(Version::new(1, 4, 9))
        );
        assert!(!history.has_release(&AppId::new("web")));
        assert!(history.lookup(&AppId::new("web")).is_some());
        assert!(history.lookup(&AppId::new("cli")).is_none());
        assert_eq!(history.len(), 2);
    }
}
