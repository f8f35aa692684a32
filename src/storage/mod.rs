//! History and cost data persistence
//!
//! Snapshots go to the remote database when one is configured and reachable,
//! otherwise to local JSON files.

pub mod local;
pub mod supabase;

pub use self::local::{default_locations, LocalStore, LocationCosts};
pub use self::supabase::SupabaseClient;

use tracing::warn;

use crate::error::StorageError;
use crate::models::HistorySnapshot;

/// A place history snapshots can be kept
pub trait HistoryStore: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    fn insert(&self, snapshot: &HistorySnapshot) -> Result<(), StorageError>;

    /// Every stored snapshot, newest first
    fn all(&self) -> Result<Vec<HistorySnapshot>, StorageError>;

    fn delete_all(&self) -> Result<(), StorageError>;

    fn count(&self) -> Result<usize, StorageError> {
        Ok(self.all()?.len())
    }
}

/// Where a snapshot ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredIn {
    Primary,
    Fallback,
}

/// Primary store with a local fallback used whenever the primary fails
pub struct HistoryRepository {
    primary: Option<Box<dyn HistoryStore>>,
    fallback: Box<dyn HistoryStore>,
}

impl HistoryRepository {
    pub fn new(primary: Option<Box<dyn HistoryStore>>, fallback: Box<dyn HistoryStore>) -> Self {
        Self { primary, fallback }
    }

    /// Repository backed by local files only
    pub fn local_only(fallback: Box<dyn HistoryStore>) -> Self {
        Self::new(None, fallback)
    }

    pub fn is_remote(&self) -> bool {
        self.primary.is_some()
    }

    pub fn save(&self, snapshot: &HistorySnapshot) -> Result<StoredIn, StorageError> {
        if let Some(primary) = &self.primary {
            match primary.insert(snapshot) {
                Ok(()) => return Ok(StoredIn::Primary),
                Err(e) => warn!(store = primary.name(), error = %e, "saving snapshot failed, using fallback"),
            }
        }
        self.fallback.insert(snapshot)?;
        Ok(StoredIn::Fallback)
    }

    pub fn load_all(&self) -> Result<Vec<HistorySnapshot>, StorageError> {
        if let Some(primary) = &self.primary {
            match primary.all() {
                Ok(snapshots) => return Ok(snapshots),
                Err(e) => warn!(store = primary.name(), error = %e, "loading history failed, using fallback"),
            }
        }
        self.fallback.all()
    }

    /// Clears the primary if present, otherwise the fallback
    pub fn clear(&self) -> Result<(), StorageError> {
        match &self.primary {
            Some(primary) => primary.delete_all(),
            None => self.fallback.delete_all(),
        }
    }

    pub fn count(&self) -> Result<usize, StorageError> {
        if let Some(primary) = &self.primary {
            match primary.count() {
                Ok(count) => return Ok(count),
                Err(e) => warn!(store = primary.name(), error = %e, "counting history failed, using fallback"),
            }
        }
        self.fallback.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct Unreachable;

    impl HistoryStore for Unreachable {
        fn name(&self) -> &str {
            "unreachable"
        }

        fn insert(&self, _: &HistorySnapshot) -> Result<(), StorageError> {
            Err(StorageError::NotConfigured)
        }

        fn all(&self) -> Result<Vec<HistorySnapshot>, StorageError> {
            Err(StorageError::NotConfigured)
        }

        fn delete_all(&self) -> Result<(), StorageError> {
            Err(StorageError::NotConfigured)
        }
    }

    fn snapshot(week: u32) -> HistorySnapshot {
        let date = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        HistorySnapshot::new(date, week, format!("week {}", week), vec![], vec![])
    }

    #[test]
    fn test_failing_primary_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalStore::open(dir.path()).unwrap();
        let repo = HistoryRepository::new(Some(Box::new(Unreachable)), Box::new(local));

        assert!(repo.is_remote());
        assert_eq!(repo.save(&snapshot(1)).unwrap(), StoredIn::Fallback);
        assert_eq!(repo.load_all().unwrap().len(), 1);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_clear_targets_primary() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalStore::open(dir.path()).unwrap();
        let repo = HistoryRepository::new(Some(Box::new(Unreachable)), Box::new(local));
        assert!(repo.clear().is_err());
    }

    #[test]
    fn test_local_only() {
        let dir = tempfile::tempdir().unwrap();
        let repo = HistoryRepository::local_only(Box::new(LocalStore::open(dir.path()).unwrap()));

        assert!(!repo.is_remote());
        repo.save(&snapshot(1)).unwrap();
        repo.save(&snapshot(2)).unwrap();
        let all = repo.load_all().unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].timestamp >= all[1].timestamp);

        repo.clear().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }
}
