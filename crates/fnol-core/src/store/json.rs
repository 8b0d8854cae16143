//! Claim store persisted as a JSON file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::{ClaimStore, MemoryStore, NewClaim, Result};
use crate::error::StorageError;
use crate::models::claim::{ClaimAnalysis, StoredClaim};

/// Claims kept in memory and rewritten to a JSON file on every save.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
    /// Held from insert until the file write finishes, so snapshots land in id order.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store, loading existing claims if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let claims: Vec<StoredClaim> = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            Vec::new()
        };

        info!("Opened claim store {} with {} claims", path.display(), claims.len());
        Ok(Self {
            path,
            inner: MemoryStore::with_claims(claims),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, claims: &[StoredClaim]) -> Result<()> {
        let parent = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };

        let content = serde_json::to_string_pretty(claims)?;
        let mut file = NamedTempFile::new_in(parent)?;
        file.write_all(content.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;

        debug!("Wrote {} claims to {}", claims.len(), self.path.display());
        Ok(())
    }
}

impl ClaimStore for JsonFileStore {
    fn save(&self, analysis: &ClaimAnalysis) -> Result<StoredClaim> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        let (stored, snapshot) = self.inner.insert(NewClaim::from_analysis(analysis))?;
        if let Err(e) = self.persist(&snapshot) {
            self.inner.remove(stored.id)?;
            return Err(e);
        }
        Ok(stored)
    }

    fn list(&self) -> Result<Vec<StoredClaim>> {
        self.inner.list()
    }

    fn get(&self, id: u64) -> Result<Option<StoredClaim>> {
        self.inner.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::claim::{ClaimRoute, ExtractedFields, RoutingDecision};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::thread;

    fn analysis(date: &str) -> ClaimAnalysis {
        ClaimAnalysis {
            decision: RoutingDecision {
                route: ClaimRoute::Investigation,
                reasoning: "flagged".to_string(),
                missing_fields: Vec::new(),
                extracted_fields: ExtractedFields {
                    incident_date: Some(date.to_string()),
                    ..ExtractedFields::default()
                },
            },
            raw_text: "staged collision".to_string(),
        }
    }

    #[test]
    fn test_claims_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("claims.json");

        {
            let store = JsonFileStore::open(&path).unwrap();
            store.save(&analysis("2024-01-31")).unwrap();
            store.save(&analysis("bad date")).unwrap();
        }

        let store = JsonFileStore::open(&path).unwrap();
        let claims = store.list().unwrap();
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[0].incident_date, chrono::NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(claims[1].incident_date, None);
        assert_eq!(claims[1].recommended_route, ClaimRoute::Investigation);

        let third = store.save(&analysis("1/1/2024")).unwrap();
        assert_eq!(third.id, 3);
    }

    #[test]
    fn test_concurrent_saves_all_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claims.json");
        let store = Arc::new(JsonFileStore::open(&path).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..25 {
                        store.save(&analysis("2024-01-31")).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let ids: Vec<u64> = store.list().unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, (1..=200).collect::<Vec<_>>());

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.list().unwrap().len(), 200);
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_empty_file_opens_empty() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let store = JsonFileStore::open(file.path()).unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(JsonFileStore::open(file.path()).is_err());
    }
}
