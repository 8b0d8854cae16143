//! In-process claim store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use tracing::debug;

use super::{ClaimStore, NewClaim, Result};
use crate::error::StorageError;
use crate::models::claim::{ClaimAnalysis, StoredClaim};

/// Claims held in memory, keyed by id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    claims: RwLock<BTreeMap<u64, StoredClaim>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records.
    pub fn with_claims(claims: impl IntoIterator<Item = StoredClaim>) -> Self {
        Self {
            claims: RwLock::new(claims.into_iter().map(|c| (c.id, c)).collect()),
        }
    }

    /// Insert a claim under the next id and return a snapshot of all claims.
    pub(super) fn insert(&self, claim: NewClaim) -> Result<(StoredClaim, Vec<StoredClaim>)> {
        let mut claims = self.claims.write().map_err(|_| StorageError::Poisoned)?;
        let id = claims.keys().next_back().map_or(1, |last| last + 1);
        let stored = claim.into_stored(id);
        claims.insert(id, stored.clone());
        debug!("Stored claim {} ({} total)", id, claims.len());
        Ok((stored, claims.values().cloned().collect()))
    }

    /// Remove a claim, used to undo an insert whose persistence failed.
    pub(super) fn remove(&self, id: u64) -> Result<()> {
        let mut claims = self.claims.write().map_err(|_| StorageError::Poisoned)?;
        claims.remove(&id);
        Ok(())
    }
}

impl ClaimStore for MemoryStore {
    fn save(&self, analysis: &ClaimAnalysis) -> Result<StoredClaim> {
        self.insert(NewClaim::from_analysis(analysis)).map(|(stored, _)| stored)
    }

    fn list(&self) -> Result<Vec<StoredClaim>> {
        let claims = self.claims.read().map_err(|_| StorageError::Poisoned)?;
        Ok(claims.values().cloned().collect())
    }

    fn get(&self, id: u64) -> Result<Option<StoredClaim>> {
        let claims = self.claims.read().map_err(|_| StorageError::Poisoned)?;
        Ok(claims.get(&id).cloned())
    }
}
