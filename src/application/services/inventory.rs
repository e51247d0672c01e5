//! Inventory service
//!
//! Hydrates the ledger from the key/value store, applies form submissions and
//! persists the full snapshot after every mutation.

use std::io;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{DomainError, Entry, Ledger, MergeMode, MergeOutcome, Quantity};
use crate::infrastructure::traits::KeyValueStore;

/// Raw values as typed by the user, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub item: String,
    pub brand: String,
    pub available: String,
}

impl Submission {
    pub fn new(
        item: impl Into<String>,
        brand: impl Into<String>,
        available: impl Into<String>,
    ) -> Self {
        Self {
            item: item.into(),
            brand: brand.into(),
            available: available.into(),
        }
    }

    /// Parse and validate into an [`Entry`].
    pub fn into_entry(self) -> Result<Entry, DomainError> {
        let quantity = Quantity::parse(&self.available)?;
        Entry::new(self.item, self.brand, quantity)
    }
}

/// Service owning the persistence contract of the ledger.
pub struct InventoryService {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl InventoryService {
    /// Create a new inventory service persisting under `key`.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the persisted ledger.
    ///
    /// A missing snapshot, or one that cannot be decoded (including one that
    /// is not UTF-8), yields an empty ledger; the decode failure is only
    /// logged. Other read errors are returned.
    pub fn load(&self) -> ApplicationResult<Ledger> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("load: no snapshot under key {:?}", self.key);
                return Ok(Ledger::new());
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                warn!("load: discarding unreadable snapshot {:?}: {}", self.key, e);
                return Ok(Ledger::new());
            }
            Err(e) => return Err(e).with_key_context("read", &self.key),
        };

        let entries: Vec<Entry> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("load: discarding undecodable snapshot {:?}: {}", self.key, e);
                return Ok(Ledger::new());
            }
        };

        match Ledger::from_entries(entries) {
            Ok(ledger) => {
                debug!("load: {} entries", ledger.len());
                Ok(ledger)
            }
            Err(e) => {
                warn!("load: discarding inconsistent snapshot {:?}: {}", self.key, e);
                Ok(Ledger::new())
            }
        }
    }

    /// Serialize the full sequence and overwrite the stored value.
    pub fn save(&self, ledger: &Ledger) -> ApplicationResult<()> {
        let json = serde_json::to_string(ledger.entries()).map_err(|e| ApplicationError::Encode {
            key: self.key.clone(),
            message: e.to_string(),
        })?;
        self.store
            .set(&self.key, &json)
            .with_key_context("write", &self.key)?;
        debug!("save: {} entries under key {:?}", ledger.len(), self.key);
        Ok(())
    }

    /// Validate a submission, merge it and persist.
    ///
    /// The ledger is only updated once the snapshot has been written, so a
    /// rejected submission or a failed write leaves it as it was.
    pub fn submit(
        &self,
        ledger: &mut Ledger,
        submission: Submission,
        mode: MergeMode,
    ) -> ApplicationResult<MergeOutcome> {
        let entry = submission.into_entry()?;
        debug!("submit: {:?} mode={}", entry, mode);

        let mut next = ledger.clone();
        let outcome = next.add_or_merge(entry, mode)?;
        self.save(&next)?;
        *ledger = next;

        info!("submit: {:?}", outcome);
        Ok(outcome)
    }

    /// Empty the ledger and delete the stored snapshot.
    pub fn clear(&self, ledger: &mut Ledger) -> ApplicationResult<()> {
        self.store
            .remove(&self.key)
            .with_key_context("remove", &self.key)?;
        info!("clear: removed {} entries", ledger.len());
        ledger.clear();
        Ok(())
    }
}
