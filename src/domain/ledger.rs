//! The inventory ledger: merge-on-write list of entries
//!
//! Invariant: no two entries share an `(item, brand)` identity. Every write
//! path goes through [`Ledger::add_or_merge`] (directly or via
//! [`Ledger::replace_all`]), so the invariant holds for every reachable state.

use itertools::Itertools;

use crate::domain::{collate, DomainError, Entry, MergeMode};

/// What a submission did to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// New identity appended at the end
    Inserted(Entry),
    /// Existing quantity increased (or decreased) by the submitted amount
    Incremented { previous: i64, entry: Entry },
    /// Existing quantity overwritten
    Replaced { previous: i64, entry: Entry },
}

/// Ordered sequence of entries with unique identities.
///
/// Storage order is insertion order (merges keep the existing position);
/// display order comes from [`Ledger::sorted_view`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: Vec<Entry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from a snapshot, folding duplicate identities.
    pub fn from_entries(entries: Vec<Entry>) -> Result<Self, DomainError> {
        let mut ledger = Self::new();
        ledger.replace_all(entries)?;
        Ok(ledger)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, item: &str, brand: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.identity() == (item, brand))
    }

    /// Apply a submission.
    ///
    /// An existing identity is updated in place according to `mode`; a new
    /// identity is appended. On error the ledger is unchanged.
    pub fn add_or_merge(
        &mut self,
        entry: Entry,
        mode: MergeMode,
    ) -> Result<MergeOutcome, DomainError> {
        let Some(index) = self.entries.iter().position(|e| e.same_identity(&entry)) else {
            self.entries.push(entry.clone());
            return Ok(MergeOutcome::Inserted(entry));
        };

        let existing = &mut self.entries[index];
        let previous = existing.available;
        match mode {
            MergeMode::Add => {
                existing.available = previous.checked_add(entry.available).ok_or_else(|| {
                    DomainError::QuantityOverflow {
                        item: entry.item.clone(),
                        brand: entry.brand.clone(),
                        current: previous,
                        delta: entry.available,
                    }
                })?;
                Ok(MergeOutcome::Incremented {
                    previous,
                    entry: existing.clone(),
                })
            }
            MergeMode::Replace => {
                existing.available = entry.available;
                Ok(MergeOutcome::Replaced {
                    previous,
                    entry: existing.clone(),
                })
            }
        }
    }

    /// Replace the whole contents, e.g. when hydrating from a snapshot.
    ///
    /// Duplicate identities in the input are summed into the first occurrence.
    /// All-or-nothing: on error the previous contents are kept.
    pub fn replace_all(
        &mut self,
        entries: impl IntoIterator<Item = Entry>,
    ) -> Result<(), DomainError> {
        let mut next = Self::new();
        for entry in entries {
            next.add_or_merge(entry, MergeMode::Add)?;
        }
        *self = next;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries ordered by item, then brand.
    pub fn sorted_view(&self) -> SortedView<'_> {
        let order = self
            .entries
            .iter()
            .sorted_by(|a, b| collate(&a.item, &b.item).then_with(|| collate(&a.brand, &b.brand)))
            .collect();
        SortedView { order }
    }
}

/// Read-only, display-ordered projection of a [`Ledger`].
///
/// Borrowing the ledger keeps it from being mutated while a view is alive;
/// [`SortedView::iter`] can be called any number of times.
#[derive(Debug, Clone)]
pub struct SortedView<'a> {
    order: Vec<&'a Entry>,
}

impl<'a> SortedView<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &'a Entry> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<'v, 'a> IntoIterator for &'v SortedView<'a> {
    type Item = &'a Entry;
    type IntoIter = std::iter::Copied<std::slice::Iter<'v, &'a Entry>>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter().copied()
    }
}
