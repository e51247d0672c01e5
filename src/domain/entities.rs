//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// One inventory line, identified by `(item, brand)`.
///
/// Serialized as `{"item": ..., "brand": ..., "available": ...}`, which is the
/// snapshot format kept in the key/value store. Deserialization goes through
/// [`Entry::new`], so a snapshot cannot smuggle in an empty item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawEntry")]
pub struct Entry {
    pub item: String,
    pub brand: String,
    pub available: i64,
}

#[derive(Deserialize)]
struct RawEntry {
    item: String,
    brand: String,
    available: i64,
}

impl TryFrom<RawEntry> for Entry {
    type Error = DomainError;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        Entry::new(raw.item, raw.brand, Quantity::new(raw.available))
    }
}

impl Entry {
    /// Create an entry, rejecting an empty item name.
    ///
    /// Names are kept verbatim: identity is exact string equality, so no
    /// trimming or case folding happens here.
    pub fn new(
        item: impl Into<String>,
        brand: impl Into<String>,
        available: Quantity,
    ) -> Result<Self, DomainError> {
        let item = item.into();
        if item.is_empty() {
            return Err(DomainError::EmptyItem);
        }
        Ok(Self {
            item,
            brand: brand.into(),
            available: available.value(),
        })
    }

    /// The `(item, brand)` identity pair.
    pub fn identity(&self) -> (&str, &str) {
        (&self.item, &self.brand)
    }

    /// Exact, case-sensitive identity comparison.
    pub fn same_identity(&self, other: &Entry) -> bool {
        self.identity() == other.identity()
    }
}

/// How a submission for an existing identity is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    /// Add the submitted quantity to the existing one
    #[default]
    Add,
    /// Overwrite the existing quantity
    #[serde(alias = "update")]
    Replace,
}

impl MergeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeMode::Add => "add",
            MergeMode::Replace => "replace",
        }
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(MergeMode::Add),
            // "update" is the label the browser form used
            "replace" | "update" => Ok(MergeMode::Replace),
            other => Err(DomainError::InvalidMode(other.to_string())),
        }
    }
}

/// A validated whole-number quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quantity(i64);

impl Quantity {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Parse user-entered quantity text.
    ///
    /// Surrounding whitespace and a leading sign are accepted. Anything else
    /// that is not a base-10 integer (empty text, `"3.5"`, `"12abc"`, `"NaN"`)
    /// is rejected instead of being coerced.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        input
            .trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| DomainError::InvalidQuantity {
                input: input.to_string(),
            })
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl FromStr for Quantity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
