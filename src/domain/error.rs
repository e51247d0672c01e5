//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent ledger rule violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid quantity: {input:?} is not a whole number")]
    InvalidQuantity { input: String },

    #[error("item name must not be empty")]
    EmptyItem,

    #[error("quantity overflow for {item} ({brand}): {current} + {delta}")]
    QuantityOverflow {
        item: String,
        brand: String,
        current: i64,
        delta: i64,
    },

    #[error("unknown mode: {0:?} (expected add or replace)")]
    InvalidMode(String),
}
