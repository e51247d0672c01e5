//! Domain layer: entries, the ledger and its ordering rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod collation;
pub mod entities;
pub mod error;
pub mod ledger;

pub use collation::collate;
pub use entities::{Entry, MergeMode, Quantity};
pub use error::DomainError;
pub use ledger::{Ledger, MergeOutcome, SortedView};
