//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (KeyValueStore, FileSystem, DocumentRenderer)
//! but are themselves concrete structs, not traits.

mod export;
mod inventory;

pub use export::{ExportReport, ExportService};
pub use inventory::{InventoryService, Submission};
