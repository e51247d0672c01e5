//! groc: grocery inventory ledger
//!
//! Layers, innermost first:
//! - [`domain`]: entries, merge rules, sort order
//! - [`application`]: load/submit/clear/export use cases
//! - [`infrastructure`]: file-backed store, PDF renderer, wiring
//! - [`cli`]: argument parsing and command handlers

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
