//! Export service
//!
//! Projects the sorted view into a [`TableDocument`], renders it and writes
//! the result. Export only reads the ledger.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt, TableDocument};
use crate::domain::Ledger;
use crate::infrastructure::traits::{DocumentRenderer, FileSystem};

/// Summary of a finished export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub rows: usize,
    pub bytes: usize,
}

pub struct ExportService {
    fs: Arc<dyn FileSystem>,
    renderer: Arc<dyn DocumentRenderer>,
    title: String,
}

impl ExportService {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        renderer: Arc<dyn DocumentRenderer>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            fs,
            renderer,
            title: title.into(),
        }
    }

    /// The table that would be exported for `ledger`.
    pub fn document(&self, ledger: &Ledger) -> TableDocument {
        TableDocument::grocery_list(self.title.clone(), &ledger.sorted_view())
    }

    /// `target`, with the renderer's extension added when it has none.
    pub fn resolve_target(&self, target: &Path) -> PathBuf {
        if target.extension().is_some() {
            target.to_path_buf()
        } else {
            target.with_extension(self.renderer.extension())
        }
    }

    /// Render the ledger and write it to `target`.
    #[instrument(skip(self, ledger), fields(entries = ledger.len()))]
    pub fn export(&self, ledger: &Ledger, target: &Path) -> ApplicationResult<ExportReport> {
        let target = self.resolve_target(target);
        let target = target.as_path();
        let document = self.document(ledger);
        let bytes = self
            .renderer
            .render(&document)
            .map_err(|message| ApplicationError::Export {
                path: target.to_path_buf(),
                message,
            })?;

        self.fs
            .ensure_parent(target)
            .with_path_context("create export directory", target)?;
        self.fs
            .write(target, &bytes)
            .with_path_context("write export", target)?;
        debug!("export: wrote {} bytes to {}", bytes.len(), target.display());

        Ok(ExportReport {
            path: target.to_path_buf(),
            rows: document.rows.len(),
            bytes: bytes.len(),
        })
    }
}
