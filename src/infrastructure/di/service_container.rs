//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{ExportService, InventoryService};
use crate::config::Settings;
use crate::infrastructure::pdf::PdfRenderer;
use crate::infrastructure::store::FileKeyValueStore;
use crate::infrastructure::traits::{DocumentRenderer, FileSystem, KeyValueStore, RealFileSystem};

/// Container holding the settings and I/O implementations services are built from.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Snapshot storage
    pub store: Arc<dyn KeyValueStore>,

    /// Export format
    pub renderer: Arc<dyn DocumentRenderer>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let store = Arc::new(FileKeyValueStore::new(fs.clone(), settings.data_dir.clone()));
        Self::with_deps(settings, fs, store, Arc::new(PdfRenderer::default()))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        store: Arc<dyn KeyValueStore>,
        renderer: Arc<dyn DocumentRenderer>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            store,
            renderer,
        }
    }

    pub fn inventory(&self) -> InventoryService {
        InventoryService::new(self.store.clone(), self.settings.storage_key.clone())
    }

    pub fn exporter(&self) -> ExportService {
        ExportService::new(
            self.fs.clone(),
            self.renderer.clone(),
            self.settings.export.title.clone(),
        )
    }
}
