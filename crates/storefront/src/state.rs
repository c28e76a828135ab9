//! Everything a handler needs besides the request: configuration, the
//! parsed catalogs, rendered pages and pending downloads.

use std::path::Path;
use std::sync::Arc;

use takshashil_core::CatalogError;

use crate::catalog::Datasets;
use crate::config::StorefrontConfig;
use crate::content::{ContentError, ContentStore};
use crate::services::DownloadStore;

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("failed to load content: {0}")]
    Content(#[from] ContentError),
}

/// Cloned into every handler by axum; the contents sit behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    datasets: Datasets,
    content: ContentStore,
    downloads: DownloadStore,
}

impl AppState {
    /// Parse the embedded datasets and render `content_dir/pages`.
    ///
    /// # Errors
    ///
    /// A dataset that fails validation, or an unreadable pages directory.
    pub fn new(config: StorefrontConfig, content_dir: &Path) -> Result<Self, StateError> {
        let inner = AppStateInner {
            datasets: Datasets::load()?,
            content: ContentStore::load(content_dir)?,
            downloads: DownloadStore::new(config.download_ttl),
            config,
        };
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Shop, merchandise and library datasets.
    #[must_use]
    pub fn datasets(&self) -> &Datasets {
        &self.inner.datasets
    }

    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }

    /// Documents waiting for their one-shot download.
    #[must_use]
    pub fn downloads(&self) -> &DownloadStore {
        &self.inner.downloads
    }
}
