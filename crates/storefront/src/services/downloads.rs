//! Temporary download references.
//!
//! A generated certificate is parked here under a random token and handed to
//! the first request for that token. Tokens nobody claims expire after the
//! configured time-to-live, and the store never holds more than
//! [`MAX_PENDING_DOWNLOADS`] documents.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use uuid::Uuid;

use crate::documents::Document;

/// Upper bound on documents waiting to be downloaded.
pub const MAX_PENDING_DOWNLOADS: u64 = 10_000;

/// One-shot store of generated documents.
#[derive(Clone)]
pub struct DownloadStore {
    cache: Cache<Uuid, Arc<Document>>,
}

impl DownloadStore {
    /// Create a store whose entries expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, MAX_PENDING_DOWNLOADS)
    }

    #[must_use]
    pub fn with_capacity(ttl: Duration, capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Park a document and return its token.
    pub async fn register(&self, document: Document) -> Uuid {
        let token = Uuid::new_v4();
        tracing::debug!(%token, filename = %document.filename, "Download registered");
        self.cache.insert(token, Arc::new(document)).await;
        token
    }

    /// Remove and return the document behind `token`.
    ///
    /// Returns `None` for unknown, expired or already-claimed tokens.
    pub async fn take(&self, token: Uuid) -> Option<Arc<Document>> {
        // `remove` hands back entries past their TTL, `get` does not.
        self.cache.get(&token).await?;
        let document = self.cache.remove(&token).await;
        if document.is_some() {
            tracing::debug!(%token, "Download released");
        }
        document
    }

    /// Whether a token is still waiting to be claimed.
    pub async fn contains(&self, token: Uuid) -> bool {
        self.cache.get(&token).await.is_some()
    }
}

impl std::fmt::Debug for DownloadStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadStore")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn document(name: &str) -> Document {
        Document {
            filename: format!("{name}.html"),
            body: format!("<p>{name}</p>"),
        }
    }

    #[tokio::test]
    async fn test_take_is_one_shot() {
        let store = DownloadStore::new(Duration::from_secs(60));
        let token = store.register(document("a")).await;

        assert!(store.contains(token).await);
        let doc = store.take(token).await.unwrap();
        assert_eq!(doc.filename, "a.html");
        assert!(store.take(token).await.is_none());
        assert!(!store.contains(token).await);
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let store = DownloadStore::new(Duration::from_secs(60));
        assert!(store.take(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_tokens_are_distinct() {
        let store = DownloadStore::new(Duration::from_secs(60));
        let a = store.register(document("a")).await;
        let b = store.register(document("b")).await;
        assert_ne!(a, b);
        assert_eq!(store.take(b).await.unwrap().filename, "b.html");
        assert_eq!(store.take(a).await.unwrap().filename, "a.html");
    }

    #[tokio::test]
    async fn test_expired_token_is_gone() {
        let store = DownloadStore::new(Duration::from_millis(20));
        let token = store.register(document("a")).await;
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(!store.contains(token).await);
        assert!(store.take(token).await.is_none());
    }
}
