use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use allpi_core::{RepoRef, TreeListing};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::FetchError;

/// Anything that can produce a recursive tree listing for a branch.
#[async_trait]
pub trait TreeSource: Send + Sync {
    async fn fetch_tree(&self, repo: &RepoRef) -> Result<TreeListing, FetchError>;
}

#[async_trait]
impl<T: TreeSource + ?Sized> TreeSource for Arc<T> {
    async fn fetch_tree(&self, repo: &RepoRef) -> Result<TreeListing, FetchError> {
        (**self).fetch_tree(repo).await
    }
}

#[derive(Clone)]
struct CachedListing {
    listing: TreeListing,
    fetched_at: Instant,
}

/// Reuses successful listings for up to `ttl`.
///
/// Errors are never cached. A zero `ttl` turns the wrapper into a plain
/// pass-through, which is the default: every request sees the remote as it
/// is now.
pub struct CachedTreeSource<S> {
    inner: S,
    ttl: Duration,
    entries: RwLock<HashMap<RepoRef, CachedListing>>,
}

impl<S: TreeSource> CachedTreeSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Drop every cached listing.
    pub async fn invalidate(&self) {
        self.entries.write().await.clear();
    }

    async fn fresh(&self, repo: &RepoRef) -> Option<TreeListing> {
        let entries = self.entries.read().await;
        entries
            .get(repo)
            .filter(|cached| cached.fetched_at.elapsed() < self.ttl)
            .map(|cached| cached.listing.clone())
    }
}

#[async_trait]
impl<S: TreeSource> TreeSource for CachedTreeSource<S> {
    async fn fetch_tree(&self, repo: &RepoRef) -> Result<TreeListing, FetchError> {
        if self.ttl.is_zero() {
            return self.inner.fetch_tree(repo).await;
        }
        if let Some(listing) = self.fresh(repo).await {
            tracing::debug!(repo = %repo, "tree cache hit");
            return Ok(listing);
        }

        let listing = self.inner.fetch_tree(repo).await?;
        let mut entries = self.entries.write().await;
        entries.retain(|_, cached| cached.fetched_at.elapsed() < self.ttl);
        entries.insert(
            repo.clone(),
            CachedListing {
                listing: listing.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(listing)
    }
}
