//! Read-cache invalidation collaborator.
//!
//! Product listings and the homepage are served from rendered-path and tag
//! caches owned by the delivery layer. Propagation treats invalidation as
//! fire-and-forget: failures are logged by the caller, never propagated.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache invalidation failed: {0}")]
    Invalidation(String),
}

impl CacheError {
    pub fn invalidation(msg: impl Into<String>) -> Self {
        Self::Invalidation(msg.into())
    }
}

#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    async fn invalidate_path(&self, path: &str) -> Result<(), CacheError>;
    async fn invalidate_tag(&self, tag: &str) -> Result<(), CacheError>;
}

#[async_trait]
impl<C> CacheInvalidator for Arc<C>
where
    C: CacheInvalidator + ?Sized,
{
    async fn invalidate_path(&self, path: &str) -> Result<(), CacheError> {
        (**self).invalidate_path(path).await
    }

    async fn invalidate_tag(&self, tag: &str) -> Result<(), CacheError> {
        (**self).invalidate_tag(tag).await
    }
}

/// In-memory invalidator that records every call; the default implementation
/// for tests/dev.
#[derive(Debug, Default)]
pub struct RecordingCacheInvalidator {
    paths: RwLock<Vec<String>>,
    tags: RwLock<Vec<String>>,
}

impl RecordingCacheInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.read().map(|paths| paths.clone()).unwrap_or_default()
    }

    pub fn tags(&self) -> Vec<String> {
        self.tags.read().map(|tags| tags.clone()).unwrap_or_default()
    }

    pub fn invalidation_count(&self) -> usize {
        self.paths().len() + self.tags().len()
    }
}

#[async_trait]
impl CacheInvalidator for RecordingCacheInvalidator {
    async fn invalidate_path(&self, path: &str) -> Result<(), CacheError> {
        if let Ok(mut paths) = self.paths.write() {
            paths.push(path.to_string());
        }
        Ok(())
    }

    async fn invalidate_tag(&self, tag: &str) -> Result<(), CacheError> {
        if let Ok(mut tags) = self.tags.write() {
            tags.push(tag.to_string());
        }
        Ok(())
    }
}
