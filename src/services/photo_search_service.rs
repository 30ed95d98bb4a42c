use crate::model::{Photo, PhotoQuery};
use anyhow::Result;
use async_trait::async_trait;

/// Asynchronous capability that turns a query into an ordered list of photos.
///
/// Transport, paging and retries are the implementation's business. The
/// controller only cares whether the call succeeded.
#[async_trait]
pub trait PhotoSearchService: Send + Sync {
    async fn find_photos(&self, query: &PhotoQuery) -> Result<Vec<Photo>>;
}
