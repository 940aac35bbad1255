pub mod http_fetcher;

use async_trait::async_trait;

use crate::domain::Validators;

#[derive(Debug)]
pub enum FetchResult {
    /// New content fetched successfully
    Modified {
        body: Vec<u8>,
        validators: Validators,
    },
    /// Content not modified (HTTP 304)
    NotModified,
    /// Network error, timeout or non-success status
    Failed(String),
}

/// Issues a single conditional GET. Implementations never return an error;
/// every failure is folded into [`FetchResult::Failed`].
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str, validators: &Validators) -> FetchResult;
}
