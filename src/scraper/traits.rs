use crate::model::{FetchError, PageRequest};

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, req: &PageRequest) -> Result<String, FetchError>;
}
