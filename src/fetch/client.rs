use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport seam for source retrieval, so the loader can run against any client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
