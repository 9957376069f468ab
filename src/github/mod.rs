pub mod rest;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;
use types::SearchPage;

#[async_trait]
pub trait UserSearch: Send + Sync {
    async fn search_users(&self, query: &str) -> Result<SearchPage>;
}
