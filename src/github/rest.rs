use super::types::{SearchPage, SearchUsersResponse};
use super::UserSearch;
use crate::config::GithubConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Request};
use std::time::Duration;

pub struct GitHubRest {
    client: Client,
    base_url: String,
    qualifier: String,
    sort: String,
    per_page: Option<u32>,
}

impl GitHubRest {
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            qualifier: config.qualifier.clone(),
            sort: config.sort.clone(),
            per_page: config.per_page,
        })
    }

    /// The search text goes out as typed; only the configured qualifier is appended.
    pub fn build_request(&self, query: &str) -> Result<Request> {
        let url = format!("{}/search/users", self.base_url);
        let q = if self.qualifier.is_empty() {
            query.to_string()
        } else {
            format!("{} {}", query, self.qualifier)
        };

        let mut params: Vec<(&str, String)> = vec![("q", q)];
        if !self.sort.is_empty() {
            params.push(("sort", self.sort.clone()));
        }
        if let Some(per_page) = self.per_page {
            params.push(("per_page", per_page.to_string()));
        }

        self.client
            .get(&url)
            .query(&params)
            .build()
            .with_context(|| format!("invalid search request for {:?}", query))
    }
}

#[async_trait]
impl UserSearch for GitHubRest {
    async fn search_users(&self, query: &str) -> Result<SearchPage> {
        let req = self.build_request(query)?;

        let resp = self.client.execute(req).await
            .context("GitHub search request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("GitHub search failed ({}): {}", status, body);
        }

        let parsed: SearchUsersResponse = resp.json().await
            .context("failed to parse GitHub search response")?;

        Ok(parsed.into())
    }
}
