use serde::Deserialize;

/// GitHub `/search/users` response. Fields we don't render are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchUsersResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<UserResult>,
}

/// A single matched user, taken verbatim from the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserResult {
    pub login: String,
    pub avatar_url: String,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// One response page as seen by the search session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub total_count: u64,
    pub items: Vec<UserResult>,
}

impl From<SearchUsersResponse> for SearchPage {
    fn from(resp: SearchUsersResponse) -> Self {
        Self {
            total_count: resp.total_count,
            items: resp.items,
        }
    }
}
