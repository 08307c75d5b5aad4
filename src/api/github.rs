//! GitHub API client for the project contributors screen.
//!
//! Unauthenticated read-only access; subject to the anonymous rate
//! limit, which is fine for a single fetch per screen open.

use serde::Deserialize;

use crate::api::error::ApiError;

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";
const PROVIDER: &str = "github";

/// One repository contributor
#[derive(Debug, Clone, Deserialize)]
pub struct Contributor {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    pub contributions: u64,
}

/// GitHub API client
pub struct GitHubClient {
    client: reqwest::Client,
}

impl GitHubClient {
    pub fn new() -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bolsa/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::network(PROVIDER, e.to_string()))?;
        Ok(Self { client })
    }

    /// Fetch the contributor list for a repository.
    pub async fn fetch_contributors(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<Contributor>, ApiError> {
        let url = format!("{}/repos/{}/{}/contributors", GITHUB_API_BASE, owner, repo);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .send()
            .await
            .map_err(|e| ApiError::network(PROVIDER, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::http(PROVIDER, status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::malformed(PROVIDER, e.to_string()))
    }
}

/// Drop the repository owner from a contributor list, keeping order.
///
/// The owner gets a fixed creator card rendered up front, so their API
/// entry would be a duplicate.
pub fn exclude_owner(contributors: Vec<Contributor>, owner: &str) -> Vec<Contributor> {
    contributors
        .into_iter()
        .filter(|c| !c.login.is_empty() && c.login != owner)
        .collect()
}
