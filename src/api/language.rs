//! Client for the server-side inclusive-language validation endpoint.
//!
//! The endpoint is a black box: a form-encoded POST carrying the raw
//! text and an anti-forgery token, answering with a JSON object whose
//! optional `issues` array lists flagged terms with suggested
//! replacements.

use serde::Deserialize;

use crate::api::error::ApiError;
use crate::config::ServerConfig;

const PROVIDER: &str = "language";

/// One flagged term in a validated text
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LanguageIssue {
    /// The non-inclusive term found in the text
    pub term: String,
    /// Suggested inclusive replacement
    pub suggestion: String,
}

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    #[serde(default)]
    issues: Vec<LanguageIssue>,
}

/// Client for the validate-language endpoint
#[derive(Clone)]
pub struct LanguageClient {
    client: reqwest::Client,
    endpoint: String,
    csrf_token: String,
}

impl LanguageClient {
    pub fn new(server: &ServerConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bolsa/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::network(PROVIDER, e.to_string()))?;

        Ok(Self {
            client,
            endpoint: server.validate_language_url(),
            csrf_token: server.csrf_token.clone(),
        })
    }

    /// Submit a text for validation and return the flagged issues.
    ///
    /// An empty issue list means the text is clean; callers must not
    /// record an empty list in the blocking-error map.
    pub async fn check(&self, text: &str) -> Result<Vec<LanguageIssue>, ApiError> {
        let params = [
            ("text", text),
            ("csrfmiddlewaretoken", self.csrf_token.as_str()),
        ];

        let response = self
            .client
            .post(&self.endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| ApiError::network(PROVIDER, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::http(PROVIDER, status.as_u16()));
        }

        let body: ValidateResponse = response
            .json()
            .await
            .map_err(|e| ApiError::malformed(PROVIDER, e.to_string()))?;

        Ok(body.issues)
    }
}
