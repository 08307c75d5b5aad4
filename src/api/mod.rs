//! Remote interfaces: the inclusive-language check and the GitHub
//! contributors fetch.

pub mod error;
pub mod github;
pub mod language;

pub use error::ApiError;
pub use github::{Contributor, GitHubClient};
pub use language::{LanguageClient, LanguageIssue};
