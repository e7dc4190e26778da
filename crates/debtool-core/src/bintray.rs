//! Bintray publish check: has a Debian already been published for a version?
//!
//! A repository whose Debian already exists on Bintray is skipped without
//! any build invocation.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::error::{BuildToolError, Result};
use crate::options::BintrayCredentials;
use crate::repository::{BuildVersion, Repository};

/// Decides whether a Debian package already exists for a repository version.
#[async_trait]
pub trait DebianPublishCheck: Send + Sync {
    async fn already_published(
        &self,
        repository: &Repository,
        version: &BuildVersion,
    ) -> Result<bool>;
}

/// Bintray REST API client.
pub struct BintrayClient {
    http: reqwest::Client,
    api_base: String,
    credentials: BintrayCredentials,
    org: String,
    debian_repository: String,
}

impl BintrayClient {
    const API_BASE: &'static str = "https://api.bintray.com";

    pub fn new(credentials: BintrayCredentials, org: String, debian_repository: String) -> Self {
        Self::with_api_base(Self::API_BASE.to_string(), credentials, org, debian_repository)
    }

    /// Point the client at an alternate API base (test servers).
    pub fn with_api_base(
        api_base: String,
        credentials: BintrayCredentials,
        org: String,
        debian_repository: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base,
            credentials,
            org,
            debian_repository,
        }
    }

    fn version_url(&self, package: &str, version: &BuildVersion) -> String {
        format!(
            "{}/packages/{}/{}/{}/versions/{}",
            self.api_base, self.org, self.debian_repository, package, version
        )
    }
}

#[async_trait]
impl DebianPublishCheck for BintrayClient {
    async fn already_published(
        &self,
        repository: &Repository,
        version: &BuildVersion,
    ) -> Result<bool> {
        let url = self.version_url(&repository.name, version);
        debug!(repository = %repository.name, url = %url, "Checking bintray for existing debian");

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.credentials.user, Some(&self.credentials.key))
            .send()
            .await
            .map_err(|e| BuildToolError::Bintray(format!("request to {url} failed: {e}")))?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(BuildToolError::Bintray(format!(
                "unexpected status {status} from {url}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_url_shape() {
        let client = BintrayClient::new(
            BintrayCredentials {
                user: "builder".to_string(),
                key: "secret".to_string(),
            },
            "spinnaker".to_string(),
            "debians".to_string(),
        );
        let url = client.version_url("clouddriver", &BuildVersion::from("3.4.1-20180619"));
        assert_eq!(
            url,
            "https://api.bintray.com/packages/spinnaker/debians/clouddriver/versions/3.4.1-20180619"
        );
    }
}
