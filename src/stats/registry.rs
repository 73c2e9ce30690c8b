//! Retrieval of the raw package page

use std::time::Duration;

#[cfg(test)]
use mockall::automock;
use tracing::{debug, warn};

use crate::config::USER_AGENT;
use crate::stats::error::RegistryError;

/// Trait for fetching the versions page of a package
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches the raw HTML of the versions view for a package
    ///
    /// # Arguments
    /// * `package_name` - The name of the package (e.g., "@types/node")
    async fn fetch_page(&self, package_name: &str) -> Result<String, RegistryError>;
}

/// Page source backed by the npm website
pub struct NpmWebsite {
    client: reqwest::Client,
    base_url: String,
}

impl NpmWebsite {
    /// Creates a new NpmWebsite with a custom base URL and request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn page_url(&self, package_name: &str) -> String {
        format!("{}/package/{}?activeTab=versions", self.base_url, package_name)
    }
}

#[async_trait::async_trait]
impl PageSource for NpmWebsite {
    async fn fetch_page(&self, package_name: &str) -> Result<String, RegistryError> {
        let url = self.page_url(package_name);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(package_name.to_string()));
        }

        if !status.is_success() {
            warn!("npm website returned status {}: {}", status, url);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        Ok(response.text().await?)
    }
}
