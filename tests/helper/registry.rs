//! Page source test utilities

use std::collections::HashMap;

use async_trait::async_trait;

use version_stats::stats::error::RegistryError;
use version_stats::stats::registry::PageSource;

/// Page source serving canned pages per package
pub struct MockPageSource {
    pages: HashMap<String, String>,
}

impl MockPageSource {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
        }
    }

    pub fn with_page(mut self, package: &str, body: String) -> Self {
        self.pages.insert(package.to_string(), body);
        self
    }
}

#[async_trait]
impl PageSource for MockPageSource {
    async fn fetch_page(&self, package_name: &str) -> Result<String, RegistryError> {
        match self.pages.get(package_name) {
            Some(body) => Ok(body.clone()),
            None => Err(RegistryError::NotFound(package_name.to_string())),
        }
    }
}
