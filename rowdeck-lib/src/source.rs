//! Seed data sources

use std::time::Duration;

use async_trait::async_trait;

use crate::error::LoadError;
use crate::model::SeedRow;

/// Remote location of the demo dataset.
pub const DEMO_DATA_URL: &str = "https://microsoftedge.github.io/Demos/json-dummy-data/5MB.json";

/// One-shot read of the full seed dataset.
///
/// No pagination and no filtering; implementations return the entire
/// dataset or fail with a [`LoadError`]. There is no retry logic.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Reads the full dataset.
    async fn fetch(&self) -> Result<Vec<SeedRow>, LoadError>;
}

/// Data source backed by an HTTP endpoint serving a JSON array.
#[derive(Debug, Clone)]
pub struct HttpDataSource {
    http_client: reqwest::Client,
    url: String,
    timeout: Option<Duration>,
}

impl HttpDataSource {
    /// Creates a data source for the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            url: url.into(),
            timeout: None,
        }
    }

    /// Data source pointed at the demo dataset.
    pub fn demo() -> Self {
        Self::new(DEMO_DATA_URL)
    }

    /// Sets a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn classify(&self, error: reqwest::Error) -> LoadError {
        match self.timeout {
            Some(timeout) if error.is_timeout() => LoadError::Timeout(timeout),
            _ => LoadError::Network(error),
        }
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch(&self) -> Result<Vec<SeedRow>, LoadError> {
        let mut request = self.http_client.get(&self.url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|error| self.classify(error))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LoadError::http(status, body));
        }

        response
            .json::<Vec<SeedRow>>()
            .await
            .map_err(|error| LoadError::parse(error.to_string()))
    }
}

/// Data source serving a fixed in-memory dataset.
///
/// Used by tests and anywhere a network read is unwanted.
#[derive(Debug, Clone, Default)]
pub struct StaticDataSource {
    rows: Vec<SeedRow>,
}

impl StaticDataSource {
    /// Creates a data source serving the given records.
    pub fn new(rows: Vec<SeedRow>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl DataSource for StaticDataSource {
    async fn fetch(&self) -> Result<Vec<SeedRow>, LoadError> {
        Ok(self.rows.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_source_returns_its_records() {
        let seed: SeedRow = serde_json::from_str(
            r#"{"id":"1","name":"Ada","language":"English","bio":"x","version":"1.0"}"#,
        )
        .unwrap();
        let source = StaticDataSource::new(vec![seed.clone()]);
        let fetched = source.fetch().await.unwrap();
        assert_eq!(fetched, vec![seed]);
    }

    #[test]
    fn http_source_defaults_to_the_demo_url() {
        assert_eq!(HttpDataSource::demo().url(), DEMO_DATA_URL);
    }
}
