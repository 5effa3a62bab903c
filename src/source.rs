//! Read-only city data sources standing in for a backend

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::state::{City, CityId};

pub const DEFAULT_DATA_PATH: &str = "data/cities.json";

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed city data: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A JSON array of cities, always fetched whole.
#[async_trait]
pub trait CitySource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<City>, SourceError>;

    /// There is no server-side lookup: fetch everything and filter.
    async fn fetch_one(&self, id: CityId) -> Result<Option<City>, SourceError> {
        let cities = self.fetch_all().await?;
        Ok(cities.into_iter().find(|city| city.id == id))
    }
}

pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CitySource for JsonFile {
    async fn fetch_all(&self) -> Result<Vec<City>, SourceError> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(serde_json::from_str(&json)?)
    }
}

pub struct HttpJson {
    client: reqwest::Client,
    url: String,
}

impl HttpJson {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl CitySource for HttpJson {
    async fn fetch_all(&self) -> Result<Vec<City>, SourceError> {
        let response = self.client.get(&self.url).send().await?;
        let bytes = response.error_for_status()?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Pick a source from a `--data` argument: URLs go over HTTP, anything else is a path.
pub fn source_for(location: &str) -> Arc<dyn CitySource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Arc::new(HttpJson::new(location))
    } else {
        Arc::new(JsonFile::new(location))
    }
}
