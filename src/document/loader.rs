//! Document fetch and load.
//!
//! A single fetch attempt per load; retrying is left to the caller.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;

use super::RawDocument;
use crate::errors::AppError;
use crate::models::{Catalog, Notebook};

/// Retrieves raw document bytes for a catalog path.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, AppError>;
}

/// Reads documents from a local assets directory.
pub struct AssetDirFetcher {
    root: PathBuf,
}

impl AssetDirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes || relative.as_os_str().is_empty() {
            return None;
        }
        Some(self.root.join(relative))
    }
}

#[async_trait]
impl DocumentFetcher for AssetDirFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, AppError> {
        let full_path = self
            .resolve(path)
            .ok_or_else(|| AppError::FetchFailed(format!("Invalid document path: {}", path)))?;

        tokio::fs::read(&full_path).await.map_err(|e| {
            tracing::warn!("Failed to read {}: {}", full_path.display(), e);
            AppError::FetchFailed("Failed to load notebook".to_string())
        })
    }
}

/// Fetches documents over HTTP relative to a base URL.
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("Invalid assets URL {}: {}", base_url, e)))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    fn url_for(&self, path: &str) -> Result<Url, AppError> {
        // Join relative to the base so a base path prefix is kept.
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path.trim_start_matches('/'))
            .map_err(|e| AppError::FetchFailed(format!("Invalid document path {}: {}", path, e)))
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, AppError> {
        let url = self.url_for(path)?;
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            tracing::warn!("Fetching {} returned {}", url, response.status());
            return Err(AppError::FetchFailed("Failed to load notebook".to_string()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Loads and parses notebook documents for catalog entries.
#[derive(Clone)]
pub struct DocumentLoader {
    fetcher: Arc<dyn DocumentFetcher>,
    timeout: Option<Duration>,
}

impl DocumentLoader {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>) -> Self {
        Self {
            fetcher,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch and parse the document behind a notebook entry.
    pub async fn load(&self, notebook: &Notebook) -> Result<RawDocument, AppError> {
        let fetch = self.fetcher.fetch(&notebook.path);

        let bytes = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fetch).await.map_err(|_| {
                AppError::FetchFailed(format!("Timed out loading notebook {}", notebook.id))
            })??,
            None => fetch.await?,
        };

        let document = RawDocument::from_slice(&bytes).inspect_err(|e| {
            tracing::warn!("Notebook {} is not a valid document: {}", notebook.id, e);
        })?;

        tracing::debug!(
            "Loaded notebook {} with {} cells",
            notebook.id,
            document.cells.len()
        );
        Ok(document)
    }

    /// Resolve a notebook id against the catalog, then load it.
    ///
    /// Unknown ids fail with `NotFound` before any fetch happens.
    pub async fn open<'a>(
        &self,
        catalog: &'a Catalog,
        id: &str,
    ) -> Result<(&'a Notebook, RawDocument), AppError> {
        let notebook = catalog
            .notebook(id)
            .ok_or_else(|| AppError::NotFound("Notebook not found".to_string()))?;

        let document = self.load(notebook).await?;
        Ok((notebook, document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeFetcher {
        body: Result<Vec<u8>, String>,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl FakeFetcher {
        fn ok(body: &str) -> Arc<Self> {
            Arc::new(Self {
                body: Ok(body.as_bytes().to_vec()),
                delay: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                body: Err("404".to_string()),
                delay: None,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl DocumentFetcher for FakeFetcher {
        async fn fetch(&self, _path: &str) -> Result<Vec<u8>, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.body.clone().map_err(AppError::FetchFailed)
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"{"notebooks": [{"id": "basics", "title": "Basics", "date": "Jan 5, 2026",
                "path": "/assets/Basics.ipynb"}]}"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_open_known_notebook() {
        let fetcher = FakeFetcher::ok(r##"{"cells": [{"cell_type": "markdown", "source": ["# Hi"]}]}"##);
        let loader = DocumentLoader::new(fetcher.clone());
        let catalog = catalog();

        let (notebook, document) = loader.open(&catalog, "basics").await.unwrap();
        assert_eq!(notebook.title, "Basics");
        assert_eq!(document.cells.len(), 1);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_id_never_fetches() {
        let fetcher = FakeFetcher::ok("{}");
        let loader = DocumentLoader::new(fetcher.clone());

        let err = loader.open(&catalog(), "missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_surfaced_once() {
        let fetcher = FakeFetcher::failing();
        let loader = DocumentLoader::new(fetcher.clone());

        let err = loader.open(&catalog(), "basics").await.unwrap_err();
        assert!(matches!(err, AppError::FetchFailed(_)));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_parse_failure() {
        let loader = DocumentLoader::new(FakeFetcher::ok(r#"{"nbformat": 4}"#));
        let err = loader.open(&catalog(), "basics").await.unwrap_err();
        assert!(matches!(err, AppError::ParseFailed(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_fetch_failure() {
        let fetcher = Arc::new(FakeFetcher {
            body: Ok(br#"{"cells": []}"#.to_vec()),
            delay: Some(Duration::from_millis(500)),
            calls: AtomicUsize::new(0),
        });
        let loader = DocumentLoader::new(fetcher).with_timeout(Some(Duration::from_millis(20)));

        let err = loader.open(&catalog(), "basics").await.unwrap_err();
        assert!(matches!(err, AppError::FetchFailed(_)));
    }

    #[test]
    fn test_asset_paths_cannot_escape_root() {
        let fetcher = AssetDirFetcher::new("/srv/public");

        assert_eq!(
            fetcher.resolve("/assets/actual_notebooks/Basics.ipynb"),
            Some(PathBuf::from("/srv/public/assets/actual_notebooks/Basics.ipynb"))
        );
        assert_eq!(fetcher.resolve("/assets/../../etc/passwd"), None);
        assert_eq!(fetcher.resolve("/"), None);
    }

    #[tokio::test]
    async fn test_asset_dir_fetch() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("doc.ipynb"), b"{\"cells\": []}").unwrap();
        let fetcher = AssetDirFetcher::new(dir.path());

        assert_eq!(fetcher.fetch("/doc.ipynb").await.unwrap(), b"{\"cells\": []}");
        assert!(matches!(
            fetcher.fetch("/missing.ipynb").await,
            Err(AppError::FetchFailed(_))
        ));
    }

    #[test]
    fn test_http_urls_are_encoded_and_keep_base_path() {
        let fetcher = HttpFetcher::new("https://cdn.example.com/cookbook").unwrap();
        let url = fetcher
            .url_for("/assets/actual_notebooks/Weather Notebook.ipynb")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://cdn.example.com/cookbook/assets/actual_notebooks/Weather%20Notebook.ipynb"
        );
    }
}
