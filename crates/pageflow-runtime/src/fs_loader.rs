use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use pageflow_config::PageConfig;
use serde::Deserialize;
use serde_json::Value;
use tokio::fs;
use tracing::info;

use crate::cache::PageCache;
use crate::error::EngineError;
use crate::loader::{PageLoader, PageSummary};

const INDEX_FILE: &str = "index.json";

/// Page metadata kept in `index.json`.
#[derive(Debug, Default, Deserialize)]
struct PageIndex {
  #[serde(default)]
  domain: Value,
  #[serde(default)]
  pages: HashMap<String, PageEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageEntry {
  #[serde(default)]
  name: String,
  #[serde(default)]
  url: Option<String>,
  #[serde(default)]
  frame_url: Option<String>,
  #[serde(default = "allowed")]
  auth: bool,
}

fn allowed() -> bool {
  true
}

/// Filesystem-based page loader.
///
/// Pages are stored as one schema file per page id:
/// ```text
/// {root}/
/// ├── index.json (optional: names, urls, auth, domain)
/// ├── users.json
/// └── user-edit.json
/// ```
///
/// Without an index entry a page is allowed and has no URLs.
pub struct FsPageLoader {
  root: PathBuf,
  cache: PageCache,
}

impl FsPageLoader {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      cache: PageCache::new(),
    }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn cache(&self) -> &PageCache {
    &self.cache
  }

  fn page_path(&self, page: &str) -> Result<PathBuf, EngineError> {
    // Ids name files directly under the root.
    if page.is_empty() || page.contains(['/', '\\']) || page.starts_with('.') {
      return Err(EngineError::PageNotFound {
        page: page.to_string(),
      });
    }
    Ok(self.root.join(format!("{page}.json")))
  }

  async fn read_index(&self) -> Result<PageIndex, EngineError> {
    match fs::read_to_string(self.root.join(INDEX_FILE)).await {
      Ok(content) => Ok(serde_json::from_str(&content)?),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(PageIndex::default()),
      Err(e) => Err(e.into()),
    }
  }

  async fn entry(&self, page: &str) -> Result<Option<PageEntry>, EngineError> {
    Ok(self.read_index().await?.pages.remove(page))
  }
}

#[async_trait]
impl PageLoader for FsPageLoader {
  async fn load_page_config(&self, page: &str) -> Result<Arc<PageConfig>, EngineError> {
    if let Some(config) = self.cache.get(page) {
      return Ok(config);
    }

    let path = self.page_path(page)?;
    let content = match fs::read_to_string(&path).await {
      Ok(content) => content,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        return Err(EngineError::PageNotFound {
          page: page.to_string(),
        });
      }
      Err(e) => return Err(e.into()),
    };
    let config = PageConfig::from_json(&content)?;
    info!(page, path = %path.display(), "page_config_loaded");
    Ok(self.cache.insert(page, config))
  }

  async fn load_page_url(&self, page: &str) -> Result<String, EngineError> {
    self
      .entry(page)
      .await?
      .and_then(|entry| entry.url)
      .ok_or_else(|| EngineError::PageUrlMissing {
        page: page.to_string(),
        kind: "page",
      })
  }

  async fn load_page_frame_url(&self, page: &str) -> Result<String, EngineError> {
    let entry = self.entry(page).await?;
    entry
      .and_then(|entry| entry.frame_url.or(entry.url))
      .ok_or_else(|| EngineError::PageUrlMissing {
        page: page.to_string(),
        kind: "frame",
      })
  }

  async fn load_page_list(&self) -> Result<Vec<PageSummary>, EngineError> {
    let mut pages = Vec::new();
    if !self.root.exists() {
      return Ok(pages);
    }

    let index = self.read_index().await?;
    let mut entries = fs::read_dir(&self.root).await?;
    while let Some(entry) = entries.next_entry().await? {
      let path = entry.path();
      if path.extension().and_then(|e| e.to_str()) != Some("json") {
        continue;
      }
      let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
        continue;
      };
      if format!("{id}.json") == INDEX_FILE {
        continue;
      }
      let name = index
        .pages
        .get(id)
        .map(|entry| entry.name.clone())
        .unwrap_or_default();
      pages.push(PageSummary {
        id: id.to_string(),
        name,
      });
    }

    pages.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(pages)
  }

  async fn load_domain(&self) -> Result<Value, EngineError> {
    Ok(self.read_index().await?.domain)
  }

  async fn check_page_auth(&self, page: &str) -> Result<bool, EngineError> {
    Ok(self.entry(page).await?.is_none_or(|entry| entry.auth))
  }
}
