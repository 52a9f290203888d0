//! Parsed page schema caching.
//!
//! Schemas are parsed and validated once per page id and shared as
//! `Arc<PageConfig>` between every session that mounts them.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use pageflow_config::PageConfig;

#[derive(Debug, Clone, Default)]
pub struct PageCache {
  cache: Arc<RwLock<HashMap<String, Arc<PageConfig>>>>,
}

impl PageCache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, page: &str) -> Option<Arc<PageConfig>> {
    let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
    cache.get(page).cloned()
  }

  /// Store `config` for `page` and return the shared handle.
  pub fn insert(&self, page: &str, config: PageConfig) -> Arc<PageConfig> {
    let config = Arc::new(config);
    let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
    cache.insert(page.to_string(), config.clone());
    config
  }

  /// Drop one page, e.g. after its file changed.
  pub fn invalidate(&self, page: &str) {
    let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
    cache.remove(page);
  }

  pub fn clear(&self) {
    let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
    cache.clear();
  }
}
