use std::sync::Arc;

use async_trait::async_trait;
use pageflow_config::PageConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EngineError;

/// An entry of the page list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
  pub id: String,
  #[serde(default)]
  pub name: String,
}

/// Resolves page ids for the engine.
///
/// Nested sessions share the loader of the session that opened them.
#[async_trait]
pub trait PageLoader: Send + Sync {
  async fn load_page_config(&self, page: &str) -> Result<Arc<PageConfig>, EngineError>;

  /// URL used to navigate to `page`.
  async fn load_page_url(&self, page: &str) -> Result<String, EngineError>;

  /// URL used to open `page` in a new browsing context.
  async fn load_page_frame_url(&self, page: &str) -> Result<String, EngineError>;

  async fn load_page_list(&self) -> Result<Vec<PageSummary>, EngineError>;

  /// Host-specific domain information, passed through untouched.
  async fn load_domain(&self) -> Result<Value, EngineError>;

  /// Whether the current user may open `page`.
  async fn check_page_auth(&self, page: &str) -> Result<bool, EngineError>;
}
