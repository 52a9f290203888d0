//! Table operation configuration.
//!
//! Each button runs `check → confirm → handle`; the first two stages are
//! optional and any rejection stops the pipeline.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::api::{ApiConfig, ConditionConfig};
use crate::param::{ParamMap, TemplateParam};
use crate::toggle::Toggle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperationConfig {
  Button(ButtonOperation),
  Group(OperationGroup),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonOperation {
  pub label: String,
  #[serde(default)]
  pub check: Toggle<CheckConfig>,
  #[serde(default)]
  pub confirm: Toggle<ConfirmConfig>,
  pub handle: HandleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationGroup {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub label: Option<String>,
  pub operations: Vec<ButtonOperation>,
}

/// Pre-check: call an API and gate on its response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckConfig {
  pub api: ApiConfig,
  #[serde(default)]
  pub request: ParamMap,
  pub condition: ConditionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmConfig {
  pub title_text: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub title_params: Option<Vec<TemplateParam>>,
  #[serde(default = "default_ok_text")]
  pub ok_text: String,
  #[serde(default = "default_cancel_text")]
  pub cancel_text: String,
}

fn default_ok_text() -> String {
  "OK".to_string()
}

fn default_cancel_text() -> String {
  "Cancel".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HandleConfig {
  /// Dispatch to another pageflow page.
  Ccms(PageHandle),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageHandle {
  #[serde(deserialize_with = "page_id")]
  pub page: String,
  pub target: HandleTarget,
  /// Parameters handed to the target page; keys may be dotted paths.
  #[serde(default)]
  pub data: ParamMap,
  /// Reload the parent step once a nested page completes.
  #[serde(default)]
  pub callback: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleTarget {
  /// Mount the page as a nested session.
  Current,
  /// Navigate the current browsing context.
  Page,
  /// Open a new browsing context.
  Open,
}

/// Operations grouped by where the table shows them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableOperations {
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub table_operations: Vec<OperationConfig>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub row_operations: Vec<OperationConfig>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub multirow_operations: Vec<OperationConfig>,
}

/// Page ids are strings in newer schemas and numbers in older ones.
fn page_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
  match serde_json::Value::deserialize(deserializer)? {
    serde_json::Value::String(id) => Ok(id),
    serde_json::Value::Number(id) => Ok(id.to_string()),
    other => Err(de::Error::custom(format!(
      "page id must be a string or number, got {}",
      other
    ))),
  }
}
