use serde::{Deserialize, Serialize};

use crate::api::{ApiConfig, ConditionConfig};
use crate::column::ColumnConfig;
use crate::field::FieldConfig;
use crate::operation::TableOperations;
use crate::param::ParamMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepConfig {
  Fetch(FetchStepConfig),
  Form(FormStepConfig),
  Table(TableStepConfig),
}

impl StepConfig {
  pub fn type_name(&self) -> &'static str {
    match self {
      Self::Fetch(_) => "fetch",
      Self::Form(_) => "form",
      Self::Table(_) => "table",
    }
  }
}

/// Loads data into the pipeline when the step mounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchStepConfig {
  pub api: ApiConfig,
  #[serde(default)]
  pub request: ParamMap,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub condition: Option<ConditionConfig>,
  /// Path of the payload inside the response body; the whole body when absent.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub response: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormStepConfig {
  #[serde(default)]
  pub fields: Vec<FieldConfig>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub submit_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableStepConfig {
  /// Path of the row list inside the step's data slice.
  #[serde(default)]
  pub field: String,
  #[serde(default = "default_primary")]
  pub primary: String,
  #[serde(default)]
  pub columns: Vec<ColumnConfig>,
  #[serde(default)]
  pub operations: TableOperations,
}

fn default_primary() -> String {
  "id".to_string()
}
