use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::param::ParamMap;

/// An HTTP endpoint invoked by fetch steps, pre-checks and subform imports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
  pub url: String,
  #[serde(default)]
  pub method: HttpMethod,
  /// Parameters merged into every call, resolved against the caller's context.
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub params: ParamMap,
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub headers: IndexMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
  #[default]
  #[serde(alias = "get")]
  Get,
  #[serde(alias = "post")]
  Post,
  #[serde(alias = "put")]
  Put,
  #[serde(alias = "patch")]
  Patch,
  #[serde(alias = "delete")]
  Delete,
}

impl HttpMethod {
  /// Whether parameters travel in the query string rather than the body.
  pub fn uses_query(&self) -> bool {
    matches!(self, Self::Get | Self::Delete)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Get => "GET",
      Self::Post => "POST",
      Self::Put => "PUT",
      Self::Patch => "PATCH",
      Self::Delete => "DELETE",
    }
  }
}

/// Rules deciding whether an API response counts as success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionConfig {
  #[serde(default)]
  pub enable: bool,
  /// Predicate; when absent any 2xx status matches.
  #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
  pub matcher: Option<ConditionMatch>,
  #[serde(default)]
  pub success: ConditionOutcome,
  #[serde(default)]
  pub fail: ConditionOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConditionMatch {
  /// The response status is one of `codes`.
  Status { codes: Vec<u16> },
  /// The body value at `field` equals `value`.
  Field {
    field: String,
    value: serde_json::Value,
  },
}

/// What the user sees once a condition has been evaluated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConditionOutcome {
  #[default]
  None,
  /// A dialog the user must acknowledge before the pipeline continues.
  Modal { content: MessageContent },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
  Static { content: String },
  /// Read from the response body.
  Field { field: String },
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_api_defaults_to_get() {
    let api: ApiConfig = serde_json::from_value(json!({ "url": "/api/users" })).unwrap();
    assert_eq!(api.method, HttpMethod::Get);
    assert!(api.params.is_empty());
  }

  #[test]
  fn test_lowercase_method_alias() {
    let api: ApiConfig =
      serde_json::from_value(json!({ "url": "/api/users", "method": "post" })).unwrap();
    assert_eq!(api.method, HttpMethod::Post);
    assert!(!api.method.uses_query());
  }

  #[test]
  fn test_condition_with_field_match_and_modal() {
    let condition: ConditionConfig = serde_json::from_value(json!({
      "enable": true,
      "match": { "type": "field", "field": "code", "value": 0 },
      "fail": { "type": "modal", "content": { "type": "field", "field": "msg" } }
    }))
    .unwrap();

    assert!(condition.enable);
    assert_eq!(
      condition.matcher,
      Some(ConditionMatch::Field {
        field: "code".to_string(),
        value: json!(0)
      })
    );
    assert_eq!(condition.success, ConditionOutcome::None);
    assert!(matches!(condition.fail, ConditionOutcome::Modal { .. }));
  }
}
