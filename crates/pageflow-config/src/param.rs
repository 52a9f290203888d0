//! Parameter configuration.
//!
//! A [`ParamConfig`] describes where a value comes from when an API call,
//! a navigation or a confirmation title needs data from the page:
//!
//! ```json
//! { "type": "static", "value": 42 }
//! { "type": "field", "field": "user.id" }
//! { "type": "field", "field": "filter.status", "scope": "data" }
//! { "type": "step", "step": 0, "field": "id" }
//! { "type": "source", "field": "tenant" }
//! { "type": "template", "template": "Delete {{ name }}?", "params": [{ "field": "name", "data": { "type": "field", "field": "name" } }] }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Named parameters, resolved in declaration order.
pub type ParamMap = IndexMap<String, ParamConfig>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParamConfig {
  /// A literal returned unchanged.
  Static {
    #[serde(default)]
    value: serde_json::Value,
  },
  /// A path into the current record or the active step's data slice.
  Field {
    field: String,
    #[serde(default)]
    scope: FieldScope,
  },
  /// A path into a specific step's data slice.
  Step { step: usize, field: String },
  /// A path into the session's source data.
  Source { field: String },
  /// Templated text with `{{ placeholder }}` markers.
  Template {
    template: String,
    #[serde(default)]
    params: Vec<TemplateParam>,
  },
}

impl ParamConfig {
  pub fn field(field: impl Into<String>) -> Self {
    Self::Field {
      field: field.into(),
      scope: FieldScope::Record,
    }
  }

  pub fn literal(value: serde_json::Value) -> Self {
    Self::Static { value }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldScope {
  #[default]
  Record,
  Data,
}

/// One placeholder binding for templated text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateParam {
  /// Placeholder path inside the template context.
  pub field: String,
  pub data: ParamConfig,
}
