use serde::{Deserialize, Serialize};

use crate::field::DatetimeOptions;
use crate::options::Multiplicity;

/// A display-only table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
  /// Row key, optionally followed by a dotted path into that key's value.
  pub field: String,
  #[serde(default)]
  pub label: String,
  /// Passed through to the view adapter untouched.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub style: Option<serde_json::Value>,
  #[serde(flatten)]
  pub kind: ColumnKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ColumnKind {
  #[serde(rename = "text")]
  Text,
  #[serde(rename = "number")]
  Number(NumberColumnOptions),
  #[serde(rename = "datetime")]
  Datetime(DatetimeOptions),
  #[serde(rename = "datetimeRange")]
  DatetimeRange(DatetimeOptions),
  #[serde(rename = "numberRange")]
  NumberRange(NumberColumnOptions),
  #[serde(rename = "multirowText")]
  MultirowText,
  #[serde(rename = "enum")]
  Enum(EnumColumnOptions),
  #[serde(rename = "image")]
  Image(ImageOptions),
}

impl ColumnKind {
  pub fn type_name(&self) -> &'static str {
    match self {
      Self::Text => "text",
      Self::Number(_) => "number",
      Self::Datetime(_) => "datetime",
      Self::DatetimeRange(_) => "datetimeRange",
      Self::NumberRange(_) => "numberRange",
      Self::MultirowText => "multirowText",
      Self::Enum(_) => "enum",
      Self::Image(_) => "image",
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberColumnOptions {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub precision: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumColumnOptions {
  #[serde(default)]
  pub options: Vec<EnumOption>,
  /// Present when the cell holds several keys.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub multiple: Option<Multiplicity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumOption {
  pub key: serde_json::Value,
  #[serde(default)]
  pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageOptions {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub width: Option<u32>,
}
