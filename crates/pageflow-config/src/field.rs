use serde::{Deserialize, Serialize};

use crate::api::ApiConfig;
use crate::options::{Multiplicity, OptionsConfig};
use crate::param::ParamMap;

/// A form field bound to one path inside its step's data slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
  /// Dotted path of the value this field owns.
  pub field: String,
  #[serde(default)]
  pub label: String,
  #[serde(default)]
  pub required: bool,
  /// Used when the data slice has no value at `field`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub default_value: Option<serde_json::Value>,
  #[serde(default)]
  pub disabled: bool,
  #[serde(flatten)]
  pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FieldKind {
  #[serde(rename = "text")]
  Text(TextOptions),
  #[serde(rename = "longtext")]
  Longtext(TextOptions),
  #[serde(rename = "number")]
  Number(NumberOptions),
  #[serde(rename = "datetime")]
  Datetime(DatetimeOptions),
  #[serde(rename = "datetimeRange")]
  DatetimeRange(DatetimeOptions),
  #[serde(rename = "radio")]
  Radio(SelectSingleOptions),
  #[serde(rename = "select_single")]
  SelectSingle(SelectSingleOptions),
  #[serde(rename = "select_multiple")]
  SelectMultiple(SelectMultipleOptions),
  /// A list of sub-records, each rendered with `fields`.
  #[serde(rename = "form")]
  Form(SubformOptions),
  #[serde(rename = "tabs")]
  Tabs(TabsOptions),
  /// Field definitions fetched from an API when the step mounts.
  #[serde(rename = "import_subform")]
  ImportSubform(ImportSubformOptions),
  #[serde(rename = "hidden")]
  Hidden,
  #[serde(rename = "none")]
  Blank,
}

impl FieldKind {
  /// The schema tag of this kind.
  pub fn type_name(&self) -> &'static str {
    match self {
      Self::Text(_) => "text",
      Self::Longtext(_) => "longtext",
      Self::Number(_) => "number",
      Self::Datetime(_) => "datetime",
      Self::DatetimeRange(_) => "datetimeRange",
      Self::Radio(_) => "radio",
      Self::SelectSingle(_) => "select_single",
      Self::SelectMultiple(_) => "select_multiple",
      Self::Form(_) => "form",
      Self::Tabs(_) => "tabs",
      Self::ImportSubform(_) => "import_subform",
      Self::Hidden => "hidden",
      Self::Blank => "none",
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOptions {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub placeholder: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min_length: Option<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max_length: Option<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub regexp: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub regexp_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberOptions {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max: Option<f64>,
  /// Digits kept after the decimal point.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub precision: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatetimeOptions {
  /// Moment-style format, e.g. `YYYY-MM-DD HH:mm:ss`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectSingleOptions {
  #[serde(default)]
  pub options: OptionsConfig,
  #[serde(default)]
  pub mode: SingleMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingleMode {
  #[default]
  Dropdown,
  Radio,
  Button,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectMultipleOptions {
  #[serde(default)]
  pub options: OptionsConfig,
  #[serde(default)]
  pub mode: MultipleMode,
  #[serde(default)]
  pub multiple: Multiplicity,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultipleMode {
  #[default]
  Dropdown,
  Checkbox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubformOptions {
  #[serde(default)]
  pub fields: Vec<FieldConfig>,
  /// Field shown as the title of each sub-record.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub primary_field: Option<String>,
  #[serde(default = "enabled")]
  pub can_insert: bool,
  #[serde(default = "enabled")]
  pub can_remove: bool,
}

fn enabled() -> bool {
  true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabsOptions {
  #[serde(default)]
  pub tabs: Vec<TabConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabConfig {
  /// Sub-path the tab's fields bind under; empty binds at the tabs field itself.
  #[serde(default)]
  pub field: String,
  #[serde(default)]
  pub label: String,
  #[serde(default)]
  pub fields: Vec<FieldConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSubformOptions {
  pub api: ApiConfig,
  #[serde(default)]
  pub request: ParamMap,
  /// Path of the field list inside the response body.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub response: Option<String>,
}
