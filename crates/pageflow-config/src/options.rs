//! Option lists and multi-value encodings shared by select fields and enum columns.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::param::ParamConfig;

/// Where a select field gets its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum OptionsConfig {
  Manual {
    #[serde(default)]
    data: Vec<OptionItem>,
  },
  /// A list read from the page data, mapped through `format`.
  Data {
    source: ParamConfig,
    #[serde(default)]
    format: OptionFormat,
  },
}

impl Default for OptionsConfig {
  fn default() -> Self {
    Self::Manual { data: Vec::new() }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionItem {
  pub value: Value,
  #[serde(default)]
  pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionFormat {
  #[serde(default = "default_key_field")]
  pub key_field: String,
  #[serde(default = "default_label_field")]
  pub label_field: String,
}

impl Default for OptionFormat {
  fn default() -> Self {
    Self {
      key_field: default_key_field(),
      label_field: default_label_field(),
    }
  }
}

fn default_key_field() -> String {
  "value".to_string()
}

fn default_label_field() -> String {
  "label".to_string()
}

/// How a multi-valued selection is stored.
///
/// Accepts `true`, `{ "type": "array" }` or `{ "type": "split", "split": "," }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Multiplicity {
  /// An array of strings or numbers.
  #[default]
  Array,
  /// A single string joined with `delimiter`.
  Split { delimiter: String },
}

pub(crate) const DEFAULT_DELIMITER: &str = ",";

impl<'de> Deserialize<'de> for Multiplicity {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match &value {
      Value::Bool(true) => Ok(Self::Array),
      Value::Object(map) => match map.get("type").and_then(Value::as_str) {
        Some("array") => Ok(Self::Array),
        Some("split") => {
          let delimiter = match map.get("split") {
            None | Some(Value::Null) => DEFAULT_DELIMITER.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
              return Err(de::Error::custom(format!(
                "split delimiter must be a string, got {}",
                other
              )));
            }
          };
          Ok(Self::Split { delimiter })
        }
        Some(other) => Err(de::Error::unknown_variant(other, &["array", "split"])),
        None => Err(de::Error::missing_field("type")),
      },
      other => Err(de::Error::custom(format!(
        "expected `true` or a multiplicity object, got {}",
        other
      ))),
    }
  }
}

impl Serialize for Multiplicity {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      Self::Array => serde_json::json!({ "type": "array" }).serialize(serializer),
      Self::Split { delimiter } => {
        serde_json::json!({ "type": "split", "split": delimiter }).serialize(serializer)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_multiplicity_forms() {
    let flag: Multiplicity = serde_json::from_value(json!(true)).unwrap();
    assert_eq!(flag, Multiplicity::Array);

    let array: Multiplicity = serde_json::from_value(json!({ "type": "array" })).unwrap();
    assert_eq!(array, Multiplicity::Array);

    let split: Multiplicity = serde_json::from_value(json!({ "type": "split" })).unwrap();
    assert_eq!(
      split,
      Multiplicity::Split {
        delimiter: ",".to_string()
      }
    );

    let custom: Multiplicity =
      serde_json::from_value(json!({ "type": "split", "split": "|" })).unwrap();
    assert_eq!(
      custom,
      Multiplicity::Split {
        delimiter: "|".to_string()
      }
    );
  }

  #[test]
  fn test_multiplicity_rejects_unknown() {
    assert!(serde_json::from_value::<Multiplicity>(json!(false)).is_err());
    assert!(serde_json::from_value::<Multiplicity>(json!({ "type": "set" })).is_err());
  }

  #[test]
  fn test_options_default_format() {
    let options: OptionsConfig = serde_json::from_value(json!({
      "from": "data",
      "source": { "type": "field", "field": "roles", "scope": "data" }
    }))
    .unwrap();

    match options {
      OptionsConfig::Data { format, .. } => {
        assert_eq!(format.key_field, "value");
        assert_eq!(format.label_field, "label");
      }
      other => panic!("unexpected options: {:?}", other),
    }
  }
}
