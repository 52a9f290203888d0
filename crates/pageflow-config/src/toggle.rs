//! `{ "enable": false }` / `{ "enable": true, ... }` switches.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An optional pipeline stage gated by an `enable` flag.
///
/// The disabled form carries no payload, so `{ "enable": false }` never has
/// to satisfy the enabled form's required keys.
#[derive(Debug, Clone, PartialEq)]
pub enum Toggle<T> {
  Disabled,
  Enabled(T),
}

impl<T> Default for Toggle<T> {
  fn default() -> Self {
    Self::Disabled
  }
}

impl<T> Toggle<T> {
  /// The payload when enabled.
  pub fn enabled(&self) -> Option<&T> {
    match self {
      Self::Enabled(inner) => Some(inner),
      Self::Disabled => None,
    }
  }

  pub fn is_enabled(&self) -> bool {
    matches!(self, Self::Enabled(_))
  }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Toggle<T> {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match value.get("enable").and_then(Value::as_bool) {
      Some(true) => serde_json::from_value(value)
        .map(Toggle::Enabled)
        .map_err(de::Error::custom),
      Some(false) => Ok(Toggle::Disabled),
      None => Err(de::Error::missing_field("enable")),
    }
  }
}

impl<T: Serialize> Serialize for Toggle<T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      Self::Disabled => serde_json::json!({ "enable": false }).serialize(serializer),
      Self::Enabled(inner) => {
        let mut value = serde_json::to_value(inner).map_err(ser::Error::custom)?;
        match value.as_object_mut() {
          Some(map) => {
            map.insert("enable".to_string(), Value::Bool(true));
          }
          None => return Err(ser::Error::custom("enabled payload must be an object")),
        }
        value.serialize(serializer)
      }
    }
  }
}
