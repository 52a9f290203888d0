use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::step::StepConfig;
use crate::validate;

/// A complete page schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
  #[serde(default)]
  pub steps: Vec<StepConfig>,
}

impl PageConfig {
  /// Parse and validate a page schema from JSON text.
  pub fn from_json(json: &str) -> Result<Self, ConfigError> {
    let page: PageConfig = serde_json::from_str(json)?;
    page.validate()?;
    Ok(page)
  }

  /// Parse and validate a page schema from an already decoded value.
  pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
    let page: PageConfig = serde_json::from_value(value)?;
    page.validate()?;
    Ok(page)
  }

  /// Structural checks serde cannot express.
  pub fn validate(&self) -> Result<(), ConfigError> {
    validate::page(self)
  }
}
