use std::fmt::Debug;

use pageflow_config::{ColumnConfig, ColumnKind, EnumColumnOptions, NumberColumnOptions};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::display::{display_text, present};
use crate::format::{MomentFormat, read_timestamp};
use crate::multiple::decode;

/// A display-only table cell renderer.
pub trait Column: Send + Sync + Debug {
  fn config(&self) -> &ColumnConfig;

  /// Cell text, or a list of entries for multi-line and multi-label cells.
  fn display(&self, value: Option<&Value>) -> Value;

  fn props(&self, value: Option<&Value>) -> ColumnProps {
    let config = self.config();
    ColumnProps {
      kind: config.kind.type_name(),
      field: config.field.clone(),
      label: config.label.clone(),
      value: value.cloned().unwrap_or(Value::Null),
      display: self.display(value),
      style: config.style.clone(),
      extra: Map::new(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProps {
  pub kind: &'static str,
  pub field: String,
  pub label: String,
  /// The raw cell value.
  pub value: Value,
  pub display: Value,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub style: Option<Value>,
  #[serde(skip_serializing_if = "Map::is_empty")]
  pub extra: Map<String, Value>,
}

pub fn build_column(config: &ColumnConfig) -> Box<dyn Column> {
  let owned = config.clone();
  match &config.kind {
    ColumnKind::Text => Box::new(TextColumn { config: owned }),
    ColumnKind::Number(options) => Box::new(NumberColumn {
      options: options.clone(),
      range: false,
      config: owned,
    }),
    ColumnKind::NumberRange(options) => Box::new(NumberColumn {
      options: options.clone(),
      range: true,
      config: owned,
    }),
    ColumnKind::Datetime(options) | ColumnKind::DatetimeRange(options) => {
      Box::new(DatetimeColumn {
        format: options
          .format
          .as_deref()
          .map(MomentFormat::new)
          .unwrap_or_default(),
        range: matches!(config.kind, ColumnKind::DatetimeRange(_)),
        config: owned,
      })
    }
    ColumnKind::MultirowText => Box::new(MultirowTextColumn { config: owned }),
    ColumnKind::Enum(options) => Box::new(EnumColumn {
      options: options.clone(),
      config: owned,
    }),
    ColumnKind::Image(options) => Box::new(ImageColumn {
      width: options.width,
      config: owned,
    }),
  }
}

const RANGE_SEPARATOR: &str = " ~ ";

/// `[start, end]` joined with the range separator; anything else shown as-is.
fn range(value: Option<&Value>, part: impl Fn(&Value) -> String) -> Value {
  match present(value) {
    None => Value::String(String::new()),
    Some(Value::Array(items)) => Value::String(
      items
        .iter()
        .map(part)
        .collect::<Vec<_>>()
        .join(RANGE_SEPARATOR),
    ),
    Some(other) => Value::String(display_text(other)),
  }
}

#[derive(Debug)]
struct TextColumn {
  config: ColumnConfig,
}

impl Column for TextColumn {
  fn config(&self) -> &ColumnConfig {
    &self.config
  }

  fn display(&self, value: Option<&Value>) -> Value {
    Value::String(value.map(display_text).unwrap_or_default())
  }
}

#[derive(Debug)]
struct NumberColumn {
  config: ColumnConfig,
  options: NumberColumnOptions,
  range: bool,
}

impl NumberColumn {
  fn number(&self, value: &Value) -> String {
    let number = match value {
      Value::Number(n) => n.as_f64(),
      Value::String(s) => s.trim().parse::<f64>().ok(),
      _ => None,
    };
    let Some(number) = number else {
      return display_text(value);
    };
    let text = match self.options.precision {
      Some(precision) => format!("{:.*}", precision as usize, number),
      None => display_text(value),
    };
    match &self.options.unit {
      Some(unit) => format!("{text}{unit}"),
      None => text,
    }
  }
}

impl Column for NumberColumn {
  fn config(&self) -> &ColumnConfig {
    &self.config
  }

  fn display(&self, value: Option<&Value>) -> Value {
    if self.range {
      return range(value, |part| self.number(part));
    }
    Value::String(present(value).map(|v| self.number(v)).unwrap_or_default())
  }
}

#[derive(Debug)]
struct DatetimeColumn {
  config: ColumnConfig,
  format: MomentFormat,
  range: bool,
}

impl DatetimeColumn {
  fn datetime(&self, value: &Value) -> String {
    match read_timestamp(value) {
      Some(timestamp) => self.format.format(&timestamp),
      None => display_text(value),
    }
  }
}

impl Column for DatetimeColumn {
  fn config(&self) -> &ColumnConfig {
    &self.config
  }

  fn display(&self, value: Option<&Value>) -> Value {
    if self.range {
      return range(value, |part| self.datetime(part));
    }
    Value::String(present(value).map(|v| self.datetime(v)).unwrap_or_default())
  }
}

#[derive(Debug)]
struct MultirowTextColumn {
  config: ColumnConfig,
}

impl Column for MultirowTextColumn {
  fn config(&self) -> &ColumnConfig {
    &self.config
  }

  fn display(&self, value: Option<&Value>) -> Value {
    let lines = match present(value) {
      None => Vec::new(),
      Some(Value::Array(items)) => items.iter().map(display_text).collect(),
      Some(other) => display_text(other)
        .lines()
        .map(str::to_string)
        .collect(),
    };
    Value::Array(lines.into_iter().map(Value::String).collect())
  }
}

#[derive(Debug)]
struct EnumColumn {
  config: ColumnConfig,
  options: EnumColumnOptions,
}

impl EnumColumn {
  /// Label for `key`; keys without an option show themselves.
  fn label(&self, key: &Value) -> String {
    self
      .options
      .options
      .iter()
      .find(|option| {
        option.key == *key || key.as_str() == Some(display_text(&option.key).as_str())
      })
      .map(|option| option.label.clone())
      .unwrap_or_else(|| display_text(key))
  }
}

impl Column for EnumColumn {
  fn config(&self) -> &ColumnConfig {
    &self.config
  }

  fn display(&self, value: Option<&Value>) -> Value {
    match &self.options.multiple {
      Some(multiple) => Value::Array(
        decode(multiple, value)
          .iter()
          .map(|key| Value::String(self.label(key)))
          .collect(),
      ),
      None => Value::String(present(value).map(|key| self.label(key)).unwrap_or_default()),
    }
  }
}

#[derive(Debug)]
struct ImageColumn {
  config: ColumnConfig,
  width: Option<u32>,
}

impl Column for ImageColumn {
  fn config(&self) -> &ColumnConfig {
    &self.config
  }

  fn display(&self, value: Option<&Value>) -> Value {
    Value::String(present(value).map(display_text).unwrap_or_default())
  }

  fn props(&self, value: Option<&Value>) -> ColumnProps {
    let config = &self.config;
    let mut extra = Map::new();
    if let Some(width) = self.width {
      extra.insert("width".to_string(), Value::from(width));
    }
    ColumnProps {
      kind: config.kind.type_name(),
      field: config.field.clone(),
      label: config.label.clone(),
      value: value.cloned().unwrap_or(Value::Null),
      display: self.display(value),
      style: config.style.clone(),
      extra,
    }
  }
}
