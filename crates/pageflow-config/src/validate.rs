//! Load-time structural validation.
//!
//! Unknown `type` tags are already rejected by serde; this pass catches the
//! mistakes that parse cleanly but cannot render: empty or duplicate field
//! paths, empty operation groups, empty delimiters and broken patterns.

use std::collections::HashSet;

use crate::column::{ColumnConfig, ColumnKind};
use crate::error::ConfigError;
use crate::field::{FieldConfig, FieldKind};
use crate::operation::OperationConfig;
use crate::options::Multiplicity;
use crate::page::PageConfig;
use crate::step::StepConfig;

pub(crate) fn page(page: &PageConfig) -> Result<(), ConfigError> {
  for (index, step) in page.steps.iter().enumerate() {
    let location = format!("steps[{}]", index);
    match step {
      StepConfig::Fetch(_) => {}
      StepConfig::Form(form) => fields(&form.fields, &location)?,
      StepConfig::Table(table) => {
        columns(&table.columns, &location)?;
        operations(&table.operations.table_operations, &format!("{}.tableOperations", location))?;
        operations(&table.operations.row_operations, &format!("{}.rowOperations", location))?;
        operations(
          &table.operations.multirow_operations,
          &format!("{}.multirowOperations", location),
        )?;
      }
    }
  }
  Ok(())
}

/// Validate a field list, recursing into composite fields.
pub(crate) fn fields(fields: &[FieldConfig], parent: &str) -> Result<(), ConfigError> {
  let mut seen = HashSet::new();

  for (index, field) in fields.iter().enumerate() {
    let location = format!("{}.fields[{}]", parent, index);

    // Tabs may legitimately bind at their parent's level.
    if field.field.is_empty() && !matches!(field.kind, FieldKind::Tabs(_)) {
      return Err(ConfigError::EmptyFieldPath { location });
    }
    if !field.field.is_empty() && !seen.insert(field.field.as_str()) {
      return Err(ConfigError::DuplicateField {
        location,
        field: field.field.clone(),
      });
    }

    match &field.kind {
      FieldKind::Text(options) | FieldKind::Longtext(options) => {
        if let Some(pattern) = &options.regexp {
          regex::Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            location: location.clone(),
            pattern: pattern.clone(),
            message: e.to_string(),
          })?;
        }
      }
      FieldKind::SelectMultiple(options) => multiplicity(&options.multiple, &location)?,
      FieldKind::Form(options) => self::fields(&options.fields, &location)?,
      FieldKind::Tabs(options) => {
        for (tab_index, tab) in options.tabs.iter().enumerate() {
          self::fields(&tab.fields, &format!("{}.tabs[{}]", location, tab_index))?;
        }
      }
      _ => {}
    }
  }

  Ok(())
}

fn columns(columns: &[ColumnConfig], parent: &str) -> Result<(), ConfigError> {
  for (index, column) in columns.iter().enumerate() {
    let location = format!("{}.columns[{}]", parent, index);
    if column.field.is_empty() {
      return Err(ConfigError::EmptyFieldPath { location });
    }
    if let ColumnKind::Enum(options) = &column.kind
      && let Some(multiple) = &options.multiple
    {
      multiplicity(multiple, &location)?;
    }
  }
  Ok(())
}

fn operations(operations: &[OperationConfig], parent: &str) -> Result<(), ConfigError> {
  for (index, operation) in operations.iter().enumerate() {
    if let OperationConfig::Group(group) = operation
      && group.operations.is_empty()
    {
      return Err(ConfigError::EmptyGroup {
        location: format!("{}[{}]", parent, index),
      });
    }
  }
  Ok(())
}

fn multiplicity(multiple: &Multiplicity, location: &str) -> Result<(), ConfigError> {
  match multiple {
    Multiplicity::Split { delimiter } if delimiter.is_empty() => Err(ConfigError::EmptyDelimiter {
      location: location.to_string(),
    }),
    _ => Ok(()),
  }
}
