use pageflow_config::{ButtonOperation, OperationConfig, TableStepConfig};
use pageflow_fields::{Column, ColumnProps, build_column};
use pageflow_value::{Segment, path};
use serde_json::Value;
use tracing::warn;

use crate::operation::{OperationRef, OperationScope};
use crate::view::ColumnHeader;

/// Key of the column holding row operations.
pub const ROW_OPERATION_FIELD: &str = "ccms-table-rowOperation";
pub const ROW_OPERATION_LABEL: &str = "操作";

#[derive(Debug)]
struct BoundColumn {
  /// Row key, the part of the column field before the first `.`.
  head: String,
  /// Path inside the row value when that value is a mapping.
  tail: Vec<Segment>,
  column: Box<dyn Column>,
}

/// A mounted table step.
#[derive(Debug)]
pub struct TableState {
  config: TableStepConfig,
  columns: Vec<BoundColumn>,
}

impl TableState {
  pub(crate) fn new(config: &TableStepConfig) -> Self {
    let columns = config
      .columns
      .iter()
      .map(|column| {
        let (head, tail) = column.field.split_once('.').unwrap_or((&column.field, ""));
        BoundColumn {
          head: head.to_string(),
          tail: path::parse(tail),
          column: build_column(column),
        }
      })
      .collect();
    Self {
      config: config.clone(),
      columns,
    }
  }

  pub fn config(&self) -> &TableStepConfig {
    &self.config
  }

  /// Rows shown by this table, read from `slice` at the table's `field`.
  pub fn rows<'a>(&self, slice: &'a Value) -> &'a [Value] {
    match path::get(slice, &self.config.field) {
      Some(Value::Array(rows)) => rows,
      None | Some(Value::Null) => &[],
      Some(other) => {
        warn!(field = %self.config.field, value = %other, "table_rows_not_a_list");
        &[]
      }
    }
  }

  pub fn has_row_operations(&self) -> bool {
    !self.config.operations.row_operations.is_empty()
  }

  pub fn headers(&self) -> Vec<ColumnHeader> {
    let mut headers: Vec<ColumnHeader> = self
      .columns
      .iter()
      .map(|bound| ColumnHeader {
        field: bound.head.clone(),
        label: bound.column.config().label.clone(),
      })
      .collect();
    if self.has_row_operations() {
      headers.push(ColumnHeader {
        field: ROW_OPERATION_FIELD.to_string(),
        label: ROW_OPERATION_LABEL.to_string(),
      });
    }
    headers
  }

  /// Props of each configured column for `row`.
  pub fn cells(&self, row: &Value) -> Vec<ColumnProps> {
    self
      .columns
      .iter()
      .map(|bound| {
        let value = row.get(&bound.head);
        let value = match value {
          Some(inner @ Value::Object(_)) => path::get_segments(inner, &bound.tail),
          other => other,
        };
        bound.column.props(value)
      })
      .collect()
  }

  pub fn primary_key(&self, row: &Value) -> Value {
    path::get(row, &self.config.primary)
      .cloned()
      .unwrap_or(Value::Null)
  }

  pub fn operations(&self, scope: &OperationScope) -> &[OperationConfig] {
    let operations = &self.config.operations;
    match scope {
      OperationScope::Table => &operations.table_operations,
      OperationScope::Row { .. } => &operations.row_operations,
      OperationScope::Multirow { .. } => &operations.multirow_operations,
    }
  }

  /// The button `reference` points at.
  pub fn button(&self, reference: &OperationRef) -> Option<&ButtonOperation> {
    match (self.operations(&reference.scope).get(reference.index)?, reference.item) {
      (OperationConfig::Button(button), None) => Some(button),
      (OperationConfig::Group(group), Some(item)) => group.operations.get(item),
      _ => None,
    }
  }
}
