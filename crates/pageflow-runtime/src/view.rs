use pageflow_fields::{ColumnProps, FieldGroup, FieldProps};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::operation::OperationRef;
use crate::session::SessionStatus;

#[derive(Debug, Error)]
pub enum ViewError {
  /// The adapter has no component for this kind.
  #[error("the current view does not implement the {component} component")]
  Unimplemented { component: String },
}

impl ViewError {
  pub fn unimplemented(component: impl Into<String>) -> Self {
    Self::Unimplemented {
      component: component.into(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormProps {
  pub step: usize,
  pub submit_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnHeader {
  /// Row key the column reads.
  pub field: String,
  pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableProps {
  pub step: usize,
  pub primary: String,
  pub columns: Vec<ColumnHeader>,
  /// Primary key of each row, in row order.
  pub keys: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationProps {
  pub label: String,
  /// `button` or `group`.
  pub kind: &'static str,
  /// What to pass back to the engine when a button is clicked. Groups have none.
  pub reference: Option<OperationRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionProps {
  pub id: Uuid,
  pub page: String,
  pub depth: usize,
  pub status: SessionStatus,
  /// Dialog title of a nested session: the label of the operation that opened it.
  pub title: Option<String>,
}

/// Turns props into renderable nodes.
///
/// Only [`View::placeholder`] is mandatory. Every other method defaults to
/// [`ViewError::Unimplemented`], which the engine replaces with a placeholder
/// so a partial adapter still renders.
pub trait View {
  type Node;

  fn placeholder(&self, message: &str) -> Self::Node;

  fn field(&self, props: &FieldProps, _children: Vec<Self::Node>) -> Result<Self::Node, ViewError> {
    Err(ViewError::unimplemented(props.kind))
  }

  fn field_group(&self, _group: &FieldGroup, _fields: Vec<Self::Node>) -> Result<Self::Node, ViewError> {
    Err(ViewError::unimplemented("field group"))
  }

  fn form(&self, _props: &FormProps, _fields: Vec<Self::Node>) -> Result<Self::Node, ViewError> {
    Err(ViewError::unimplemented("form"))
  }

  fn column(&self, props: &ColumnProps) -> Result<Self::Node, ViewError> {
    Err(ViewError::unimplemented(props.kind))
  }

  /// `rows` hold one node per column, plus the row-operation cell when the
  /// table has row operations.
  fn table(
    &self,
    _props: &TableProps,
    _operations: Self::Node,
    _rows: Vec<Vec<Self::Node>>,
  ) -> Result<Self::Node, ViewError> {
    Err(ViewError::unimplemented("table"))
  }

  /// A button, or a group whose `items` are its buttons.
  fn operation(&self, props: &OperationProps, _items: Vec<Self::Node>) -> Result<Self::Node, ViewError> {
    Err(ViewError::unimplemented(format!("operation {}", props.kind)))
  }

  /// A bar of operations.
  fn operations(&self, _items: Vec<Self::Node>) -> Result<Self::Node, ViewError> {
    Err(ViewError::unimplemented("operations"))
  }

  fn session(
    &self,
    _props: &SessionProps,
    _steps: Vec<Self::Node>,
    _nested: Option<Self::Node>,
  ) -> Result<Self::Node, ViewError> {
    Err(ViewError::unimplemented("page"))
  }
}
