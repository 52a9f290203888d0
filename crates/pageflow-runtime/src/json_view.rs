use pageflow_fields::{ColumnProps, FieldGroup, FieldProps};
use serde::Serialize;
use serde_json::{Value, json};

use crate::view::{FormProps, OperationProps, SessionProps, TableProps, View, ViewError};

/// Renders every node as JSON. Useful for inspecting a page and for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonView;

fn to_value(props: &impl Serialize) -> Value {
  serde_json::to_value(props).unwrap_or(Value::Null)
}

impl View for JsonView {
  type Node = Value;

  fn placeholder(&self, message: &str) -> Value {
    json!({ "placeholder": message })
  }

  fn field(&self, props: &FieldProps, children: Vec<Value>) -> Result<Value, ViewError> {
    let mut node = to_value(props);
    if let Value::Object(map) = &mut node {
      // Children arrive already rendered.
      map.remove("children");
      if !children.is_empty() {
        map.insert("children".to_string(), Value::Array(children));
      }
    }
    Ok(node)
  }

  fn field_group(&self, group: &FieldGroup, fields: Vec<Value>) -> Result<Value, ViewError> {
    Ok(json!({ "key": group.key, "label": group.label, "fields": fields }))
  }

  fn form(&self, props: &FormProps, fields: Vec<Value>) -> Result<Value, ViewError> {
    Ok(json!({ "form": to_value(props), "fields": fields }))
  }

  fn column(&self, props: &ColumnProps) -> Result<Value, ViewError> {
    Ok(to_value(props))
  }

  fn table(&self, props: &TableProps, operations: Value, rows: Vec<Vec<Value>>) -> Result<Value, ViewError> {
    Ok(json!({ "table": to_value(props), "operations": operations, "rows": rows }))
  }

  fn operation(&self, props: &OperationProps, items: Vec<Value>) -> Result<Value, ViewError> {
    let mut node = to_value(props);
    if let Value::Object(map) = &mut node
      && !items.is_empty()
    {
      map.insert("items".to_string(), Value::Array(items));
    }
    Ok(node)
  }

  fn operations(&self, items: Vec<Value>) -> Result<Value, ViewError> {
    Ok(Value::Array(items))
  }

  fn session(&self, props: &SessionProps, steps: Vec<Value>, nested: Option<Value>) -> Result<Value, ViewError> {
    let mut node = json!({ "session": to_value(props), "steps": steps });
    if let (Value::Object(map), Some(nested)) = (&mut node, nested) {
      map.insert("nested".to_string(), nested);
    }
    Ok(node)
  }
}
