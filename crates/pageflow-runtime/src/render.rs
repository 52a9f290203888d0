//! Walks the session stack and hands props to a [`View`].
//!
//! A node the view cannot draw becomes a placeholder, so a partial adapter
//! still renders everything it knows about.

use pageflow_config::{ButtonOperation, OperationConfig};
use pageflow_fields::FieldProps;
use pageflow_value::EvaluationContext;
use serde_json::Value;
use tracing::warn;

use crate::form::FormState;
use crate::operation::{OperationRef, OperationScope};
use crate::session::Session;
use crate::table::TableState;
use crate::view::{FormProps, OperationProps, SessionProps, TableProps, View, ViewError};

static EMPTY: Value = Value::Null;

fn or_placeholder<V: View>(view: &V, node: Result<V::Node, ViewError>) -> V::Node {
  node.unwrap_or_else(|error| {
    warn!(error = %error, "view_adapter_missing");
    view.placeholder(&error.to_string())
  })
}

pub(crate) fn sessions<V: View>(sessions: &[Session], view: &V) -> Option<V::Node> {
  session(sessions, None, view)
}

fn session<V: View>(stack: &[Session], title: Option<String>, view: &V) -> Option<V::Node> {
  let (current, rest) = stack.split_first()?;
  let nested = match current.operation() {
    Some(operation) if operation.enable && operation.visible => {
      session(rest, Some(operation.title.clone()), view)
    }
    _ => None,
  };
  let steps = current
    .mounted_step()
    .and_then(|step| self::step(current, step, view))
    .into_iter()
    .collect();
  let props = SessionProps {
    id: current.id(),
    page: current.page().to_string(),
    depth: current.depth(),
    status: current.status(),
    title,
  };
  Some(or_placeholder(view, view.session(&props, steps, nested)))
}

fn step<V: View>(session: &Session, step: usize, view: &V) -> Option<V::Node> {
  if let Some(form) = session.form(step) {
    return Some(self::form(session, step, form, view));
  }
  session.table(step).map(|table| self::table(session, step, table, view))
}

fn field<V: View>(props: &FieldProps, view: &V) -> V::Node {
  let children = props
    .children
    .iter()
    .map(|group| {
      let fields = group.fields.iter().map(|child| field(child, view)).collect();
      or_placeholder(view, view.field_group(group, fields))
    })
    .collect();
  or_placeholder(view, view.field(props, children))
}

fn form<V: View>(session: &Session, step: usize, form: &FormState, view: &V) -> V::Node {
  let slice = session.slice(step).unwrap_or(&EMPTY);
  let ctx = EvaluationContext::new(slice, session.data(), step, session.source());
  let fields = form
    .props(slice, &ctx)
    .iter()
    .map(|props| field(props, view))
    .collect();
  let props = FormProps {
    step,
    submit_label: form.submit_label().map(str::to_string),
  };
  or_placeholder(view, view.form(&props, fields))
}

fn button<V: View>(button: &ButtonOperation, reference: OperationRef, view: &V) -> V::Node {
  let props = OperationProps {
    label: button.label.clone(),
    kind: "button",
    reference: Some(reference),
  };
  or_placeholder(view, view.operation(&props, Vec::new()))
}

fn operations<V: View>(table: &TableState, step: usize, scope: OperationScope, view: &V) -> Vec<V::Node> {
  table
    .operations(&scope)
    .iter()
    .enumerate()
    .map(|(index, operation)| {
      let reference = |item| OperationRef {
        step,
        scope: scope.clone(),
        index,
        item,
      };
      match operation {
        OperationConfig::Button(operation) => button(operation, reference(None), view),
        OperationConfig::Group(group) => {
          let items = group
            .operations
            .iter()
            .enumerate()
            .map(|(item, operation)| button(operation, reference(Some(item)), view))
            .collect();
          let props = OperationProps {
            label: group.label.clone().unwrap_or_default(),
            kind: "group",
            reference: None,
          };
          or_placeholder(view, view.operation(&props, items))
        }
      }
    })
    .collect()
}

fn table<V: View>(session: &Session, step: usize, table: &TableState, view: &V) -> V::Node {
  let rows = session.slice(step).map(|slice| table.rows(slice)).unwrap_or_default();

  // Multirow buttons carry no rows; the host fills in the selection.
  let mut toolbar = operations(table, step, OperationScope::Table, view);
  toolbar.extend(operations(table, step, OperationScope::Multirow { rows: Vec::new() }, view));
  let toolbar = or_placeholder(view, view.operations(toolbar));

  let cells = rows
    .iter()
    .enumerate()
    .map(|(index, row)| {
      let mut cells: Vec<V::Node> = table
        .cells(row)
        .iter()
        .map(|cell| or_placeholder(view, view.column(cell)))
        .collect();
      if table.has_row_operations() {
        let items = operations(table, step, OperationScope::Row { row: index }, view);
        cells.push(or_placeholder(view, view.operations(items)));
      }
      cells
    })
    .collect();

  let props = TableProps {
    step,
    primary: table.config().primary.clone(),
    columns: table.headers(),
    keys: rows.iter().map(|row| table.primary_key(row)).collect(),
  };
  or_placeholder(view, view.table(&props, toolbar, cells))
}
