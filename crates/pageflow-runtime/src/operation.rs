//! The table operation pipeline: `check → confirm → dispatch`.
//!
//! Every stage runs strictly after the previous one and any rejection stops
//! the pipeline. Side effects of completed stages (a check API call) are
//! not undone.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use pageflow_config::{ButtonOperation, HandleConfig, HandleTarget, PageConfig};
use pageflow_request::{merge_query, request_condition, request_params};
use pageflow_value::{EvaluationContext, resolve_param_text, resolve_param_tree};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use crate::engine::Collaborators;
use crate::error::EngineError;
use crate::interaction::{Acknowledge, ConfirmPrompt};

/// Which operation list of a table step an operation belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum OperationScope {
  /// Toolbar operations; they run against an empty record.
  Table,
  /// A row's operations; the row is the record.
  Row { row: usize },
  /// Operations over selected rows; the record is `{ "rows": [...] }`.
  Multirow { rows: Vec<usize> },
}

/// Addresses one button of a table step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRef {
  pub step: usize,
  #[serde(flatten)]
  pub scope: OperationScope,
  /// Position in the operation list.
  pub index: usize,
  /// Position inside a group.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub item: Option<usize>,
}

impl fmt::Display for OperationRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let scope = match &self.scope {
      OperationScope::Table => "table".to_string(),
      OperationScope::Row { row } => format!("row {row}"),
      OperationScope::Multirow { rows } => format!("rows {rows:?}"),
    };
    write!(f, "step {} {} operation {}", self.step, scope, self.index)?;
    if let Some(item) = self.item {
      write!(f, " item {item}")?;
    }
    Ok(())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AbortReason {
  /// The check condition rejected the response or its message was dismissed.
  CheckFailed,
  /// The user cancelled the confirmation.
  Declined,
  /// The caller's cancellation token fired.
  Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OperationOutcome {
  Aborted { reason: AbortReason },
  /// A nested session was mounted on top of the current one.
  Mounted { session_id: Uuid },
  Navigated { url: String },
  Opened { url: String },
}

/// UI state of the nested session an operation opened, kept by the parent.
#[derive(Debug, Clone, Serialize)]
pub struct OperationState {
  /// Gates mounting.
  pub enable: bool,
  /// Gates rendering.
  pub visible: bool,
  pub title: String,
  pub page: String,
  #[serde(skip)]
  pub config: Arc<PageConfig>,
  pub data: Value,
  /// Reload the parent when the nested session completes.
  pub callback: bool,
}

/// What the pipeline decided; mounting is left to the engine.
pub(crate) enum Dispatch {
  Done(OperationOutcome),
  Mount {
    page: String,
    title: String,
    config: Arc<PageConfig>,
    data: Value,
    callback: bool,
  },
}

fn abort(reason: AbortReason) -> Dispatch {
  Dispatch::Done(OperationOutcome::Aborted { reason })
}

async fn until_cancelled<F: Future>(cancel: &CancellationToken, future: F) -> Option<F::Output> {
  tokio::select! {
    biased;
    _ = cancel.cancelled() => None,
    output = future => Some(output),
  }
}

fn into_map(value: Value) -> Map<String, Value> {
  match value {
    Value::Object(map) => map,
    _ => Map::new(),
  }
}

/// Run one button's pipeline against `ctx`.
pub(crate) async fn run(
  button: &ButtonOperation,
  ctx: &EvaluationContext<'_>,
  collaborators: &Collaborators,
  cancel: &CancellationToken,
) -> Result<Dispatch, EngineError> {
  let interaction = collaborators.interaction.as_ref();

  if let Some(check) = button.check.enabled() {
    let params = request_params(&check.api, &check.request, ctx);
    let Some(response) = until_cancelled(cancel, collaborators.requester.request(&check.api, params)).await
    else {
      return Ok(abort(AbortReason::Cancelled));
    };
    let response = response?;
    let acknowledge = Acknowledge(interaction);
    let gate = request_condition(&check.condition, &response, &acknowledge);
    match until_cancelled(cancel, gate).await {
      None => return Ok(abort(AbortReason::Cancelled)),
      Some(false) => return Ok(abort(AbortReason::CheckFailed)),
      Some(true) => {}
    }
  }

  if let Some(confirm) = button.confirm.enabled() {
    let title = match &confirm.title_params {
      Some(params) => resolve_param_text(&confirm.title_text, params, ctx)?,
      None => confirm.title_text.clone(),
    };
    let prompt = ConfirmPrompt {
      title,
      ok_text: confirm.ok_text.clone(),
      cancel_text: confirm.cancel_text.clone(),
    };
    match until_cancelled(cancel, interaction.confirm(&prompt)).await {
      None => return Ok(abort(AbortReason::Cancelled)),
      Some(false) => return Ok(abort(AbortReason::Declined)),
      Some(true) => {}
    }
  }

  let HandleConfig::Ccms(handle) = &button.handle;
  let pages = collaborators.pages.as_ref();

  // Unresolved params stay in the tree as null.
  let data = resolve_param_tree(&handle.data, ctx);

  match handle.target {
    HandleTarget::Current => {
      let Some(config) = until_cancelled(cancel, pages.load_page_config(&handle.page)).await else {
        return Ok(abort(AbortReason::Cancelled));
      };
      Ok(Dispatch::Mount {
        page: handle.page.clone(),
        title: button.label.clone(),
        config: config?,
        data,
        callback: handle.callback,
      })
    }
    HandleTarget::Page => {
      let Some(url) = until_cancelled(cancel, pages.load_page_url(&handle.page)).await else {
        return Ok(abort(AbortReason::Cancelled));
      };
      let url = merge_query(&url?, &into_map(data));
      info!(page = %handle.page, url = %url, "operation_navigate");
      interaction.navigate(&url).await;
      Ok(Dispatch::Done(OperationOutcome::Navigated { url }))
    }
    HandleTarget::Open => {
      let Some(url) = until_cancelled(cancel, pages.load_page_frame_url(&handle.page)).await else {
        return Ok(abort(AbortReason::Cancelled));
      };
      let url = merge_query(&url?, &into_map(data));
      info!(page = %handle.page, url = %url, "operation_open");
      interaction.open(&url).await;
      Ok(Dispatch::Done(OperationOutcome::Opened { url }))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_reference_round_trips_through_json() {
    let reference = OperationRef {
      step: 1,
      scope: OperationScope::Row { row: 3 },
      index: 0,
      item: Some(2),
    };
    let value = serde_json::to_value(&reference).unwrap();
    assert_eq!(
      value,
      json!({ "step": 1, "scope": "row", "row": 3, "index": 0, "item": 2 })
    );
    assert_eq!(serde_json::from_value::<OperationRef>(value).unwrap(), reference);
    assert_eq!(reference.to_string(), "step 1 row 3 operation 0 item 2");
  }
}
