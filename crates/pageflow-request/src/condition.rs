use async_trait::async_trait;
use pageflow_config::{ConditionConfig, ConditionMatch, ConditionOutcome, MessageContent};
use pageflow_value::path;
use serde_json::Value;
use tracing::info;

use crate::requester::ApiResponse;

/// Shows a condition message and waits until the user dismisses it.
#[async_trait]
pub trait Notifier: Send + Sync {
  /// `success` tells which outcome produced the message. Returns `false`
  /// when the user dismissed the dialog without acknowledging it.
  async fn acknowledge(&self, message: &str, success: bool) -> bool;
}

/// Result of judging a response, before any acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
  pub passed: bool,
  /// Message the user must acknowledge.
  pub message: Option<String>,
}

fn matches(condition: &ConditionConfig, response: &ApiResponse) -> bool {
  match &condition.matcher {
    None => response.is_success(),
    Some(ConditionMatch::Status { codes }) => codes.contains(&response.status),
    Some(ConditionMatch::Field { field, value }) => path::get(&response.body, field) == Some(value),
  }
}

fn message(outcome: &ConditionOutcome, response: &ApiResponse) -> Option<String> {
  match outcome {
    ConditionOutcome::None => None,
    ConditionOutcome::Modal { content } => Some(match content {
      MessageContent::Static { content } => content.clone(),
      MessageContent::Field { field } => match path::get(&response.body, field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
      },
    }),
  }
}

/// Judge `response`. A disabled condition passes any 2xx response and shows
/// nothing.
pub fn evaluate(condition: &ConditionConfig, response: &ApiResponse) -> Verdict {
  if !condition.enable {
    return Verdict {
      passed: response.is_success(),
      message: None,
    };
  }
  let passed = matches(condition, response);
  let outcome = if passed {
    &condition.success
  } else {
    &condition.fail
  };
  Verdict {
    passed,
    message: message(outcome, response),
  }
}

/// Judge `response` and, when the outcome carries a message, wait for the
/// user to acknowledge it. Passes only when the condition matched and any
/// required acknowledgement was given.
pub async fn request_condition(
  condition: &ConditionConfig,
  response: &ApiResponse,
  notifier: &dyn Notifier,
) -> bool {
  let verdict = evaluate(condition, response);
  if let Some(message) = &verdict.message {
    let acknowledged = notifier.acknowledge(message, verdict.passed).await;
    if !acknowledged {
      info!(status = response.status, "condition_message_dismissed");
      return false;
    }
  }
  verdict.passed
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use std::sync::Mutex;

  #[derive(Default)]
  struct Recorder {
    answer: bool,
    seen: Mutex<Vec<(String, bool)>>,
  }

  #[async_trait]
  impl Notifier for Recorder {
    async fn acknowledge(&self, message: &str, success: bool) -> bool {
      self.seen.lock().unwrap().push((message.to_string(), success));
      self.answer
    }
  }

  fn condition(value: Value) -> ConditionConfig {
    serde_json::from_value(value).unwrap()
  }

  #[test]
  fn test_disabled_condition_follows_status() {
    let disabled = condition(json!({ "enable": false }));
    assert!(evaluate(&disabled, &ApiResponse::ok(json!({}))).passed);
    let failed = ApiResponse { status: 500, body: Value::Null };
    assert!(!evaluate(&disabled, &failed).passed);
  }

  #[test]
  fn test_status_match() {
    let accepted = condition(json!({ "enable": true, "match": { "type": "status", "codes": [201] } }));
    assert!(evaluate(&accepted, &ApiResponse { status: 201, body: Value::Null }).passed);
    assert!(!evaluate(&accepted, &ApiResponse::ok(Value::Null)).passed);
  }

  #[test]
  fn test_field_match_with_fail_message() {
    let gate = condition(json!({
      "enable": true,
      "match": { "type": "field", "field": "code", "value": 0 },
      "fail": { "type": "modal", "content": { "type": "field", "field": "msg" } }
    }));
    let verdict = evaluate(&gate, &ApiResponse::ok(json!({ "code": 1, "msg": "locked" })));
    assert_eq!(
      verdict,
      Verdict {
        passed: false,
        message: Some("locked".to_string())
      }
    );
    assert_eq!(evaluate(&gate, &ApiResponse::ok(json!({ "code": 0 }))).message, None);
  }

  #[tokio::test]
  async fn test_success_message_must_be_acknowledged() {
    let gate = condition(json!({
      "enable": true,
      "success": { "type": "modal", "content": { "type": "static", "content": "done" } }
    }));
    let response = ApiResponse::ok(json!({}));

    let accepting = Recorder { answer: true, ..Default::default() };
    assert!(request_condition(&gate, &response, &accepting).await);
    assert_eq!(accepting.seen.lock().unwrap().as_slice(), &[("done".to_string(), true)]);

    let dismissing = Recorder::default();
    assert!(!request_condition(&gate, &response, &dismissing).await);
  }

  #[tokio::test]
  async fn test_failure_never_passes_even_when_acknowledged() {
    let gate = condition(json!({
      "enable": true,
      "match": { "type": "status", "codes": [200] },
      "fail": { "type": "modal", "content": { "type": "static", "content": "no" } }
    }));
    let accepting = Recorder { answer: true, ..Default::default() };
    let response = ApiResponse { status: 409, body: Value::Null };
    assert!(!request_condition(&gate, &response, &accepting).await);
    assert_eq!(accepting.seen.lock().unwrap().len(), 1);
  }
}
