use async_trait::async_trait;
use pageflow_request::Notifier;
use serde::Serialize;

/// A confirmation dialog shown before an operation dispatches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPrompt {
  pub title: String,
  pub ok_text: String,
  pub cancel_text: String,
}

/// The user-facing side of the engine: dialogs and navigation.
///
/// Each call suspends the pipeline until the user has answered.
#[async_trait]
pub trait Interaction: Send + Sync {
  /// `true` when the user accepted.
  async fn confirm(&self, prompt: &ConfirmPrompt) -> bool;

  /// Show a condition message; `true` once acknowledged.
  async fn acknowledge(&self, message: &str, success: bool) -> bool;

  /// Replace the current browsing context with `url`.
  async fn navigate(&self, url: &str);

  /// Open `url` in a new browsing context.
  async fn open(&self, url: &str);
}

/// Routes condition messages to an [`Interaction`].
pub(crate) struct Acknowledge<'a>(pub &'a dyn Interaction);

#[async_trait]
impl Notifier for Acknowledge<'_> {
  async fn acknowledge(&self, message: &str, success: bool) -> bool {
    self.0.acknowledge(message, success).await
  }
}
