use std::sync::Arc;

use pageflow_config::{HandleConfig, PageConfig};
use pageflow_fields::{CompositionEvent, Validation};
use pageflow_request::Requester;
use pageflow_value::EvaluationContext;
use serde_json::{Map, Value, json};
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use crate::error::EngineError;
use crate::events::{SessionEvent, SessionObserver};
use crate::interaction::Interaction;
use crate::loader::PageLoader;
use crate::operation::{self, Dispatch, OperationOutcome, OperationRef, OperationScope, OperationState};
use crate::render;
use crate::session::{Session, SessionStatus};
use crate::view::View;

/// Everything the engine calls but does not implement. Nested sessions
/// share the collaborators of the engine that mounted them.
#[derive(Clone)]
pub struct Collaborators {
  pub pages: Arc<dyn PageLoader>,
  pub requester: Arc<dyn Requester>,
  pub interaction: Arc<dyn Interaction>,
  pub observer: Arc<dyn SessionObserver>,
}

/// A stack of sessions. The top-level page sits at the bottom and every
/// `current`-target operation pushes the page it opens.
pub struct Engine {
  collaborators: Collaborators,
  sessions: Vec<Session>,
}

impl Engine {
  pub fn new(collaborators: Collaborators) -> Self {
    Self {
      collaborators,
      sessions: Vec::new(),
    }
  }

  pub fn collaborators(&self) -> &Collaborators {
    &self.collaborators
  }

  /// All open sessions, outermost first.
  pub fn sessions(&self) -> &[Session] {
    &self.sessions
  }

  /// The innermost session; user input goes here.
  pub fn current(&self) -> Option<&Session> {
    self.sessions.last()
  }

  pub fn depth(&self) -> usize {
    self.sessions.len()
  }

  /// Load `page` and open it as the top-level session, replacing any open ones.
  pub async fn open(&mut self, page: &str, source: Value) -> Result<Uuid, EngineError> {
    let config = self.collaborators.pages.load_page_config(page).await?;
    self.open_config(page, config, source).await
  }

  /// Open an already loaded schema as the top-level session.
  pub async fn open_config(
    &mut self,
    page: &str,
    config: Arc<PageConfig>,
    source: Value,
  ) -> Result<Uuid, EngineError> {
    self.sessions.clear();
    let session = self.mount(page, config, source).await?;
    let id = session.id();
    self.sessions.push(session);
    Ok(id)
  }

  async fn mount(&self, page: &str, config: Arc<PageConfig>, source: Value) -> Result<Session, EngineError> {
    let depth = self.sessions.len();
    let mut session = Session::new(page, config, source, depth);
    info!(session_id = %session.id(), page = %page, depth, "session_mounted");
    self.collaborators.observer.notify(SessionEvent::SessionMounted {
      session_id: session.id(),
      page: page.to_string(),
      depth,
    });
    session.run(&self.collaborators).await?;
    Ok(session)
  }

  fn top(&mut self) -> Result<&mut Session, EngineError> {
    self.sessions.last_mut().ok_or(EngineError::NoSession)
  }

  /// Change the value at `field` in form step `step` of the current session.
  pub fn change(&mut self, step: usize, field: &str, value: Value) -> Result<(), EngineError> {
    self.top()?.change(step, field, value)
  }

  /// Feed a text-input event to the field at `field`.
  pub fn input(&mut self, step: usize, field: &str, event: CompositionEvent) -> Result<(), EngineError> {
    self.top()?.input(step, field, event)
  }

  /// Submit form step `step` of the current session. An invalid form keeps
  /// the session where it is and reports the errors.
  pub async fn submit(&mut self, step: usize) -> Result<Validation, EngineError> {
    let collaborators = self.collaborators.clone();
    let validation = self.top()?.submit(step, &collaborators).await?;
    self.settle().await?;
    Ok(validation)
  }

  /// Re-run the current session from its first step.
  pub async fn reload(&mut self) -> Result<(), EngineError> {
    let collaborators = self.collaborators.clone();
    self.top()?.reload(&collaborators).await?;
    self.settle().await
  }

  /// Close the current session without completing it. The parent keeps its
  /// data and does not reload.
  pub fn close(&mut self) -> Result<(), EngineError> {
    let session = self.sessions.pop().ok_or(EngineError::NoSession)?;
    info!(session_id = %session.id(), page = %session.page(), "session_closed");
    self.collaborators.observer.notify(SessionEvent::SessionClosed {
      session_id: session.id(),
    });
    if let Some(parent) = self.sessions.last_mut() {
      parent.operation = None;
    }
    Ok(())
  }

  /// Pop completed nested sessions. A parent whose operation asked for a
  /// callback reloads, which may complete the parent in turn.
  async fn settle(&mut self) -> Result<(), EngineError> {
    let collaborators = self.collaborators.clone();
    while self.sessions.len() > 1
      && self
        .sessions
        .last()
        .is_some_and(|session| session.status() == SessionStatus::Completed)
    {
      let Some(nested) = self.sessions.pop() else {
        break;
      };
      let Some(parent) = self.sessions.last_mut() else {
        break;
      };
      let callback = parent.operation.take().is_some_and(|operation| operation.callback);
      info!(session_id = %nested.id(), parent_id = %parent.id(), callback, "nested_session_completed");
      if callback {
        parent.reload(&collaborators).await?;
      }
    }
    Ok(())
  }

  /// Run the operation `reference` points at in the current session.
  ///
  /// Aborts are reported as [`OperationOutcome::Aborted`]. Errors come from
  /// collaborators failing, not from the user saying no.
  pub async fn invoke_operation(
    &mut self,
    reference: &OperationRef,
    cancel: &CancellationToken,
  ) -> Result<OperationOutcome, EngineError> {
    let collaborators = self.collaborators.clone();
    let session = self.sessions.last().ok_or(EngineError::NoSession)?;
    let session_id = session.id();
    let not_found = || EngineError::OperationNotFound {
      reference: reference.to_string(),
    };

    let table = session.table(reference.step).ok_or(EngineError::StepMismatch {
      step: reference.step,
      expected: "table",
    })?;
    let button = table.button(reference).ok_or_else(not_found)?;
    let rows = session.slice(reference.step).map(|slice| table.rows(slice)).unwrap_or_default();
    let record = match &reference.scope {
      OperationScope::Table => Value::Object(Map::new()),
      OperationScope::Row { row } => rows.get(*row).cloned().ok_or_else(not_found)?,
      OperationScope::Multirow { rows: selected } => {
        let selected: Vec<Value> = selected.iter().filter_map(|row| rows.get(*row).cloned()).collect();
        json!({ "rows": selected })
      }
    };

    info!(session_id = %session_id, operation = %reference, label = %button.label, "operation_invoked");
    let ctx = EvaluationContext::new(&record, session.data(), reference.step, session.source());
    let dispatch = operation::run(button, &ctx, &collaborators, cancel).await?;

    let (page, title, config, data, callback) = match dispatch {
      Dispatch::Done(outcome) => {
        let HandleConfig::Ccms(handle) = &button.handle;
        let dispatched = |target| SessionEvent::OperationDispatched {
          session_id,
          page: handle.page.clone(),
          target,
        };
        match &outcome {
          OperationOutcome::Aborted { reason } => {
            info!(session_id = %session_id, operation = %reference, reason = ?reason, "operation_aborted");
            collaborators.observer.notify(SessionEvent::OperationAborted {
              session_id,
              reason: reason.clone(),
            });
          }
          OperationOutcome::Navigated { .. } => collaborators.observer.notify(dispatched("page")),
          OperationOutcome::Opened { .. } => collaborators.observer.notify(dispatched("open")),
          OperationOutcome::Mounted { .. } => {}
        }
        return Ok(outcome);
      }
      Dispatch::Mount {
        page,
        title,
        config,
        data,
        callback,
      } => (page, title, config, data, callback),
    };

    collaborators.observer.notify(SessionEvent::OperationDispatched {
      session_id,
      page: page.clone(),
      target: "current",
    });
    self.top()?.operation = Some(OperationState {
      enable: true,
      visible: true,
      title,
      page: page.clone(),
      config: Arc::clone(&config),
      data: data.clone(),
      callback,
    });

    let nested = match self.mount(&page, config, data).await {
      Ok(nested) => nested,
      Err(error) => {
        self.top()?.operation = None;
        return Err(error);
      }
    };
    let nested_id = nested.id();
    self.sessions.push(nested);
    self.settle().await?;
    Ok(OperationOutcome::Mounted {
      session_id: nested_id,
    })
  }

  /// Render every open session through `view`, nesting each session inside
  /// the one that opened it.
  pub fn render<V: View>(&self, view: &V) -> Option<V::Node> {
    render::sessions(&self.sessions, view)
  }
}
