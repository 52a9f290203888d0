use std::sync::Arc;

use pageflow_config::{
  FetchStepConfig, FieldConfig, FieldKind, ImportSubformOptions, PageConfig, StepConfig,
  validate_fields,
};
use pageflow_fields::{CompositionEvent, FieldPosition, Imports, Validation};
use pageflow_request::{request_condition, request_params};
use pageflow_value::{EvaluationContext, path};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::Collaborators;
use crate::error::EngineError;
use crate::events::SessionEvent;
use crate::form::FormState;
use crate::interaction::Acknowledge;
use crate::operation::OperationState;
use crate::table::TableState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionStatus {
  /// Waiting on a mounted form or table step.
  Running,
  /// A fetch step's condition rejected its response.
  Halted { step: usize },
  Completed,
}

#[derive(Debug)]
pub(crate) enum StepState {
  Fetched,
  Form(FormState),
  Table(TableState),
}

/// One page being worked through: its schema, one data slice per step and
/// the state of every mounted step.
#[derive(Debug)]
pub struct Session {
  id: Uuid,
  page: String,
  depth: usize,
  config: Arc<PageConfig>,
  source: Value,
  data: Vec<Value>,
  current: usize,
  status: SessionStatus,
  pub(crate) steps: Vec<Option<StepState>>,
  /// The nested session this one's table opened, if any.
  pub(crate) operation: Option<OperationState>,
}

fn steps_for(config: &PageConfig) -> Vec<Option<StepState>> {
  config.steps.iter().map(|_| None).collect()
}

fn form_mut(steps: &mut [Option<StepState>], step: usize) -> Result<&mut FormState, EngineError> {
  match steps.get_mut(step) {
    Some(Some(StepState::Form(form))) => Ok(form),
    _ => Err(EngineError::StepMismatch {
      step,
      expected: "form",
    }),
  }
}

impl Session {
  pub(crate) fn new(page: impl Into<String>, config: Arc<PageConfig>, source: Value, depth: usize) -> Self {
    let steps = steps_for(&config);
    Self {
      id: Uuid::new_v4(),
      page: page.into(),
      depth,
      data: vec![Value::Null; config.steps.len()],
      config,
      source,
      current: 0,
      status: SessionStatus::Running,
      steps,
      operation: None,
    }
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn page(&self) -> &str {
    &self.page
  }

  /// 0 for the top-level session.
  pub fn depth(&self) -> usize {
    self.depth
  }

  pub fn config(&self) -> &Arc<PageConfig> {
    &self.config
  }

  /// The data this session was opened with.
  pub fn source(&self) -> &Value {
    &self.source
  }

  /// One slice per step.
  pub fn data(&self) -> &[Value] {
    &self.data
  }

  pub fn slice(&self, step: usize) -> Option<&Value> {
    self.data.get(step)
  }

  /// Index of the step the pipeline is waiting on.
  pub fn current(&self) -> usize {
    self.current
  }

  pub fn status(&self) -> SessionStatus {
    self.status
  }

  pub fn operation(&self) -> Option<&OperationState> {
    self.operation.as_ref()
  }

  pub fn form(&self, step: usize) -> Option<&FormState> {
    match self.steps.get(step) {
      Some(Some(StepState::Form(form))) => Some(form),
      _ => None,
    }
  }

  pub fn table(&self, step: usize) -> Option<&TableState> {
    match self.steps.get(step) {
      Some(Some(StepState::Table(table))) => Some(table),
      _ => None,
    }
  }

  /// The last step that mounted a form or table.
  pub(crate) fn mounted_step(&self) -> Option<usize> {
    self
      .steps
      .iter()
      .rposition(|state| matches!(state, Some(StepState::Form(_) | StepState::Table(_))))
  }

  fn context<'a>(&'a self, step: usize, record: &'a Value) -> EvaluationContext<'a> {
    EvaluationContext::new(record, &self.data, step, &self.source)
  }

  /// Step 0 starts from the source data, every later step from the slice
  /// before it. Anything mounted at or after `step` is dropped.
  fn seed(&mut self, step: usize) {
    let seed = match step {
      0 => match &self.source {
        Value::Object(_) => self.source.clone(),
        _ => Value::Object(Map::new()),
      },
      _ => self.data[step - 1].clone(),
    };
    self.data[step] = seed;
    for state in &mut self.steps[step..] {
      *state = None;
    }
  }

  /// Advance the pipeline from the current step until a step blocks, a
  /// fetch is rejected or the last step finishes.
  pub(crate) async fn run(&mut self, collaborators: &Collaborators) -> Result<(), EngineError> {
    let config = Arc::clone(&self.config);
    self.status = SessionStatus::Running;

    while let Some(step_config) = config.steps.get(self.current) {
      let step = self.current;
      self.seed(step);
      collaborators.observer.notify(SessionEvent::StepMounted {
        session_id: self.id,
        step,
        kind: step_config.type_name(),
      });

      match step_config {
        StepConfig::Fetch(fetch) => {
          if !self.fetch(step, fetch, collaborators).await? {
            warn!(session_id = %self.id, page = %self.page, step, "session_halted");
            self.status = SessionStatus::Halted { step };
            collaborators.observer.notify(SessionEvent::SessionHalted {
              session_id: self.id,
              step,
            });
            return Ok(());
          }
          self.steps[step] = Some(StepState::Fetched);
          self.current += 1;
        }
        StepConfig::Form(form) => {
          let imports = self.load_imports(step, &form.fields, collaborators).await;
          let mut state = FormState::new(form, &imports);
          state.reset(&mut self.data[step]);
          self.steps[step] = Some(StepState::Form(state));
          return Ok(());
        }
        StepConfig::Table(table) => {
          self.steps[step] = Some(StepState::Table(TableState::new(table)));
          return Ok(());
        }
      }
    }

    info!(session_id = %self.id, page = %self.page, "session_completed");
    self.status = SessionStatus::Completed;
    collaborators.observer.notify(SessionEvent::SessionCompleted { session_id: self.id });
    Ok(())
  }

  /// Returns `false` when the condition rejected the response.
  async fn fetch(
    &mut self,
    step: usize,
    fetch: &FetchStepConfig,
    collaborators: &Collaborators,
  ) -> Result<bool, EngineError> {
    let params = {
      let ctx = self.context(step, &self.data[step]);
      request_params(&fetch.api, &fetch.request, &ctx)
    };
    let response = collaborators.requester.request(&fetch.api, params).await?;

    let passed = match &fetch.condition {
      Some(condition) => {
        let notifier = Acknowledge(collaborators.interaction.as_ref());
        request_condition(condition, &response, &notifier).await
      }
      None => response.is_success(),
    };
    if !passed {
      return Ok(false);
    }

    let payload = match &fetch.response {
      Some(field) => path::get(&response.body, field).cloned(),
      None => Some(response.body),
    };
    match payload {
      Some(Value::Object(entries)) => {
        if let Value::Object(slice) = &mut self.data[step] {
          slice.extend(entries);
        }
      }
      None | Some(Value::Null) => {}
      Some(other) => {
        warn!(step, url = %fetch.api.url, value = %other, "fetch_response_not_a_mapping");
      }
    }
    Ok(true)
  }

  /// Load the field lists of every `import_subform` reachable from `fields`,
  /// keyed by each field's position. A failed import is logged and the field
  /// renders without children. An import that an enclosing import already
  /// made (same field, same url) is refused.
  async fn load_imports(&self, step: usize, fields: &[FieldConfig], collaborators: &Collaborators) -> Imports {
    let mut imports = Imports::default();
    let root = FieldPosition::default();
    let mut pending: Vec<(FieldConfig, FieldPosition, Vec<(String, String)>)> = fields
      .iter()
      .enumerate()
      .map(|(index, config)| (config.clone(), root.child(index), Vec::new()))
      .collect();

    while let Some((config, at, enclosing)) = pending.pop() {
      let children = |fields: &[FieldConfig], base: &FieldPosition, enclosing: &[(String, String)]| {
        fields
          .iter()
          .enumerate()
          .map(|(index, child)| (child.clone(), base.child(index), enclosing.to_vec()))
          .collect::<Vec<_>>()
      };
      match &config.kind {
        FieldKind::Form(options) => pending.extend(children(&options.fields, &at, &enclosing)),
        FieldKind::Tabs(options) => {
          for (index, tab) in options.tabs.iter().enumerate() {
            pending.extend(children(&tab.fields, &at.tab(index), &enclosing));
          }
        }
        FieldKind::ImportSubform(options) => {
          let identity = (config.field.clone(), options.api.url.clone());
          if enclosing.contains(&identity) {
            let error = EngineError::ImportedFields {
              field: config.field.clone(),
              message: "already imported by an enclosing field".to_string(),
            };
            warn!(field = %config.field, position = %at.as_str(), error = %error, "import_subform_failed");
            continue;
          }
          match self.import_fields(step, &config, options, collaborators).await {
            Ok(loaded) => {
              info!(field = %config.field, position = %at.as_str(), count = loaded.len(), "import_subform_loaded");
              let mut enclosing = enclosing;
              enclosing.push(identity);
              pending.extend(children(&loaded, &at, &enclosing));
              imports.insert(at, loaded);
            }
            Err(error) => {
              warn!(field = %config.field, position = %at.as_str(), error = %error, "import_subform_failed");
            }
          }
        }
        _ => {}
      }
    }
    imports
  }

  async fn import_fields(
    &self,
    step: usize,
    config: &FieldConfig,
    options: &ImportSubformOptions,
    collaborators: &Collaborators,
  ) -> Result<Vec<FieldConfig>, EngineError> {
    let params = {
      let ctx = self.context(step, &self.data[step]);
      request_params(&options.api, &options.request, &ctx)
    };
    let response = collaborators.requester.request(&options.api, params).await?;
    let invalid = |message: String| EngineError::ImportedFields {
      field: config.field.clone(),
      message,
    };
    if !response.is_success() {
      return Err(invalid(format!("status {}", response.status)));
    }

    let body = match &options.response {
      Some(field) => path::get(&response.body, field).cloned(),
      None => Some(response.body),
    };
    let Some(body) = body else {
      return Err(invalid("response holds no field list".to_string()));
    };
    let fields: Vec<FieldConfig> = serde_json::from_value(body).map_err(|e| invalid(e.to_string()))?;
    validate_fields(&fields, &config.field)?;
    Ok(fields)
  }

  /// Commit a change to the mounted form at `step`.
  pub(crate) fn change(&mut self, step: usize, field: &str, value: Value) -> Result<(), EngineError> {
    let segments = path::parse(field);
    let normalized = {
      let form = self.form(step).ok_or(EngineError::StepMismatch {
        step,
        expected: "form",
      })?;
      let ctx = self.context(step, &self.data[step]);
      form.normalize(&segments, value, &ctx)
    };
    path::set_segments(&mut self.data[step], &segments, normalized);
    form_mut(&mut self.steps, step)?.revalidate(&segments, &self.data[step]);
    Ok(())
  }

  /// Feed a text-input event; committed text goes through [`Session::change`].
  pub(crate) fn input(&mut self, step: usize, field: &str, event: CompositionEvent) -> Result<(), EngineError> {
    let commit = form_mut(&mut self.steps, step)?.compose(field, event);
    match commit {
      Some(text) => self.change(step, field, Value::String(text)),
      None => Ok(()),
    }
  }

  /// Validate the current form and, when every field passes, move on.
  pub(crate) async fn submit(&mut self, step: usize, collaborators: &Collaborators) -> Result<Validation, EngineError> {
    if step != self.current {
      return Err(EngineError::StepMismatch {
        step,
        expected: "form",
      });
    }
    let validation = form_mut(&mut self.steps, step)?.validate_all(&self.data[step]);
    if !validation.is_valid() {
      info!(session_id = %self.id, step, errors = validation.errors().len(), "form_invalid");
      return Ok(validation);
    }
    self.current += 1;
    self.run(collaborators).await?;
    Ok(validation)
  }

  /// Run the pipeline again from step 0.
  pub(crate) async fn reload(&mut self, collaborators: &Collaborators) -> Result<(), EngineError> {
    info!(session_id = %self.id, page = %self.page, "session_reload");
    self.current = 0;
    self.operation = None;
    self.steps = steps_for(&self.config);
    self.run(collaborators).await
  }
}
