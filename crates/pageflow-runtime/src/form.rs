use std::collections::HashMap;

use pageflow_config::FormStepConfig;
use pageflow_fields::{
  Composition, CompositionEvent, FieldError, FieldProps, FieldSet, Imports, Validation,
};
use pageflow_value::{EvaluationContext, Segment, path};
use serde_json::Value;

/// A mounted form step: its fields, their latest validation and any
/// in-progress text composition.
#[derive(Debug)]
pub struct FormState {
  submit_label: Option<String>,
  fields: FieldSet,
  errors: HashMap<String, Vec<FieldError>>,
  compositions: HashMap<String, Composition>,
}

impl FormState {
  pub(crate) fn new(config: &FormStepConfig, imports: &Imports) -> Self {
    Self {
      submit_label: config.submit_label.clone(),
      fields: FieldSet::build(&config.fields, imports),
      errors: HashMap::new(),
      compositions: HashMap::new(),
    }
  }

  pub fn fields(&self) -> &FieldSet {
    &self.fields
  }

  pub fn submit_label(&self) -> Option<&str> {
    self.submit_label.as_deref()
  }

  /// Errors of the field bound at `path` from its last validation.
  pub fn errors(&self, path: &str) -> &[FieldError] {
    self.errors.get(path).map(Vec::as_slice).unwrap_or_default()
  }

  pub(crate) fn reset(&mut self, slice: &mut Value) {
    self.errors.clear();
    self.compositions.clear();
    self.fields.reset(slice);
  }

  pub(crate) fn normalize(&self, segments: &[Segment], input: Value, ctx: &EvaluationContext<'_>) -> Value {
    self.fields.normalize_at(segments, input, ctx)
  }

  /// Re-validate the top-level field owning `segments`.
  pub(crate) fn revalidate(&mut self, segments: &[Segment], slice: &Value) {
    let Some((field, _)) = self.fields.find(segments) else {
      return;
    };
    let key = field.path().to_string();
    match field.validate(path::get(slice, &key)) {
      Validation::Valid => {
        self.errors.remove(&key);
      }
      Validation::Invalid(errors) => {
        self.errors.insert(key, errors);
      }
    }
  }

  /// Validate every field; errors are kept for rendering.
  pub(crate) fn validate_all(&mut self, slice: &Value) -> Validation {
    self.errors.clear();
    let mut all = Vec::new();
    for (key, validation) in self.fields.validate(slice) {
      if let Validation::Invalid(errors) = validation {
        all.extend(errors.iter().cloned());
        self.errors.insert(key, errors);
      }
    }
    Validation::from_errors(all)
  }

  /// Feed a text-input event; returns the text to commit, if any.
  pub(crate) fn compose(&mut self, path: &str, event: CompositionEvent) -> Option<String> {
    let state = self.compositions.entry(path.to_string()).or_default();
    let commit = state.apply(event);
    if !state.is_composing() {
      self.compositions.remove(path);
    }
    commit
  }

  /// Props for every rendered field, with errors and staged text applied.
  pub(crate) fn props(&self, slice: &Value, ctx: &EvaluationContext<'_>) -> Vec<FieldProps> {
    let mut props = self.fields.props("", slice, ctx);
    for field in &mut props {
      if let Some(errors) = self.errors.get(&field.path) {
        field.errors = errors.clone();
      }
      if let Some(composition) = self.compositions.get(&field.path) {
        field.value = Value::String(composition.display("").to_string());
      }
    }
    props
  }
}
