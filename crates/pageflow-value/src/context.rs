use serde_json::{Value, json};

static EMPTY: Value = Value::Null;

/// The data a schema node is evaluated against.
///
/// `record` is the row or item being rendered, `data` holds one slice per
/// step, `step` selects the active slice and `source` is the data the
/// session was opened with.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
  pub record: &'a Value,
  pub data: &'a [Value],
  pub step: usize,
  pub source: &'a Value,
}

impl<'a> EvaluationContext<'a> {
  pub fn new(record: &'a Value, data: &'a [Value], step: usize, source: &'a Value) -> Self {
    Self {
      record,
      data,
      step,
      source,
    }
  }

  /// The same context focused on another record.
  pub fn with_record(self, record: &'a Value) -> Self {
    Self { record, ..self }
  }

  /// The active step's data slice.
  pub fn step_data(&self) -> &'a Value {
    self.data.get(self.step).unwrap_or(&EMPTY)
  }

  /// Variables visible to templates without explicit params.
  pub(crate) fn template_vars(&self) -> Value {
    json!({
      "record": self.record,
      "data": self.step_data(),
      "source": self.source,
      "step": self.step,
    })
  }
}
