use pageflow_config::{FieldConfig, FieldKind, SubformOptions, TabConfig};
use pageflow_value::{EvaluationContext, Segment, path};
use serde_json::{Map, Value};
use tracing::warn;

use crate::display::{display_text, present};
use crate::error::{FieldError, Validation};
use crate::field::{Field, FieldGroup, FieldProps, display_label, required};
use crate::registry::{FieldPosition, Imports, build_field_at};

/// An ordered list of fields bound inside one record.
#[derive(Debug, Default)]
pub struct FieldSet {
  fields: Vec<(Vec<Segment>, Box<dyn Field>)>,
}

impl FieldSet {
  pub fn build(configs: &[FieldConfig], imports: &Imports) -> Self {
    Self::build_at(configs, &FieldPosition::default(), imports)
  }

  /// Build the field list sitting at `at`; each field takes its index there.
  pub fn build_at(configs: &[FieldConfig], at: &FieldPosition, imports: &Imports) -> Self {
    Self {
      fields: configs
        .iter()
        .enumerate()
        .map(|(index, config)| {
          let field = build_field_at(config, &at.child(index), imports);
          (path::parse(&config.field), field)
        })
        .collect(),
    }
  }

  pub fn len(&self) -> usize {
    self.fields.len()
  }

  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &dyn Field> {
    self.fields.iter().map(|(_, field)| field.as_ref())
  }

  /// Write every field's mount value into `record`.
  pub fn reset(&self, record: &mut Value) {
    for (segments, field) in &self.fields {
      if let Some(value) = field.reset(path::get_segments(record, segments)) {
        path::set_segments(record, segments, value);
      }
    }
  }

  /// Validation of each field, keyed by its path.
  pub fn validate(&self, record: &Value) -> Vec<(String, Validation)> {
    self
      .fields
      .iter()
      .map(|(segments, field)| {
        let value = path::get_segments(record, segments);
        (field.path().to_string(), field.validate(value))
      })
      .collect()
  }

  pub(crate) fn errors(&self, record: &Value) -> Vec<FieldError> {
    self
      .validate(record)
      .into_iter()
      .flat_map(|(_, validation)| validation.into_errors())
      .collect()
  }

  /// The field owning `segments` and how many segments its path consumed.
  /// A field with a non-empty path wins over one bound at the record itself.
  pub fn find(&self, segments: &[Segment]) -> Option<(&dyn Field, usize)> {
    self
      .fields
      .iter()
      .filter(|(own, _)| segments.starts_with(own))
      .max_by_key(|(own, _)| own.len())
      .map(|(own, field)| (field.as_ref(), own.len()))
  }

  /// Normalize a change addressed at `segments`; unowned paths pass through.
  pub fn normalize_at(&self, segments: &[Segment], input: Value, ctx: &EvaluationContext<'_>) -> Value {
    match self.find(segments) {
      Some((field, consumed)) => field.normalize_at(&segments[consumed..], input, ctx),
      None => input,
    }
  }

  /// Props of the rendered fields; `base` prefixes every field path.
  pub fn props(&self, base: &str, record: &Value, ctx: &EvaluationContext<'_>) -> Vec<FieldProps> {
    self
      .fields
      .iter()
      .filter(|(_, field)| field.renders())
      .map(|(segments, field)| {
        let value = path::get_segments(record, segments);
        field.props(&path::join(base, field.path()), value, ctx)
      })
      .collect()
  }
}

fn object_or_empty(value: Option<&Value>) -> Value {
  match present(value) {
    Some(value @ Value::Object(_)) => value.clone(),
    _ => Value::Object(Map::new()),
  }
}

/// `form`: a list of sub-records sharing one field list.
#[derive(Debug)]
pub(crate) struct FormListField {
  config: FieldConfig,
  primary_field: Option<String>,
  can_insert: bool,
  can_remove: bool,
  children: FieldSet,
}

impl FormListField {
  pub(crate) fn new(config: FieldConfig, options: &SubformOptions, at: &FieldPosition, imports: &Imports) -> Self {
    Self {
      primary_field: options.primary_field.clone(),
      can_insert: options.can_insert,
      can_remove: options.can_remove,
      children: FieldSet::build_at(&options.fields, at, imports),
      config,
    }
  }

  fn rows(&self, value: Option<&Value>) -> Vec<Value> {
    match present(value) {
      None => Vec::new(),
      Some(Value::Array(rows)) => rows
        .iter()
        .map(|row| {
          let mut row = object_or_empty(Some(row));
          self.children.reset(&mut row);
          row
        })
        .collect(),
      Some(other) => {
        warn!(field = %self.config.field, value = %other, "form_value_not_a_list");
        Vec::new()
      }
    }
  }
}

impl Field for FormListField {
  fn config(&self) -> &FieldConfig {
    &self.config
  }

  fn reset(&self, stored: Option<&Value>) -> Option<Value> {
    let value = present(stored).or(self.config.default_value.as_ref());
    Some(Value::Array(self.rows(value)))
  }

  fn validate(&self, value: Option<&Value>) -> Validation {
    let rows = match present(value) {
      Some(Value::Array(rows)) => rows.as_slice(),
      _ => &[],
    };
    if self.config.required && rows.is_empty() {
      return Validation::Invalid(vec![FieldError::new(format!(
        "{} is required",
        display_label(&self.config)
      ))]);
    }
    let errors = rows
      .iter()
      .enumerate()
      .flat_map(|(index, row)| {
        self
          .children
          .errors(row)
          .into_iter()
          .map(move |error| FieldError::new(format!("#{}: {}", index + 1, error.message)))
      })
      .collect();
    Validation::from_errors(errors)
  }

  /// Whole-list edits (insert, remove, reorder) re-apply row defaults.
  fn normalize(&self, input: Value, _ctx: &EvaluationContext<'_>) -> Value {
    Value::Array(self.rows(Some(&input)))
  }

  fn normalize_at(&self, rest: &[Segment], input: Value, ctx: &EvaluationContext<'_>) -> Value {
    match rest {
      [] => self.normalize(input, ctx),
      [Segment::Index(_), inner @ ..] => self.children.normalize_at(inner, input, ctx),
      _ => input,
    }
  }

  fn props(&self, path: &str, value: Option<&Value>, ctx: &EvaluationContext<'_>) -> FieldProps {
    let rows = match present(value) {
      Some(Value::Array(rows)) => rows.as_slice(),
      _ => &[],
    };
    let children = rows
      .iter()
      .enumerate()
      .map(|(index, row)| {
        let label = self
          .primary_field
          .as_deref()
          .and_then(|primary| path::get(row, primary))
          .map(display_text)
          .unwrap_or_else(|| format!("#{}", index + 1));
        let base = path::join(path, &index.to_string());
        FieldGroup {
          key: index.to_string(),
          label,
          fields: self.children.props(&base, row, &ctx.with_record(row)),
        }
      })
      .collect();

    let mut props = FieldProps::new(&self.config, path, value)
      .with_extra("canInsert", self.can_insert)
      .with_extra("canRemove", self.can_remove);
    props.children = children;
    props
  }
}

/// A field list bound under `sub` inside the composite's own value.
#[derive(Debug)]
struct Section {
  field: String,
  segments: Vec<Segment>,
  label: String,
  children: FieldSet,
}

impl Section {
  fn new(field: &str, label: &str, children: FieldSet) -> Self {
    Self {
      field: field.to_string(),
      segments: path::parse(field),
      label: label.to_string(),
      children,
    }
  }

  fn reset(&self, value: &mut Value) {
    if self.segments.is_empty() {
      self.children.reset(value);
      return;
    }
    let mut sub = object_or_empty(path::get_segments(value, &self.segments));
    self.children.reset(&mut sub);
    path::set_segments(value, &self.segments, sub);
  }

  fn record<'v>(&self, value: &'v Value) -> &'v Value {
    static EMPTY: Value = Value::Null;
    path::get_segments(value, &self.segments).unwrap_or(&EMPTY)
  }

  fn group(&self, base: &str, value: &Value, ctx: &EvaluationContext<'_>) -> FieldGroup {
    FieldGroup {
      key: self.field.clone(),
      label: self.label.clone(),
      fields: self
        .children
        .props(&path::join(base, &self.field), self.record(value), ctx),
    }
  }
}

/// Shared behavior of `tabs` and `import_subform`: one object value whose
/// keys are owned by the sections' fields.
#[derive(Debug)]
pub(crate) struct SectionedField {
  config: FieldConfig,
  sections: Vec<Section>,
}

impl SectionedField {
  pub(crate) fn tabs(config: FieldConfig, tabs: &[TabConfig], at: &FieldPosition, imports: &Imports) -> Self {
    let sections = tabs
      .iter()
      .enumerate()
      .map(|(index, tab)| {
        let children = FieldSet::build_at(&tab.fields, &at.tab(index), imports);
        Section::new(&tab.field, &tab.label, children)
      })
      .collect();
    Self { config, sections }
  }

  /// Children come from field definitions loaded at mount; without them the
  /// field holds its value untouched and renders an empty group.
  pub(crate) fn imported(config: FieldConfig, at: &FieldPosition, imports: &Imports) -> Self {
    let children = match imports.get(at) {
      Some(fields) => FieldSet::build_at(fields, at, imports),
      None => {
        warn!(field = %config.field, "import_subform_not_loaded");
        FieldSet::default()
      }
    };
    let sections = vec![Section::new("", &config.label, children)];
    Self { config, sections }
  }

  fn is_tabs(&self) -> bool {
    matches!(self.config.kind, FieldKind::Tabs(_))
  }
}

impl Field for SectionedField {
  fn config(&self) -> &FieldConfig {
    &self.config
  }

  fn reset(&self, stored: Option<&Value>) -> Option<Value> {
    let mut value = object_or_empty(present(stored).or(self.config.default_value.as_ref()));
    for section in &self.sections {
      section.reset(&mut value);
    }
    Some(value)
  }

  fn validate(&self, value: Option<&Value>) -> Validation {
    if let Some(error) = required(&self.config, value) {
      return Validation::Invalid(vec![error]);
    }
    let Some(value) = present(value) else {
      return Validation::Valid;
    };
    let errors = self
      .sections
      .iter()
      .flat_map(|section| {
        let errors = section.children.errors(section.record(value));
        let prefix = (self.is_tabs() && !section.label.is_empty()).then(|| section.label.clone());
        errors.into_iter().map(move |error| match &prefix {
          Some(prefix) => FieldError::new(format!("{prefix}: {}", error.message)),
          None => error,
        })
      })
      .collect();
    Validation::from_errors(errors)
  }

  fn normalize_at(&self, rest: &[Segment], input: Value, ctx: &EvaluationContext<'_>) -> Value {
    let owner = self
      .sections
      .iter()
      .filter(|section| rest.starts_with(&section.segments))
      .filter_map(|section| {
        section
          .children
          .find(&rest[section.segments.len()..])
          .map(|(field, consumed)| (field, section.segments.len() + consumed))
      })
      .max_by_key(|(_, consumed)| *consumed);
    match owner {
      Some((field, consumed)) => field.normalize_at(&rest[consumed..], input, ctx),
      None => input,
    }
  }

  fn props(&self, path: &str, value: Option<&Value>, ctx: &EvaluationContext<'_>) -> FieldProps {
    let empty = Value::Object(Map::new());
    let record = present(value).unwrap_or(&empty);
    let mut props = FieldProps::new(&self.config, path, value);
    props.children = self
      .sections
      .iter()
      .map(|section| section.group(path, record, ctx))
      .collect();
    if !self.is_tabs() {
      let loaded = self.sections.iter().any(|section| !section.children.is_empty());
      props = props.with_extra("loaded", loaded);
    }
    props
  }
}

/// `hidden` and `none`: keep data, render nothing.
#[derive(Debug)]
pub(crate) struct SilentField {
  config: FieldConfig,
}

impl SilentField {
  pub(crate) fn new(config: FieldConfig) -> Self {
    Self { config }
  }
}

impl Field for SilentField {
  fn config(&self) -> &FieldConfig {
    &self.config
  }

  fn validate(&self, _value: Option<&Value>) -> Validation {
    Validation::Valid
  }

  fn renders(&self) -> bool {
    false
  }
}
