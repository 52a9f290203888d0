use std::collections::HashMap;

use pageflow_config::{FieldConfig, FieldKind};

use crate::composite::{FormListField, SectionedField, SilentField};
use crate::datetime::DatetimeField;
use crate::field::Field;
use crate::multiple::SelectMultipleField;
use crate::number::NumberField;
use crate::select::SelectSingleField;
use crate::text::TextField;

/// Where a field node sits in the schema tree. Every node has its own
/// position, so two fields sharing a name in different lists never meet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPosition(String);

impl FieldPosition {
  /// The `index`-th field of the list at this position.
  pub fn child(&self, index: usize) -> Self {
    Self(format!("{}/{}", self.0, index))
  }

  /// The field list of the `index`-th tab at this position.
  pub fn tab(&self, index: usize) -> Self {
    Self(format!("{}/tab{}", self.0, index))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

/// Field lists loaded at mount for `import_subform` fields, keyed by the
/// importing field's position.
#[derive(Debug, Clone, Default)]
pub struct Imports {
  fields: HashMap<FieldPosition, Vec<FieldConfig>>,
}

impl Imports {
  pub fn insert(&mut self, at: FieldPosition, fields: Vec<FieldConfig>) {
    self.fields.insert(at, fields);
  }

  pub fn get(&self, at: &FieldPosition) -> Option<&[FieldConfig]> {
    self.fields.get(at).map(Vec::as_slice)
  }
}

/// Instantiate the behavior for a field schema placed at the root position.
pub fn build_field(config: &FieldConfig, imports: &Imports) -> Box<dyn Field> {
  build_field_at(config, &FieldPosition::default(), imports)
}

/// Instantiate the behavior for a field schema at `at`.
pub fn build_field_at(config: &FieldConfig, at: &FieldPosition, imports: &Imports) -> Box<dyn Field> {
  let owned = config.clone();
  match &config.kind {
    FieldKind::Text(_) | FieldKind::Longtext(_) => Box::new(TextField::new(owned)),
    FieldKind::Number(_) => Box::new(NumberField::new(owned)),
    FieldKind::Datetime(_) | FieldKind::DatetimeRange(_) => Box::new(DatetimeField::new(owned)),
    FieldKind::Radio(_) | FieldKind::SelectSingle(_) => Box::new(SelectSingleField::new(owned)),
    FieldKind::SelectMultiple(_) => Box::new(SelectMultipleField::new(owned)),
    FieldKind::Form(options) => Box::new(FormListField::new(owned, options, at, imports)),
    FieldKind::Tabs(options) => Box::new(SectionedField::tabs(owned, &options.tabs, at, imports)),
    FieldKind::ImportSubform(_) => Box::new(SectionedField::imported(owned, at, imports)),
    FieldKind::Hidden | FieldKind::Blank => Box::new(SilentField::new(owned)),
  }
}
