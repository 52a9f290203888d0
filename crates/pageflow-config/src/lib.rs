//! Pageflow Config
//!
//! This crate contains the serializable page schema types for pageflow.
//! A page is an ordered list of steps; steps are composed of typed fields
//! (forms) or columns and operations (tables).
//!
//! Schemas are immutable once loaded. Every node carries a `type` tag that
//! selects its behavior from a closed set, so an unknown tag is rejected by
//! [`PageConfig::from_json`] instead of surfacing later at render time.
//!
//! Configuration can be loaded from:
//! - JSON files (via the CLI with `--pages-dir`)
//! - Any page-config collaborator returning JSON values

mod api;
mod column;
mod error;
mod field;
mod operation;
mod options;
mod page;
mod param;
mod step;
mod toggle;
mod validate;

pub use api::{
  ApiConfig, ConditionConfig, ConditionMatch, ConditionOutcome, HttpMethod, MessageContent,
};
pub use column::{ColumnConfig, ColumnKind, EnumColumnOptions, EnumOption, ImageOptions, NumberColumnOptions};
pub use error::ConfigError;
pub use field::{
  DatetimeOptions, FieldConfig, FieldKind, ImportSubformOptions, MultipleMode, NumberOptions,
  SelectMultipleOptions, SelectSingleOptions, SingleMode, SubformOptions, TabConfig, TabsOptions,
  TextOptions,
};
pub use operation::{
  ButtonOperation, CheckConfig, ConfirmConfig, HandleConfig, HandleTarget, OperationConfig,
  OperationGroup, PageHandle, TableOperations,
};
pub use options::{Multiplicity, OptionFormat, OptionItem, OptionsConfig};
pub use page::PageConfig;
pub use param::{FieldScope, ParamConfig, ParamMap, TemplateParam};
pub use step::{FetchStepConfig, FormStepConfig, StepConfig, TableStepConfig};
pub use toggle::Toggle;

/// Validate a field list that did not come from a page schema, e.g. one
/// imported at runtime. `location` prefixes error locations.
pub fn validate_fields(fields: &[FieldConfig], location: &str) -> Result<(), ConfigError> {
  validate::fields(fields, location)
}
