//! Parameter resolution.
//!
//! Resolves [`ParamConfig`]s against an [`EvaluationContext`]. A parameter
//! that points at a missing path resolves to `None`; callers decide whether
//! that drops the key ([`resolve_params`]) or keeps it ([`resolve_param_tree`]).
//!
//! # Templates
//! Templates use minijinja `{{ placeholder }}` syntax. Without explicit
//! params the variables are `record`, `data` (the active step slice),
//! `source` and `step`:
//! ```json
//! { "type": "template", "template": "Delete {{ record.name }}?" }
//! ```
//! With params, each `{field, data}` pair is resolved against the context
//! in order and written at `field`:
//! ```json
//! { "titleText": "Delete {{ name }} ({{ meta.id }})?",
//!   "titleParams": [
//!     { "field": "name", "data": { "type": "field", "field": "name" } },
//!     { "field": "meta.id", "data": { "type": "field", "field": "id" } }
//!   ] }
//! ```
//! Placeholders that do not resolve render as empty text.

use std::sync::OnceLock;

use minijinja::{Environment, UndefinedBehavior};
use pageflow_config::{FieldScope, ParamConfig, ParamMap, TemplateParam};
use serde_json::{Map, Value};
use tracing::warn;

use crate::context::EvaluationContext;
use crate::error::ValueError;
use crate::path;

/// Resolve one parameter. `None` means the referenced path does not exist.
pub fn resolve_param(config: &ParamConfig, ctx: &EvaluationContext<'_>) -> Option<Value> {
  match config {
    ParamConfig::Static { value } => Some(value.clone()),
    ParamConfig::Field { field, scope } => {
      let base = match scope {
        FieldScope::Record => ctx.record,
        FieldScope::Data => ctx.step_data(),
      };
      path::get(base, field).cloned()
    }
    ParamConfig::Step { step, field } => ctx
      .data
      .get(*step)
      .and_then(|slice| path::get(slice, field))
      .cloned(),
    ParamConfig::Source { field } => path::get(ctx.source, field).cloned(),
    ParamConfig::Template { template, params } => {
      match resolve_param_text(template, params, ctx) {
        Ok(text) => Some(Value::String(text)),
        Err(e) => {
          warn!(error = %e, "template_param_unresolved");
          None
        }
      }
    }
  }
}

/// Resolve a map of parameters into a flat object, omitting unresolved keys.
///
/// Used for API request parameters, where an unresolved value has nothing
/// to send.
pub fn resolve_params(params: &ParamMap, ctx: &EvaluationContext<'_>) -> Map<String, Value> {
  params
    .iter()
    .filter_map(|(name, config)| resolve_param(config, ctx).map(|value| (name.clone(), value)))
    .collect()
}

/// Resolve a map of parameters into a nested object, writing each key as a path.
///
/// Unresolved parameters keep their key with a `null` value.
pub fn resolve_param_tree(params: &ParamMap, ctx: &EvaluationContext<'_>) -> Value {
  let mut tree = Value::Object(Map::new());
  for (field, config) in params {
    let value = resolve_param(config, ctx).unwrap_or_else(|| {
      warn!(field = %field, "param_unresolved_kept_as_null");
      Value::Null
    });
    path::set(&mut tree, field, value);
  }
  tree
}

/// Render templated text.
///
/// Every entry in `params` is resolved against `ctx` (never against the
/// results of earlier entries) and written at its `field` before rendering.
pub fn resolve_param_text(
  template: &str,
  params: &[TemplateParam],
  ctx: &EvaluationContext<'_>,
) -> Result<String, ValueError> {
  let mut vars = ctx.template_vars();
  for param in params {
    if let Some(value) = resolve_param(&param.data, ctx) {
      path::set(&mut vars, &param.field, value);
    }
  }

  environment()
    .render_str(template, minijinja::Value::from_serialize(&vars))
    .map_err(|e| ValueError::Template {
      template: template.to_string(),
      message: e.to_string(),
    })
}

/// Shared template environment: chained undefined lookups and `none`
/// values both render as empty text.
fn environment() -> &'static Environment<'static> {
  static ENV: OnceLock<Environment<'static>> = OnceLock::new();
  ENV.get_or_init(|| {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Chainable);
    env.set_formatter(|out, state, value| {
      if value.is_none() || value.is_undefined() {
        Ok(())
      } else {
        minijinja::escape_formatter(out, state, value)
      }
    });
    env
  })
}
