//! Pageflow Value
//!
//! Reads and writes values inside the nested JSON records that back every
//! page, and evaluates [`ParamConfig`](pageflow_config::ParamConfig)s against
//! an [`EvaluationContext`].
//!
//! Nothing in this crate mutates the context it evaluates against; the only
//! mutating operation is [`path::set`], which callers apply to records they own.

mod context;
mod error;
mod param;
pub mod path;

pub use context::EvaluationContext;
pub use error::ValueError;
pub use param::{resolve_param, resolve_param_text, resolve_param_tree, resolve_params};
pub use path::Segment;
