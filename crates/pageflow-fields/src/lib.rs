//! Pageflow Fields
//!
//! The behavior behind every field and column `type` tag. Each field kind
//! implements the [`Field`] capability interface:
//!
//! - `reset`: the value bound at mount (stored value, else `defaultValue`, shaped per kind)
//! - `validate`: pure check producing a [`Validation`]
//! - `normalize`: turns user input into the value committed to the data record
//! - `props`: the [`FieldProps`] bundle handed to a view adapter
//!
//! [`build_field`] and [`build_column`] map the closed set of schema kinds to
//! their implementations. Malformed stored values never fail: they degrade to
//! a safe value and emit a `warn!` event.

mod column;
mod composite;
mod composition;
mod datetime;
mod display;
mod error;
mod field;
mod format;
mod multiple;
mod number;
mod registry;
mod select;
mod text;

pub use column::{Column, ColumnProps, build_column};
pub use composite::FieldSet;
pub use composition::{Composition, CompositionEvent};
pub use display::display_text;
pub use error::{FieldError, Validation};
pub use field::{Field, FieldGroup, FieldProps};
pub use format::MomentFormat;
pub use multiple::{decode, encode};
pub use registry::{FieldPosition, Imports, build_field, build_field_at};
pub use select::{SelectOption, resolve_options};
