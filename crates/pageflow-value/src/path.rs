//! Dotted/bracket paths into nested records.
//!
//! `items[0].name` and `items.0.name` address the same value. Numeric segments index arrays; when writing
//! through a missing container a numeric segment creates an array and any
//! other segment creates a mapping.

use std::borrow::Cow;

use serde_json::{Map, Value};
use tracing::warn;

/// How far past its end a write may grow an array.
const MAX_ARRAY_GROWTH: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  Key(String),
  Index(usize),
}

impl Segment {
  fn from_part(part: &str) -> Self {
    match part.parse::<usize>() {
      Ok(index) if !part.starts_with('+') && !(part.len() > 1 && part.starts_with('0')) => {
        Self::Index(index)
      }
      _ => Self::Key(part.to_string()),
    }
  }

  /// The segment as a mapping key.
  pub fn key(&self) -> Cow<'_, str> {
    match self {
      Self::Key(key) => Cow::Borrowed(key),
      Self::Index(index) => Cow::Owned(index.to_string()),
    }
  }

  fn empty_container(&self) -> Value {
    match self {
      Self::Key(_) => Value::Object(Map::new()),
      Self::Index(_) => Value::Array(Vec::new()),
    }
  }
}

/// Split a path into segments. The empty path addresses the record itself.
pub fn parse(path: &str) -> Vec<Segment> {
  let mut segments = Vec::new();

  for part in path.split('.') {
    let mut rest = part;
    // Leading key before any `[n]` suffixes.
    let head_end = rest.find('[').unwrap_or(rest.len());
    if head_end > 0 {
      segments.push(Segment::from_part(&rest[..head_end]));
    }
    rest = &rest[head_end..];

    while let Some(stripped) = rest.strip_prefix('[') {
      match stripped.find(']') {
        Some(close) => {
          let inner = stripped[..close].trim_matches(|c| c == '"' || c == '\'');
          if !inner.is_empty() {
            segments.push(Segment::from_part(inner));
          }
          rest = &stripped[close + 1..];
        }
        None => {
          segments.push(Segment::Key(rest.to_string()));
          break;
        }
      }
    }
  }

  segments
}

/// Value at `path`, or `None` when any segment is missing.
pub fn get<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
  get_segments(record, &parse(path))
}

pub fn get_segments<'a>(record: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
  let mut current = record;
  for segment in segments {
    current = match (current, segment) {
      (Value::Object(map), segment) => map.get(segment.key().as_ref())?,
      (Value::Array(items), Segment::Index(index)) => items.get(*index)?,
      _ => return None,
    };
  }
  Some(current)
}

/// Write `value` at `path`, creating intermediate containers and keeping
/// sibling keys at every level. A write whose index lies far past the end
/// of an array is dropped with a warning.
pub fn set(record: &mut Value, path: &str, value: Value) {
  set_segments(record, &parse(path), value)
}

pub fn set_segments(record: &mut Value, segments: &[Segment], value: Value) {
  let mut current = record;
  for segment in segments {
    current = match slot(current, segment) {
      Some(next) => next,
      None => return,
    };
  }
  *current = value;
}

/// Mutable slot for `segment` inside `target`, replacing scalars with a
/// container. An array addressed by key becomes a mapping keyed by the
/// element indexes. `None` when the index lies too far past the end.
fn slot<'a>(target: &'a mut Value, segment: &Segment) -> Option<&'a mut Value> {
  match (target, segment) {
    (Value::Array(items), Segment::Index(index)) => {
      if *index >= items.len() {
        if *index - items.len() >= MAX_ARRAY_GROWTH {
          warn!(index, len = items.len(), "path_index_out_of_range");
          return None;
        }
        items.resize(*index + 1, Value::Null);
      }
      items.get_mut(*index)
    }
    (Value::Object(map), segment) => Some(map.entry(segment.key().into_owned()).or_insert(Value::Null)),
    (target, segment) => {
      *target = match std::mem::take(target) {
        Value::Array(items) => Value::Object(
          items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect(),
        ),
        _ => segment.empty_container(),
      };
      slot(target, segment)
    }
  }
}

/// Join a parent path and a child path.
pub fn join(parent: &str, child: &str) -> String {
  match (parent.is_empty(), child.is_empty()) {
    (true, _) => child.to_string(),
    (false, true) => parent.to_string(),
    (false, false) => format!("{}.{}", parent, child),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_parse_dotted_and_bracket() {
    assert_eq!(
      parse("items[0].name"),
      vec![
        Segment::Key("items".to_string()),
        Segment::Index(0),
        Segment::Key("name".to_string())
      ]
    );
    assert_eq!(parse("items.0.name"), parse("items[0].name"));
    assert_eq!(parse(""), Vec::<Segment>::new());
    assert_eq!(parse("a[1][2]"), parse("a.1.2"));
  }

  #[test]
  fn test_get_missing_is_none() {
    let record = json!({ "a": { "b": [1, 2] } });
    assert_eq!(get(&record, "a.b.1"), Some(&json!(2)));
    assert_eq!(get(&record, "a.b.5"), None);
    assert_eq!(get(&record, "a.c.d"), None);
    assert_eq!(get(&record, "a.b.1.x"), None);
    assert_eq!(get(&record, ""), Some(&record));
  }

  #[test]
  fn test_get_null_is_present() {
    let record = json!({ "a": null });
    assert_eq!(get(&record, "a"), Some(&Value::Null));
  }

  #[test]
  fn test_set_then_get_returns_value() {
    let paths = ["a", "a.b", "a.b.c", "list.0", "list[2].name", "deep.0.1.x", "0"];
    let values = [json!(1), json!("text"), json!([1, 2]), json!({ "k": null }), Value::Null];

    for path in paths {
      for value in &values {
        let mut record = json!({ "keep": true });
        set(&mut record, path, value.clone());
        assert_eq!(get(&record, path), Some(value), "path {}", path);
      }
    }
  }

  #[test]
  fn test_set_keeps_siblings() {
    let mut record = json!({ "user": { "name": "ann", "age": 3 }, "other": 1 });
    set(&mut record, "user.address.city", json!("Oslo"));

    assert_eq!(
      record,
      json!({
        "user": { "name": "ann", "age": 3, "address": { "city": "Oslo" } },
        "other": 1
      })
    );
  }

  #[test]
  fn test_set_creates_arrays_for_numeric_segments() {
    let mut record = json!({});
    set(&mut record, "rows.1.id", json!(7));
    assert_eq!(record, json!({ "rows": [null, { "id": 7 }] }));
  }

  #[test]
  fn test_set_numeric_key_on_mapping() {
    let mut record = json!({ "byId": { "12": "x" } });
    set(&mut record, "byId.13", json!("y"));
    assert_eq!(record, json!({ "byId": { "12": "x", "13": "y" } }));
  }

  #[test]
  fn test_set_replaces_scalar_parent() {
    let mut record = json!({ "a": 5 });
    set(&mut record, "a.b", json!(1));
    assert_eq!(record, json!({ "a": { "b": 1 } }));
  }

  #[test]
  fn test_set_far_index_is_ignored() {
    let mut record = json!({ "list": [] });
    set(&mut record, "list.18446744073709551615", json!(1));
    set(&mut record, "list.1000000000000", json!(1));
    set(&mut record, "fresh.99999.x", json!(1));
    assert_eq!(record, json!({ "list": [], "fresh": [] }));

    set(&mut record, "list.3", json!(1));
    assert_eq!(get(&record, "list.3"), Some(&json!(1)));
  }

  #[test]
  fn test_set_key_through_array_keeps_elements() {
    let mut record = json!({ "list": [1, 2] });
    set(&mut record, "list.name", json!("x"));
    assert_eq!(record, json!({ "list": { "0": 1, "1": 2, "name": "x" } }));
    assert_eq!(get(&record, "list.0"), Some(&json!(1)));
  }

  #[test]
  fn test_set_empty_path_replaces_record() {
    let mut record = json!({ "a": 1 });
    set(&mut record, "", json!([1]));
    assert_eq!(record, json!([1]));
  }

  #[test]
  fn test_join() {
    assert_eq!(join("", "a"), "a");
    assert_eq!(join("a", ""), "a");
    assert_eq!(join("a", "b.c"), "a.b.c");
  }
}
