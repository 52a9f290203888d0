use serde_json::Value;

/// Text shown for a value: strings unquoted, `null` empty, containers as JSON.
pub fn display_text(value: &Value) -> String {
  match value {
    Value::Null => String::new(),
    Value::String(s) => s.clone(),
    Value::Bool(b) => b.to_string(),
    Value::Number(n) => n.to_string(),
    other => other.to_string(),
  }
}

/// A value that is a string or a number.
pub(crate) fn is_primitive(value: &Value) -> bool {
  matches!(value, Value::String(_) | Value::Number(_))
}

/// Treat an explicit `null` like a missing value.
pub(crate) fn present(value: Option<&Value>) -> Option<&Value> {
  value.filter(|v| !v.is_null())
}
