use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde_json::Value;

pub const DEFAULT_DATETIME_FORMAT: &str = "YYYY-MM-DD HH:mm:ss";

/// Moment-style date pattern (`YYYY-MM-DD HH:mm:ss`) translated to chrono.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MomentFormat {
  pattern: String,
  chrono: String,
  has_date: bool,
  has_time: bool,
}

// Longest tokens first so `YYYY` wins over `YY`.
const TOKENS: &[(&str, &str)] = &[
  ("YYYY", "%Y"),
  ("YY", "%y"),
  ("MM", "%m"),
  ("M", "%-m"),
  ("DD", "%d"),
  ("D", "%-d"),
  ("HH", "%H"),
  ("H", "%-H"),
  ("hh", "%I"),
  ("h", "%-I"),
  ("mm", "%M"),
  ("m", "%-M"),
  ("ss", "%S"),
  ("s", "%-S"),
  ("SSS", "%3f"),
  ("A", "%p"),
  ("a", "%P"),
];

impl MomentFormat {
  pub fn new(pattern: &str) -> Self {
    let mut chrono = String::new();
    let mut has_date = false;
    let mut has_time = false;
    let mut rest = pattern;
    'outer: while !rest.is_empty() {
      if let Some(literal) = rest.strip_prefix('[') {
        // [text] is an escaped literal.
        let end = literal.find(']').unwrap_or(literal.len());
        chrono.push_str(&literal[..end].replace('%', "%%"));
        rest = literal.get(end + 1..).unwrap_or("");
        continue;
      }
      for (token, spec) in TOKENS {
        if let Some(after) = rest.strip_prefix(token) {
          chrono.push_str(spec);
          match token.chars().next() {
            Some('Y' | 'M' | 'D') => has_date = true,
            _ => has_time = true,
          }
          rest = after;
          continue 'outer;
        }
      }
      let mut chars = rest.chars();
      if let Some(c) = chars.next() {
        if c == '%' {
          chrono.push_str("%%");
        } else {
          chrono.push(c);
        }
      }
      rest = chars.as_str();
    }
    Self {
      pattern: pattern.to_string(),
      chrono,
      has_date,
      has_time,
    }
  }

  pub fn pattern(&self) -> &str {
    &self.pattern
  }

  /// Parse text written in this format. Date-only formats yield midnight,
  /// time-only formats the Unix epoch date.
  pub fn parse(&self, text: &str) -> Option<NaiveDateTime> {
    match (self.has_date, self.has_time) {
      (true, true) => NaiveDateTime::parse_from_str(text, &self.chrono).ok(),
      (true, false) => NaiveDate::parse_from_str(text, &self.chrono)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0)),
      (false, true) => NaiveTime::parse_from_str(text, &self.chrono)
        .ok()
        .and_then(|t| NaiveDate::from_ymd_opt(1970, 1, 1).map(|d| d.and_time(t))),
      (false, false) => None,
    }
  }

  pub fn format(&self, value: &NaiveDateTime) -> String {
    value.format(&self.chrono).to_string()
  }
}

impl Default for MomentFormat {
  fn default() -> Self {
    Self::new(DEFAULT_DATETIME_FORMAT)
  }
}

/// Read a timestamp from a record value: epoch milliseconds, RFC 3339, or one
/// of the common `YYYY-MM-DD[ HH:mm:ss]` spellings.
pub(crate) fn read_timestamp(value: &Value) -> Option<NaiveDateTime> {
  match value {
    Value::Number(n) => {
      let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
      Utc.timestamp_millis_opt(millis).single().map(|d| d.naive_utc())
    }
    Value::String(s) => DateTime::parse_from_rfc3339(s)
      .map(|d| d.naive_utc())
      .ok()
      .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok())
      .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok())
      .or_else(|| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
          .ok()
          .and_then(|d| d.and_hms_opt(0, 0, 0))
      }),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_default_format_round_trip() {
    let format = MomentFormat::default();
    let parsed = format.parse("2024-03-05 07:08:09").unwrap();
    assert_eq!(format.format(&parsed), "2024-03-05 07:08:09");
  }

  #[test]
  fn test_date_only_format() {
    let format = MomentFormat::new("YYYY/MM/DD");
    let parsed = format.parse("2024/12/31").unwrap();
    assert_eq!(parsed.to_string(), "2024-12-31 00:00:00");
    assert!(format.parse("2024-12-31").is_none());
  }

  #[test]
  fn test_time_only_format() {
    let format = MomentFormat::new("HH:mm");
    assert!(format.parse("23:15").is_some());
    assert!(format.parse("25:15").is_none());
  }

  #[test]
  fn test_escaped_literal() {
    let format = MomentFormat::new("YYYY[年]MM[月]DD[日]");
    let parsed = format.parse("2024年01月02日").unwrap();
    assert_eq!(format.format(&parsed), "2024年01月02日");
  }

  #[test]
  fn test_read_timestamp_variants() {
    assert_eq!(
      read_timestamp(&json!(0)).unwrap().to_string(),
      "1970-01-01 00:00:00"
    );
    assert!(read_timestamp(&json!("2024-01-02")).is_some());
    assert!(read_timestamp(&json!("2024-01-02T03:04:05Z")).is_some());
    assert!(read_timestamp(&json!("yesterday")).is_none());
    assert!(read_timestamp(&json!(true)).is_none());
  }
}
