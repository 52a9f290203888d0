use indexmap::IndexMap;
use serde_json::{Map, Value};
use url::form_urlencoded;

fn encode(text: &str) -> String {
  form_urlencoded::byte_serialize(text.as_bytes()).collect()
}

/// Name a raw `key=value` pair is grouped under: the decoded key up to its
/// first `[`, so `a[]=1` and `a[]=2` belong to `a`.
fn base_name(pair: &str) -> String {
  let raw_key = pair.split('=').next().unwrap_or(pair);
  let key = form_urlencoded::parse(raw_key.as_bytes())
    .next()
    .map(|(key, _)| key.into_owned())
    .unwrap_or_default();
  match key.find('[') {
    Some(end) => key[..end].to_string(),
    None => key,
  }
}

/// Encoded pairs for one parameter. Arrays use `key[]=v`, objects
/// `key[sub]=v`, and `null` a bare `key`.
fn push_pairs(key: &str, value: &Value, out: &mut Vec<String>) {
  match value {
    Value::Null => out.push(key.to_string()),
    Value::Array(items) => {
      let key = format!("{key}[]");
      for item in items {
        push_pairs(&key, item, out);
      }
    }
    Value::Object(map) => {
      for (sub, item) in map {
        push_pairs(&format!("{key}[{}]", encode(sub)), item, out);
      }
    }
    Value::String(s) => out.push(format!("{key}={}", encode(s))),
    other => out.push(format!("{key}={}", encode(&other.to_string()))),
  }
}

/// Encode `params` as a query string (no leading `?`).
pub fn stringify(params: &Map<String, Value>) -> String {
  let mut pairs = Vec::new();
  for (key, value) in params {
    push_pairs(&encode(key), value, &mut pairs);
  }
  pairs.join("&")
}

/// Merge `params` into the query string of `url`.
///
/// Keys already in the URL keep their position; a key that is also in
/// `params` has its value replaced in place. New keys are appended in
/// `params` order. Works on absolute and relative URLs and keeps any fragment.
pub fn merge_query(url: &str, params: &Map<String, Value>) -> String {
  let (rest, fragment) = match url.split_once('#') {
    Some((rest, fragment)) => (rest, Some(fragment)),
    None => (url, None),
  };
  let (path, query) = match rest.split_once('?') {
    Some((path, query)) => (path, query),
    None => (rest, ""),
  };

  let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
  for pair in query.split('&').filter(|pair| !pair.is_empty()) {
    groups.entry(base_name(pair)).or_default().push(pair.to_string());
  }
  for (key, value) in params {
    let mut pairs = Vec::new();
    push_pairs(&encode(key), value, &mut pairs);
    // Replaces in place when present, appends otherwise.
    groups.insert(key.clone(), pairs);
  }

  let query = groups.into_values().flatten().collect::<Vec<_>>().join("&");
  let mut merged = path.to_string();
  if !query.is_empty() {
    merged.push('?');
    merged.push_str(&query);
  }
  if let Some(fragment) = fragment {
    merged.push('#');
    merged.push_str(fragment);
  }
  merged
}
