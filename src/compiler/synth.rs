//! Route module synthesis: compiled component + generated `meta`/`loader`.
//!
//! Metadata keys are split three ways:
//!
//! - `meta`: literal values for the `meta()` accessor
//! - `headers`: response headers passed to `json(data, { headers })`
//! - everything else: loader data, returned by `loader()` and readable by
//!   `meta()` as `data.<key>`

use serde_json::Value;

use super::js_string;
use crate::content::Metadata;

/// Keys always considered by `meta()`, in emission order.
const BASELINE_META_KEYS: &[&str] = &["title", "description", "keywords"];

const META_KEY: &str = "meta";
const HEADERS_KEY: &str = "headers";

/// Wrap `compiled` with a `meta({ data })` accessor and a `loader()`.
pub fn synthesize(metadata: &Metadata, compiled: &str, runtime_module: &str) -> String {
    let meta = metadata.get(META_KEY).and_then(Value::as_object);
    let headers = metadata.get(HEADERS_KEY).filter(|value| is_truthy(value));

    let mut loader_data = metadata.clone();
    loader_data.remove(META_KEY);
    loader_data.remove(HEADERS_KEY);

    let mut out = String::with_capacity(compiled.len() + 512);
    out.push_str(&format!("import {{ json }} from {};\n", js_string(runtime_module)));
    out.push_str(compiled);
    if !compiled.ends_with('\n') {
        out.push('\n');
    }

    out.push_str(&meta_function(meta, &loader_data));

    let data = format!("{:#}", Value::Object(loader_data));
    out.push_str("export function loader() {\n  return json(");
    out.push_str(&data);
    if let Some(headers) = headers {
        out.push_str(&format!(", {{ headers: {headers:#} }}"));
    }
    out.push_str(");\n}\n");

    out
}

fn meta_function(meta: Option<&Metadata>, loader_data: &Metadata) -> String {
    let entries: Vec<String> = meta_keys(meta)
        .into_iter()
        .filter_map(|key| {
            if let Some(value) = meta.and_then(|m| m.get(key)).filter(|v| is_truthy(v)) {
                Some(format!("    {}: {}", object_key(key), js_string(&to_js_string(value))))
            } else if loader_data.get(key).is_some_and(is_truthy) {
                Some(format!("    {}: {}", object_key(key), data_access(key)))
            } else {
                None
            }
        })
        .collect();

    if entries.is_empty() {
        return "export function meta({ data }) {\n  return {};\n}\n".to_string();
    }
    format!(
        "export function meta({{ data }}) {{\n  return {{\n{},\n  }};\n}}\n",
        entries.join(",\n")
    )
}

/// Baseline keys, then `meta` keys in first-seen order, without duplicates.
fn meta_keys(meta: Option<&Metadata>) -> Vec<&str> {
    let mut keys: Vec<&str> = BASELINE_META_KEYS.to_vec();
    for key in meta.into_iter().flat_map(|m| m.keys()) {
        if !keys.contains(&key.as_str()) {
            keys.push(key);
        }
    }
    keys
}

/// JavaScript truthiness of a metadata value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// JavaScript `String(value)` of a metadata value.
fn to_js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => to_js_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn object_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        js_string(key)
    }
}

fn data_access(key: &str) -> String {
    if is_identifier(key) {
        format!("data.{key}")
    } else {
        format!("data[{}]", js_string(key))
    }
}
