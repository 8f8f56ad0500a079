//! Route documentation → OpenAPI operations.
//!
//! A route's documentation string is free prose, optionally followed by a
//! line containing only `---` and a YAML mapping of operations:
//!
//! ```text
//! Fetch a single user.
//! ---
//! get:
//!   summary: Fetch a user
//!   responses:
//!     200:
//!       content:
//!         application/json:
//!           schema: User
//! ```
//!
//! Only keys naming an HTTP method or starting with `x-` are kept. A bare
//! string under `schema` or `items` is a model name and becomes a reference
//! into `components.schemas`.

use apidoc_core::RouteInfo;
use serde_json::{json, Map, Value};

use crate::error::DocError;
use crate::schema::components_ref;

pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

const DOC_SEPARATOR: &str = "---";

/// The operations a single route contributes to `paths`.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOperations {
    /// Path in OpenAPI template form (`/users/{id}`).
    pub path: String,
    /// Path item entries (`get`, `post`, `x-...`).
    pub operations: Map<String, Value>,
}

/// Parse the operations documented on `route`.
///
/// A route whose documentation has no YAML block yields an empty operation
/// map. Malformed YAML, or YAML that is not a mapping, is a
/// [`DocError::RouteDoc`].
pub fn route_operations(route: &RouteInfo) -> Result<RouteOperations, DocError> {
    let operations = match route.documentation().and_then(yaml_block) {
        Some(block) => parse_operations(&route.name, &block)?,
        None => Map::new(),
    };
    Ok(RouteOperations {
        path: openapi_path(&route.path),
        operations,
    })
}

/// Convert a host path to OpenAPI template form.
///
/// `/users/:id` and `/users/{id}` both become `/users/{id}`; wildcards
/// (`*rest`, `{*rest}`) become `{rest}`.
pub fn openapi_path(host_path: &str) -> String {
    host_path
        .split('/')
        .map(|segment| {
            if let Some(name) = segment.strip_prefix(':') {
                format!("{{{name}}}")
            } else if let Some(name) = segment.strip_prefix('*') {
                format!("{{{name}}}")
            } else if let Some(name) = segment.strip_prefix("{*") {
                format!("{{{name}")
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// The dedented YAML text after the `---` separator line, if any.
fn yaml_block(doc: &str) -> Option<String> {
    let mut lines = doc.lines();
    lines.by_ref().find(|line| line.trim() == DOC_SEPARATOR)?;
    let block: Vec<&str> = lines.collect();

    let indent = block
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let dedented: Vec<&str> = block
        .iter()
        .map(|line| line.get(indent..).unwrap_or_else(|| line.trim_start()))
        .collect();
    Some(dedented.join("\n"))
}

fn parse_operations(route: &str, yaml: &str) -> Result<Map<String, Value>, DocError> {
    let parsed: serde_yaml::Value = serde_yaml::from_str(yaml).map_err(|e| DocError::RouteDoc {
        route: route.to_string(),
        message: e.to_string(),
    })?;

    let entries = match yaml_to_json(parsed) {
        Value::Object(entries) => entries,
        Value::Null => return Ok(Map::new()),
        other => {
            return Err(DocError::RouteDoc {
                route: route.to_string(),
                message: format!("expected a mapping of operations, found {}", json_kind(&other)),
            })
        }
    };

    let mut operations = Map::new();
    for (key, mut value) in entries {
        let key = key.to_lowercase();
        if HTTP_METHODS.contains(&key.as_str()) || key.starts_with("x-") {
            resolve_model_names(&mut value);
            operations.insert(key, value);
        } else {
            tracing::debug!(route, key, "ignoring non-operation key in route documentation");
        }
    }
    Ok(operations)
}

/// Replace bare model names under `schema` / `items` with references.
fn resolve_model_names(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                if key == "schema" || key == "items" {
                    if let Value::String(name) = child {
                        *child = json!({ "$ref": components_ref(name) });
                        continue;
                    }
                }
                resolve_model_names(child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(resolve_model_names),
        _ => {}
    }
}

/// Convert YAML to JSON. Non-string keys (e.g. `200:`) become strings.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;
    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!(i)
            } else if let Some(u) = n.as_u64() {
                json!(u)
            } else {
                n.as_f64().map(|f| json!(f)).unwrap_or(Value::Null)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .map(|(k, v)| (yaml_key(k), yaml_to_json(v)))
                .collect(),
        ),
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
