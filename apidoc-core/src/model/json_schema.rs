//! Bridges between JSON-Schema exports and [`ModelDescriptor`]s.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use super::{FieldDescriptor, ModelDescriptor, ModelRef, TypeAnnotation};

const DEFINITION_PREFIXES: [&str; 2] = ["#/$defs/", "#/definitions/"];

/// Export a `schemars` type as `(name, schema)`.
///
/// The schema is the crate's root schema for `T` (draft 2020-12), with
/// auxiliary types under `$defs`.
pub fn schemars_export<T: schemars::JsonSchema>() -> (String, Value) {
    let schema = schemars::schema_for!(T);
    let value = serde_json::to_value(&schema).unwrap_or(Value::Null);
    (T::schema_name().into_owned(), value)
}

impl ModelDescriptor {
    /// Rebuild a descriptor from a JSON-Schema export.
    ///
    /// Best effort: shapes that do not map onto a [`TypeAnnotation`] become
    /// [`TypeAnnotation::Other`]. References into the export's own `$defs`
    /// (or `definitions`) section resolve to descriptors built from those
    /// entries; a reference cycle falls back to a name-only [`ModelRef`].
    pub fn from_json_schema(name: impl Into<String>, schema: &Value) -> ModelDescriptor {
        let mut importer = Importer {
            defs: collect_definitions(schema),
            in_progress: HashSet::new(),
            done: HashMap::new(),
        };
        importer.model(name.into(), schema)
    }
}

fn collect_definitions(schema: &Value) -> Map<String, Value> {
    let mut defs = Map::new();
    for key in ["definitions", "$defs"] {
        if let Some(Value::Object(section)) = schema.get(key) {
            for (name, def) in section {
                defs.insert(name.clone(), def.clone());
            }
        }
    }
    defs
}

struct Importer {
    defs: Map<String, Value>,
    in_progress: HashSet<String>,
    done: HashMap<String, ModelDescriptor>,
}

impl Importer {
    fn model(&mut self, name: String, schema: &Value) -> ModelDescriptor {
        self.in_progress.insert(name.clone());
        let mut model = ModelDescriptor::new(name.clone());

        if let Some(Value::Object(properties)) = schema.get("properties") {
            for (field_name, field_schema) in properties {
                let mut field = FieldDescriptor::new(self.annotation(field_schema, false));
                if let Some(desc) = field_schema.get("description").and_then(Value::as_str) {
                    field = field.with_description(desc);
                }
                model = model.with_field(field_name.clone(), field);
            }
        }

        self.in_progress.remove(&name);
        self.done.insert(name, model.clone());
        model
    }

    fn annotation(&mut self, schema: &Value, ignore_nullable: bool) -> TypeAnnotation {
        let Some(obj) = schema.as_object() else {
            return TypeAnnotation::other("any");
        };

        if !ignore_nullable && obj.get("nullable").and_then(Value::as_bool) == Some(true) {
            return TypeAnnotation::optional(self.annotation(schema, true));
        }

        if let Some(Value::String(target)) = obj.get("$ref") {
            return TypeAnnotation::Model(self.reference(target));
        }

        for key in ["anyOf", "oneOf"] {
            if let Some(Value::Array(variants)) = obj.get(key) {
                return match non_null_variant(variants) {
                    Some(inner) => TypeAnnotation::optional(self.annotation(inner, false)),
                    None => TypeAnnotation::other(key),
                };
            }
        }

        if let Some(Value::Array(parts)) = obj.get("allOf") {
            if let [single] = parts.as_slice() {
                return self.annotation(single, false);
            }
            return TypeAnnotation::other("allOf");
        }

        match obj.get("type") {
            Some(Value::String(t)) => self.typed(t, obj),
            Some(Value::Array(types)) => {
                let non_null: Vec<&str> = types
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|t| *t != "null")
                    .collect();
                match non_null.as_slice() {
                    [single] if non_null.len() < types.len() => {
                        TypeAnnotation::optional(self.typed(single, obj))
                    }
                    [single] => self.typed(single, obj),
                    _ => TypeAnnotation::other("union"),
                }
            }
            _ => TypeAnnotation::other("any"),
        }
    }

    fn typed(&mut self, type_name: &str, obj: &Map<String, Value>) -> TypeAnnotation {
        match type_name {
            "string" => TypeAnnotation::String,
            "integer" => TypeAnnotation::Integer,
            "number" => TypeAnnotation::Float,
            "boolean" => TypeAnnotation::Boolean,
            "array" => match obj.get("items") {
                Some(items @ Value::Object(_)) => TypeAnnotation::list(self.annotation(items, false)),
                _ => TypeAnnotation::AnyList,
            },
            "object" => match obj.get("additionalProperties") {
                Some(values @ Value::Object(_)) => TypeAnnotation::map(self.annotation(values, false)),
                _ => TypeAnnotation::AnyMap,
            },
            other => TypeAnnotation::other(other),
        }
    }

    fn reference(&mut self, target: &str) -> ModelRef {
        let name = DEFINITION_PREFIXES
            .iter()
            .find_map(|prefix| target.strip_prefix(prefix))
            .unwrap_or(target)
            .to_string();

        if let Some(done) = self.done.get(&name) {
            return ModelRef::to(done.clone());
        }
        if self.in_progress.contains(&name) {
            return ModelRef::named(name);
        }
        match self.defs.get(&name).cloned() {
            Some(def) => ModelRef::to(self.model(name, &def)),
            None => ModelRef::named(name),
        }
    }
}

fn non_null_variant(variants: &[Value]) -> Option<&Value> {
    let is_null = |v: &Value| v.get("type").and_then(Value::as_str) == Some("null");
    match variants {
        [a, b] if is_null(b) => Some(a),
        [a, b] if is_null(a) => Some(b),
        _ => None,
    }
}
