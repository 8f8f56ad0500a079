use std::collections::{HashSet, VecDeque};

use serde_json::{json, Map, Value};

use super::{ModelDescriptor, TypeAnnotation};

/// Where exported schemas place their auxiliary definitions.
pub const EXPORT_DEFS_PREFIX: &str = "#/$defs/";

impl ModelDescriptor {
    /// Export this model as a JSON-Schema mapping.
    ///
    /// References to other models point at `#/$defs/<Name>`, and every model
    /// reachable from this one (including itself, when recursive) is flattened
    /// into a top-level `$defs` section. Fields that are not `Optional` are
    /// listed under `required`.
    pub fn export_json_schema(&self) -> Value {
        let mut root = self.export_object();

        let mut defs = Map::new();
        let mut seen = HashSet::new();
        let mut queue: VecDeque<_> = self.referenced_models().into_iter().collect();
        while let Some(model_ref) = queue.pop_front() {
            if !seen.insert(model_ref.name().to_string()) {
                continue;
            }
            let Some(model) = model_ref.resolve() else {
                continue;
            };
            defs.insert(model.name().to_string(), model.export_object());
            queue.extend(model.referenced_models());
        }

        if !defs.is_empty() {
            if let Some(obj) = root.as_object_mut() {
                obj.insert("$defs".into(), Value::Object(defs));
            }
        }
        root
    }

    fn export_object(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for (name, field) in self.fields() {
            let mut schema = export_annotation(&field.annotation);
            if let (Some(desc), Some(obj)) = (&field.description, schema.as_object_mut()) {
                obj.insert("description".into(), json!(desc));
            }
            properties.insert(name.to_string(), schema);
            if !field.is_optional() {
                required.push(json!(name));
            }
        }

        let mut schema = Map::new();
        schema.insert("type".into(), json!("object"));
        schema.insert("title".into(), json!(self.name()));
        schema.insert("properties".into(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".into(), Value::Array(required));
        }
        Value::Object(schema)
    }
}

fn export_annotation(annotation: &TypeAnnotation) -> Value {
    match annotation {
        TypeAnnotation::String | TypeAnnotation::Other(_) => json!({ "type": "string" }),
        TypeAnnotation::Integer => json!({ "type": "integer" }),
        TypeAnnotation::Float => json!({ "type": "number" }),
        TypeAnnotation::Boolean => json!({ "type": "boolean" }),
        TypeAnnotation::AnyList => json!({ "type": "array" }),
        TypeAnnotation::AnyMap => json!({ "type": "object" }),
        TypeAnnotation::List(inner) => json!({
            "type": "array",
            "items": export_annotation(inner),
        }),
        TypeAnnotation::Map(value) => json!({
            "type": "object",
            "additionalProperties": export_annotation(value),
        }),
        TypeAnnotation::Optional(inner) => {
            let mut schema = export_annotation(inner);
            if let Some(obj) = schema.as_object_mut() {
                obj.insert("nullable".into(), json!(true));
            }
            schema
        }
        TypeAnnotation::Model(r) => json!({ "$ref": format!("{EXPORT_DEFS_PREFIX}{}", r.name()) }),
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{ModelDescriptor, ModelRef, TypeAnnotation};
    use serde_json::json;

    fn address() -> ModelDescriptor {
        ModelDescriptor::new("Address")
            .field("city", TypeAnnotation::String)
            .field("country", TypeAnnotation::Model(ModelRef::new("Country", country)))
    }

    fn country() -> ModelDescriptor {
        ModelDescriptor::new("Country").field("code", TypeAnnotation::String)
    }

    fn tree() -> ModelDescriptor {
        ModelDescriptor::new("Tree")
            .field("children", TypeAnnotation::list(TypeAnnotation::Model(ModelRef::new("Tree", tree))))
    }

    #[test]
    fn scalar_export_lists_required_fields() {
        let model = ModelDescriptor::new("User")
            .field("id", TypeAnnotation::Integer)
            .described_field("nick", TypeAnnotation::optional(TypeAnnotation::String), "Display name");

        assert_eq!(
            model.export_json_schema(),
            json!({
                "type": "object",
                "title": "User",
                "properties": {
                    "id": { "type": "integer" },
                    "nick": { "type": "string", "nullable": true, "description": "Display name" }
                },
                "required": ["id"]
            })
        );
    }

    #[test]
    fn transitive_models_are_flattened_into_defs() {
        let user = ModelDescriptor::new("User").field("home", TypeAnnotation::model(&address()));
        let schema = user.export_json_schema();

        assert_eq!(schema["properties"]["home"]["$ref"], "#/$defs/Address");
        assert_eq!(schema["$defs"]["Address"]["properties"]["country"]["$ref"], "#/$defs/Country");
        assert_eq!(schema["$defs"]["Country"]["title"], "Country");
        assert!(schema["$defs"]["Address"].get("$defs").is_none());
    }

    #[test]
    fn recursive_model_defines_itself() {
        let schema = tree().export_json_schema();
        assert_eq!(schema["properties"]["children"]["items"]["$ref"], "#/$defs/Tree");
        assert_eq!(schema["$defs"]["Tree"]["title"], "Tree");
    }

    #[test]
    fn no_defs_section_without_references() {
        let schema = ModelDescriptor::new("Empty").export_json_schema();
        assert!(schema.get("$defs").is_none());
        assert!(schema.get("required").is_none());
    }
}
