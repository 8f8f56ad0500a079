use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::registry::ComponentsRegistry;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct License {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// The document's `info` object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

impl Info {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: None,
            terms_of_service: None,
            contact: None,
            license: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Components {
    pub schemas: ComponentsRegistry,
}

/// Root OpenAPI object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecDocument {
    pub openapi: String,
    pub info: Info,
    /// Path template → path item (`get`, `post`, `x-...`).
    pub paths: IndexMap<String, Map<String, Value>>,
    pub components: Components,
}

impl SpecDocument {
    pub fn new(openapi: impl Into<String>, info: Info) -> Self {
        Self {
            openapi: openapi.into(),
            info,
            paths: IndexMap::new(),
            components: Components::default(),
        }
    }

    pub fn schemas(&self) -> &ComponentsRegistry {
        &self.components.schemas
    }

    /// Merge operations into the path item for `path`. An operation already
    /// present for the same method is replaced.
    pub fn merge_path(&mut self, path: impl Into<String>, operations: Map<String, Value>) {
        let item = self.paths.entry(path.into()).or_default();
        for (method, operation) in operations {
            item.insert(method, operation);
        }
    }

    /// Drop every path and schema, keeping the metadata.
    pub fn clear(&mut self) {
        self.paths.clear();
        self.components.schemas.clear();
    }

    pub fn to_value(&self) -> Value {
        // Serialization of these types cannot fail: every map key is a string.
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_document_shape() {
        let doc = SpecDocument::new("3.0.2", Info::new("ReDoc", "1.0.0"));
        assert_eq!(
            doc.to_value(),
            json!({
                "openapi": "3.0.2",
                "info": { "title": "ReDoc", "version": "1.0.0" },
                "paths": {},
                "components": { "schemas": {} }
            })
        );
    }

    #[test]
    fn info_uses_openapi_key_names() {
        let mut info = Info::new("Pets", "2.0");
        info.terms_of_service = Some("https://example.com/tos".into());
        info.license = Some(License {
            name: "MIT".into(),
            url: None,
        });
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["termsOfService"], "https://example.com/tos");
        assert_eq!(value["license"], json!({ "name": "MIT" }));
        assert!(value.get("contact").is_none());
    }

    #[test]
    fn merge_path_combines_methods() {
        let mut doc = SpecDocument::new("3.0.2", Info::new("T", "1"));
        let mut get = Map::new();
        get.insert("get".into(), json!({ "summary": "list" }));
        let mut post = Map::new();
        post.insert("post".into(), json!({ "summary": "create" }));
        doc.merge_path("/pets", get);
        doc.merge_path("/pets", post);

        let item = &doc.paths["/pets"];
        assert_eq!(item.len(), 2);
        assert_eq!(item["post"]["summary"], "create");
    }
}
