use std::collections::{HashMap, HashSet};

use apidoc_core::model::{schemars_export, DocModel, ModelDescriptor};
use apidoc_core::RouteInfo;
use indexmap::IndexMap;
use serde_json::Value;

use crate::config::RedocConfig;
use crate::diagnostic::Diagnostic;
use crate::document::SpecDocument;
use crate::error::DocError;
use crate::operations::route_operations;
use crate::registry::Registration;
use crate::schema::{component_name, local_definition_name, SchemaNode};
use crate::translator::SchemaTranslator;

/// Where a registered model's schema comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelSource {
    /// Translated by the [`SchemaTranslator`].
    Descriptor(ModelDescriptor),
    /// A ready-made JSON-Schema export, possibly carrying `$defs`.
    Export { name: String, schema: Value },
}

impl ModelSource {
    /// Source for a type implementing [`DocModel`].
    pub fn of<M: DocModel>() -> Self {
        ModelSource::Descriptor(M::descriptor())
    }

    /// Source for a type deriving `schemars::JsonSchema`.
    pub fn schemars<T: apidoc_core::schemars::JsonSchema>() -> Self {
        let (name, schema) = schemars_export::<T>();
        ModelSource::Export { name, schema }
    }

    /// Source for a `schemars` type, routed through the translator instead
    /// of promoting its export as-is.
    pub fn schemars_descriptor<T: apidoc_core::schemars::JsonSchema>() -> Self {
        let (name, schema) = schemars_export::<T>();
        ModelSource::Descriptor(ModelDescriptor::from_json_schema(name, &schema))
    }

    /// A descriptor's own JSON-Schema export (`$defs` and `required`).
    pub fn exported(model: &ModelDescriptor) -> Self {
        ModelSource::Export {
            name: model.name().to_string(),
            schema: model.export_json_schema(),
        }
    }

    pub fn export(name: impl Into<String>, schema: Value) -> Self {
        ModelSource::Export {
            name: name.into(),
            schema,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ModelSource::Descriptor(model) => model.name(),
            ModelSource::Export { name, .. } => name,
        }
    }
}

impl From<ModelDescriptor> for ModelSource {
    fn from(model: ModelDescriptor) -> Self {
        ModelSource::Descriptor(model)
    }
}

/// Owns the [`SpecDocument`] and everything that goes into it.
///
/// Registration promotes local definitions into `components.schemas`,
/// rewrites references to point there, then registers the model itself.
/// [`build_once`](Self::build_once) registers a set of models and the
/// documented routes, and does nothing on later calls until
/// [`reset`](Self::reset).
#[derive(Debug)]
pub struct DocumentAssembler {
    document: SpecDocument,
    translator: SchemaTranslator,
    /// Descriptors registered through the translator, by name.
    descriptors: HashMap<String, ModelDescriptor>,
    diagnostics: Vec<Diagnostic>,
    built: bool,
}

impl DocumentAssembler {
    pub fn new(config: &RedocConfig) -> Self {
        Self {
            document: SpecDocument::new(config.openapi_version.clone(), config.info()),
            translator: SchemaTranslator::new(),
            descriptors: HashMap::new(),
            diagnostics: Vec::new(),
            built: false,
        }
    }

    /// Replace the document's metadata, keeping paths and schemas.
    pub fn set_metadata(&mut self, config: &RedocConfig) {
        self.document.openapi = config.openapi_version.clone();
        self.document.info = config.info();
    }

    // ── Registration ────────────────────────────────────────────────────

    pub fn register(&mut self, source: &ModelSource) -> Result<Registration, DocError> {
        match source {
            ModelSource::Descriptor(model) => self.register_model(model),
            ModelSource::Export { name, schema } => self.register_export(name, schema),
        }
    }

    /// Register a model through the translator. Models it references are
    /// translated and registered alongside it.
    ///
    /// A descriptor that differs from one registered earlier under the same
    /// name is rejected; the translator's cache would otherwise hand back the
    /// first model's schema.
    pub fn register_model(&mut self, model: &ModelDescriptor) -> Result<Registration, DocError> {
        let conflicts = self
            .descriptors
            .get(model.name())
            .is_some_and(|known| known != model);
        if conflicts {
            return Err(self.collision(model.name()));
        }

        let node = self.translator.translate(model);
        let dependencies = self.translator.translate_dependencies(model);
        self.diagnostics.extend(self.translator.take_diagnostics());

        let definitions = dependencies
            .into_iter()
            .map(|(name, node)| (name, node.as_ref().clone()))
            .collect();
        let registration = self.register_node(model.name(), node.as_ref().clone(), definitions)?;
        self.descriptors
            .entry(model.name().to_string())
            .or_insert_with(|| model.clone());
        Ok(registration)
    }

    /// Register a JSON-Schema export. Its `$defs` / `definitions` section is
    /// promoted into the components and every local reference rewritten.
    pub fn register_export(&mut self, name: &str, schema: &Value) -> Result<Registration, DocError> {
        let mut node = SchemaNode::from_value(schema);
        let mut definitions = IndexMap::new();
        node.drain_definitions(&mut definitions);

        node.rewrite_local_references();
        for definition in definitions.values_mut() {
            definition.rewrite_local_references();
        }
        self.register_node(name, node, definitions)
    }

    fn register_node(
        &mut self,
        name: &str,
        node: SchemaNode,
        definitions: IndexMap<String, SchemaNode>,
    ) -> Result<Registration, DocError> {
        if let Some(existing) = self.document.schemas().get(name) {
            if *existing == node {
                return Ok(Registration::Unchanged);
            }
            return Err(self.collision(name));
        }

        for (def_name, definition) in definitions {
            if self
                .document
                .components
                .schemas
                .insert(def_name.clone(), definition)
                .is_err()
            {
                // The parent registration still goes ahead.
                let _ = self.collision(&def_name);
            }
        }

        self.document
            .components
            .schemas
            .insert(name, node)
            .map_err(|collision| self.collision(&collision.name))
    }

    fn collision(&mut self, name: &str) -> DocError {
        tracing::warn!(schema = name, "schema name already registered with a different definition, keeping the first");
        self.diagnostics.push(Diagnostic::SchemaCollision {
            name: name.to_string(),
        });
        DocError::SchemaCollision {
            name: name.to_string(),
        }
    }

    // ── Routes ──────────────────────────────────────────────────────────

    /// Merge a route's documented operations into `paths`.
    ///
    /// Undocumented routes are skipped. Malformed documentation is logged,
    /// recorded and skipped.
    pub fn add_route(&mut self, route: &RouteInfo) {
        if route.documentation().is_none() {
            tracing::debug!(route = %route.name, path = %route.path, "route has no documentation, skipping");
            self.diagnostics.push(Diagnostic::UndocumentedRoute {
                route: route.name.clone(),
            });
            return;
        }

        match route_operations(route) {
            Ok(parsed) => self.document.merge_path(parsed.path, parsed.operations),
            Err(err) => {
                tracing::warn!(route = %route.name, error = %err, "skipping route with malformed documentation");
                let message = match err {
                    DocError::RouteDoc { message, .. } => message,
                    other => other.to_string(),
                };
                self.diagnostics.push(Diagnostic::MalformedRouteDoc {
                    route: route.name.clone(),
                    message,
                });
            }
        }
    }

    // ── Build ───────────────────────────────────────────────────────────

    /// Register `models` and every documented route, once.
    ///
    /// Returns `true` if the build ran, `false` if the document was already
    /// built. Registration errors are recorded as diagnostics.
    pub fn build_once(&mut self, models: &[ModelSource], routes: &[RouteInfo]) -> bool {
        if self.built {
            return false;
        }
        self.built = true;

        for model in models {
            if let Err(err) = self.register(model) {
                tracing::debug!(model = model.name(), error = %err, "model not registered");
            }
        }
        for route in routes {
            self.add_route(route);
        }
        self.report_dangling_references();

        tracing::info!(
            schemas = self.document.schemas().len(),
            paths = self.document.paths.len(),
            "OpenAPI document built"
        );
        true
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Clear the latch, the document's paths and schemas, the translator
    /// cache and the diagnostics.
    pub fn reset(&mut self) {
        self.built = false;
        self.document.clear();
        self.translator.clear();
        self.descriptors.clear();
        self.diagnostics.clear();
    }

    /// Names referenced under `#/components/schemas/` that are not
    /// registered, and names still referenced through a local-definitions
    /// prefix (`#/$defs/`), which cannot resolve inside the document.
    pub fn dangling_references(&self) -> Vec<String> {
        let schemas = self.document.schemas();
        let mut targets: Vec<String> = Vec::new();
        for (_, node) in schemas.iter() {
            targets.extend(node.references().into_iter().map(str::to_string));
        }
        for item in self.document.paths.values() {
            for operation in item.values() {
                collect_value_refs(operation, &mut targets);
            }
        }

        let mut seen = HashSet::new();
        targets
            .iter()
            .filter_map(|target| match component_name(target) {
                Some(name) if schemas.contains(name) => None,
                Some(name) => Some(name),
                None => local_definition_name(target),
            })
            .filter(|name| seen.insert(name.to_string()))
            .map(str::to_string)
            .collect()
    }

    fn report_dangling_references(&mut self) {
        for name in self.dangling_references() {
            let diagnostic = Diagnostic::DanglingReference { name };
            if !self.diagnostics.contains(&diagnostic) {
                tracing::warn!(%diagnostic, "dangling schema reference");
                self.diagnostics.push(diagnostic);
            }
        }
    }

    // ── Access ──────────────────────────────────────────────────────────

    pub fn document(&self) -> &SpecDocument {
        &self.document
    }

    pub fn to_value(&self) -> Value {
        self.document.to_value()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

fn collect_value_refs(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(target)) = map.get("$ref") {
                out.push(target.clone());
            }
            map.values().for_each(|v| collect_value_refs(v, out));
        }
        Value::Array(items) => items.iter().for_each(|v| collect_value_refs(v, out)),
        _ => {}
    }
}
