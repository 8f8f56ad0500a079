use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use apidoc_core::model::{ModelDescriptor, TypeAnnotation};
use indexmap::IndexMap;

use crate::diagnostic::Diagnostic;
use crate::schema::{ScalarKind, SchemaNode};

/// Converts [`ModelDescriptor`]s into OpenAPI schemas.
///
/// Results are cached by model name: translating a name a second time
/// returns the same `Arc` without looking at the descriptor again, even if
/// its fields have changed since.
///
/// Translation never fails. Annotations that have no OpenAPI counterpart are
/// documented as `{type: string}` and reported through
/// [`take_diagnostics`](Self::take_diagnostics).
#[derive(Debug, Default)]
pub struct SchemaTranslator {
    cache: HashMap<String, Arc<SchemaNode>>,
    diagnostics: Vec<Diagnostic>,
}

impl SchemaTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate a model into `{type: object, title, properties}`.
    pub fn translate(&mut self, model: &ModelDescriptor) -> Arc<SchemaNode> {
        if let Some(node) = self.cache.get(model.name()) {
            return Arc::clone(node);
        }

        let mut properties = IndexMap::new();
        for (field_name, field) in model.fields() {
            let mut node = self.annotation(model.name(), field_name, &field.annotation);
            if let Some(description) = &field.description {
                node.annotations_mut().description = Some(description.clone());
            }
            properties.insert(field_name.to_string(), node);
        }

        let node = Arc::new(SchemaNode::titled_object(model.name(), properties));
        self.cache.insert(model.name().to_string(), Arc::clone(&node));
        node
    }

    /// Translate every model reachable from `model` through its fields,
    /// excluding `model` itself, in breadth-first discovery order.
    ///
    /// References that cannot be resolved to a descriptor are skipped; the
    /// assembler reports them once it knows nobody else registered them.
    pub fn translate_dependencies(
        &mut self,
        model: &ModelDescriptor,
    ) -> IndexMap<String, Arc<SchemaNode>> {
        let mut out = IndexMap::new();
        let mut seen = HashSet::from([model.name().to_string()]);
        let mut queue: VecDeque<_> = model.referenced_models().into();

        while let Some(model_ref) = queue.pop_front() {
            if !seen.insert(model_ref.name().to_string()) {
                continue;
            }
            let Some(descriptor) = model_ref.resolve() else {
                continue;
            };
            queue.extend(descriptor.referenced_models());
            out.insert(descriptor.name().to_string(), self.translate(&descriptor));
        }
        out
    }

    /// Translate a single field annotation, outside of any model.
    pub fn translate_annotation(&mut self, annotation: &TypeAnnotation) -> SchemaNode {
        self.annotation("", "", annotation)
    }

    fn annotation(&mut self, model: &str, field: &str, annotation: &TypeAnnotation) -> SchemaNode {
        match annotation {
            TypeAnnotation::String => SchemaNode::scalar(ScalarKind::String),
            TypeAnnotation::Integer => SchemaNode::scalar(ScalarKind::Integer),
            TypeAnnotation::Float => SchemaNode::scalar(ScalarKind::Number),
            TypeAnnotation::Boolean => SchemaNode::scalar(ScalarKind::Boolean),
            TypeAnnotation::AnyList => SchemaNode::any_array(),
            TypeAnnotation::AnyMap => SchemaNode::any_object(),
            TypeAnnotation::List(inner) => SchemaNode::array(self.annotation(model, field, inner)),
            TypeAnnotation::Map(value) => SchemaNode::map(self.annotation(model, field, value)),
            TypeAnnotation::Optional(inner) => self.annotation(model, field, inner).with_nullable(),
            TypeAnnotation::Model(model_ref) => SchemaNode::component_reference(model_ref.name()),
            TypeAnnotation::Other(name) => {
                tracing::debug!(model, field, annotation = %name, "unknown type, documenting as string");
                self.diagnostics.push(Diagnostic::UnknownType {
                    model: model.to_string(),
                    field: field.to_string(),
                    annotation: name.clone(),
                });
                SchemaNode::string()
            }
        }
    }

    /// The cached node for `name`, if the model was translated before.
    pub fn cached(&self, name: &str) -> Option<Arc<SchemaNode>> {
        self.cache.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Forget every cached translation.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Drain the diagnostics recorded since the last call.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
