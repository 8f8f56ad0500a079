//! Structured data-model descriptions.
//!
//! A [`ModelDescriptor`] is the shape a documented type exposes to the
//! OpenAPI layer: a stable name plus an ordered list of fields, each carrying
//! a [`TypeAnnotation`] and an optional human-readable description.
//!
//! Descriptors are usually produced by implementing [`DocModel`] on the Rust
//! type itself:
//!
//! ```
//! use apidoc_core::model::{DocModel, ModelDescriptor, ModelRef, TypeAnnotation};
//!
//! struct Address;
//!
//! impl DocModel for Address {
//!     fn model_name() -> &'static str { "Address" }
//!     fn descriptor() -> ModelDescriptor {
//!         ModelDescriptor::new("Address").field("city", TypeAnnotation::String)
//!     }
//! }
//!
//! let user = ModelDescriptor::new("User")
//!     .field("id", TypeAnnotation::Integer)
//!     .field("home", TypeAnnotation::Model(ModelRef::of::<Address>()));
//!
//! assert_eq!(user.referenced_models()[0].name(), "Address");
//! ```

mod export;
mod json_schema;

use std::fmt;
use std::sync::Arc;

pub use self::export::EXPORT_DEFS_PREFIX;
pub use self::json_schema::schemars_export;

/// A type that can describe its own documented shape.
pub trait DocModel {
    /// The stable model name, used as the OpenAPI component key.
    fn model_name() -> &'static str;

    /// Build the descriptor for this model.
    fn descriptor() -> ModelDescriptor;
}

/// The type annotation attached to a field.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeAnnotation {
    String,
    Integer,
    Float,
    Boolean,
    /// A bare list with no element type.
    AnyList,
    /// A bare mapping with no value type.
    AnyMap,
    /// A list of the inner type.
    List(Box<TypeAnnotation>),
    /// A string-keyed mapping to the inner value type.
    Map(Box<TypeAnnotation>),
    /// The inner type, or absent/null.
    Optional(Box<TypeAnnotation>),
    /// A reference to another model.
    Model(ModelRef),
    /// Anything the schema layer does not recognise, kept by name for diagnostics.
    Other(String),
}

impl TypeAnnotation {
    pub fn list(inner: TypeAnnotation) -> Self {
        TypeAnnotation::List(Box::new(inner))
    }

    pub fn map(value: TypeAnnotation) -> Self {
        TypeAnnotation::Map(Box::new(value))
    }

    pub fn optional(inner: TypeAnnotation) -> Self {
        TypeAnnotation::Optional(Box::new(inner))
    }

    /// Reference a model described by an existing descriptor value.
    pub fn model(descriptor: &ModelDescriptor) -> Self {
        TypeAnnotation::Model(ModelRef::to(descriptor.clone()))
    }

    pub fn other(name: impl Into<String>) -> Self {
        TypeAnnotation::Other(name.into())
    }

    /// Human-readable form, used in diagnostics.
    pub fn display_name(&self) -> String {
        match self {
            TypeAnnotation::String => "str".into(),
            TypeAnnotation::Integer => "int".into(),
            TypeAnnotation::Float => "float".into(),
            TypeAnnotation::Boolean => "bool".into(),
            TypeAnnotation::AnyList => "list".into(),
            TypeAnnotation::AnyMap => "dict".into(),
            TypeAnnotation::List(inner) => format!("list[{}]", inner.display_name()),
            TypeAnnotation::Map(value) => format!("dict[str, {}]", value.display_name()),
            TypeAnnotation::Optional(inner) => format!("Optional[{}]", inner.display_name()),
            TypeAnnotation::Model(r) => r.name().to_string(),
            TypeAnnotation::Other(name) => name.clone(),
        }
    }

    fn collect_models<'a>(&'a self, out: &mut Vec<&'a ModelRef>) {
        match self {
            TypeAnnotation::List(inner)
            | TypeAnnotation::Map(inner)
            | TypeAnnotation::Optional(inner) => inner.collect_models(out),
            TypeAnnotation::Model(r) => out.push(r),
            _ => {}
        }
    }
}

#[derive(Clone)]
enum Resolver {
    Fn(fn() -> ModelDescriptor),
    Shared(Arc<ModelDescriptor>),
    /// Only the name is known (e.g. a cycle in an imported JSON schema).
    Named,
}

/// A lazily-resolved reference to another model.
///
/// Resolution is deferred so that recursive models can be described without
/// building an infinite value.
#[derive(Clone)]
pub struct ModelRef {
    name: String,
    resolver: Resolver,
}

impl ModelRef {
    /// Reference a model through its descriptor function.
    pub fn new(name: impl Into<String>, resolve: fn() -> ModelDescriptor) -> Self {
        Self {
            name: name.into(),
            resolver: Resolver::Fn(resolve),
        }
    }

    /// Reference a type implementing [`DocModel`].
    pub fn of<M: DocModel>() -> Self {
        Self::new(M::model_name(), M::descriptor)
    }

    /// Reference an already-built descriptor.
    pub fn to(descriptor: ModelDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            resolver: Resolver::Shared(Arc::new(descriptor)),
        }
    }

    /// Reference a model by name only. [`resolve`](Self::resolve) returns `None`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resolver: Resolver::Named,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve the referenced descriptor, if one is available.
    pub fn resolve(&self) -> Option<ModelDescriptor> {
        match &self.resolver {
            Resolver::Fn(f) => Some(f()),
            Resolver::Shared(d) => Some(d.as_ref().clone()),
            Resolver::Named => None,
        }
    }
}

impl fmt::Debug for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModelRef").field(&self.name).finish()
    }
}

// Identity of a model is its name.
impl PartialEq for ModelRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// A single field of a model.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub annotation: TypeAnnotation,
    pub description: Option<String>,
}

impl FieldDescriptor {
    pub fn new(annotation: TypeAnnotation) -> Self {
        Self {
            annotation,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether the field may be omitted (its annotation is `Optional`).
    pub fn is_optional(&self) -> bool {
        matches!(self.annotation, TypeAnnotation::Optional(_))
    }
}

/// A named structured type with fields in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescriptor {
    name: String,
    fields: Vec<(String, FieldDescriptor)>,
}

impl ModelDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field without a description.
    pub fn field(self, name: impl Into<String>, annotation: TypeAnnotation) -> Self {
        self.with_field(name, FieldDescriptor::new(annotation))
    }

    /// Append a field with a description.
    pub fn described_field(
        self,
        name: impl Into<String>,
        annotation: TypeAnnotation,
        description: impl Into<String>,
    ) -> Self {
        self.with_field(name, FieldDescriptor::new(annotation).with_description(description))
    }

    /// Append a prepared field. A field name used twice replaces the earlier one in place.
    pub fn with_field(mut self, name: impl Into<String>, field: FieldDescriptor) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = field,
            None => self.fields.push((name, field)),
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields.iter().map(|(n, f)| (n.as_str(), f))
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Models referenced directly by this model's fields, in declaration
    /// order, without duplicates.
    pub fn referenced_models(&self) -> Vec<ModelRef> {
        let mut refs = Vec::new();
        for (_, field) in &self.fields {
            field.annotation.collect_models(&mut refs);
        }
        let mut seen = std::collections::HashSet::new();
        refs.into_iter()
            .filter(|r| seen.insert(r.name().to_string()))
            .cloned()
            .collect()
    }
}
