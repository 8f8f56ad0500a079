//! OpenAPI 3.0 documents for apidoc applications.
//!
//! Models are translated into a typed [`SchemaNode`](schema::SchemaNode)
//! tree, registered into the document's `components.schemas` with local
//! definitions promoted and references rewritten, and combined with the
//! operations documented on each route. The [`Redoc`] plugin serves the
//! result as JSON and as a ReDoc page.

mod assembler;
mod config;
mod diagnostic;
mod document;
mod error;
mod ext;
mod handle;
mod handlers;
pub mod operations;
mod registry;
pub mod schema;
mod translator;

pub use assembler::{DocumentAssembler, ModelSource};
pub use config::{
    RedocConfig, DEFAULT_DOCS_PATH, DEFAULT_JSON_PATH, DEFAULT_OPENAPI_VERSION,
    DEFAULT_REDOC_JS_URL, DEFAULT_TITLE, DEFAULT_VERSION,
};
pub use diagnostic::Diagnostic;
pub use document::{Components, Contact, Info, License, SpecDocument};
pub use error::DocError;
pub use ext::Redoc;
pub use handle::DocsHandle;
pub use handlers::{docs_routes, render_page};
pub use registry::{Collision, ComponentsRegistry, Registration};
pub use schema::SchemaNode;
pub use translator::SchemaTranslator;
