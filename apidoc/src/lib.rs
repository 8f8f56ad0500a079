//! apidoc: OpenAPI documents for axum applications.
//!
//! This facade crate re-exports the sub-crates through a single dependency.
//!
//! ```ignore
//! use apidoc::prelude::*;
//! ```
//!
//! # Feature flags
//!
//! | Feature   | Default | Crate            |
//! |-----------|---------|------------------|
//! | `openapi` | **yes** | `apidoc-openapi` |

pub extern crate apidoc_core;

pub use apidoc_core::*;

#[cfg(feature = "openapi")]
pub use apidoc_openapi;

/// Import everything with `use apidoc::prelude::*`.
pub mod prelude {
    pub use apidoc_core::http::{get, Json, Router};
    pub use apidoc_core::{
        AppBuilder, AppConfig, DocModel, FieldDescriptor, ModelDescriptor, ModelRef, Plugin,
        RouteInfo, RouteTable, TypeAnnotation,
    };

    #[cfg(feature = "openapi")]
    pub use apidoc_openapi::{DocsHandle, ModelSource, Redoc, RedocConfig};
}
