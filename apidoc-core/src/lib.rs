//! Host-side building blocks for apidoc.
//!
//! - [`model`]: structured model descriptions handed to the schema layer.
//! - [`routes`]: the table of documented routes.
//! - [`config`]: layered YAML / `.env` / environment configuration.
//! - [`AppBuilder`] and [`Plugin`]: the host application and its extension point.

pub mod builder;
pub mod config;
pub mod http;
pub mod layers;
pub mod model;
pub mod plugin;
pub mod routes;

pub use builder::AppBuilder;
pub use config::{AppConfig, ConfigError, ConfigValue, FromConfigValue};
pub use layers::{default_trace, init_tracing};
pub use model::{DocModel, FieldDescriptor, ModelDescriptor, ModelRef, TypeAnnotation};
pub use plugin::Plugin;
pub use routes::{RouteInfo, RouteTable};

pub use schemars;
