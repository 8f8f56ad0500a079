use apidoc_core::ConfigError;

/// Errors raised while assembling or configuring the documentation.
///
/// None of these reach an HTTP client: the assembler logs and records them as
/// diagnostics, and the handlers always answer with the current document.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    /// A different schema is already registered under this name.
    #[error("schema '{name}' is already registered with a different definition")]
    SchemaCollision { name: String },

    /// A route's documentation block could not be parsed.
    #[error("invalid documentation for route '{route}': {message}")]
    RouteDoc { route: String, message: String },

    #[error("unsupported OpenAPI version '{0}', expected 3.0.x")]
    UnsupportedOpenApiVersion(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
