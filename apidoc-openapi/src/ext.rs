use apidoc_core::http::{middleware, Next, Request};
use apidoc_core::{AppBuilder, Plugin};

use crate::assembler::ModelSource;
use crate::config::RedocConfig;
use crate::error::DocError;
use crate::handle::DocsHandle;
use crate::handlers::docs_routes;

/// Plugin that documents the application and serves the ReDoc page.
///
/// On install it merges the host's `redoc.*` configuration, mounts the JSON
/// and page routes, and arranges for the document to be built: on the first
/// request by default, or while the app is assembled with
/// [`RedocConfig::eager`].
///
/// # Example
///
/// ```ignore
/// use apidoc_openapi::{Redoc, RedocConfig, ModelSource};
///
/// let redoc = Redoc::new(RedocConfig::new("Pet Store", "1.0.0"))?
///     .add_schema(ModelSource::of::<Pet>());
/// let docs = redoc.handle();
///
/// AppBuilder::new()
///     .route("/pets", "list_pets", Some(LIST_PETS_DOC), get(list_pets))
///     .with(redoc)
///     .build();
/// ```
pub struct Redoc {
    config: RedocConfig,
    handle: DocsHandle,
}

impl Redoc {
    /// Create the plugin, rejecting unsupported OpenAPI versions.
    pub fn new(config: RedocConfig) -> Result<Self, DocError> {
        config.validate()?;
        let handle = DocsHandle::new(&config);
        Ok(Self { config, handle })
    }

    /// Register a model on every build.
    pub fn add_schema(self, source: impl Into<ModelSource>) -> Self {
        let source = source.into();
        if let Err(err) = self.handle.add_schema(source.clone()) {
            tracing::warn!(model = source.name(), error = %err, "model not registered");
        }
        self
    }

    /// Handle to the documentation state, usable after the plugin is installed.
    pub fn handle(&self) -> DocsHandle {
        self.handle.clone()
    }

    pub fn config(&self) -> &RedocConfig {
        &self.config
    }
}

impl Plugin for Redoc {
    fn install<T: Clone + Send + Sync + 'static>(self, app: AppBuilder<T>) -> AppBuilder<T> {
        let config = match app.config() {
            Some(app_config) => match self.config.clone().merge_app_config(app_config) {
                Ok(merged) => match merged.validate() {
                    Ok(()) => merged,
                    Err(err) => {
                        tracing::warn!(error = %err, "ignoring redoc configuration overrides");
                        self.config
                    }
                },
                Err(err) => {
                    tracing::warn!(error = %err, "ignoring redoc configuration overrides");
                    self.config
                }
            },
            None => self.config,
        };

        let handle = self.handle;
        handle.configure(&config);
        handle.attach_routes(app.route_table().clone());
        tracing::info!(docs = %config.docs_path, json = %config.json_path, eager = config.eager, "ReDoc documentation mounted");

        let app = app.register_routes(docs_routes::<T>(handle.clone(), &config));

        if config.eager {
            app.on_build(move |_routes| {
                handle.ensure_built();
            })
        } else {
            app.with_layer_fn(move |router| {
                router.layer(middleware::from_fn(move |req: Request, next: Next| {
                    let handle = handle.clone();
                    async move {
                        handle.ensure_built();
                        next.run(req).await
                    }
                }))
            })
        }
    }
}
