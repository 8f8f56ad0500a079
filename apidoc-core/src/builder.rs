use crate::config::AppConfig;
use crate::http::{MethodRouter, Router};
use crate::plugin::Plugin;
use crate::routes::{RouteInfo, RouteTable};
use tracing::info;

type LayerFn = Box<dyn FnOnce(Router) -> Router + Send>;

type BuildHook = Box<dyn FnOnce(&RouteTable) + Send>;

/// Builder for assembling a documented application.
///
/// Collects state, routes (recording each in the shared [`RouteTable`]),
/// deferred layers and build hooks, then produces an `axum::Router`.
///
/// # Example
///
/// ```ignore
/// let app = AppBuilder::new()
///     .with_config(AppConfig::load("dev")?)
///     .route("/users", "list_users", Some(LIST_USERS_DOC), get(list_users))
///     .with(Redoc::new(RedocConfig::default())?)
///     .build();
/// ```
pub struct AppBuilder<T: Clone + Send + Sync + 'static = ()> {
    state: T,
    config: Option<AppConfig>,
    router: Router<T>,
    route_table: RouteTable,
    custom_layers: Vec<LayerFn>,
    build_hooks: Vec<BuildHook>,
    trace: bool,
}

impl AppBuilder<()> {
    /// Create a new, empty builder without application state.
    pub fn new() -> Self {
        Self::with_state(())
    }
}

impl Default for AppBuilder<()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> AppBuilder<T> {
    /// Create a builder around the given application state.
    pub fn with_state(state: T) -> Self {
        Self {
            state,
            config: None,
            router: Router::new(),
            route_table: RouteTable::new(),
            custom_layers: Vec::new(),
            build_hooks: Vec::new(),
            trace: false,
        }
    }

    // ── Plugin system ───────────────────────────────────────────────────

    /// Install a [`Plugin`] into this builder.
    pub fn with<Pl: Plugin>(self, plugin: Pl) -> Self {
        tracing::debug!(plugin = Pl::name(), "installing plugin");
        plugin.install(self)
    }

    // ── Configuration ───────────────────────────────────────────────────

    /// Store an [`AppConfig`] that plugins can read while installing.
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn config(&self) -> Option<&AppConfig> {
        self.config.as_ref()
    }

    /// Apply `tower-http` request tracing to the whole application.
    pub fn with_tracing(mut self) -> Self {
        self.trace = true;
        self
    }

    // ── Routes ──────────────────────────────────────────────────────────

    /// Handle to the table of documented routes.
    pub fn route_table(&self) -> &RouteTable {
        &self.route_table
    }

    /// Mount a handler and record it in the route table.
    ///
    /// `name` identifies the route (usually the handler's name) and `doc` is
    /// its documentation string.
    pub fn route(
        mut self,
        path: &str,
        name: &str,
        doc: Option<&str>,
        method_router: MethodRouter<T>,
    ) -> Self {
        let mut info = RouteInfo::new(name, path);
        info.doc = doc.map(str::to_string);
        self.route_table.register(info);
        self.router = self.router.route(path, method_router);
        self
    }

    /// Register a raw `axum::Router` fragment. Its routes are not documented.
    pub fn register_routes(mut self, router: Router<T>) -> Self {
        self.router = self.router.merge(router);
        self
    }

    // ── Layers and hooks ────────────────────────────────────────────────

    /// Apply a transformation to the assembled router during `build()`.
    ///
    /// Deferred so that layers wrap every route, including routes registered
    /// after the call. Multiple calls are applied in order.
    pub fn with_layer_fn<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Router) -> Router + Send + 'static,
    {
        self.custom_layers.push(Box::new(f));
        self
    }

    /// Run a hook at the start of `build()`, once every route is registered.
    pub fn on_build<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&RouteTable) + Send + 'static,
    {
        self.build_hooks.push(Box::new(hook));
        self
    }

    /// Assemble the final `axum::Router` from all registered routes and layers.
    pub fn build(self) -> Router {
        for hook in self.build_hooks {
            hook(&self.route_table);
        }

        let mut app = self.router.with_state(self.state);
        for layer_fn in self.custom_layers {
            app = layer_fn(app);
        }
        if self.trace {
            app = app.layer(crate::layers::default_trace());
        }
        app
    }

    /// Build the application and serve it on `addr` until Ctrl-C or SIGTERM.
    pub async fn serve(self, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.build();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(%addr, "server listening");
        crate::http::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("server stopped");
        Ok(())
    }
}

/// Wait for a shutdown signal (Ctrl-C or SIGTERM on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
