use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use apidoc_core::RouteTable;
use serde_json::Value;

use crate::assembler::{DocumentAssembler, ModelSource};
use crate::config::RedocConfig;
use crate::diagnostic::Diagnostic;
use crate::error::DocError;
use crate::registry::Registration;

/// Shared handle to the documentation state.
///
/// Cloning yields another handle to the same document. The build latch lives
/// behind a `Mutex`, so concurrent first requests build the document once.
#[derive(Clone)]
pub struct DocsHandle {
    inner: Arc<Inner>,
}

struct Inner {
    assembler: Mutex<DocumentAssembler>,
    models: Mutex<Vec<ModelSource>>,
    routes: Mutex<RouteTable>,
}

impl DocsHandle {
    /// Create a handle whose models are `config.models` and whose route table
    /// is empty until the plugin attaches the host's.
    pub fn new(config: &RedocConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                assembler: Mutex::new(DocumentAssembler::new(config)),
                models: Mutex::new(config.models.clone()),
                routes: Mutex::new(RouteTable::new()),
            }),
        }
    }

    fn assembler(&self) -> MutexGuard<'_, DocumentAssembler> {
        self.inner.assembler.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn models(&self) -> Vec<ModelSource> {
        self.inner.models.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Use `routes` as the source of documented routes.
    pub fn attach_routes(&self, routes: RouteTable) {
        *self.inner.routes.lock().unwrap_or_else(PoisonError::into_inner) = routes;
    }

    pub(crate) fn configure(&self, config: &RedocConfig) {
        self.assembler().set_metadata(config);
    }

    pub fn routes(&self) -> RouteTable {
        self.inner.routes.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Build the document unless it is already built. Returns `true` if this
    /// call ran the build.
    pub fn ensure_built(&self) -> bool {
        let mut assembler = self.assembler();
        if assembler.is_built() {
            return false;
        }
        let models = self.models();
        let routes = self.routes().snapshot();
        assembler.build_once(&models, &routes)
    }

    pub fn is_built(&self) -> bool {
        self.assembler().is_built()
    }

    /// Drop the built document so the next [`ensure_built`](Self::ensure_built)
    /// picks up routes registered since.
    pub fn reset(&self) {
        tracing::debug!("resetting OpenAPI document");
        self.assembler().reset();
    }

    /// Register a model now and on every later rebuild.
    pub fn add_schema(&self, source: impl Into<ModelSource>) -> Result<Registration, DocError> {
        let source = source.into();
        let result = self.assembler().register(&source);
        if result.is_ok() {
            self.inner
                .models
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(source);
        }
        result
    }

    /// The current document, built or not.
    pub fn document_value(&self) -> Value {
        self.assembler().to_value()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.assembler().diagnostics().to_vec()
    }
}

impl std::fmt::Debug for DocsHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocsHandle")
            .field("built", &self.is_built())
            .finish_non_exhaustive()
    }
}
