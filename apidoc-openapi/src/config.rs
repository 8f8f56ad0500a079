use apidoc_core::AppConfig;

use crate::assembler::ModelSource;
use crate::document::{Contact, Info, License};
use crate::error::DocError;

pub const DEFAULT_TITLE: &str = "ReDoc";
pub const DEFAULT_VERSION: &str = "1.0.0";
pub const DEFAULT_OPENAPI_VERSION: &str = "3.0.2";
pub const DEFAULT_DOCS_PATH: &str = "/docs";
pub const DEFAULT_JSON_PATH: &str = "/docs/json";
pub const DEFAULT_REDOC_JS_URL: &str =
    "https://cdn.redoc.ly/redoc/latest/bundles/redoc.standalone.js";

/// Configuration for the generated document and the pages serving it.
///
/// Values set here can be overridden from the host's `redoc.*` configuration
/// keys with [`merge_app_config`](Self::merge_app_config).
#[derive(Debug, Clone)]
pub struct RedocConfig {
    pub title: String,
    pub version: String,
    pub openapi_version: String,
    pub description: Option<String>,
    pub terms_of_service: Option<String>,
    pub contact: Option<Contact>,
    pub license: Option<License>,
    pub docs_path: String,
    pub json_path: String,
    pub redoc_js_url: String,
    /// Build while the application is assembled instead of on first request.
    pub eager: bool,
    /// Models registered on every build.
    pub models: Vec<ModelSource>,
}

impl Default for RedocConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE, DEFAULT_VERSION)
    }
}

impl RedocConfig {
    pub fn new(title: &str, version: &str) -> Self {
        Self {
            title: title.to_string(),
            version: version.to_string(),
            openapi_version: DEFAULT_OPENAPI_VERSION.to_string(),
            description: None,
            terms_of_service: None,
            contact: None,
            license: None,
            docs_path: DEFAULT_DOCS_PATH.to_string(),
            json_path: DEFAULT_JSON_PATH.to_string(),
            redoc_js_url: DEFAULT_REDOC_JS_URL.to_string(),
            eager: false,
            models: Vec::new(),
        }
    }

    pub fn with_openapi_version(mut self, version: &str) -> Self {
        self.openapi_version = version.to_string();
        self
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_terms_of_service(mut self, url: &str) -> Self {
        self.terms_of_service = Some(url.to_string());
        self
    }

    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contact = Some(contact);
        self
    }

    pub fn with_license(mut self, license: License) -> Self {
        self.license = Some(license);
        self
    }

    pub fn with_docs_path(mut self, path: &str) -> Self {
        self.docs_path = path.to_string();
        self
    }

    pub fn with_json_path(mut self, path: &str) -> Self {
        self.json_path = path.to_string();
        self
    }

    pub fn with_redoc_js_url(mut self, url: &str) -> Self {
        self.redoc_js_url = url.to_string();
        self
    }

    pub fn eager(mut self, eager: bool) -> Self {
        self.eager = eager;
        self
    }

    /// Register a model on every build.
    pub fn with_model(mut self, model: impl Into<ModelSource>) -> Self {
        self.models.push(model.into());
        self
    }

    /// Override fields from the host's `redoc.*` keys.
    ///
    /// Keys that are absent leave the current value untouched. A present key
    /// with a value of the wrong type is an error.
    pub fn merge_app_config(mut self, config: &AppConfig) -> Result<Self, DocError> {
        let string = |key: &str| config.get_opt::<String>(key);

        if let Some(v) = string("redoc.title")? {
            self.title = v;
        }
        if let Some(v) = string("redoc.version")? {
            self.version = v;
        }
        if let Some(v) = string("redoc.openapi_version")? {
            self.openapi_version = v;
        }
        if let Some(v) = string("redoc.info.description")? {
            self.description = Some(v);
        }
        if let Some(v) = string("redoc.info.terms_of_service")? {
            self.terms_of_service = Some(v);
        }

        let contact = (
            string("redoc.info.contact.name")?,
            string("redoc.info.contact.url")?,
            string("redoc.info.contact.email")?,
        );
        if contact != (None, None, None) {
            let current = self.contact.take();
            let (name, url, email) = contact;
            self.contact = Some(Contact {
                name: name.or_else(|| current.as_ref().and_then(|c| c.name.clone())),
                url: url.or_else(|| current.as_ref().and_then(|c| c.url.clone())),
                email: email.or_else(|| current.as_ref().and_then(|c| c.email.clone())),
            });
        }

        if let Some(name) = string("redoc.info.license.name")? {
            let url = match string("redoc.info.license.url")? {
                Some(url) => Some(url),
                None => self.license.take().and_then(|l| l.url),
            };
            self.license = Some(License { name, url });
        } else if let (Some(url), Some(license)) =
            (string("redoc.info.license.url")?, self.license.as_mut())
        {
            license.url = Some(url);
        }

        if let Some(v) = string("redoc.docs_path")? {
            self.docs_path = v;
        }
        if let Some(v) = string("redoc.json_path")? {
            self.json_path = v;
        }
        if let Some(v) = string("redoc.redoc_js_url")? {
            self.redoc_js_url = v;
        }
        if let Some(v) = config.get_opt::<bool>("redoc.eager")? {
            self.eager = v;
        }
        Ok(self)
    }

    /// Reject OpenAPI versions this crate does not generate.
    pub fn validate(&self) -> Result<(), DocError> {
        let is_3_0 = self
            .openapi_version
            .strip_prefix("3.0.")
            .is_some_and(|patch| !patch.is_empty() && patch.chars().all(|c| c.is_ascii_digit()));
        if is_3_0 {
            Ok(())
        } else {
            Err(DocError::UnsupportedOpenApiVersion(self.openapi_version.clone()))
        }
    }

    /// The document's `info` object.
    pub fn info(&self) -> Info {
        Info {
            title: self.title.clone(),
            version: self.version.clone(),
            description: self.description.clone(),
            terms_of_service: self.terms_of_service.clone(),
            contact: self.contact.clone(),
            license: self.license.clone(),
        }
    }
}
