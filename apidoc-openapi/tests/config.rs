use apidoc_core::{AppConfig, ConfigValue};
use apidoc_openapi::{Contact, DocError, License, Redoc, RedocConfig};

#[test]
fn defaults() {
    let config = RedocConfig::default();
    assert_eq!(config.title, "ReDoc");
    assert_eq!(config.version, "1.0.0");
    assert_eq!(config.openapi_version, "3.0.2");
    assert_eq!(config.docs_path, "/docs");
    assert_eq!(config.json_path, "/docs/json");
    assert!(!config.eager);
    assert!(config.models.is_empty());

    let info = config.info();
    assert_eq!(info.title, "ReDoc");
    assert_eq!(info.version, "1.0.0");
    assert!(info.description.is_none());
}

#[test]
fn builder_methods() {
    let config = RedocConfig::new("Pets", "2.0.0")
        .with_description("All the pets")
        .with_terms_of_service("https://example.com/tos")
        .with_contact(Contact {
            name: Some("Team".into()),
            url: None,
            email: None,
        })
        .with_license(License {
            name: "MIT".into(),
            url: None,
        })
        .with_redoc_js_url("/static/redoc.js")
        .eager(true);

    let info = config.info();
    assert_eq!(info.description.as_deref(), Some("All the pets"));
    assert_eq!(info.terms_of_service.as_deref(), Some("https://example.com/tos"));
    assert_eq!(info.license.unwrap().name, "MIT");
    assert_eq!(config.redoc_js_url, "/static/redoc.js");
    assert!(config.eager);
}

#[test]
fn validate_accepts_only_3_0() {
    for version in ["3.0.0", "3.0.2", "3.0.3"] {
        assert!(RedocConfig::default().with_openapi_version(version).validate().is_ok());
    }
    for version in ["3.1.0", "2.0", "3.0", "3.0.x", ""] {
        match RedocConfig::default().with_openapi_version(version).validate() {
            Err(DocError::UnsupportedOpenApiVersion(v)) => assert_eq!(v, version),
            other => panic!("{version}: expected rejection, got {other:?}"),
        }
    }
}

#[test]
fn plugin_rejects_unsupported_version() {
    let result = Redoc::new(RedocConfig::default().with_openapi_version("3.1.0"));
    assert!(matches!(result, Err(DocError::UnsupportedOpenApiVersion(_))));
}

#[test]
fn merge_app_config_overrides_present_keys() {
    let app_config = AppConfig::from_yaml_str(
        r#"
redoc:
  version: "3.2.1"
  openapi_version: "3.0.3"
  docs_path: "/reference"
  eager: true
  info:
    terms_of_service: "https://example.com/terms"
    license:
      name: "Apache-2.0"
      url: "https://www.apache.org/licenses/LICENSE-2.0"
"#,
        "test",
    )
    .unwrap();

    let config = RedocConfig::new("Pets", "1.0.0")
        .merge_app_config(&app_config)
        .unwrap();

    assert_eq!(config.title, "Pets");
    assert_eq!(config.version, "3.2.1");
    assert_eq!(config.openapi_version, "3.0.3");
    assert_eq!(config.docs_path, "/reference");
    assert_eq!(config.json_path, "/docs/json");
    assert!(config.eager);
    assert_eq!(config.terms_of_service.as_deref(), Some("https://example.com/terms"));
    let license = config.license.unwrap();
    assert_eq!(license.name, "Apache-2.0");
    assert_eq!(license.url.as_deref(), Some("https://www.apache.org/licenses/LICENSE-2.0"));
}

#[test]
fn merge_app_config_keeps_unset_contact_fields() {
    let mut app_config = AppConfig::empty();
    app_config.set("redoc.info.contact.email", ConfigValue::String("ops@example.com".into()));

    let config = RedocConfig::default()
        .with_contact(Contact {
            name: Some("Ops".into()),
            url: None,
            email: Some("old@example.com".into()),
        })
        .merge_app_config(&app_config)
        .unwrap();

    let contact = config.contact.unwrap();
    assert_eq!(contact.name.as_deref(), Some("Ops"));
    assert_eq!(contact.email.as_deref(), Some("ops@example.com"));
}

#[test]
fn merge_app_config_reports_type_mismatch() {
    let mut app_config = AppConfig::empty();
    app_config.set("redoc.eager", ConfigValue::String("sometimes".into()));

    let err = RedocConfig::default().merge_app_config(&app_config).unwrap_err();
    assert!(matches!(err, DocError::Config(_)));
    assert!(err.to_string().contains("redoc.eager"));
}
