use apidoc_core::config::{AppConfig, ConfigError, ConfigValue};
use serial_test::serial;

#[test]
fn test_empty_config() {
    let config = AppConfig::empty();
    assert!(config.get::<String>("nonexistent").is_err());
    assert_eq!(config.profile(), "test");
}

#[test]
fn test_set_and_get() {
    let mut config = AppConfig::empty();
    config.set("redoc.title", ConfigValue::String("Pets".into()));
    assert_eq!(config.get::<String>("redoc.title").unwrap(), "Pets");
}

#[test]
fn test_get_or_default() {
    let config = AppConfig::empty();
    assert_eq!(config.get_or("missing", 42i64), 42);
}

#[test]
fn test_get_opt() {
    let mut config = AppConfig::empty();
    config.set("redoc.eager", ConfigValue::String("maybe".into()));
    assert!(config.get_opt::<bool>("redoc.missing").unwrap().is_none());
    assert!(matches!(
        config.get_opt::<bool>("redoc.eager"),
        Err(ConfigError::TypeMismatch { .. })
    ));
}

#[test]
fn test_type_conversions() {
    let mut config = AppConfig::empty();
    config.set("int_val", ConfigValue::Integer(42));
    config.set("float_val", ConfigValue::Float(2.5));
    config.set("bool_val", ConfigValue::Bool(true));
    config.set("null_val", ConfigValue::Null);
    config.set("yes_val", ConfigValue::String("yes".into()));

    assert_eq!(config.get::<i64>("int_val").unwrap(), 42);
    assert_eq!(config.get::<u16>("int_val").unwrap(), 42);
    assert_eq!(config.get::<f64>("float_val").unwrap(), 2.5);
    assert!(config.get::<bool>("bool_val").unwrap());
    assert!(config.get::<bool>("yes_val").unwrap());
    assert_eq!(config.get::<String>("int_val").unwrap(), "42");
    assert!(config.get::<Option<String>>("null_val").unwrap().is_none());
}

#[test]
fn test_flatten_yaml() {
    let yaml = r#"
redoc:
  title: "Pet Store"
  info:
    description: "All the pets"
    contact:
      email: "pets@example.com"
  eager: true
"#;
    let config = AppConfig::from_yaml_str(yaml, "test").unwrap();

    assert_eq!(config.get::<String>("redoc.title").unwrap(), "Pet Store");
    assert_eq!(config.get::<String>("redoc.info.description").unwrap(), "All the pets");
    assert_eq!(
        config.get::<String>("redoc.info.contact.email").unwrap(),
        "pets@example.com"
    );
    assert!(config.get::<bool>("redoc.eager").unwrap());
    assert!(config.contains_key("redoc.info.contact.email"));
}

#[test]
fn test_list_config() {
    let yaml = r#"
redoc:
  servers:
    - "http://localhost:3000"
    - "https://api.example.com"
"#;
    let config = AppConfig::from_yaml_str(yaml, "test").unwrap();
    let servers: Vec<String> = config.get("redoc.servers").unwrap();
    assert_eq!(servers.len(), 2);
    assert_eq!(config.get::<String>("redoc.servers.1").unwrap(), "https://api.example.com");
}

#[test]
fn test_type_mismatch_error() {
    let mut config = AppConfig::empty();
    config.set("key", ConfigValue::String("not_a_number".into()));
    let err = config.get::<i64>("key").unwrap_err();
    assert!(matches!(err, ConfigError::TypeMismatch { .. }));
    assert_eq!(err.to_string(), "Config type mismatch for 'key': expected i64");
}

#[test]
fn test_invalid_yaml() {
    let err = AppConfig::from_yaml_str("redoc: [unclosed", "test").unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}

#[test]
#[serial]
fn test_load_from_directory_with_profile_and_env() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("application.yaml"),
        "redoc:\n  title: Base\n  version: \"1.0.0\"\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("application-staging.yaml"),
        "redoc:\n  version: \"2.0.0\"\n",
    )
    .unwrap();

    std::env::remove_var("APIDOC_PROFILE");
    std::env::set_var("REDOC_INFO_DESCRIPTION", "from env");
    let config = AppConfig::load_from(dir.path(), "staging").unwrap();
    std::env::remove_var("REDOC_INFO_DESCRIPTION");

    assert_eq!(config.profile(), "staging");
    assert_eq!(config.get::<String>("redoc.title").unwrap(), "Base");
    assert_eq!(config.get::<String>("redoc.version").unwrap(), "2.0.0");
    assert_eq!(config.get::<String>("redoc.info.description").unwrap(), "from env");
}

#[test]
#[serial]
fn test_missing_files_are_not_errors() {
    let dir = tempfile::tempdir().unwrap();
    std::env::remove_var("APIDOC_PROFILE");
    let config = AppConfig::load_from(dir.path(), "dev").unwrap();
    assert_eq!(config.profile(), "dev");
    assert!(!config.contains_key("redoc.title"));
}

#[test]
#[serial]
fn test_env_overrides_keys_containing_underscores() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("application.yaml"),
        "redoc:\n  docs_path: /docs\n  info:\n    terms_of_service: yaml\n",
    )
    .unwrap();

    std::env::remove_var("APIDOC_PROFILE");
    std::env::set_var("REDOC_DOCS_PATH", "/reference");
    std::env::set_var("REDOC_INFO_TERMS_OF_SERVICE", "https://example.com/tos");
    let config = AppConfig::load_from(dir.path(), "dev").unwrap();
    std::env::remove_var("REDOC_DOCS_PATH");
    std::env::remove_var("REDOC_INFO_TERMS_OF_SERVICE");

    assert_eq!(config.get::<String>("redoc.docs_path").unwrap(), "/reference");
    assert_eq!(
        config.get::<String>("redoc.info.terms_of_service").unwrap(),
        "https://example.com/tos"
    );
    assert!(config.contains_key("redoc.docs_path"));
}

#[test]
#[serial]
fn test_set_takes_precedence_over_env() {
    let dir = tempfile::tempdir().unwrap();
    std::env::remove_var("APIDOC_PROFILE");
    std::env::set_var("REDOC_JSON_PATH", "/from-env");
    let mut config = AppConfig::load_from(dir.path(), "dev").unwrap();
    std::env::remove_var("REDOC_JSON_PATH");

    assert_eq!(config.get::<String>("redoc.json_path").unwrap(), "/from-env");
    config.set("redoc.json_path", ConfigValue::String("/openapi.json".into()));
    assert_eq!(config.get::<String>("redoc.json_path").unwrap(), "/openapi.json");
}
