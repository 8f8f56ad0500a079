use apidoc_core::model::{DocModel, ModelRef};
use apidoc_core::{ModelDescriptor, RouteInfo, TypeAnnotation};
use apidoc_openapi::{
    Diagnostic, DocError, DocumentAssembler, ModelSource, RedocConfig, Registration,
};
use serde_json::{json, Value};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn assembler() -> DocumentAssembler {
    DocumentAssembler::new(&RedocConfig::default())
}

fn user() -> ModelDescriptor {
    ModelDescriptor::new("User")
        .field("id", TypeAnnotation::Integer)
        .field("name", TypeAnnotation::String)
        .field("tags", TypeAnnotation::list(TypeAnnotation::String))
}

struct Address;

impl DocModel for Address {
    fn model_name() -> &'static str {
        "Address"
    }

    fn descriptor() -> ModelDescriptor {
        ModelDescriptor::new("Address")
            .field("city", TypeAnnotation::String)
            .field("country", TypeAnnotation::Model(ModelRef::of::<Country>()))
    }
}

struct Country;

impl DocModel for Country {
    fn model_name() -> &'static str {
        "Country"
    }

    fn descriptor() -> ModelDescriptor {
        ModelDescriptor::new("Country").field("code", TypeAnnotation::String)
    }
}

fn documented(name: &str, path: &str, method: &str, summary: &str) -> RouteInfo {
    RouteInfo::new(name, path).with_doc(format!("{summary}\n---\n{method}:\n  summary: {summary}\n"))
}

fn schemas(assembler: &DocumentAssembler) -> Value {
    assembler.to_value()["components"]["schemas"].clone()
}

// ── Translator path ─────────────────────────────────────────────────────────

#[test]
fn end_to_end_user_schema() {
    let mut assembler = assembler();
    assert_eq!(assembler.register_model(&user()).unwrap(), Registration::Inserted);

    assert_eq!(
        schemas(&assembler)["User"],
        json!({
            "type": "object",
            "title": "User",
            "properties": {
                "id": { "type": "integer" },
                "name": { "type": "string" },
                "tags": { "type": "array", "items": { "type": "string" } }
            }
        })
    );
}

#[test]
fn referenced_models_are_registered() {
    let mut assembler = assembler();
    let person = ModelDescriptor::new("Person")
        .field("home", TypeAnnotation::Model(ModelRef::of::<Address>()));
    assembler.register_model(&person).unwrap();

    let schemas = schemas(&assembler);
    assert_eq!(
        schemas["Person"]["properties"]["home"],
        json!({ "type": "object", "$ref": "#/components/schemas/Address" })
    );
    assert_eq!(schemas["Address"]["properties"]["country"]["$ref"], "#/components/schemas/Country");
    assert_eq!(schemas["Country"]["title"], "Country");
    assert!(assembler.dangling_references().is_empty());
}

#[test]
fn unknown_annotation_never_fails() {
    let mut assembler = assembler();
    let model = ModelDescriptor::new("Event").field("at", TypeAnnotation::other("datetime"));
    assembler.register_model(&model).unwrap();

    assert_eq!(schemas(&assembler)["Event"]["properties"]["at"], json!({ "type": "string" }));
    assert!(matches!(
        assembler.diagnostics(),
        [Diagnostic::UnknownType { model, field, .. }] if model == "Event" && field == "at"
    ));
}

#[test]
fn unresolvable_reference_is_reported_as_dangling() {
    let mut assembler = assembler();
    let model = ModelDescriptor::new("Post").field("author", TypeAnnotation::Model(ModelRef::named("Author")));
    assembler.build_once(&[model.into()], &[]);

    assert_eq!(assembler.dangling_references(), vec!["Author".to_string()]);
    assert!(assembler
        .diagnostics()
        .contains(&Diagnostic::DanglingReference { name: "Author".into() }));
}

// ── Export path ─────────────────────────────────────────────────────────────

fn customer_export() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "Customer",
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "home": { "$ref": "#/$defs/Address" },
            "previous": { "type": "array", "items": { "$ref": "#/$defs/Address" } },
            "by_label": { "type": "object", "additionalProperties": { "$ref": "#/$defs/Address" } }
        },
        "required": ["name", "home"],
        "$defs": {
            "Address": {
                "type": "object",
                "properties": {
                    "city": { "type": "string" },
                    "geo": { "$ref": "#/$defs/Geo" }
                }
            },
            "Geo": {
                "type": "object",
                "properties": { "lat": { "type": "number" }, "lon": { "type": "number" } }
            }
        }
    })
}

#[test]
fn export_definitions_are_promoted() {
    let mut assembler = assembler();
    assembler.register_export("Customer", &customer_export()).unwrap();

    let schemas = schemas(&assembler);
    let customer = &schemas["Customer"];
    assert!(customer.get("$defs").is_none());
    assert!(customer.get("$schema").is_none());
    assert_eq!(customer["properties"]["home"]["$ref"], "#/components/schemas/Address");
    assert_eq!(customer["properties"]["previous"]["items"]["$ref"], "#/components/schemas/Address");
    assert_eq!(
        customer["properties"]["by_label"]["additionalProperties"]["$ref"],
        "#/components/schemas/Address"
    );
    assert_eq!(customer["required"], json!(["name", "home"]));

    assert_eq!(schemas["Address"]["properties"]["geo"]["$ref"], "#/components/schemas/Geo");
    assert_eq!(schemas["Geo"]["properties"]["lat"]["type"], "number");

    let text = serde_json::to_string(&schemas).unwrap();
    assert!(!text.contains("#/$defs/"));
}

#[test]
fn legacy_definitions_section_is_promoted() {
    let mut assembler = assembler();
    let export = json!({
        "type": "object",
        "properties": { "item": { "$ref": "#/definitions/Item" } },
        "definitions": { "Item": { "type": "object", "properties": { "sku": { "type": "string" } } } }
    });
    assembler.register_export("Cart", &export).unwrap();

    let schemas = schemas(&assembler);
    assert_eq!(schemas["Cart"]["properties"]["item"]["$ref"], "#/components/schemas/Item");
    assert!(schemas["Cart"].get("definitions").is_none());
    assert_eq!(schemas["Item"]["properties"]["sku"]["type"], "string");
}

#[derive(schemars::JsonSchema)]
#[allow(dead_code)]
struct Shipment {
    id: u64,
    to: Destination,
    note: Option<String>,
}

#[derive(schemars::JsonSchema)]
#[allow(dead_code)]
struct Destination {
    city: String,
}

#[test]
fn schemars_export_is_promoted() {
    let mut assembler = assembler();
    assembler.register(&ModelSource::schemars::<Shipment>()).unwrap();

    let schemas = schemas(&assembler);
    assert_eq!(schemas["Shipment"]["properties"]["to"]["$ref"], "#/components/schemas/Destination");
    assert_eq!(schemas["Shipment"]["properties"]["note"]["nullable"], true);
    assert_eq!(schemas["Shipment"]["properties"]["note"]["type"], "string");
    assert_eq!(schemas["Destination"]["properties"]["city"]["type"], "string");
}

// ── Name collisions ─────────────────────────────────────────────────────────

#[test]
fn identical_reregistration_is_unchanged() {
    let mut assembler = assembler();
    assembler.register_export("Customer", &customer_export()).unwrap();
    assert_eq!(
        assembler.register_export("Customer", &customer_export()).unwrap(),
        Registration::Unchanged
    );
    assert!(assembler.diagnostics().is_empty());
}

#[test]
fn conflicting_registration_is_rejected() {
    let mut assembler = assembler();
    assembler.register_model(&user()).unwrap();

    let other = json!({ "type": "object", "properties": { "email": { "type": "string" } } });
    match assembler.register_export("User", &other) {
        Err(DocError::SchemaCollision { name }) => assert_eq!(name, "User"),
        other => panic!("expected collision, got {other:?}"),
    }

    assert!(schemas(&assembler)["User"]["properties"].get("id").is_some());
    assert_eq!(
        assembler.diagnostics(),
        &[Diagnostic::SchemaCollision { name: "User".into() }]
    );
}

#[test]
fn conflicting_descriptor_is_rejected() {
    let mut assembler = assembler();
    let first = ModelDescriptor::new("User").field("id", TypeAnnotation::Integer);
    let second = ModelDescriptor::new("User").field("email", TypeAnnotation::String);

    assert_eq!(assembler.register_model(&first).unwrap(), Registration::Inserted);
    assert_eq!(assembler.register_model(&first).unwrap(), Registration::Unchanged);
    match assembler.register_model(&second) {
        Err(DocError::SchemaCollision { name }) => assert_eq!(name, "User"),
        other => panic!("expected collision, got {other:?}"),
    }

    let user = &schemas(&assembler)["User"];
    assert!(user["properties"].get("id").is_some());
    assert!(user["properties"].get("email").is_none());
    assert_eq!(
        assembler.diagnostics(),
        &[Diagnostic::SchemaCollision { name: "User".into() }]
    );
}

#[test]
fn reset_forgets_registered_descriptors() {
    let mut assembler = assembler();
    assembler
        .register_model(&ModelDescriptor::new("User").field("id", TypeAnnotation::Integer))
        .unwrap();
    assembler.reset();

    let replacement = ModelDescriptor::new("User").field("email", TypeAnnotation::String);
    assert_eq!(assembler.register_model(&replacement).unwrap(), Registration::Inserted);
    assert!(schemas(&assembler)["User"]["properties"].get("email").is_some());
}

// ── Nested keywords ─────────────────────────────────────────────────────────

#[derive(schemars::JsonSchema)]
#[allow(dead_code)]
struct Leg {
    pair: (Stop, u32),
    maybe: Option<Stop>,
}

#[derive(schemars::JsonSchema)]
#[allow(dead_code)]
struct Stop {
    name: String,
}

#[test]
fn schemars_tuple_and_optional_model() {
    let mut assembler = assembler();
    assembler.register(&ModelSource::schemars::<Leg>()).unwrap();

    let schemas = schemas(&assembler);
    let text = serde_json::to_string(&schemas).unwrap();
    assert!(!text.contains("#/$defs/"), "local reference left in {text}");
    assert!(!text.contains(r#""type":"null""#), "null type left in {text}");

    let leg = &schemas["Leg"]["properties"];
    assert_eq!(leg["pair"]["prefixItems"][0]["$ref"], "#/components/schemas/Stop");
    assert_eq!(leg["maybe"]["nullable"], true);
    assert_eq!(leg["maybe"]["allOf"][0]["$ref"], "#/components/schemas/Stop");
    assert_eq!(schemas["Stop"]["properties"]["name"]["type"], "string");
    assert!(assembler.dangling_references().is_empty());
}

#[test]
fn negated_reference_is_promoted_without_inventing_a_type() {
    let mut assembler = assembler();
    let export = json!({
        "type": "object",
        "properties": { "x": { "not": { "$ref": "#/$defs/A" } } },
        "$defs": { "A": { "type": "object", "properties": { "a": { "type": "integer" } } } }
    });
    assembler.register_export("Holder", &export).unwrap();

    let schemas = schemas(&assembler);
    assert_eq!(
        schemas["Holder"]["properties"]["x"],
        json!({ "not": { "$ref": "#/components/schemas/A" } })
    );
    assert_eq!(schemas["A"]["properties"]["a"]["type"], "integer");
}

#[test]
fn definitions_nested_in_properties_are_promoted() {
    let mut assembler = assembler();
    let export = json!({
        "type": "object",
        "properties": {
            "inner": {
                "type": "object",
                "properties": { "leaf": { "$ref": "#/$defs/Leaf" } },
                "$defs": { "Leaf": { "type": "object", "properties": { "v": { "type": "boolean" } } } }
            }
        }
    });
    assembler.register_export("Outer", &export).unwrap();

    let schemas = schemas(&assembler);
    let inner = &schemas["Outer"]["properties"]["inner"];
    assert!(inner.get("$defs").is_none());
    assert_eq!(inner["properties"]["leaf"]["$ref"], "#/components/schemas/Leaf");
    assert_eq!(schemas["Leaf"]["properties"]["v"]["type"], "boolean");
    assert!(assembler.dangling_references().is_empty());
}

#[test]
fn local_reference_in_operation_is_dangling() {
    let mut assembler = assembler();
    let route = RouteInfo::new("ghost", "/ghost").with_doc(
        "---\nget:\n  responses:\n    200:\n      description: ok\n      content:\n        application/json:\n          schema:\n            $ref: '#/$defs/Ghost'\n",
    );
    assembler.build_once(&[], &[route]);

    assert_eq!(assembler.dangling_references(), vec!["Ghost".to_string()]);
    assert!(assembler
        .diagnostics()
        .contains(&Diagnostic::DanglingReference { name: "Ghost".into() }));
}

// ── build_once ──────────────────────────────────────────────────────────────

#[test]
fn build_once_is_idempotent_and_stale() {
    let mut assembler = assembler();
    let models = vec![ModelSource::from(user())];
    let mut routes = vec![documented("list_users", "/users", "get", "List users")];

    assert!(assembler.build_once(&models, &routes));
    let first = assembler.to_value();

    routes.push(documented("create_user", "/users/new", "post", "Create user"));
    assert!(!assembler.build_once(&models, &routes));
    assert_eq!(assembler.to_value(), first);
    assert!(assembler.to_value()["paths"].get("/users/new").is_none());

    assembler.reset();
    assert!(!assembler.is_built());
    assert!(assembler.build_once(&models, &routes));
    assert!(assembler.to_value()["paths"].get("/users/new").is_some());
}

#[test]
fn document_before_build_is_empty() {
    let assembler = assembler();
    let doc = assembler.to_value();
    assert_eq!(doc["openapi"], "3.0.2");
    assert_eq!(doc["info"], json!({ "title": "ReDoc", "version": "1.0.0" }));
    assert_eq!(doc["paths"], json!({}));
    assert_eq!(doc["components"]["schemas"], json!({}));
}

#[test]
fn routes_merge_by_path_and_skip_undocumented() {
    let mut assembler = assembler();
    let routes = vec![
        documented("list_users", "/users", "get", "List users"),
        documented("create_user", "/users", "post", "Create user"),
        RouteInfo::new("health", "/health"),
        RouteInfo::new("broken", "/broken").with_doc("---\nget: [oops\n"),
    ];
    assembler.build_once(&[], &routes);

    let paths = &assembler.to_value()["paths"];
    assert_eq!(paths["/users"]["get"]["summary"], "List users");
    assert_eq!(paths["/users"]["post"]["summary"], "Create user");
    assert!(paths.get("/health").is_none());
    assert!(paths.get("/broken").is_none());

    let diagnostics = assembler.diagnostics();
    assert!(diagnostics.contains(&Diagnostic::UndocumentedRoute { route: "health".into() }));
    assert!(diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::MalformedRouteDoc { route, .. } if route == "broken")));
}

#[test]
fn operation_schema_names_become_references() {
    let mut assembler = assembler();
    let route = RouteInfo::new("get_user", "/users/{id}").with_doc(
        "---\nget:\n  responses:\n    200:\n      description: ok\n      content:\n        application/json:\n          schema: User\n",
    );
    assembler.build_once(&[ModelSource::from(user())], &[route]);

    let doc = assembler.to_value();
    assert_eq!(
        doc["paths"]["/users/{id}"]["get"]["responses"]["200"]["content"]["application/json"]["schema"],
        json!({ "$ref": "#/components/schemas/User" })
    );
    assert!(assembler.dangling_references().is_empty());
}

// ── Source equivalence ──────────────────────────────────────────────────────

#[test]
fn descriptor_export_matches_translation_links() {
    let person = ModelDescriptor::new("Person")
        .field("name", TypeAnnotation::String)
        .field("home", TypeAnnotation::Model(ModelRef::of::<Address>()));

    let mut exported = assembler();
    exported.register(&ModelSource::exported(&person)).unwrap();
    let schemas = schemas(&exported);

    assert_eq!(schemas["Person"]["properties"]["home"]["$ref"], "#/components/schemas/Address");
    assert_eq!(schemas["Person"]["required"], json!(["name", "home"]));
    assert_eq!(schemas["Address"]["properties"]["country"]["$ref"], "#/components/schemas/Country");
    assert!(schemas.get("Country").is_some());
    assert!(exported.dangling_references().is_empty());
}

#[test]
fn schemars_type_through_translator() {
    let mut assembler = assembler();
    assembler
        .register(&ModelSource::schemars_descriptor::<Shipment>())
        .unwrap();

    let schemas = schemas(&assembler);
    assert_eq!(
        schemas["Shipment"]["properties"]["to"],
        json!({ "type": "object", "$ref": "#/components/schemas/Destination" })
    );
    assert_eq!(schemas["Shipment"]["properties"]["id"], json!({ "type": "integer" }));
    assert_eq!(
        schemas["Shipment"]["properties"]["note"],
        json!({ "type": "string", "nullable": true })
    );
    assert_eq!(schemas["Destination"]["properties"]["city"], json!({ "type": "string" }));
}
