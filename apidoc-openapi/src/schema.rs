//! Typed OpenAPI schema tree.
//!
//! [`SchemaNode`] is a tagged union over the schema shapes this crate emits
//! and understands: objects, arrays, scalars, references and composites
//! (`anyOf` / `oneOf` / `allOf`). Schemas nested under other keywords (`not`,
//! `prefixItems`, `patternProperties`, ...) are parsed into [`Subschemas`] so
//! traversal reaches them. Keywords that are not interpreted here (`format`,
//! `enum`, `minimum`, ...) are kept verbatim in [`Annotations::extra`].
//!
//! Converting from JSON is total: anything that is not a recognisable schema
//! degrades to `{ "type": "string" }` instead of failing. A schema made only of
//! uninterpreted keywords stays [`SchemaNode::Untyped`].
//!
//! OpenAPI 3.0 has no `null` type: `type: [X, "null"]` and `anyOf` / `oneOf`
//! with a `{type: null}` variant both become `X` with `nullable: true`.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

/// Location of shared schemas inside an OpenAPI document.
pub const COMPONENTS_PREFIX: &str = "#/components/schemas/";

/// Locations JSON-Schema exports use for their local definitions.
pub const LOCAL_DEFS_PREFIXES: [&str; 2] = ["#/$defs/", "#/definitions/"];

const DEFS_KEYS: [&str; 2] = ["$defs", "definitions"];

/// Keywords holding one schema.
const SINGLE_SCHEMA_KEYWORDS: [&str; 11] = [
    "not",
    "if",
    "then",
    "else",
    "contains",
    "propertyNames",
    "additionalItems",
    "unevaluatedItems",
    "unevaluatedProperties",
    "items",
    "additionalProperties",
];

/// Keywords holding a list of schemas.
const SCHEMA_LIST_KEYWORDS: [&str; 5] = ["prefixItems", "items", "allOf", "anyOf", "oneOf"];

/// Keywords holding a name -> schema mapping.
const SCHEMA_MAP_KEYWORDS: [&str; 3] = ["properties", "patternProperties", "dependentSchemas"];

/// Keywords whose values are instance data, never schemas.
const DATA_KEYWORDS: [&str; 5] = ["const", "enum", "default", "example", "examples"];

/// Build the components reference for a schema name.
pub fn components_ref(name: &str) -> String {
    format!("{COMPONENTS_PREFIX}{name}")
}

/// Rewrite a local-definitions reference (`#/$defs/X`) to the components
/// location. Returns `None` for any other reference.
pub fn to_components_ref(reference: &str) -> Option<String> {
    LOCAL_DEFS_PREFIXES
        .iter()
        .find_map(|prefix| reference.strip_prefix(prefix))
        .map(components_ref)
}

/// The schema name a components reference points at.
pub fn component_name(reference: &str) -> Option<&str> {
    reference.strip_prefix(COMPONENTS_PREFIX)
}

/// The definition name a local-definitions reference points at.
pub fn local_definition_name(reference: &str) -> Option<&str> {
    LOCAL_DEFS_PREFIXES
        .iter()
        .find_map(|prefix| reference.strip_prefix(prefix))
}

/// JSON-Schema scalar type tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Integer,
    Number,
    Boolean,
    Null,
}

impl ScalarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Integer => "integer",
            ScalarKind::Number => "number",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Null => "null",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "string" => Some(ScalarKind::String),
            "integer" => Some(ScalarKind::Integer),
            "number" => Some(ScalarKind::Number),
            "boolean" => Some(ScalarKind::Boolean),
            "null" => Some(ScalarKind::Null),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    AnyOf,
    OneOf,
    AllOf,
}

impl Combinator {
    const ALL: [Combinator; 3] = [Combinator::AnyOf, Combinator::OneOf, Combinator::AllOf];

    pub fn key(self) -> &'static str {
        match self {
            Combinator::AnyOf => "anyOf",
            Combinator::OneOf => "oneOf",
            Combinator::AllOf => "allOf",
        }
    }
}

/// Keywords shared by every schema shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Annotations {
    pub title: Option<String>,
    pub description: Option<String>,
    pub nullable: bool,
    /// Local definitions (`$defs` / `definitions`) carried by an export.
    pub definitions: IndexMap<String, SchemaNode>,
    /// Schemas under keywords without a dedicated field, by keyword.
    pub nested: IndexMap<String, Subschemas>,
    /// Uninterpreted keywords, emitted as-is.
    pub extra: IndexMap<String, Value>,
}

/// The schema(s) held by one keyword.
#[derive(Debug, Clone, PartialEq)]
pub enum Subschemas {
    Single(SchemaNode),
    List(Vec<SchemaNode>),
    Map(IndexMap<String, SchemaNode>),
}

impl Subschemas {
    fn nodes(&self) -> Vec<&SchemaNode> {
        match self {
            Subschemas::Single(node) => vec![node],
            Subschemas::List(nodes) => nodes.iter().collect(),
            Subschemas::Map(nodes) => nodes.values().collect(),
        }
    }

    fn nodes_mut(&mut self) -> Vec<&mut SchemaNode> {
        match self {
            Subschemas::Single(node) => vec![node],
            Subschemas::List(nodes) => nodes.iter_mut().collect(),
            Subschemas::Map(nodes) => nodes.values_mut().collect(),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Subschemas::Single(node) => node.to_value(),
            Subschemas::List(nodes) => Value::Array(nodes.iter().map(SchemaNode::to_value).collect()),
            Subschemas::Map(nodes) => Value::Object(
                nodes
                    .iter()
                    .map(|(name, node)| (name.clone(), node.to_value()))
                    .collect(),
            ),
        }
    }
}

impl Annotations {
    fn take_from(obj: &mut Map<String, Value>) -> Self {
        let mut annotations = Annotations::default();
        if let Some(Value::String(title)) = obj.remove("title") {
            annotations.title = Some(title);
        }
        if let Some(Value::String(description)) = obj.remove("description") {
            annotations.description = Some(description);
        }
        if let Some(nullable) = obj.remove("nullable") {
            annotations.nullable = nullable.as_bool().unwrap_or(false);
        }
        for key in DEFS_KEYS {
            if let Some(Value::Object(defs)) = obj.remove(key) {
                for (name, def) in &defs {
                    annotations.definitions.insert(name.clone(), SchemaNode::from_value(def));
                }
            }
        }
        annotations
    }

    /// Fold the annotations of an enclosing schema into this node's own.
    fn absorb(&mut self, outer: Annotations) {
        if outer.title.is_some() {
            self.title = outer.title;
        }
        if outer.description.is_some() {
            self.description = outer.description;
        }
        self.nullable |= outer.nullable;
        self.definitions.extend(outer.definitions);
        self.nested.extend(outer.nested);
        self.extra.extend(outer.extra);
    }

    fn write_head(&self, map: &mut Map<String, Value>) {
        if let Some(title) = &self.title {
            map.insert("title".into(), json!(title));
        }
        if let Some(description) = &self.description {
            map.insert("description".into(), json!(description));
        }
        if self.nullable {
            map.insert("nullable".into(), json!(true));
        }
    }

    fn write_tail(&self, map: &mut Map<String, Value>) {
        for (key, value) in &self.extra {
            map.insert(key.clone(), value.clone());
        }
        for (key, subschemas) in &self.nested {
            map.insert(key.clone(), subschemas.to_value());
        }
        if !self.definitions.is_empty() {
            let defs: Map<String, Value> = self
                .definitions
                .iter()
                .map(|(name, node)| (name.clone(), node.to_value()))
                .collect();
            map.insert("$defs".into(), Value::Object(defs));
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    /// `None` omits the `properties` key; `Some(empty)` emits `{}`.
    pub properties: Option<IndexMap<String, SchemaNode>>,
    pub additional_properties: Option<Box<SchemaNode>>,
    pub required: Vec<String>,
    pub annotations: Annotations,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArraySchema {
    pub items: Option<Box<SchemaNode>>,
    pub annotations: Annotations,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarSchema {
    pub kind: ScalarKind,
    pub annotations: Annotations,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSchema {
    pub target: String,
    /// Emit `type: object` next to `$ref`, for consumers that ignore `$ref`.
    pub typed: bool,
    pub annotations: Annotations,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeSchema {
    pub combinator: Combinator,
    pub variants: Vec<SchemaNode>,
    pub annotations: Annotations,
}

/// A schema without `type`, e.g. `{not: {...}}` or `{enum: [...]}`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UntypedSchema {
    pub annotations: Annotations,
}

/// A translated OpenAPI schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Object(ObjectSchema),
    Array(ArraySchema),
    Scalar(ScalarSchema),
    Reference(ReferenceSchema),
    Composite(CompositeSchema),
    Untyped(UntypedSchema),
}

impl SchemaNode {
    // ── Constructors ────────────────────────────────────────────────────

    pub fn scalar(kind: ScalarKind) -> Self {
        SchemaNode::Scalar(ScalarSchema {
            kind,
            annotations: Annotations::default(),
        })
    }

    pub fn string() -> Self {
        Self::scalar(ScalarKind::String)
    }

    /// `{type: object}` without properties.
    pub fn any_object() -> Self {
        SchemaNode::Object(ObjectSchema::default())
    }

    /// `{type: array}` without items.
    pub fn any_array() -> Self {
        SchemaNode::Array(ArraySchema::default())
    }

    pub fn array(items: SchemaNode) -> Self {
        SchemaNode::Array(ArraySchema {
            items: Some(Box::new(items)),
            annotations: Annotations::default(),
        })
    }

    /// `{type: object, additionalProperties: <values>}`.
    pub fn map(values: SchemaNode) -> Self {
        SchemaNode::Object(ObjectSchema {
            additional_properties: Some(Box::new(values)),
            ..ObjectSchema::default()
        })
    }

    /// A titled object with properties in the given order.
    pub fn titled_object(
        title: impl Into<String>,
        properties: IndexMap<String, SchemaNode>,
    ) -> Self {
        SchemaNode::Object(ObjectSchema {
            properties: Some(properties),
            annotations: Annotations {
                title: Some(title.into()),
                ..Annotations::default()
            },
            ..ObjectSchema::default()
        })
    }

    /// Plain `{$ref: target}`.
    pub fn reference(target: impl Into<String>) -> Self {
        SchemaNode::Reference(ReferenceSchema {
            target: target.into(),
            typed: false,
            annotations: Annotations::default(),
        })
    }

    /// Dual form `{type: object, $ref: #/components/schemas/<name>}`.
    pub fn component_reference(name: &str) -> Self {
        SchemaNode::Reference(ReferenceSchema {
            target: components_ref(name),
            typed: true,
            annotations: Annotations::default(),
        })
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn annotations(&self) -> &Annotations {
        match self {
            SchemaNode::Object(s) => &s.annotations,
            SchemaNode::Array(s) => &s.annotations,
            SchemaNode::Scalar(s) => &s.annotations,
            SchemaNode::Reference(s) => &s.annotations,
            SchemaNode::Composite(s) => &s.annotations,
            SchemaNode::Untyped(s) => &s.annotations,
        }
    }

    pub fn annotations_mut(&mut self) -> &mut Annotations {
        match self {
            SchemaNode::Object(s) => &mut s.annotations,
            SchemaNode::Array(s) => &mut s.annotations,
            SchemaNode::Scalar(s) => &mut s.annotations,
            SchemaNode::Reference(s) => &mut s.annotations,
            SchemaNode::Composite(s) => &mut s.annotations,
            SchemaNode::Untyped(s) => &mut s.annotations,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.annotations_mut().description = Some(description.into());
        self
    }

    pub fn with_nullable(mut self) -> Self {
        self.annotations_mut().nullable = true;
        self
    }

    /// The `type` token this node emits, if any.
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            SchemaNode::Object(_) => Some("object"),
            SchemaNode::Array(_) => Some("array"),
            SchemaNode::Scalar(s) => Some(s.kind.as_str()),
            SchemaNode::Reference(r) if r.typed => Some("object"),
            SchemaNode::Reference(_) | SchemaNode::Composite(_) | SchemaNode::Untyped(_) => None,
        }
    }

    // ── Traversal ───────────────────────────────────────────────────────

    fn children(&self) -> Vec<&SchemaNode> {
        let mut children: Vec<&SchemaNode> = match self {
            SchemaNode::Object(o) => {
                let mut c: Vec<&SchemaNode> =
                    o.properties.iter().flat_map(|p| p.values()).collect();
                c.extend(o.additional_properties.as_deref());
                c
            }
            SchemaNode::Array(a) => a.items.as_deref().into_iter().collect(),
            SchemaNode::Composite(c) => c.variants.iter().collect(),
            SchemaNode::Scalar(_) | SchemaNode::Reference(_) | SchemaNode::Untyped(_) => Vec::new(),
        };
        let annotations = self.annotations();
        children.extend(annotations.nested.values().flat_map(Subschemas::nodes));
        children.extend(annotations.definitions.values());
        children
    }

    fn children_mut(&mut self) -> Vec<&mut SchemaNode> {
        let (annotations, mut children): (&mut Annotations, Vec<&mut SchemaNode>) = match self {
            SchemaNode::Object(o) => {
                let mut c: Vec<&mut SchemaNode> =
                    o.properties.iter_mut().flat_map(|p| p.values_mut()).collect();
                c.extend(o.additional_properties.as_deref_mut());
                (&mut o.annotations, c)
            }
            SchemaNode::Array(a) => {
                let c = a.items.as_deref_mut().into_iter().collect();
                (&mut a.annotations, c)
            }
            SchemaNode::Composite(c) => {
                let v = c.variants.iter_mut().collect();
                (&mut c.annotations, v)
            }
            SchemaNode::Scalar(s) => (&mut s.annotations, Vec::new()),
            SchemaNode::Reference(r) => (&mut r.annotations, Vec::new()),
            SchemaNode::Untyped(u) => (&mut u.annotations, Vec::new()),
        };
        let Annotations {
            nested,
            definitions,
            ..
        } = annotations;
        children.extend(nested.values_mut().flat_map(Subschemas::nodes_mut));
        children.extend(definitions.values_mut());
        children
    }

    /// Every `$ref` target reachable from this node, in traversal order.
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let SchemaNode::Reference(r) = self {
            out.push(&r.target);
        }
        for child in self.children() {
            child.collect_references(out);
        }
        for (key, value) in &self.annotations().extra {
            if !DATA_KEYWORDS.contains(&key.as_str()) {
                collect_value_references(value, out);
            }
        }
    }

    /// Rewrite every `$ref` target for which `f` returns a replacement.
    ///
    /// Visits properties, `additionalProperties`, `items`, composite variants,
    /// nested keyword schemas, local definitions and any `$ref` inside an
    /// uninterpreted keyword, at every depth. Instance data (`enum`,
    /// `default`, `examples`, ...) is left alone. Returns the number of
    /// rewrites.
    pub fn rewrite_references<F>(&mut self, f: &mut F) -> usize
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut rewritten = 0;
        if let SchemaNode::Reference(r) = self {
            if let Some(target) = f(&r.target) {
                r.target = target;
                rewritten += 1;
            }
        }
        for child in self.children_mut() {
            rewritten += child.rewrite_references(f);
        }
        for (key, value) in self.annotations_mut().extra.iter_mut() {
            if !DATA_KEYWORDS.contains(&key.as_str()) {
                rewritten += rewrite_value_references(value, f);
            }
        }
        rewritten
    }

    /// Point every local-definitions reference at the components section.
    pub fn rewrite_local_references(&mut self) -> usize {
        self.rewrite_references(&mut |target| to_components_ref(target))
    }

    /// Remove and return this node's local definitions.
    pub fn take_definitions(&mut self) -> IndexMap<String, SchemaNode> {
        std::mem::take(&mut self.annotations_mut().definitions)
    }

    /// Move the local definitions of this node and of every schema nested in
    /// it into `out`. The first definition seen for a name wins.
    pub fn drain_definitions(&mut self, out: &mut IndexMap<String, SchemaNode>) {
        for (name, mut definition) in self.take_definitions() {
            definition.drain_definitions(out);
            out.entry(name).or_insert(definition);
        }
        for child in self.children_mut() {
            child.drain_definitions(out);
        }
    }

    // ── JSON conversion ─────────────────────────────────────────────────

    /// Parse a JSON schema. Never fails; see the module docs.
    pub fn from_value(value: &Value) -> SchemaNode {
        let Some(obj) = value.as_object() else {
            tracing::debug!(schema = %value, "non-object schema, falling back to string");
            return SchemaNode::string();
        };

        let mut rest = obj.clone();
        rest.remove("$schema");
        let mut annotations = Annotations::take_from(&mut rest);
        let type_token = take_type(&mut rest, &mut annotations);

        let mut fallback = false;
        let mut node = if let Some(target) = take_string(&mut rest, "$ref") {
            SchemaNode::Reference(ReferenceSchema {
                target,
                typed: type_token.as_deref() == Some("object"),
                annotations: Annotations::default(),
            })
        } else if let Some((combinator, variants)) = take_combinator(&mut rest) {
            composite_from(combinator, &variants, &mut annotations)
        } else {
            match type_token.as_deref() {
                Some("object") => object_from(&mut rest),
                Some("array") => array_from(&mut rest),
                Some(token) => match ScalarKind::parse(token) {
                    Some(kind) => SchemaNode::scalar(kind),
                    None => {
                        tracing::debug!(token, "unknown schema type, falling back to string");
                        SchemaNode::string()
                    }
                },
                None if rest.contains_key("properties")
                    || rest.contains_key("additionalProperties") =>
                {
                    object_from(&mut rest)
                }
                None if rest.get("items").is_some_and(Value::is_object) => array_from(&mut rest),
                None => {
                    fallback = true;
                    SchemaNode::string()
                }
            }
        };

        annotations.nested = take_subschemas(&mut rest);
        annotations.extra = rest.into_iter().collect();
        if fallback && !(annotations.nested.is_empty() && annotations.extra.is_empty()) {
            node = SchemaNode::Untyped(UntypedSchema::default());
        }
        node.annotations_mut().absorb(annotations);
        node
    }

    /// Render the node in the OpenAPI JSON shape.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        if let Some(token) = self.type_name() {
            map.insert("type".into(), json!(token));
        }
        let annotations = self.annotations();
        annotations.write_head(&mut map);

        match self {
            SchemaNode::Object(o) => {
                if let Some(properties) = &o.properties {
                    let props: Map<String, Value> = properties
                        .iter()
                        .map(|(name, node)| (name.clone(), node.to_value()))
                        .collect();
                    map.insert("properties".into(), Value::Object(props));
                }
                if !o.required.is_empty() {
                    map.insert("required".into(), json!(o.required));
                }
                if let Some(values) = &o.additional_properties {
                    map.insert("additionalProperties".into(), values.to_value());
                }
            }
            SchemaNode::Array(a) => {
                if let Some(items) = &a.items {
                    map.insert("items".into(), items.to_value());
                }
            }
            SchemaNode::Reference(r) => {
                map.insert("$ref".into(), json!(r.target));
            }
            SchemaNode::Composite(c) => {
                let variants: Vec<Value> = c.variants.iter().map(SchemaNode::to_value).collect();
                map.insert(c.combinator.key().into(), Value::Array(variants));
            }
            SchemaNode::Scalar(_) | SchemaNode::Untyped(_) => {}
        }

        annotations.write_tail(&mut map);
        Value::Object(map)
    }
}

/// Remove `type`, folding a `"null"` member of a type array into `nullable`.
fn take_type(rest: &mut Map<String, Value>, annotations: &mut Annotations) -> Option<String> {
    match rest.remove("type") {
        Some(Value::String(t)) => Some(t),
        Some(Value::Array(tokens)) => {
            let non_null: Vec<&str> = tokens
                .iter()
                .filter_map(Value::as_str)
                .filter(|t| *t != "null")
                .collect();
            match non_null.as_slice() {
                [] if !tokens.is_empty() => Some("null".to_string()),
                [single] => {
                    annotations.nullable |= non_null.len() < tokens.len();
                    Some(single.to_string())
                }
                _ => {
                    rest.insert("type".into(), Value::Array(tokens));
                    None
                }
            }
        }
        Some(other) => {
            rest.insert("type".into(), other);
            None
        }
        None => None,
    }
}

fn take_string(rest: &mut Map<String, Value>, key: &str) -> Option<String> {
    match rest.get(key) {
        Some(Value::String(_)) => match rest.remove(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        },
        _ => None,
    }
}

fn is_null_schema(schema: &Value) -> bool {
    schema.get("type").and_then(Value::as_str) == Some("null")
}

/// Build a composite. `anyOf` / `oneOf` lose their `{type: null}` variants,
/// which become `nullable` on the result; a single remaining variant replaces
/// the composite, with references wrapped in `allOf` so `nullable` is not a
/// `$ref` sibling.
fn composite_from(
    combinator: Combinator,
    variants: &[Value],
    annotations: &mut Annotations,
) -> SchemaNode {
    let has_null = variants.iter().any(is_null_schema);
    let all_null = variants.iter().all(is_null_schema);
    if combinator == Combinator::AllOf || !has_null || all_null {
        return SchemaNode::Composite(CompositeSchema {
            combinator,
            variants: variants.iter().map(SchemaNode::from_value).collect(),
            annotations: Annotations::default(),
        });
    }

    annotations.nullable = true;
    let mut others: Vec<SchemaNode> = variants
        .iter()
        .filter(|v| !is_null_schema(v))
        .map(SchemaNode::from_value)
        .collect();
    let mut combinator = combinator;
    if others.len() == 1 {
        if !matches!(others[0], SchemaNode::Reference(_)) {
            return others.remove(0);
        }
        combinator = Combinator::AllOf;
    }
    SchemaNode::Composite(CompositeSchema {
        combinator,
        variants: others,
        annotations: Annotations::default(),
    })
}

/// Remove every keyword left in `rest` that holds schemas.
fn take_subschemas(rest: &mut Map<String, Value>) -> IndexMap<String, Subschemas> {
    let keys: Vec<String> = rest.keys().cloned().collect();
    let mut nested = IndexMap::new();
    for key in keys {
        let keyword = key.as_str();
        let parsed = match rest.get(keyword) {
            Some(schema @ Value::Object(_)) if SINGLE_SCHEMA_KEYWORDS.contains(&keyword) => {
                Some(Subschemas::Single(SchemaNode::from_value(schema)))
            }
            Some(Value::Array(schemas))
                if SCHEMA_LIST_KEYWORDS.contains(&keyword)
                    && schemas.iter().all(Value::is_object) =>
            {
                Some(Subschemas::List(schemas.iter().map(SchemaNode::from_value).collect()))
            }
            Some(Value::Object(schemas))
                if SCHEMA_MAP_KEYWORDS.contains(&keyword)
                    && schemas.values().all(Value::is_object) =>
            {
                Some(Subschemas::Map(
                    schemas
                        .iter()
                        .map(|(name, schema)| (name.clone(), SchemaNode::from_value(schema)))
                        .collect(),
                ))
            }
            _ => None,
        };
        if let Some(parsed) = parsed {
            rest.remove(keyword);
            nested.insert(key, parsed);
        }
    }
    nested
}

fn collect_value_references<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(target)) = map.get("$ref") {
                out.push(target);
            }
            map.values().for_each(|v| collect_value_references(v, out));
        }
        Value::Array(items) => items.iter().for_each(|v| collect_value_references(v, out)),
        _ => {}
    }
}

fn rewrite_value_references<F>(value: &mut Value, f: &mut F) -> usize
where
    F: FnMut(&str) -> Option<String>,
{
    match value {
        Value::Object(map) => {
            let mut rewritten = 0;
            if let Some(Value::String(target)) = map.get_mut("$ref") {
                if let Some(replacement) = f(target) {
                    *target = replacement;
                    rewritten += 1;
                }
            }
            for (key, child) in map.iter_mut() {
                if key != "$ref" {
                    rewritten += rewrite_value_references(child, f);
                }
            }
            rewritten
        }
        Value::Array(items) => items.iter_mut().map(|v| rewrite_value_references(v, f)).sum(),
        _ => 0,
    }
}

fn take_combinator(rest: &mut Map<String, Value>) -> Option<(Combinator, Vec<Value>)> {
    for combinator in Combinator::ALL {
        if let Some(Value::Array(variants)) = rest.get(combinator.key()) {
            let variants = variants.clone();
            rest.remove(combinator.key());
            return Some((combinator, variants));
        }
    }
    None
}

fn object_from(rest: &mut Map<String, Value>) -> SchemaNode {
    let mut object = ObjectSchema::default();

    match rest.remove("properties") {
        Some(Value::Object(properties)) => {
            object.properties = Some(
                properties
                    .iter()
                    .map(|(name, schema)| (name.clone(), SchemaNode::from_value(schema)))
                    .collect(),
            );
        }
        Some(other) => {
            rest.insert("properties".into(), other);
        }
        None => {}
    }

    match rest.remove("additionalProperties") {
        Some(values @ Value::Object(_)) => {
            object.additional_properties = Some(Box::new(SchemaNode::from_value(&values)));
        }
        Some(other) => {
            rest.insert("additionalProperties".into(), other);
        }
        None => {}
    }

    match rest.remove("required") {
        Some(Value::Array(names)) if names.iter().all(Value::is_string) => {
            object.required = names.iter().filter_map(Value::as_str).map(str::to_string).collect();
        }
        Some(other) => {
            rest.insert("required".into(), other);
        }
        None => {}
    }

    SchemaNode::Object(object)
}

fn array_from(rest: &mut Map<String, Value>) -> SchemaNode {
    let mut array = ArraySchema::default();
    match rest.remove("items") {
        Some(items @ Value::Object(_)) => {
            array.items = Some(Box::new(SchemaNode::from_value(&items)));
        }
        Some(other) => {
            rest.insert("items".into(), other);
        }
        None => {}
    }
    SchemaNode::Array(array)
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SchemaNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(SchemaNode::from_value(&value))
    }
}
