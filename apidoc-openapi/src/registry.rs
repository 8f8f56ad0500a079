use indexmap::IndexMap;
use serde::Serialize;

use crate::schema::SchemaNode;

/// Outcome of a successful [`ComponentsRegistry::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The name was free and the schema is now registered.
    Inserted,
    /// The exact same schema was already registered under this name.
    Unchanged,
}

/// A name was already taken by a different schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    pub name: String,
    /// The schema that stays registered.
    pub existing: SchemaNode,
    /// The schema that was turned away.
    pub rejected: SchemaNode,
}

/// Registry of named schemas for the document's `components.schemas` section.
///
/// Insertion is insert-if-absent: the first schema registered under a name
/// is kept, identical re-registrations are accepted as no-ops, and
/// conflicting ones are handed back as a [`Collision`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ComponentsRegistry {
    schemas: IndexMap<String, SchemaNode>,
}

impl ComponentsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under `name`.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        node: SchemaNode,
    ) -> Result<Registration, Collision> {
        let name = name.into();
        match self.schemas.get(&name) {
            Some(existing) if *existing == node => Ok(Registration::Unchanged),
            Some(existing) => Err(Collision {
                existing: existing.clone(),
                rejected: node,
                name,
            }),
            None => {
                self.schemas.insert(name, node);
                Ok(Registration::Inserted)
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.schemas.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.schemas.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn clear(&mut self) {
        self.schemas.clear();
    }

    pub fn into_inner(self) -> IndexMap<String, SchemaNode> {
        self.schemas
    }
}
