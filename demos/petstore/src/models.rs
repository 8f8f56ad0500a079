use apidoc::{DocModel, ModelDescriptor, ModelRef, TypeAnnotation};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    pub email: Option<String>,
}

impl DocModel for Owner {
    fn model_name() -> &'static str {
        "Owner"
    }

    fn descriptor() -> ModelDescriptor {
        ModelDescriptor::new("Owner")
            .field("name", TypeAnnotation::String)
            .described_field(
                "email",
                TypeAnnotation::optional(TypeAnnotation::String),
                "Contact address",
            )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: i64,
    pub name: String,
    pub tags: Vec<String>,
    pub owner: Option<Owner>,
}

impl DocModel for Pet {
    fn model_name() -> &'static str {
        "Pet"
    }

    fn descriptor() -> ModelDescriptor {
        ModelDescriptor::new("Pet")
            .described_field("id", TypeAnnotation::Integer, "Unique identifier")
            .field("name", TypeAnnotation::String)
            .field("tags", TypeAnnotation::list(TypeAnnotation::String))
            .field(
                "owner",
                TypeAnnotation::optional(TypeAnnotation::Model(ModelRef::of::<Owner>())),
            )
    }
}

/// Shipping address of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub postcode: Option<String>,
}

/// An order for a pet, documented through its `schemars` export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Order {
    pub id: u64,
    pub pet_id: i64,
    pub quantity: u32,
    pub ship_to: Address,
    pub complete: bool,
}
