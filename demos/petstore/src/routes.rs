use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tokio::sync::RwLock;

use crate::models::{Order, Pet};

#[derive(Debug, Clone, Default)]
pub struct PetStore {
    pets: Arc<RwLock<Vec<Pet>>>,
    orders: Arc<RwLock<Vec<Order>>>,
}

pub const LIST_PETS_DOC: &str = "List every pet in the store.
---
get:
  summary: List pets
  tags: [pets]
  responses:
    200:
      description: All pets
      content:
        application/json:
          schema:
            type: array
            items: Pet
";

pub const CREATE_PET_DOC: &str = "Add a pet to the store.
---
post:
  summary: Create a pet
  tags: [pets]
  requestBody:
    required: true
    content:
      application/json:
        schema: Pet
  responses:
    201:
      description: The stored pet
      content:
        application/json:
          schema: Pet
";

pub const GET_PET_DOC: &str = "Fetch a single pet.
---
get:
  summary: Get a pet
  tags: [pets]
  parameters:
    - name: id
      in: path
      required: true
      schema:
        type: integer
  responses:
    200:
      description: The pet
      content:
        application/json:
          schema: Pet
    404:
      description: No pet with this id
";

pub const PLACE_ORDER_DOC: &str = "Place an order for a pet.
---
post:
  summary: Place an order
  tags: [store]
  requestBody:
    content:
      application/json:
        schema: Order
  responses:
    201:
      description: The accepted order
      content:
        application/json:
          schema: Order
";

pub async fn list_pets(State(store): State<PetStore>) -> Json<Vec<Pet>> {
    Json(store.pets.read().await.clone())
}

pub async fn create_pet(
    State(store): State<PetStore>,
    Json(pet): Json<Pet>,
) -> (StatusCode, Json<Pet>) {
    let mut pets = store.pets.write().await;
    pets.retain(|p| p.id != pet.id);
    pets.push(pet.clone());
    tracing::info!(id = pet.id, "pet stored");
    (StatusCode::CREATED, Json(pet))
}

pub async fn get_pet(
    State(store): State<PetStore>,
    Path(id): Path<i64>,
) -> Result<Json<Pet>, StatusCode> {
    let pets = store.pets.read().await;
    pets.iter()
        .find(|p| p.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn place_order(
    State(store): State<PetStore>,
    Json(order): Json<Order>,
) -> (StatusCode, Json<Order>) {
    store.orders.write().await.push(order.clone());
    tracing::info!(id = order.id, pet_id = order.pet_id, "order placed");
    (StatusCode::CREATED, Json(order))
}

pub async fn health() -> &'static str {
    "OK"
}
