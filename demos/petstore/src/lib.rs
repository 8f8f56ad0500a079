//! A small pet store that documents itself with apidoc.

pub mod models;
pub mod routes;

use apidoc::apidoc_openapi::{DocError, DocsHandle, ModelSource, Redoc, RedocConfig};
use apidoc::http::get;
use apidoc::{AppBuilder, AppConfig};
use axum::routing::post;

use models::{Order, Pet};
use routes::PetStore;

/// Assemble the pet store. The returned handle reads the generated document.
pub fn build_app(config: &AppConfig) -> Result<(AppBuilder<PetStore>, DocsHandle), DocError> {
    let redoc = Redoc::new(RedocConfig::new("Pet Store", "1.0.0"))?
        .add_schema(ModelSource::of::<Pet>())
        .add_schema(ModelSource::schemars::<Order>());
    let docs = redoc.handle();

    let app = AppBuilder::with_state(PetStore::default())
        .with_config(config.clone())
        .with_tracing()
        .route("/pets", "list_pets", Some(routes::LIST_PETS_DOC), get(routes::list_pets))
        .route("/pets", "create_pet", Some(routes::CREATE_PET_DOC), post(routes::create_pet))
        .route("/pets/{id}", "get_pet", Some(routes::GET_PET_DOC), get(routes::get_pet))
        .route("/store/orders", "place_order", Some(routes::PLACE_ORDER_DOC), post(routes::place_order))
        .route("/health", "health", None, get(routes::health))
        .with(redoc);

    Ok((app, docs))
}
