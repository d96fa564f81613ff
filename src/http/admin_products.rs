use axum::{
    extract::State,
    routing::{get, put},
    Router,
};

use crate::api;

use super::{AdminClaims, Detail, Json, Path, SharedAppState};

pub(super) fn routes() -> Router<SharedAppState> {
    Router::new()
        .route(
            "/admin/products/food_drink",
            get(list_food_drinks).post(create_food_drink),
        )
        .route(
            "/admin/products/food_drink/:product_id",
            put(update_food_drink).delete(delete_food_drink),
        )
        .route(
            "/admin/products/souvenir",
            get(list_souvenirs).post(create_souvenir),
        )
        .route(
            "/admin/products/souvenir/:product_id",
            put(update_souvenir).delete(delete_souvenir),
        )
}

fn changed(message: &str, product_id: i32) -> Json<api::product::Changed> {
    Json(api::product::Changed {
        message: message.to_owned(),
        product_id,
    })
}

async fn list_food_drinks(
    State(state): State<SharedAppState>,
    _: AdminClaims,
) -> Result<Json<Vec<api::product::FoodDrink>>, Detail> {
    let items = state.db_client.get_food_drinks().await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

async fn create_food_drink(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Json(item): Json<api::product::NewFoodDrink>,
) -> Result<Json<api::Message>, Detail> {
    state.db_client.create_food_drink(&item.into()).await?;
    Ok(Json(api::Message::new(
        "Food / Drink product created successfully",
    )))
}

async fn update_food_drink(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Path(product_id): Path<i32>,
    Json(patch): Json<api::product::FoodDrinkPatch>,
) -> Result<Json<api::product::Changed>, Detail> {
    state
        .db_client
        .update_food_drink(product_id, &patch.into())
        .await?;
    Ok(changed("Food / Drink product updated successfully", product_id))
}

async fn delete_food_drink(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Path(product_id): Path<i32>,
) -> Result<Json<api::product::Changed>, Detail> {
    state.db_client.delete_food_drink(product_id).await?;
    Ok(changed("Food / Drink product deleted successfully", product_id))
}

async fn list_souvenirs(
    State(state): State<SharedAppState>,
    _: AdminClaims,
) -> Result<Json<Vec<api::product::Souvenir>>, Detail> {
    let items = state.db_client.get_souvenirs().await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

async fn create_souvenir(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Json(item): Json<api::product::NewSouvenir>,
) -> Result<Json<api::Message>, Detail> {
    state.db_client.create_souvenir(&item.into()).await?;
    Ok(Json(api::Message::new("Souvenir product created successfully")))
}

async fn update_souvenir(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Path(product_id): Path<i32>,
    Json(patch): Json<api::product::SouvenirPatch>,
) -> Result<Json<api::product::Changed>, Detail> {
    state
        .db_client
        .update_souvenir(product_id, &patch.into())
        .await?;
    Ok(changed("Souvenir product updated successfully", product_id))
}

async fn delete_souvenir(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Path(product_id): Path<i32>,
) -> Result<Json<api::product::Changed>, Detail> {
    state.db_client.delete_souvenir(product_id).await?;
    Ok(changed("Souvenir product deleted successfully", product_id))
}
