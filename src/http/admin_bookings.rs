use axum::{extract::State, routing::get, Router};

use crate::api;

use super::{AdminClaims, Detail, Json, Path, SharedAppState};

pub(super) fn routes() -> Router<SharedAppState> {
    Router::new()
        .route("/admin/bookings/all", get(list_bookings))
        .route("/admin/bookings/branch/:branch_id", get(list_branch_bookings))
}

async fn list_bookings(
    State(state): State<SharedAppState>,
    _: AdminClaims,
) -> Result<Json<Vec<api::booking::Booking>>, Detail> {
    let bookings = state.db_client.get_all_receipts().await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

async fn list_branch_bookings(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Path(branch_id): Path<i32>,
) -> Result<Json<Vec<api::booking::Booking>>, Detail> {
    let bookings = state.db_client.get_receipts_by_branch(branch_id).await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}
