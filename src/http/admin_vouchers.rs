use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use derive_more::From;

use crate::{api, date, db};

use super::{AdminClaims, Detail, Json, Path, SharedAppState};

pub(super) fn routes() -> Router<SharedAppState> {
    Router::new()
        .route("/admin/vouchers", get(list_vouchers).post(create_voucher))
        .route(
            "/admin/vouchers/:voucher_id",
            put(update_voucher).delete(delete_voucher),
        )
}

#[derive(Debug, From)]
pub enum AdminVoucherError {
    #[from]
    DbError(db::Error),
    #[from]
    InvalidDate(date::InvalidDate),
}

impl IntoResponse for AdminVoucherError {
    fn into_response(self) -> Response {
        match self {
            Self::DbError(e) => Detail::from(e),
            Self::InvalidDate(e) => Detail::bad_request(e.to_string()),
        }
        .into_response()
    }
}

async fn list_vouchers(
    State(state): State<SharedAppState>,
    _: AdminClaims,
) -> Result<Json<Vec<api::voucher::Voucher>>, AdminVoucherError> {
    let vouchers = state.db_client.get_vouchers().await?;
    Ok(Json(vouchers.into_iter().map(Into::into).collect()))
}

async fn create_voucher(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Json(voucher): Json<api::voucher::NewVoucher>,
) -> Result<Json<api::Message>, AdminVoucherError> {
    let expiration = date::parse_dmy(&voucher.expiration)?;
    state
        .db_client
        .create_voucher(
            voucher.discount,
            expiration,
            voucher.description.as_deref(),
            &voucher.condition,
        )
        .await?;
    Ok(Json(api::Message::new("Voucher created successfully")))
}

async fn update_voucher(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Path(voucher_id): Path<i32>,
    Json(patch): Json<api::voucher::VoucherPatch>,
) -> Result<Json<api::voucher::Changed>, AdminVoucherError> {
    let patch = patch.into_db()?;
    state.db_client.update_voucher(voucher_id, &patch).await?;
    Ok(Json(api::voucher::Changed {
        message: "Voucher updated successfully".to_owned(),
        voucher_id,
    }))
}

async fn delete_voucher(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Path(voucher_id): Path<i32>,
) -> Result<Json<api::voucher::Changed>, AdminVoucherError> {
    state.db_client.delete_voucher(voucher_id).await?;
    Ok(Json(api::voucher::Changed {
        message: "Voucher deleted successfully".to_owned(),
        voucher_id,
    }))
}
