use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use derive_more::From;

use crate::{api, db};

use super::{Detail, Json, Path, SharedAppState};

pub(super) fn routes() -> Router<SharedAppState> {
    Router::new().route("/vouchers/:customer_id", get(list_customer_vouchers))
}

#[derive(Debug, From)]
pub enum VoucherError {
    #[from]
    DbError(db::Error),
    NoVouchers,
}

impl IntoResponse for VoucherError {
    fn into_response(self) -> Response {
        match self {
            Self::DbError(e) => Detail::from(e),
            Self::NoVouchers => {
                Detail::not_found("No vouchers found for this customer")
            }
        }
        .into_response()
    }
}

async fn list_customer_vouchers(
    State(state): State<SharedAppState>,
    Path(customer_id): Path<i32>,
) -> Result<Json<Vec<api::voucher::CustomerVoucher>>, VoucherError> {
    let vouchers = state.db_client.get_customer_vouchers(customer_id).await?;
    if vouchers.is_empty() {
        return Err(VoucherError::NoVouchers);
    }
    Ok(Json(vouchers.into_iter().map(Into::into).collect()))
}
