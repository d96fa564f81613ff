use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use derive_more::From;

use crate::{api, db, receipt};

use super::{Detail, Json, SharedAppState};

pub(super) fn routes() -> Router<SharedAppState> {
    Router::new().route("/receipts", post(create_receipt))
}

#[derive(Debug, From)]
pub enum ReceiptError {
    #[from]
    DbError(db::Error),
    #[from]
    Invalid(receipt::Invalid),
    #[from]
    Assembly(receipt::Error<db::Error>),
}

impl IntoResponse for ReceiptError {
    fn into_response(self) -> Response {
        use receipt::Error as E;

        match self {
            Self::DbError(e) | Self::Assembly(E::Store(e)) => Detail::from(e),
            Self::Invalid(e) => Detail::bad_request(e.to_string()),
            Self::Assembly(e @ E::VoucherUnavailable) => {
                Detail::bad_request(e.to_string())
            }
            Self::Assembly(e @ E::MissingReceiptId) => {
                tracing::error!("store returned no receipt id");
                Detail::internal(e.to_string())
            }
        }
        .into_response()
    }
}

#[tracing::instrument(
    skip_all,
    fields(
        customer_id = purchase.customer_id,
        tickets = purchase.tickets.len(),
        products = purchase.products.len(),
    ),
)]
async fn create_receipt(
    State(state): State<SharedAppState>,
    Json(purchase): Json<api::receipt::Purchase>,
) -> Result<Json<api::receipt::Created>, ReceiptError> {
    let purchase = purchase.validate()?;

    let mut conn = state.db_client.exclusive().await;
    let tx = conn.transaction().await?;
    let receipt_id = receipt::assemble(tx, &purchase).await?;

    Ok(Json(api::receipt::Created::new(receipt_id)))
}
