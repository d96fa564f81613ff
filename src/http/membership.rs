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
    Router::new()
        .route("/customers/:customer_id/membership", get(get_membership))
}

#[derive(Debug, From)]
pub enum MembershipError {
    #[from]
    DbError(db::Error),
    CustomerNotFound,
}

impl IntoResponse for MembershipError {
    fn into_response(self) -> Response {
        match self {
            Self::DbError(e) => Detail::from(e),
            Self::CustomerNotFound => Detail::not_found("Customer not found"),
        }
        .into_response()
    }
}

async fn get_membership(
    State(state): State<SharedAppState>,
    Path(customer_id): Path<i32>,
) -> Result<Json<api::membership::Overview>, MembershipError> {
    let store = &state.db_client;
    let membership = store
        .get_membership(customer_id)
        .await?
        .ok_or(MembershipError::CustomerNotFound)?;

    let (privileges, reviews, receipts, tickets, products) = tokio::try_join!(
        store.get_privileges(membership.membership_id),
        store.get_customer_reviews(customer_id),
        store.get_customer_receipts(customer_id),
        store.get_customer_tickets(customer_id),
        store.get_customer_products(customer_id),
    )?;

    Ok(Json(
        api::membership::Records {
            membership,
            privileges,
            reviews,
            receipts,
            tickets,
            products,
        }
        .into(),
    ))
}
