//! axum handlers, one module per resource.

mod admin_bookings;
mod admin_events;
mod admin_movies;
mod admin_products;
mod admin_regular;
mod admin_vouchers;
mod auth;
mod branches;
mod dashboard;
mod events;
mod membership;
mod movies;
mod receipts;
mod vouchers;
mod votemood;

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Router,
};
use jsonwebtoken::{DecodingKey, EncodingKey};
use serde::Serialize;
use tower_http::normalize_path::NormalizePath;

use crate::{api, db, mail, spoiler};

pub use self::auth::{AdminClaims, AuthClaims};

pub type SharedAppState = Arc<AppState>;

pub struct AppState {
    pub db_client: db::Client,

    pub jwt_expiration_time: Duration,

    pub jwt_decoding_key: DecodingKey,

    pub jwt_encoding_key: EncodingKey,

    pub classifier: Box<dyn spoiler::Classify>,

    pub spoiler_threshold: f32,

    /// Ticket confirmations; booking doesn't send them on its own.
    pub mailer: mail::TicketMailer,
}

pub fn router(state: SharedAppState) -> Router {
    Router::new()
        .merge(auth::routes())
        .merge(movies::routes())
        .merge(events::routes())
        .merge(branches::routes())
        .merge(vouchers::routes())
        .merge(membership::routes())
        .merge(receipts::routes())
        .merge(votemood::routes())
        .merge(admin_movies::routes())
        .merge(admin_events::routes())
        .merge(admin_vouchers::routes())
        .merge(admin_products::routes())
        .merge(admin_bookings::routes())
        .merge(dashboard::routes())
        .merge(admin_regular::routes())
        .with_state(state)
}

/// Routes `/receipts/` and `/receipts` alike by trimming trailing slashes
/// before the router sees the path.
pub fn trim_trailing_slash(app: Router) -> NormalizePath<Router> {
    NormalizePath::trim_trailing_slash(app)
}

/// Error response carrying `{"detail": message}`.
#[derive(Debug)]
pub struct Detail {
    status: StatusCode,
    message: String,
}

impl Detail {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for Detail {
    fn into_response(self) -> Response {
        (
            self.status,
            axum::Json(api::Detail {
                detail: self.message,
            }),
        )
            .into_response()
    }
}

impl From<db::Error> for Detail {
    fn from(err: db::Error) -> Self {
        match db::classify(&err) {
            db::Failure::Rejected(message) => Self::bad_request(message),
            db::Failure::NotFound(message) => Self::not_found(message),
            db::Failure::Unclassified(message) => {
                tracing::error!("store failure: {err}");
                Self::internal(message)
            }
        }
    }
}

impl From<JsonRejection> for Detail {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for Detail {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for Detail {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

/// JSON body whose rejections are reported as `{"detail": ...}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(Detail))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Detail))]
pub struct Path<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Detail))]
pub struct Query<T>(pub T);

/// Rows to skip for the requested page.
fn offset(paging: &api::Paging) -> Result<i64, Detail> {
    paging
        .offset()
        .ok_or_else(|| Detail::bad_request("page and limit must be at least 1"))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        extract::Request,
        routing::{get, post},
    };
    use tower::ServiceExt as _;

    use super::*;

    async fn body(detail: Detail) -> (StatusCode, serde_json::Value) {
        let response = detail.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn detail_body_has_single_key() {
        let (status, json) = body(Detail::not_found("Branch not found")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, serde_json::json!({"detail": "Branch not found"}));
    }

    #[test]
    fn rejects_non_positive_paging() {
        let err = offset(&api::Paging { page: 0, limit: 10 }).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(offset(&api::Paging { page: 2, limit: 10 }).unwrap(), 10);
    }

    #[tokio::test]
    async fn collection_routes_accept_trailing_slash() {
        let app = trim_trailing_slash(
            Router::new()
                .route("/receipts", post(|| async { StatusCode::CREATED }))
                .route("/admin/vouchers", get(|| async { StatusCode::OK })),
        );

        for (method, uri, expected) in [
            ("POST", "/receipts", StatusCode::CREATED),
            ("POST", "/receipts/", StatusCode::CREATED),
            ("GET", "/admin/vouchers/", StatusCode::OK),
            ("GET", "/admin/vouchers/?page=1", StatusCode::OK),
        ] {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), expected, "{method} {uri}");
        }
    }
}
