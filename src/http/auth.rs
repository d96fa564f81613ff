use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, State},
    http::request,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    RequestPartsExt as _, Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use derive_more::From;
use jsonwebtoken::{decode, encode, Header, Validation};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{api, db};

use super::{Detail, Json, SharedAppState};

pub(super) fn routes() -> Router<SharedAppState> {
    Router::new()
        .route("/auth/customer/register", post(register_customer))
        .route("/auth/customer/login", post(login_customer))
        .route("/auth/customer/change-password", post(change_customer_password))
        .route("/auth/customer/update", put(update_customer))
        .route("/auth/admin/login", post(login_admin))
        .route("/auth/admin/register", post(register_admin))
        .route("/auth/admin/all", get(list_admins))
        .route("/auth/admin/change-password", post(change_admin_password))
        .route("/auth/admin/update", put(update_admin))
}

#[derive(Debug, From)]
pub enum AuthError {
    #[from]
    DbError(db::Error),
    #[from]
    Invalid(api::auth::Invalid),
    InvalidToken,
    NotAnAdmin,
    /// Credentials didn't match; carries the store's explanation if any.
    WrongCredentials(Option<String>),
    CustomerNotFound,
    NotCreated(&'static str),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::DbError(e) => Detail::from(e),
            Self::Invalid(e) => Detail::bad_request(e.to_string()),
            Self::InvalidToken => Detail::unauthorized("Not authenticated"),
            Self::NotAnAdmin => Detail::unauthorized("Admin access required"),
            Self::WrongCredentials(message) => Detail::unauthorized(
                message.unwrap_or_else(|| "Invalid email or password.".into()),
            ),
            Self::CustomerNotFound => {
                Detail::not_found("Customer not found after update")
            }
            Self::NotCreated(message) => Detail::internal(message),
        }
        .into_response()
    }
}

/// Store rejections of a login attempt are reported as wrong credentials.
fn login_failure(err: db::Error) -> AuthError {
    match db::classify(&err) {
        db::Failure::Rejected(message) | db::Failure::NotFound(message) => {
            AuthError::WrongCredentials(Some(message))
        }
        db::Failure::Unclassified(_) => AuthError::DbError(err),
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct AuthClaims {
    pub sub: i32,
    pub role: api::Role,
    pub exp: i64,
}

impl AuthClaims {
    fn issue(
        state: &SharedAppState,
        sub: i32,
        role: api::Role,
    ) -> Result<String, AuthError> {
        let expires_at = OffsetDateTime::now_utc() + state.jwt_expiration_time;
        encode(
            &Header::default(),
            &Self {
                sub,
                role,
                exp: expires_at.unix_timestamp(),
            },
            &state.jwt_encoding_key,
        )
        .map_err(|_| AuthError::InvalidToken)
    }
}

#[async_trait]
impl FromRequestParts<SharedAppState> for AuthClaims {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut request::Parts,
        state: &SharedAppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AuthError::InvalidToken)?;
        let token_data = decode::<Self>(
            bearer.token(),
            &state.jwt_decoding_key,
            &Validation::default(),
        )
        .map_err(|_| AuthError::InvalidToken)?;

        Ok(token_data.claims)
    }
}

/// Claims of a token issued to a primary or regular admin.
#[derive(Clone, Copy, Debug)]
pub struct AdminClaims(pub AuthClaims);

#[async_trait]
impl FromRequestParts<SharedAppState> for AdminClaims {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut request::Parts,
        state: &SharedAppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = AuthClaims::from_request_parts(parts, state).await?;
        if !claims.role.is_admin() {
            return Err(AuthError::NotAnAdmin);
        }
        Ok(Self(claims))
    }
}

async fn register_customer(
    State(state): State<SharedAppState>,
    Json(input): Json<api::auth::CustomerRegistration>,
) -> Result<Json<api::auth::Customer>, AuthError> {
    let customer = input.into_db()?;

    let mut conn = state.db_client.exclusive().await;
    let tx = conn.transaction().await?;
    let created = db::customer::create_customer(&tx, &customer).await?;
    tx.commit().await?;

    let created =
        created.ok_or(AuthError::NotCreated("Failed to register customer"))?;
    tracing::info!(customer_id = created.id, "customer registered");
    Ok(Json(created.into()))
}

async fn login_customer(
    State(state): State<SharedAppState>,
    Json(api::auth::Credentials { email, password }): Json<
        api::auth::Credentials,
    >,
) -> Result<Json<api::auth::Customer>, AuthError> {
    let customer = state
        .db_client
        .login_customer(&email, &password)
        .await
        .map_err(login_failure)?
        .ok_or(AuthError::WrongCredentials(None))?;

    let token = AuthClaims::issue(&state, customer.id, api::Role::Customer)?;
    Ok(Json(api::auth::Customer {
        token: Some(token),
        ..customer.into()
    }))
}

async fn login_admin(
    State(state): State<SharedAppState>,
    Json(api::auth::Credentials { email, password }): Json<
        api::auth::Credentials,
    >,
) -> Result<Json<api::auth::Admin>, AuthError> {
    let admin = state
        .db_client
        .login_admin(&email, &password)
        .await
        .map_err(login_failure)?
        .ok_or(AuthError::WrongCredentials(None))?;

    let token = AuthClaims::issue(&state, admin.id, admin.role.into())?;
    Ok(Json(api::auth::Admin {
        token: Some(token),
        ..admin.into()
    }))
}

async fn list_admins(
    State(state): State<SharedAppState>,
) -> Result<Json<Vec<api::auth::Admin>>, AuthError> {
    let admins = state.db_client.get_all_admins().await?;
    Ok(Json(admins.into_iter().map(Into::into).collect()))
}

async fn register_admin(
    State(state): State<SharedAppState>,
    Json(input): Json<api::auth::AdminRegistration>,
) -> Result<Json<api::auth::Admin>, AuthError> {
    let admin = input.into_db()?;
    let created = state
        .db_client
        .create_admin(&admin)
        .await?
        .ok_or(AuthError::NotCreated("Failed to register admin"))?;
    Ok(Json(created.into()))
}

async fn change_customer_password(
    State(state): State<SharedAppState>,
    Json(input): Json<api::auth::PasswordChange>,
) -> Result<Json<api::Message>, AuthError> {
    state
        .db_client
        .change_customer_password(
            input.id,
            &input.old_password,
            &input.new_password,
        )
        .await?;
    Ok(Json(api::Message::new("Password updated successfully.")))
}

async fn change_admin_password(
    State(state): State<SharedAppState>,
    Json(input): Json<api::auth::PasswordChange>,
) -> Result<Json<api::Message>, AuthError> {
    state
        .db_client
        .change_admin_password(
            input.id,
            &input.old_password,
            &input.new_password,
        )
        .await?;
    Ok(Json(api::Message::new("Password updated successfully.")))
}

async fn update_customer(
    State(state): State<SharedAppState>,
    Json(input): Json<api::auth::CustomerUpdate>,
) -> Result<Json<api::auth::Customer>, AuthError> {
    let profile = input.into_db()?;

    let mut conn = state.db_client.exclusive().await;
    let tx = conn.transaction().await?;
    let updated = db::customer::update_customer(&tx, &profile).await?;
    tx.commit().await?;

    Ok(Json(updated.ok_or(AuthError::CustomerNotFound)?.into()))
}

async fn update_admin(
    State(state): State<SharedAppState>,
    Json(input): Json<api::auth::AdminUpdate>,
) -> Result<Json<api::Message>, AuthError> {
    let profile = input.into_db()?;
    state.db_client.update_admin_profile(&profile).await?;
    Ok(Json(api::Message::new("Profile updated successfully.")))
}
