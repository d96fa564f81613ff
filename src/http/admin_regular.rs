//! Per-branch administration: screens, halls and showtimes.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use derive_more::From;

use crate::{api, date, db};

use super::{AdminClaims, Detail, Json, Path, Query, SharedAppState};

pub(super) fn routes() -> Router<SharedAppState> {
    Router::new()
        .route("/admin_regular/branch/:branch_id/movies", get(list_movies))
        .route(
            "/admin_regular/branch/:branch_id/movies-not-in-branch",
            get(list_missing_movies),
        )
        .route(
            "/admin_regular/branch/:branch_id/create-screen",
            post(create_screen),
        )
        .route(
            "/admin_regular/branch/:branch_id/delete-screen/:movie_id",
            delete(delete_screen),
        )
        .route("/admin_regular/branch/halls/:branch_id", get(list_halls))
        .route(
            "/admin_regular/branch/showtimes/:branch_id",
            get(list_showtimes),
        )
        .route(
            "/admin_regular/branch/showtimes/:branch_id/create",
            post(create_showtime),
        )
        .route(
            "/admin_regular/branch/showtimes/:branch_id/:id",
            put(update_showtime),
        )
        .route(
            "/admin_regular/branch/showtimes/:branch_id/:id/:showtime_id",
            delete(delete_showtime),
        )
}

#[derive(Debug, From)]
pub enum BranchAdminError {
    #[from]
    DbError(db::Error),
    #[from]
    InvalidDate(date::InvalidDate),
    ShowtimeNotInBranch,
}

impl IntoResponse for BranchAdminError {
    fn into_response(self) -> Response {
        match self {
            Self::DbError(e) => Detail::from(e),
            Self::InvalidDate(e) => Detail::bad_request(e.to_string()),
            Self::ShowtimeNotInBranch => Detail::not_found(
                "Showtime does not exist or does not belong to this branch.",
            ),
        }
        .into_response()
    }
}

async fn list_movies(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Path(branch_id): Path<i32>,
) -> Result<Json<Vec<api::movie::AdminMovie>>, BranchAdminError> {
    let movies = state.db_client.get_movies_by_branch(branch_id).await?;
    Ok(Json(
        movies
            .into_iter()
            .map(|m| api::movie::AdminMovie::new(m, date::format_dmy))
            .collect(),
    ))
}

async fn list_missing_movies(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Path(branch_id): Path<i32>,
) -> Result<Json<Vec<api::movie::AdminMovie>>, BranchAdminError> {
    let movies = state.db_client.get_movies_not_in_branch(branch_id).await?;
    Ok(Json(
        movies
            .into_iter()
            .map(|m| api::movie::AdminMovie::new(m, date::format_dmy))
            .collect(),
    ))
}

async fn create_screen(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Path(branch_id): Path<i32>,
    Json(screen): Json<api::branch::NewScreen>,
) -> Result<Json<api::branch::ScreenChanged>, BranchAdminError> {
    state
        .db_client
        .create_screen(branch_id, screen.movie_id)
        .await?;
    Ok(Json(api::branch::ScreenChanged {
        message: "Screen created successfully".to_owned(),
        branch_id,
        movie_id: screen.movie_id,
    }))
}

async fn delete_screen(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Path((branch_id, movie_id)): Path<(i32, i32)>,
) -> Result<Json<api::branch::ScreenChanged>, BranchAdminError> {
    state.db_client.delete_screen(branch_id, movie_id).await?;
    Ok(Json(api::branch::ScreenChanged {
        message: "Screen deleted successfully".to_owned(),
        branch_id,
        movie_id,
    }))
}

async fn list_halls(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Path(branch_id): Path<i32>,
    Query(filter): Query<api::branch::HallFilter>,
) -> Result<Json<Vec<api::branch::HallChoice>>, BranchAdminError> {
    let halls = match filter.format.filter(|f| !f.is_empty()) {
        Some(format) => {
            state
                .db_client
                .get_halls_for_format(branch_id, &format.to_uppercase())
                .await?
        }
        None => state.db_client.get_halls_by_branch(branch_id).await?,
    };
    Ok(Json(halls.into_iter().map(Into::into).collect()))
}

async fn list_showtimes(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Path(branch_id): Path<i32>,
) -> Result<Json<Vec<api::branch::ScheduledShowtime>>, BranchAdminError> {
    let showtimes = state.db_client.get_showtimes_by_branch(branch_id).await?;
    Ok(Json(showtimes.into_iter().map(Into::into).collect()))
}

async fn create_showtime(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Path(branch_id): Path<i32>,
    Json(showtime): Json<api::branch::NewShowtime>,
) -> Result<Json<api::Message>, BranchAdminError> {
    let showtime = showtime.into_db()?;
    state.db_client.create_showtime(branch_id, &showtime).await?;
    Ok(Json(api::Message::new("Showtime created successfully")))
}

async fn update_showtime(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Path((branch_id, showtime_id)): Path<(i32, i32)>,
    Json(patch): Json<api::branch::ShowtimePatch>,
) -> Result<Json<api::Message>, BranchAdminError> {
    let patch = patch.into_db()?;
    state
        .db_client
        .update_showtime(branch_id, showtime_id, &patch)
        .await?;
    Ok(Json(api::Message::new("Showtime updated successfully")))
}

async fn delete_showtime(
    State(state): State<SharedAppState>,
    AdminClaims(claims): AdminClaims,
    Path((branch_id, movie_id, showtime_id)): Path<(i32, i32, i32)>,
) -> Result<Json<api::branch::ShowtimeDeleted>, BranchAdminError> {
    let mut conn = state.db_client.exclusive().await;
    let tx = conn.transaction().await?;
    let deleted = db::showtime::delete_showtime_in_branch(
        &tx,
        branch_id,
        movie_id,
        showtime_id,
    )
    .await?;
    if !deleted {
        return Err(BranchAdminError::ShowtimeNotInBranch);
    }
    tx.commit().await?;

    tracing::info!(
        admin_id = claims.sub,
        branch_id,
        movie_id,
        showtime_id,
        "showtime deleted"
    );
    Ok(Json(api::branch::ShowtimeDeleted {
        message: "Showtime deleted successfully".to_owned(),
        movie_id,
        showtime_id,
    }))
}
