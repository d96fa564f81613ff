use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use derive_more::From;

use crate::{api, date, db};

use super::{AdminClaims, Detail, Json, Path, SharedAppState};

pub(super) fn routes() -> Router<SharedAppState> {
    Router::new()
        .route("/admin/movies/all", get(list_movies))
        .route("/admin/movies", post(create_movie))
        .route("/admin/movies/:movie_id", put(update_movie))
}

#[derive(Debug, From)]
pub enum AdminMovieError {
    #[from]
    DbError(db::Error),
    #[from]
    InvalidDate(date::InvalidDate),
}

impl IntoResponse for AdminMovieError {
    fn into_response(self) -> Response {
        match self {
            Self::DbError(e) => Detail::from(e),
            Self::InvalidDate(e) => Detail::bad_request(e.to_string()),
        }
        .into_response()
    }
}

async fn list_movies(
    State(state): State<SharedAppState>,
    _: AdminClaims,
) -> Result<Json<Vec<api::movie::AdminMovie>>, AdminMovieError> {
    let movies = state
        .db_client
        .get_movies(&db::movie::Filter::default())
        .await?;
    Ok(Json(
        movies
            .into_iter()
            .map(|m| api::movie::AdminMovie::new(m, date::format_ymd))
            .collect(),
    ))
}

async fn create_movie(
    State(state): State<SharedAppState>,
    AdminClaims(claims): AdminClaims,
    Json(input): Json<api::movie::MovieInput>,
) -> Result<(StatusCode, Json<api::Message>), AdminMovieError> {
    let movie = input.into_db()?;
    state.db_client.create_movie(&movie).await?;
    tracing::info!(admin_id = claims.sub, title = %movie.title, "movie created");
    Ok((
        StatusCode::CREATED,
        Json(api::Message::new("Movie created successfully")),
    ))
}

async fn update_movie(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Path(movie_id): Path<i32>,
    Json(input): Json<api::movie::MovieInput>,
) -> Result<Json<api::Message>, AdminMovieError> {
    let movie = input.into_db()?;
    state.db_client.update_movie(movie_id, &movie).await?;
    Ok(Json(api::Message::new("Movie updated")))
}
