use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use derive_more::From;

use crate::{api, db};

use super::{Detail, Json, Path, SharedAppState};

pub(super) fn routes() -> Router<SharedAppState> {
    Router::new()
        .route("/api/votemood/change", post(change_vote))
        .route("/api/votemood/movie/:movie_id", get(count_votes))
}

#[derive(Debug, From)]
pub enum VoteError {
    #[from]
    DbError(db::Error),
    /// Toggling a vote reports every store failure as a bad request.
    VoteRejected(db::Error),
}

impl IntoResponse for VoteError {
    fn into_response(self) -> Response {
        match self {
            Self::DbError(e) => Detail::from(e),
            Self::VoteRejected(e) => {
                tracing::warn!("mood vote rejected: {e}");
                let message = match db::classify(&e) {
                    db::Failure::Rejected(m)
                    | db::Failure::NotFound(m)
                    | db::Failure::Unclassified(m) => m,
                };
                Detail::bad_request(message)
            }
        }
        .into_response()
    }
}

async fn change_vote(
    State(state): State<SharedAppState>,
    Json(vote): Json<api::mood::Vote>,
) -> Result<Json<api::Message>, VoteError> {
    state
        .db_client
        .vote_mood(vote.movie_id, vote.customer_id, vote.mood_id)
        .await
        .map_err(VoteError::VoteRejected)?;
    Ok(Json(api::Message::new("Mood vote changed successfully")))
}

async fn count_votes(
    State(state): State<SharedAppState>,
    Path(movie_id): Path<i32>,
) -> Result<Json<Vec<api::mood::MoodCount>>, VoteError> {
    let counts = state.db_client.get_mood_counts(movie_id).await?;
    Ok(Json(counts.into_iter().map(Into::into).collect()))
}
