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
        .route("/events", get(list_events))
        .route("/events/:event_id", get(get_event))
}

#[derive(Debug, From)]
pub enum EventError {
    #[from]
    DbError(db::Error),
    EventNotFound,
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        match self {
            Self::DbError(e) => Detail::from(e),
            Self::EventNotFound => Detail::not_found("Event not found"),
        }
        .into_response()
    }
}

async fn list_events(
    State(state): State<SharedAppState>,
) -> Result<Json<Vec<api::event::Event>>, EventError> {
    let events = state.db_client.get_events().await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

async fn get_event(
    State(state): State<SharedAppState>,
    Path(event_id): Path<i32>,
) -> Result<Json<api::event::Event>, EventError> {
    let event = state
        .db_client
        .get_event_by_id(event_id)
        .await?
        .ok_or(EventError::EventNotFound)?;
    Ok(Json(event.into()))
}
