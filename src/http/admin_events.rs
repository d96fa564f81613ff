use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use derive_more::From;

use crate::{api, date, db};

use super::{AdminClaims, Detail, Json, Path, SharedAppState};

pub(super) fn routes() -> Router<SharedAppState> {
    Router::new()
        .route("/admin/events/create", post(create_event))
        .route("/admin/events/update/:event_id", put(update_event))
        .route("/admin/events/delete/:event_id", delete(delete_event))
        .route("/admin/events/all", get(list_events))
        .route("/admin/events/:event_id", get(get_event))
}

#[derive(Debug, From)]
pub enum AdminEventError {
    #[from]
    DbError(db::Error),
    #[from]
    InvalidDate(date::InvalidDate),
    EventNotFound,
}

impl IntoResponse for AdminEventError {
    fn into_response(self) -> Response {
        match self {
            Self::DbError(e) => Detail::from(e),
            Self::InvalidDate(e) => Detail::bad_request(e.to_string()),
            Self::EventNotFound => Detail::not_found("Event not found"),
        }
        .into_response()
    }
}

async fn create_event(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Json(input): Json<api::event::EventInput>,
) -> Result<Json<api::event::Created>, AdminEventError> {
    let event = input.into_db()?;
    state.db_client.create_event(&event).await?;
    Ok(Json(api::event::Created {
        message: "Event created successfully".to_owned(),
        title: event.title,
    }))
}

async fn update_event(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Path(event_id): Path<i32>,
    Json(input): Json<api::event::EventInput>,
) -> Result<Json<api::Message>, AdminEventError> {
    let event = input.into_db()?;
    state.db_client.update_event(event_id, &event).await?;
    Ok(Json(api::Message::new("Event updated successfully")))
}

async fn delete_event(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Path(event_id): Path<i32>,
) -> Result<Json<api::event::Deleted>, AdminEventError> {
    state.db_client.delete_event(event_id).await?;
    Ok(Json(api::event::Deleted {
        message: "Event deleted successfully".to_owned(),
        event_id,
    }))
}

async fn list_events(
    State(state): State<SharedAppState>,
    _: AdminClaims,
) -> Result<Json<Vec<api::event::AdminEvent>>, AdminEventError> {
    let events = state.db_client.get_events_by_start().await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

async fn get_event(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Path(event_id): Path<i32>,
) -> Result<Json<api::event::AdminEvent>, AdminEventError> {
    let event = state
        .db_client
        .get_event_by_id(event_id)
        .await?
        .ok_or(AdminEventError::EventNotFound)?;
    Ok(Json(event.into()))
}
