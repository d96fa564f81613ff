use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use derive_more::From;

use crate::{api, db};

use super::{offset, Detail, Json, Path, Query, SharedAppState};

pub(super) fn routes() -> Router<SharedAppState> {
    Router::new()
        .route("/branches", get(search_branches).post(create_branch))
        .route(
            "/branches/:branch_id",
            get(get_branch).put(update_branch).delete(delete_branch),
        )
        .route("/branches/:branch_id/halls", get(list_halls).post(create_hall))
        .route(
            "/branches/:branch_id/halls/:hall_number",
            put(update_hall).delete(delete_hall),
        )
}

#[derive(Debug, From)]
pub enum BranchError {
    #[from]
    DbError(db::Error),
    #[from]
    Detail(Detail),
    BranchNotFound,
    UnknownSortColumn,
    UnknownSortOrder,
}

impl IntoResponse for BranchError {
    fn into_response(self) -> Response {
        match self {
            Self::DbError(e) => Detail::from(e),
            Self::Detail(d) => d,
            Self::BranchNotFound => Detail::not_found("Branch not found"),
            Self::UnknownSortColumn => Detail::bad_request(
                "sort_by must be one of branch_id, name, city, address",
            ),
            Self::UnknownSortOrder => {
                Detail::bad_request("order must be ASC or DESC")
            }
        }
        .into_response()
    }
}

async fn search_branches(
    State(state): State<SharedAppState>,
    Query(search): Query<api::branch::Search>,
    Query(paging): Query<api::Paging>,
) -> Result<Json<api::Page<api::branch::Branch>>, BranchError> {
    let sort_by = search
        .sort_by
        .as_deref()
        .map(str::parse::<db::branch::SortColumn>)
        .transpose()
        .map_err(|()| BranchError::UnknownSortColumn)?
        .unwrap_or_default();
    let order = search
        .order
        .as_deref()
        .map(str::parse::<db::branch::SortOrder>)
        .transpose()
        .map_err(|()| BranchError::UnknownSortOrder)?
        .unwrap_or_default();

    let (branches, total) = state
        .db_client
        .search_branches(&db::branch::Search {
            text: search.search.filter(|s| !s.is_empty()),
            sort_by,
            order,
            offset: offset(&paging)?,
            limit: paging.limit,
        })
        .await?;

    Ok(Json(api::Page {
        data: branches.into_iter().map(Into::into).collect(),
        total,
        page: paging.page,
        limit: paging.limit,
    }))
}

async fn get_branch(
    State(state): State<SharedAppState>,
    Path(branch_id): Path<i32>,
) -> Result<Json<api::branch::Detail>, BranchError> {
    let branch = state
        .db_client
        .get_branch_by_id(branch_id)
        .await?
        .ok_or(BranchError::BranchNotFound)?;
    let showings = state.db_client.get_branch_showings(branch_id).await?;

    Ok(Json(api::branch::Detail {
        branch: branch.into(),
        movies: api::branch::group_showings(showings),
    }))
}

async fn create_branch(
    State(state): State<SharedAppState>,
    Json(input): Json<api::branch::BranchInput>,
) -> Result<Json<api::branch::Branch>, BranchError> {
    let branch = state
        .db_client
        .create_branch(&input.into())
        .await?
        .ok_or(BranchError::BranchNotFound)?;
    tracing::info!(branch_id = branch.id, "branch created");
    Ok(Json(branch.into()))
}

async fn update_branch(
    State(state): State<SharedAppState>,
    Path(branch_id): Path<i32>,
    Json(input): Json<api::branch::BranchInput>,
) -> Result<Json<api::branch::Branch>, BranchError> {
    let branch = state
        .db_client
        .update_branch(branch_id, &input.into())
        .await?
        .ok_or(BranchError::BranchNotFound)?;
    Ok(Json(branch.into()))
}

async fn delete_branch(
    State(state): State<SharedAppState>,
    Path(branch_id): Path<i32>,
) -> Result<Json<api::Message>, BranchError> {
    state.db_client.delete_branch(branch_id).await?;
    Ok(Json(api::Message::new("Branch deleted successfully")))
}

async fn list_halls(
    State(state): State<SharedAppState>,
    Path(branch_id): Path<i32>,
) -> Result<Json<Vec<api::branch::Hall>>, BranchError> {
    let halls = state.db_client.get_halls_by_branch(branch_id).await?;
    Ok(Json(halls.into_iter().map(Into::into).collect()))
}

async fn create_hall(
    State(state): State<SharedAppState>,
    Path(branch_id): Path<i32>,
    Json(hall): Json<api::branch::Hall>,
) -> Result<Json<api::branch::Hall>, BranchError> {
    state
        .db_client
        .create_hall(branch_id, &hall.clone().into())
        .await?;
    Ok(Json(hall))
}

async fn update_hall(
    State(state): State<SharedAppState>,
    Path((branch_id, hall_number)): Path<(i32, i32)>,
    Json(hall): Json<api::branch::Hall>,
) -> Result<Json<api::branch::Hall>, BranchError> {
    let hall = api::branch::Hall {
        hall_number,
        ..hall
    };
    state
        .db_client
        .update_hall(branch_id, &hall.clone().into())
        .await?;
    Ok(Json(hall))
}

async fn delete_hall(
    State(state): State<SharedAppState>,
    Path((branch_id, hall_number)): Path<(i32, i32)>,
) -> Result<Json<api::Message>, BranchError> {
    state.db_client.delete_hall(branch_id, hall_number).await?;
    Ok(Json(api::Message::new("Hall deleted successfully")))
}
