use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use derive_more::From;
use time::{Date, OffsetDateTime};

use crate::{api, date, db};

use super::{offset, AdminClaims, Detail, Json, Path, Query, SharedAppState};

/// Number of movies shown in the revenue chart.
const TOP_MOVIES: i32 = 5;

pub(super) fn routes() -> Router<SharedAppState> {
    Router::new()
        .route("/admin/dashboard/primary", get(primary))
        .route("/admin/dashboard/regular/:branch_id", get(regular))
        .route(
            "/admin/dashboard/alerts/low-occupancy",
            get(low_occupancy_alerts),
        )
}

#[derive(Debug, From)]
pub enum DashboardError {
    #[from]
    DbError(db::Error),
    #[from]
    InvalidDate(date::InvalidDate),
    #[from]
    Detail(Detail),
    BranchNotFound,
}

impl DashboardError {
    /// Store routines scoped to a branch reject unknown ids with a message
    /// naming `Branch_id`.
    fn for_branch(err: db::Error) -> Self {
        match db::classify(&err) {
            db::Failure::Rejected(message) | db::Failure::NotFound(message)
                if message.contains("Branch_id") =>
            {
                Self::BranchNotFound
            }
            _ => Self::DbError(err),
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        match self {
            Self::DbError(e) => Detail::from(e),
            Self::InvalidDate(e) => Detail::bad_request(e.to_string()),
            Self::Detail(detail) => detail,
            Self::BranchNotFound => Detail::not_found("Branch not found"),
        }
        .into_response()
    }
}

fn month_of(date: Date) -> i32 {
    i32::from(u8::from(date.month()))
}

/// Chart series degrade to empty lists when the store can't produce them.
async fn charts(
    client: &db::Client,
    period: &db::dashboard::Period,
) -> api::dashboard::Charts {
    let top_movies = client
        .get_top_movies(period, TOP_MOVIES)
        .await
        .unwrap_or_else(|err| {
            tracing::warn!("top movies unavailable: {err}");
            Vec::new()
        });
    let revenue_trend =
        client.get_revenue_trend(period).await.unwrap_or_else(|err| {
            tracing::warn!("revenue trend unavailable: {err}");
            Vec::new()
        });

    api::dashboard::Charts {
        top_movies: top_movies.into_iter().map(Into::into).collect(),
        revenue_trend: revenue_trend.into_iter().map(Into::into).collect(),
    }
}

#[tracing::instrument(skip_all)]
async fn primary(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Query(range): Query<api::dashboard::DateRange>,
) -> Result<Json<api::dashboard::Primary>, DashboardError> {
    let (start, end) = range.resolve(OffsetDateTime::now_utc().date())?;
    let period = db::dashboard::Period {
        start,
        end,
        branch_id: None,
    };

    let client = &state.db_client;
    let (
        net_revenue,
        avg_receipt_value,
        total_admins,
        total_bookings,
        total_movies,
        occupancy_rate,
    ) = tokio::try_join!(
        client.get_net_revenue(&period),
        client.get_avg_receipt_value(&period),
        client.get_total_admins(),
        client.get_total_bookings(),
        client.get_movies_listed(),
        client.get_system_occupancy(month_of(start), start.year()),
    )?;

    Ok(Json(api::dashboard::Primary {
        period: (&period).into(),
        financials: api::dashboard::Financials {
            net_revenue,
            avg_receipt_value,
        },
        system_stats: api::dashboard::SystemStats {
            total_admins,
            total_bookings,
            total_movies,
            occupancy_rate,
        },
        charts: charts(client, &period).await,
    }))
}

#[tracing::instrument(skip_all, fields(branch_id = branch_id))]
async fn regular(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Path(branch_id): Path<i32>,
    Query(range): Query<api::dashboard::DateRange>,
) -> Result<Json<api::dashboard::Regular>, DashboardError> {
    let (start, end) = range.resolve(OffsetDateTime::now_utc().date())?;
    let period = db::dashboard::Period {
        start,
        end,
        branch_id: Some(branch_id),
    };

    let client = &state.db_client;
    let (net_revenue, occupancy_rate) = tokio::try_join!(
        client.get_net_revenue(&period),
        client.get_branch_occupancy(branch_id, start.year(), month_of(start)),
    )
    .map_err(DashboardError::for_branch)?;

    Ok(Json(api::dashboard::Regular {
        branch_id,
        period: (&period).into(),
        stats: api::dashboard::BranchStats {
            net_revenue,
            occupancy_rate,
        },
        charts: charts(client, &period).await,
    }))
}

async fn low_occupancy_alerts(
    State(state): State<SharedAppState>,
    _: AdminClaims,
    Query(alerts): Query<api::dashboard::AlertsQuery>,
    Query(paging): Query<api::Paging>,
) -> Result<Json<api::Page<api::dashboard::LowOccupancy>>, DashboardError> {
    let (rows, total) = state
        .db_client
        .get_low_occupancy_alerts(&db::dashboard::LowOccupancyQuery {
            month: alerts.month,
            year: alerts.year,
            threshold: alerts.threshold,
            branch_id: alerts.branch_id,
            offset: offset(&paging)?,
            limit: paging.limit,
        })
        .await?;

    Ok(Json(api::Page {
        data: rows.into_iter().map(Into::into).collect(),
        total,
        page: paging.page,
        limit: paging.limit,
    }))
}
