use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use derive_more::From;
use time::OffsetDateTime;

use crate::{api, db, spoiler};

use super::{Detail, Json, Path, Query, SharedAppState};

const SPOILER_WARNING: &str = "Comment submitted may contains spoilers, \
    please remove spoiler content or change spoiler tag.";

pub(super) fn routes() -> Router<SharedAppState> {
    Router::new()
        .route("/movies", get(list_movies))
        .route("/movies/:movie_id", get(get_movie))
        .route("/movies/:movie_id/reviews", post(create_review))
        .route("/movies/:movie_id/:showtime_id", get(get_booking_page))
}

#[derive(Debug, From)]
pub enum MovieError {
    #[from]
    DbError(db::Error),
    #[from]
    Classifier(spoiler::Error),
    MovieNotFound,
    ShowtimeNotFound,
}

impl IntoResponse for MovieError {
    fn into_response(self) -> Response {
        match self {
            Self::DbError(e) => Detail::from(e),
            Self::Classifier(e) => {
                tracing::error!("spoiler check failed: {e}");
                Detail::internal(e.to_string())
            }
            Self::MovieNotFound => Detail::not_found("Movie not found"),
            Self::ShowtimeNotFound => Detail::not_found("Showtime not found"),
        }
        .into_response()
    }
}

async fn list_movies(
    State(state): State<SharedAppState>,
    Query(filter): Query<api::movie::Filter>,
) -> Result<Json<Vec<api::Movie>>, MovieError> {
    let filter = db::movie::Filter {
        language: filter.language,
        age_rating: filter.age_rating,
        search: filter.search,
    };
    let movies = state.db_client.get_movies(&filter).await?;
    Ok(Json(movies.into_iter().map(Into::into).collect()))
}

async fn get_movie(
    State(state): State<SharedAppState>,
    Path(movie_id): Path<i32>,
    Query(filter): Query<api::movie::ReviewFilter>,
) -> Result<Json<api::movie::Detail>, MovieError> {
    let store = &state.db_client;
    let movie = store
        .get_movie_by_id(movie_id)
        .await?
        .ok_or(MovieError::MovieNotFound)?;
    let showtimes = store.get_movie_showings(movie_id).await?;
    let reviews = store
        .get_movie_reviews(movie_id, filter.tag.as_deref())
        .await?;

    Ok(Json(api::movie::Detail {
        movie: movie.into(),
        showtimes: showtimes.into_iter().map(Into::into).collect(),
        reviews: reviews.into_iter().map(Into::into).collect(),
    }))
}

async fn get_booking_page(
    State(state): State<SharedAppState>,
    Path((movie_id, showtime_id)): Path<(i32, i32)>,
) -> Result<Json<api::movie::BookingPage>, MovieError> {
    let store = &state.db_client;
    let movie = store
        .get_movie_by_id(movie_id)
        .await?
        .ok_or(MovieError::MovieNotFound)?;
    let showtime = store
        .get_showing(movie_id, showtime_id)
        .await?
        .ok_or(MovieError::ShowtimeNotFound)?;
    let (seats, products) = tokio::try_join!(
        store.get_showtime_seats(movie_id, showtime_id),
        store.get_products(),
    )?;

    Ok(Json(api::movie::BookingPage {
        movie: api::movie::MovieShort {
            movie_id: movie.id,
            title: movie.title,
            image: movie.image,
            duration: movie.duration,
        },
        showtime: showtime.into(),
        seats: seats.into_iter().map(Into::into).collect(),
        products: products.into_iter().map(Into::into).collect(),
    }))
}

async fn create_review(
    State(state): State<SharedAppState>,
    Path(movie_id): Path<i32>,
    Json(review): Json<api::movie::NewReview>,
) -> Result<Json<api::movie::ReviewOutcome>, MovieError> {
    if review.spoiler == "non_spoiler" {
        let text = review.comment.as_deref().unwrap_or_default();
        let verdict = state.classifier.classify(text).await?;
        if !spoiler::is_non_spoiler(&verdict, state.spoiler_threshold) {
            tracing::info!(
                movie_id,
                customer_id = review.customer_id,
                label = %verdict.label,
                score = verdict.score,
                "review rejected as a possible spoiler",
            );
            return Ok(Json(api::movie::ReviewOutcome {
                result: false,
                message: SPOILER_WARNING.to_owned(),
            }));
        }
    }

    state
        .db_client
        .create_review(&db::review::NewReview {
            movie_id,
            customer_id: review.customer_id,
            rating: review.rating,
            date: OffsetDateTime::now_utc().date(),
            comment: review.comment,
            spoiler: review.spoiler,
        })
        .await?;

    Ok(Json(api::movie::ReviewOutcome {
        result: true,
        message: "Review created successfully".to_owned(),
    }))
}
