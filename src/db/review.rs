use time::Date;
use tokio_postgres::Error;

use super::Client;

#[derive(Clone, Debug)]
pub struct NewReview {
    pub movie_id: i32,
    pub customer_id: i32,
    pub rating: f64,
    pub date: Date,
    pub comment: Option<String>,
    pub spoiler: String,
}

impl Client {
    pub async fn create_review(&self, review: &NewReview) -> Result<(), Error> {
        const SQL: &str = "\
            CALL create_review($1, $2, $3::FLOAT8::NUMERIC, $4, $5, $6)";
        self.shared()
            .await
            .execute(
                SQL,
                &[
                    &review.movie_id,
                    &review.customer_id,
                    &review.rating,
                    &review.date,
                    &review.comment,
                    &review.spoiler,
                ],
            )
            .await
            .map(drop)
    }
}
