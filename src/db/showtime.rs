use time::{Date, Time};
use tokio_postgres::Error;

use super::{Client, Transaction};

#[derive(Clone, Debug)]
pub struct Showtime {
    pub id: i32,
    pub movie_id: i32,
    pub title: String,
    pub start_time: Time,
    pub date: Date,
    pub format: String,
    pub subtitle: String,
    pub hall_number: i32,
}

#[derive(Clone, Debug)]
pub struct ShowtimeInput {
    pub movie_id: i32,
    pub start_time: Time,
    pub date: Date,
    pub format: String,
    pub subtitle: String,
    pub hall_number: i32,
}

/// Partial update; absent fields keep their stored values.
#[derive(Clone, Debug, Default)]
pub struct ShowtimePatch {
    pub movie_id: Option<i32>,
    pub start_time: Option<Time>,
    pub date: Option<Date>,
    pub format: Option<String>,
    pub subtitle: Option<String>,
    pub hall_number: Option<i32>,
}

impl Client {
    pub async fn get_showtimes_by_branch(
        &self,
        branch_id: i32,
    ) -> Result<Vec<Showtime>, Error> {
        const SQL: &str = "\
            SELECT s.showtime_id, s.movie_id, m.title, s.start_time, \
                   s.date, s.format, s.subtitle, s.hall_number \
            FROM showtime s \
            JOIN movie m ON s.movie_id = m.movie_id \
            WHERE s.branch_id = $1 \
            ORDER BY s.date, s.start_time";
        Ok(self
            .shared()
            .await
            .query(SQL, &[&branch_id])
            .await?
            .into_iter()
            .map(|row| Showtime {
                id: row.get("showtime_id"),
                movie_id: row.get("movie_id"),
                title: row.get("title"),
                start_time: row.get("start_time"),
                date: row.get("date"),
                format: row.get("format"),
                subtitle: row.get("subtitle"),
                hall_number: row.get("hall_number"),
            })
            .collect())
    }

    pub async fn create_showtime(
        &self,
        branch_id: i32,
        showtime: &ShowtimeInput,
    ) -> Result<(), Error> {
        const SQL: &str = "CALL create_showtime($1, $2, $3, $4, $5, $6, $7)";
        self.shared()
            .await
            .execute(
                SQL,
                &[
                    &showtime.movie_id,
                    &showtime.start_time,
                    &showtime.date,
                    &showtime.format,
                    &showtime.subtitle,
                    &branch_id,
                    &showtime.hall_number,
                ],
            )
            .await
            .map(drop)
    }

    pub async fn update_showtime(
        &self,
        branch_id: i32,
        showtime_id: i32,
        patch: &ShowtimePatch,
    ) -> Result<(), Error> {
        const SQL: &str =
            "CALL update_showtime($1, $2, $3, $4, $5, $6, $7, $8)";
        self.shared()
            .await
            .execute(
                SQL,
                &[
                    &showtime_id,
                    &patch.movie_id,
                    &patch.start_time,
                    &patch.date,
                    &patch.format,
                    &patch.subtitle,
                    &branch_id,
                    &patch.hall_number,
                ],
            )
            .await
            .map(drop)
    }
}

/// Deletes the showtime if it belongs to the branch.
///
/// Returns `false` without touching anything otherwise.
pub async fn delete_showtime_in_branch(
    tx: &Transaction<'_>,
    branch_id: i32,
    movie_id: i32,
    showtime_id: i32,
) -> Result<bool, Error> {
    const CHECK_SQL: &str = "\
        SELECT 1 FROM showtime \
        WHERE showtime_id = $1 AND movie_id = $2 AND branch_id = $3 \
        FOR UPDATE";
    const DELETE_SQL: &str = "CALL delete_showtime($1, $2)";

    let exists = tx
        .query_opt(CHECK_SQL, &[&showtime_id, &movie_id, &branch_id])
        .await?
        .is_some();
    if !exists {
        return Ok(false);
    }
    tx.execute(DELETE_SQL, &[&movie_id, &showtime_id]).await?;
    Ok(true)
}
