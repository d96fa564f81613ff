use tokio_postgres::Error;

use super::Client;

#[derive(Clone, Debug)]
pub struct MoodCount {
    pub mood_id: i32,
    pub mood_name: String,
    pub count: i64,
}

impl Client {
    /// Adds the customer's vote for the mood, or takes it back if it was
    /// already cast.
    pub async fn vote_mood(
        &self,
        movie_id: i32,
        customer_id: i32,
        mood_id: i32,
    ) -> Result<(), Error> {
        const SQL: &str = "CALL vote_mood($1, $2, $3)";
        self.shared()
            .await
            .execute(SQL, &[&movie_id, &customer_id, &mood_id])
            .await
            .map(drop)
    }

    /// Votes per mood for the movie; moods nobody picked count zero.
    pub async fn get_mood_counts(
        &self,
        movie_id: i32,
    ) -> Result<Vec<MoodCount>, Error> {
        const SQL: &str = "\
            SELECT m.mood_id, m.mood_name, COUNT(v.mood_id) AS count \
            FROM mood m \
            LEFT JOIN vote v ON m.mood_id = v.mood_id AND v.movie_id = $1 \
            GROUP BY m.mood_id, m.mood_name \
            ORDER BY m.mood_id";
        Ok(self
            .shared()
            .await
            .query(SQL, &[&movie_id])
            .await?
            .into_iter()
            .map(|row| MoodCount {
                mood_id: row.get("mood_id"),
                mood_name: row.get("mood_name"),
                count: row.get("count"),
            })
            .collect())
    }
}
