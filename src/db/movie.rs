use time::{Date, Time};
use tokio_postgres::{types::ToSql, Error, Row};

use super::{split_list, Client};

#[derive(Clone, Debug)]
pub struct Movie {
    pub id: i32,
    pub director: String,
    pub title: String,
    pub image: Option<String>,
    pub release_date: Option<Date>,
    pub language: String,
    pub age_rating: String,
    pub duration: Option<i32>,
    pub description: Option<String>,
    pub actors: Vec<String>,
    pub formats: Vec<String>,
    pub subtitles: Vec<String>,
    pub genres: Vec<String>,
}

/// Fields an admin submits when creating or updating a movie.
///
/// Multi-valued attributes travel as `", "`-joined strings; the store splits
/// them into its satellite tables.
#[derive(Clone, Debug)]
pub struct MovieInput {
    pub director: String,
    pub title: String,
    pub image: Option<String>,
    pub release_date: Date,
    pub language: String,
    pub age_rating: String,
    pub duration: Option<i32>,
    pub description: Option<String>,
    pub admin_id: i32,
    pub actor: Option<String>,
    pub format: Option<String>,
    pub subtitle: Option<String>,
    pub genres: Option<String>,
}

/// Showtime as reported by the store's showtime lookups.
#[derive(Clone, Debug)]
pub struct Showing {
    pub showtime_id: i32,
    pub movie_title: String,
    pub date: Date,
    pub start_time: Time,
    pub format: String,
    pub subtitle: String,
    pub branch_id: i32,
    pub branch_name: String,
    pub branch_address: String,
    pub hall_number: i32,
    pub hall_type: String,
}

#[derive(Clone, Debug)]
pub struct Review {
    pub customer_name: String,
    pub rating: f64,
    pub comment: Option<String>,
    pub review_date: Date,
}

#[derive(Clone, Debug)]
pub struct Seat {
    pub seat_number: String,
    pub seat_type: String,
    pub status: String,
}

#[derive(Default)]
pub struct Filter {
    pub language: Option<String>,
    pub age_rating: Option<String>,
    pub search: Option<String>,
}

macro_rules! select_movies {
    () => {
        "SELECT m.movie_id, m.director, m.title, m.image, m.release_date, \
                m.language, m.age_rating, m.duration, m.description, \
                (SELECT string_agg(ma.actor, ', ' ORDER BY ma.actor) \
                 FROM movie_actor ma \
                 WHERE ma.movie_id = m.movie_id) AS actors, \
                (SELECT string_agg(mf.format, ', ' ORDER BY mf.format) \
                 FROM movie_format mf \
                 WHERE mf.movie_id = m.movie_id) AS formats, \
                (SELECT string_agg(ms.subtitle, ', ' ORDER BY ms.subtitle) \
                 FROM movie_subtitle ms \
                 WHERE ms.movie_id = m.movie_id) AS subtitles, \
                (SELECT string_agg(mg.genre, ', ' ORDER BY mg.genre) \
                 FROM movie_genre mg \
                 WHERE mg.movie_id = m.movie_id) AS genres \
         FROM movie m "
    };
}

fn movie_from_row(row: &Row) -> Movie {
    Movie {
        id: row.get("movie_id"),
        director: row.get("director"),
        title: row.get("title"),
        image: row.get("image"),
        release_date: row.get("release_date"),
        language: row.get("language"),
        age_rating: row.get("age_rating"),
        duration: row.get("duration"),
        description: row.get("description"),
        actors: split_list(row.get("actors")),
        formats: split_list(row.get("formats")),
        subtitles: split_list(row.get("subtitles")),
        genres: split_list(row.get("genres")),
    }
}

fn showing_from_row(row: &Row) -> Showing {
    Showing {
        showtime_id: row.get("showtime_id"),
        movie_title: row.get("movie_title"),
        date: row.get("date"),
        start_time: row.get("start_time"),
        format: row.get("format"),
        subtitle: row.get("subtitle"),
        branch_id: row.get("branch_id"),
        branch_name: row.get("branch_name"),
        branch_address: row.get("branch_address"),
        hall_number: row.get("hall_number"),
        hall_type: row.get("hall_type"),
    }
}

impl Client {
    pub async fn get_movies(&self, filter: &Filter) -> Result<Vec<Movie>, Error> {
        let search = filter.search.as_ref().map(|s| format!("%{s}%"));

        let mut sql = String::from(concat!(select_movies!(), "WHERE TRUE"));
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();
        if let Some(language) = &filter.language {
            params.push(language);
            sql.push_str(&format!(" AND m.language = ${}", params.len()));
        }
        if let Some(age_rating) = &filter.age_rating {
            params.push(age_rating);
            sql.push_str(&format!(" AND m.age_rating = ${}", params.len()));
        }
        if let Some(search) = &search {
            params.push(search);
            sql.push_str(&format!(" AND m.title ILIKE ${}", params.len()));
        }
        sql.push_str(" ORDER BY m.movie_id ASC");

        Ok(self
            .shared()
            .await
            .query(&sql, &params)
            .await?
            .iter()
            .map(movie_from_row)
            .collect())
    }

    pub async fn get_movie_by_id(&self, id: i32) -> Result<Option<Movie>, Error> {
        const SQL: &str = concat!(select_movies!(), "WHERE m.movie_id = $1");
        Ok(self
            .shared()
            .await
            .query_opt(SQL, &[&id])
            .await?
            .as_ref()
            .map(movie_from_row))
    }

    /// Movies screened at the branch.
    pub async fn get_movies_by_branch(
        &self,
        branch_id: i32,
    ) -> Result<Vec<Movie>, Error> {
        const SQL: &str = concat!(
            select_movies!(),
            "JOIN screen s ON s.movie_id = m.movie_id \
             WHERE s.branch_id = $1 \
             ORDER BY m.movie_id",
        );
        Ok(self
            .shared()
            .await
            .query(SQL, &[&branch_id])
            .await?
            .iter()
            .map(movie_from_row)
            .collect())
    }

    /// Movies the branch doesn't screen yet.
    pub async fn get_movies_not_in_branch(
        &self,
        branch_id: i32,
    ) -> Result<Vec<Movie>, Error> {
        const SQL: &str = concat!(
            select_movies!(),
            "WHERE m.movie_id NOT IN (\
                 SELECT movie_id FROM screen WHERE branch_id = $1\
             ) \
             ORDER BY m.movie_id",
        );
        Ok(self
            .shared()
            .await
            .query(SQL, &[&branch_id])
            .await?
            .iter()
            .map(movie_from_row)
            .collect())
    }

    pub async fn get_movie_showings(
        &self,
        movie_id: i32,
    ) -> Result<Vec<Showing>, Error> {
        const SQL: &str = "SELECT * FROM get_movie_showtimes($1)";
        Ok(self
            .shared()
            .await
            .query(SQL, &[&movie_id])
            .await?
            .iter()
            .map(showing_from_row)
            .collect())
    }

    pub async fn get_showing(
        &self,
        movie_id: i32,
        showtime_id: i32,
    ) -> Result<Option<Showing>, Error> {
        const SQL: &str = "SELECT * FROM get_showtime_info($1, $2)";
        Ok(self
            .shared()
            .await
            .query_opt(SQL, &[&movie_id, &showtime_id])
            .await?
            .as_ref()
            .map(showing_from_row))
    }

    /// Reviews of the movie, optionally limited to one spoiler tag.
    pub async fn get_movie_reviews(
        &self,
        movie_id: i32,
        tag: Option<&str>,
    ) -> Result<Vec<Review>, Error> {
        const SQL: &str = "\
            SELECT customer_name, rating::FLOAT8 AS rating, \
                   comment, review_date \
            FROM get_movie_reviews($1, $2)";
        Ok(self
            .shared()
            .await
            .query(SQL, &[&movie_id, &tag])
            .await?
            .into_iter()
            .map(|row| Review {
                customer_name: row.get("customer_name"),
                rating: row.get("rating"),
                comment: row.get("comment"),
                review_date: row.get("review_date"),
            })
            .collect())
    }

    pub async fn get_showtime_seats(
        &self,
        movie_id: i32,
        showtime_id: i32,
    ) -> Result<Vec<Seat>, Error> {
        const SQL: &str = "\
            SELECT seat_number, seat_type, status \
            FROM get_showtime_seats($1, $2)";
        Ok(self
            .shared()
            .await
            .query(SQL, &[&movie_id, &showtime_id])
            .await?
            .into_iter()
            .map(|row| Seat {
                seat_number: row.get("seat_number"),
                seat_type: row.get("seat_type"),
                status: row.get("status"),
            })
            .collect())
    }

    pub async fn create_movie(&self, movie: &MovieInput) -> Result<(), Error> {
        const SQL: &str = "\
            CALL create_movie($1, $2, $3, $4, $5, $6, $7, \
                              $8, $9, $10, $11, $12, $13)";
        self.shared()
            .await
            .execute(
                SQL,
                &[
                    &movie.director,
                    &movie.title,
                    &movie.image,
                    &movie.release_date,
                    &movie.language,
                    &movie.age_rating,
                    &movie.duration,
                    &movie.description,
                    &movie.admin_id,
                    &movie.actor,
                    &movie.format,
                    &movie.subtitle,
                    &movie.genres,
                ],
            )
            .await
            .map(drop)
    }

    pub async fn update_movie(
        &self,
        id: i32,
        movie: &MovieInput,
    ) -> Result<(), Error> {
        const SQL: &str = "\
            CALL update_movie($1, $2, $3, $4, $5, $6, $7, \
                              $8, $9, $10, $11, $12, $13, $14)";
        self.shared()
            .await
            .execute(
                SQL,
                &[
                    &id,
                    &movie.director,
                    &movie.title,
                    &movie.image,
                    &movie.release_date,
                    &movie.language,
                    &movie.age_rating,
                    &movie.duration,
                    &movie.description,
                    &movie.admin_id,
                    &movie.actor,
                    &movie.format,
                    &movie.subtitle,
                    &movie.genres,
                ],
            )
            .await
            .map(drop)
    }

    /// Starts screening the movie at the branch.
    pub async fn create_screen(
        &self,
        branch_id: i32,
        movie_id: i32,
    ) -> Result<(), Error> {
        const SQL: &str = "CALL create_screen($1, $2)";
        self.shared()
            .await
            .execute(SQL, &[&branch_id, &movie_id])
            .await
            .map(drop)
    }

    pub async fn delete_screen(
        &self,
        branch_id: i32,
        movie_id: i32,
    ) -> Result<(), Error> {
        const SQL: &str = "CALL delete_screen($1, $2)";
        self.shared()
            .await
            .execute(SQL, &[&branch_id, &movie_id])
            .await
            .map(drop)
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn list_columns_aggregate_in_sorted_order() {
        let sql = select_movies!();
        for column in ["ma.actor", "mf.format", "ms.subtitle", "mg.genre"] {
            assert!(
                sql.contains(&format!(
                    "string_agg({column}, ', ' ORDER BY {column})"
                )),
                "{column}",
            );
        }
        assert!(!sql.contains("', ')"));
    }
}
