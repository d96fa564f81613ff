use serde::{Deserialize, Serialize};

use crate::{date, db};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Movie {
    #[serde(rename = "Movie_id")]
    pub movie_id: i32,
    pub director: String,
    pub title: String,
    pub image: Option<String>,
    #[serde(rename = "Release_date")]
    pub release_date: Option<String>,
    pub language: String,
    #[serde(rename = "Age_rating")]
    pub age_rating: String,
    pub duration: Option<i32>,
    pub description: Option<String>,
    pub actors: Vec<String>,
    pub formats: Vec<String>,
    pub subtitles: Vec<String>,
    pub genres: Vec<String>,
}

impl From<db::movie::Movie> for Movie {
    fn from(m: db::movie::Movie) -> Self {
        Self {
            movie_id: m.id,
            director: m.director,
            title: m.title,
            image: m.image,
            release_date: m.release_date.map(date::format_dmy),
            language: m.language,
            age_rating: m.age_rating,
            duration: m.duration,
            description: m.description,
            actors: m.actors,
            formats: m.formats,
            subtitles: m.subtitles,
            genres: m.genres,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Showtime {
    #[serde(rename = "Showtime_id")]
    pub showtime_id: i32,
    #[serde(rename = "Movie_title")]
    pub movie_title: String,
    pub date: String,
    #[serde(rename = "Start_time")]
    pub start_time: String,
    pub format: String,
    pub subtitle: String,
    #[serde(rename = "Branch_id")]
    pub branch_id: i32,
    #[serde(rename = "Branch_name")]
    pub branch_name: String,
    #[serde(rename = "Branch_address")]
    pub branch_address: String,
    #[serde(rename = "Hall_number")]
    pub hall_number: i32,
    #[serde(rename = "Hall_type")]
    pub hall_type: String,
}

impl From<db::movie::Showing> for Showtime {
    fn from(s: db::movie::Showing) -> Self {
        Self {
            showtime_id: s.showtime_id,
            movie_title: s.movie_title,
            date: date::format_dmy(s.date),
            start_time: date::format_hm(s.start_time),
            format: s.format,
            subtitle: s.subtitle,
            branch_id: s.branch_id,
            branch_name: s.branch_name,
            branch_address: s.branch_address,
            hall_number: s.hall_number,
            hall_type: s.hall_type,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Review {
    #[serde(rename = "Customer_name")]
    pub customer_name: String,
    pub rating: f64,
    pub comment: Option<String>,
    #[serde(rename = "Review_date")]
    pub review_date: String,
}

impl From<db::movie::Review> for Review {
    fn from(r: db::movie::Review) -> Self {
        Self {
            customer_name: r.customer_name,
            rating: r.rating,
            comment: r.comment,
            review_date: date::format_dmy(r.review_date),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Detail {
    pub movie: Movie,
    pub showtimes: Vec<Showtime>,
    pub reviews: Vec<Review>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MovieShort {
    #[serde(rename = "Movie_id")]
    pub movie_id: i32,
    pub title: String,
    pub image: Option<String>,
    pub duration: Option<i32>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Seat {
    #[serde(rename = "Seat_number")]
    pub seat_number: String,
    #[serde(rename = "Seat_type")]
    pub seat_type: String,
    pub status: String,
}

impl From<db::movie::Seat> for Seat {
    fn from(s: db::movie::Seat) -> Self {
        Self {
            seat_number: s.seat_number,
            seat_type: s.seat_type,
            status: s.status,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Product {
    #[serde(rename = "Product_id")]
    pub product_id: i32,
    pub name: String,
    pub price: Option<f64>,
    pub description: Option<String>,
}

impl From<db::product::Product> for Product {
    fn from(p: db::product::Product) -> Self {
        Self {
            product_id: p.id,
            name: p.name,
            price: p.price,
            description: p.description,
        }
    }
}

/// Everything needed to pick seats and extras for one showtime.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BookingPage {
    pub movie: MovieShort,
    pub showtime: Showtime,
    pub seats: Vec<Seat>,
    pub products: Vec<Product>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Filter {
    pub language: Option<String>,
    pub age_rating: Option<String>,
    pub search: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ReviewFilter {
    pub tag: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewReview {
    pub customer_id: i32,
    pub rating: f64,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default = "spoiler_tag")]
    pub spoiler: String,
}

fn spoiler_tag() -> String {
    "spoiler".to_owned()
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ReviewOutcome {
    pub result: bool,
    pub message: String,
}

/// Movie as listed in admin views, keyed in snake case.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AdminMovie {
    pub movie_id: i32,
    pub title: String,
    pub director: Option<String>,
    pub release_date: Option<String>,
    pub language: Option<String>,
    pub age_rating: Option<String>,
    pub duration: Option<i32>,
    pub description: Option<String>,
    pub actors: Vec<String>,
    pub formats: Vec<String>,
    pub subtitles: Vec<String>,
    pub genres: Vec<String>,
}

impl AdminMovie {
    /// Builds the admin view, rendering the release date with `format`.
    pub fn new(m: db::movie::Movie, format: fn(time::Date) -> String) -> Self {
        Self {
            movie_id: m.id,
            title: m.title,
            director: Some(m.director),
            release_date: m.release_date.map(format),
            language: Some(m.language),
            age_rating: Some(m.age_rating),
            duration: m.duration,
            description: m.description,
            actors: m.actors,
            formats: m.formats,
            subtitles: m.subtitles,
            genres: m.genres,
        }
    }
}

/// Movie fields submitted by an admin.
///
/// Actors, formats, subtitles and genres are `", "`-joined.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MovieInput {
    pub director: String,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    /// `DD/MM/YYYY`.
    pub release_date: String,
    pub language: String,
    pub age_rating: String,
    #[serde(default)]
    pub duration: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    pub admin_id: i32,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub genres: Option<String>,
}

impl MovieInput {
    pub fn into_db(self) -> Result<db::movie::MovieInput, date::InvalidDate> {
        Ok(db::movie::MovieInput {
            release_date: date::parse_dmy(&self.release_date)?,
            director: self.director,
            title: self.title,
            image: self.image.map(|image| image.replace(' ', "_")),
            language: self.language,
            age_rating: self.age_rating,
            duration: self.duration,
            description: self.description,
            admin_id: self.admin_id,
            actor: self.actor,
            format: self.format,
            subtitle: self.subtitle,
            genres: self.genres,
        })
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, time};

    use super::*;

    #[test]
    fn serializes_with_front_end_keys() {
        let movie = Movie::from(db::movie::Movie {
            id: 5,
            director: "Robert Zemeckis".into(),
            title: "Forrest Gump".into(),
            image: None,
            release_date: Some(date!(1994 - 07 - 06)),
            language: "English".into(),
            age_rating: "T13".into(),
            duration: Some(142),
            description: None,
            actors: vec!["Tom Hanks".into(), "Robin Wright".into()],
            formats: vec![],
            subtitles: vec!["Vietnamese".into()],
            genres: vec!["Drama".into()],
        });

        let json = serde_json::to_value(&movie).unwrap();
        assert_eq!(json["Movie_id"], 5);
        assert_eq!(json["Release_date"], "06/07/1994");
        assert_eq!(json["Age_rating"], "T13");
        assert_eq!(json["Actors"], serde_json::json!(["Tom Hanks", "Robin Wright"]));
        assert_eq!(json["Formats"], serde_json::json!([]));
    }

    #[test]
    fn showtime_start_is_hours_and_minutes() {
        let showtime = Showtime::from(db::movie::Showing {
            showtime_id: 2,
            movie_title: "Forrest Gump".into(),
            date: date!(2025 - 11 - 23),
            start_time: time!(10:00),
            format: "2D".into(),
            subtitle: "Vietnamese".into(),
            branch_id: 1,
            branch_name: "Central".into(),
            branch_address: "1 Main St".into(),
            hall_number: 1,
            hall_type: "Standard".into(),
        });
        assert_eq!(showtime.date, "23/11/2025");
        assert_eq!(showtime.start_time, "10:00");
    }

    #[test]
    fn admin_input_normalizes_image_name() {
        let input = MovieInput {
            director: "d".into(),
            title: "t".into(),
            image: Some("my poster.png".into()),
            release_date: "01/02/2024".into(),
            language: "English".into(),
            age_rating: "P".into(),
            duration: None,
            description: None,
            admin_id: 1,
            actor: Some("A, B".into()),
            format: None,
            subtitle: None,
            genres: None,
        };
        let movie = input.into_db().unwrap();
        assert_eq!(movie.image.as_deref(), Some("my_poster.png"));
        assert_eq!(movie.release_date, date!(2024 - 02 - 01));
    }

    #[test]
    fn review_defaults_to_spoiler_tag() {
        let review: NewReview =
            serde_json::from_str(r#"{"customer_id": 1, "rating": 4.5}"#)
                .unwrap();
        assert_eq!(review.spoiler, "spoiler");
        assert_eq!(review.comment, None);
    }
}
