use itertools::Itertools as _;
use serde::{Deserialize, Serialize};

use crate::{date, db};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Branch {
    #[serde(rename = "Branch_id")]
    pub branch_id: i32,
    pub city: String,
    pub address: String,
    pub name: String,
    #[serde(rename = "Admin_id")]
    pub admin_id: Option<i32>,
    pub phone: Option<String>,
}

impl From<db::branch::Branch> for Branch {
    fn from(b: db::branch::Branch) -> Self {
        Self {
            branch_id: b.id,
            city: b.city,
            address: b.address,
            name: b.name,
            admin_id: b.admin_id,
            phone: b.phone,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BranchInput {
    pub name: String,
    pub city: String,
    pub address: String,
    #[serde(default, rename = "Admin_id")]
    pub admin_id: Option<i32>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl From<BranchInput> for db::branch::BranchInput {
    fn from(b: BranchInput) -> Self {
        Self {
            name: b.name,
            city: b.city,
            address: b.address,
            admin_id: b.admin_id,
            phone: b.phone,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Search {
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Showtime {
    #[serde(rename = "Showtime_id")]
    pub showtime_id: i32,
    pub date: Option<String>,
    #[serde(rename = "Start_time")]
    pub start_time: String,
    pub format: String,
    pub subtitle: String,
    #[serde(rename = "Hall_number")]
    pub hall_number: i32,
    #[serde(rename = "Hall_type")]
    pub hall_type: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Movie {
    #[serde(rename = "Movie_id")]
    pub movie_id: i32,
    pub title: String,
    pub image: Option<String>,
    #[serde(rename = "Release_date")]
    pub release_date: Option<String>,
    pub language: String,
    #[serde(rename = "Age_rating")]
    pub age_rating: String,
    pub duration: Option<i32>,
    pub description: Option<String>,
    #[serde(rename = "showtimes")]
    pub showtimes: Vec<Showtime>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Detail {
    pub branch: Branch,
    pub movies: Vec<Movie>,
}

/// Groups showings (ordered by movie) into movies with their showtimes.
pub fn group_showings(showings: Vec<db::branch::BranchShowing>) -> Vec<Movie> {
    showings
        .into_iter()
        .chunk_by(|s| s.movie_id)
        .into_iter()
        .filter_map(|(_, group)| {
            let mut group = group.peekable();
            let first = group.peek()?.clone();
            Some(Movie {
                movie_id: first.movie_id,
                title: first.title,
                image: first.image,
                release_date: first.release_date.map(date::format_dmy),
                language: first.language,
                age_rating: first.age_rating,
                duration: first.duration,
                description: first.description,
                showtimes: group
                    .map(|s| Showtime {
                        showtime_id: s.showtime_id,
                        date: Some(date::format_dmy(s.date)),
                        start_time: date::format_hm(s.start_time),
                        format: s.format,
                        subtitle: s.subtitle,
                        hall_number: s.hall_number,
                        hall_type: s.hall_type,
                    })
                    .collect(),
            })
        })
        .collect()
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Hall {
    #[serde(rename = "Hall_number")]
    pub hall_number: i32,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Seat_capacity")]
    pub seat_capacity: i32,
    #[serde(rename = "Row_count")]
    pub row_count: i32,
    #[serde(rename = "Col_count")]
    pub col_count: i32,
}

impl From<db::hall::Hall> for Hall {
    fn from(h: db::hall::Hall) -> Self {
        Self {
            hall_number: h.number,
            kind: h.kind,
            seat_capacity: h.seat_capacity,
            row_count: h.row_count,
            col_count: h.col_count,
        }
    }
}

impl From<Hall> for db::hall::Hall {
    fn from(h: Hall) -> Self {
        Self {
            number: h.hall_number,
            kind: h.kind,
            seat_capacity: h.seat_capacity,
            row_count: h.row_count,
            col_count: h.col_count,
        }
    }
}

/// Hall as offered when scheduling a showtime.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HallChoice {
    pub hall_number: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub capacity: i32,
}

impl From<db::hall::Hall> for HallChoice {
    fn from(h: db::hall::Hall) -> Self {
        Self {
            hall_number: h.number,
            kind: h.kind,
            capacity: h.seat_capacity,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct HallFilter {
    pub format: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ScheduledShowtime {
    pub showtime_id: i32,
    pub movie_id: i32,
    pub title: String,
    pub start_time: String,
    pub date: String,
    pub format: String,
    pub subtitle: String,
    pub hall_number: i32,
}

impl From<db::showtime::Showtime> for ScheduledShowtime {
    fn from(s: db::showtime::Showtime) -> Self {
        Self {
            showtime_id: s.id,
            movie_id: s.movie_id,
            title: s.title,
            start_time: date::format_hms(s.start_time),
            date: date::format_dmy(s.date),
            format: s.format,
            subtitle: s.subtitle,
            hall_number: s.hall_number,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewShowtime {
    pub movie_id: i32,
    /// `HH:MM:SS` or `HH:MM`.
    pub start_time: String,
    /// `DD/MM/YYYY`.
    pub date: String,
    pub format: String,
    pub subtitle: String,
    pub hall_number: i32,
}

impl NewShowtime {
    pub fn into_db(
        self,
    ) -> Result<db::showtime::ShowtimeInput, date::InvalidDate> {
        Ok(db::showtime::ShowtimeInput {
            movie_id: self.movie_id,
            start_time: date::parse_time(&self.start_time)?,
            date: date::parse_dmy(&self.date)?,
            format: self.format,
            subtitle: self.subtitle,
            hall_number: self.hall_number,
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ShowtimePatch {
    #[serde(default)]
    pub movie_id: Option<i32>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub hall_number: Option<i32>,
}

impl ShowtimePatch {
    pub fn into_db(
        self,
    ) -> Result<db::showtime::ShowtimePatch, date::InvalidDate> {
        Ok(db::showtime::ShowtimePatch {
            movie_id: self.movie_id,
            start_time: self
                .start_time
                .as_deref()
                .map(date::parse_time)
                .transpose()?,
            date: self.date.as_deref().map(date::parse_dmy).transpose()?,
            format: self.format,
            subtitle: self.subtitle,
            hall_number: self.hall_number,
        })
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewScreen {
    pub movie_id: i32,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ScreenChanged {
    pub message: String,
    pub branch_id: i32,
    pub movie_id: i32,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ShowtimeDeleted {
    pub message: String,
    pub movie_id: i32,
    pub showtime_id: i32,
}

#[cfg(test)]
mod tests {
    use time::macros::{date, time};

    use super::*;

    fn showing(movie_id: i32, showtime_id: i32) -> db::branch::BranchShowing {
        db::branch::BranchShowing {
            movie_id,
            title: format!("Movie {movie_id}"),
            image: None,
            release_date: Some(date!(2024 - 05 - 01)),
            language: "English".into(),
            age_rating: "P".into(),
            duration: Some(120),
            description: None,
            showtime_id,
            date: date!(2025 - 11 - 23),
            start_time: time!(18:30),
            format: "2D".into(),
            subtitle: "None".into(),
            hall_number: 1,
            hall_type: "Standard".into(),
        }
    }

    #[test]
    fn groups_showtimes_under_their_movie() {
        let movies = group_showings(vec![
            showing(1, 10),
            showing(1, 11),
            showing(2, 20),
        ]);

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].movie_id, 1);
        assert_eq!(
            movies[0]
                .showtimes
                .iter()
                .map(|s| s.showtime_id)
                .collect::<Vec<_>>(),
            [10, 11],
        );
        assert_eq!(movies[0].showtimes[0].start_time, "18:30");
        assert_eq!(movies[1].showtimes.len(), 1);
        assert_eq!(movies[1].release_date.as_deref(), Some("01/05/2024"));
    }

    #[test]
    fn branch_without_showings_has_no_movies() {
        assert!(group_showings(Vec::new()).is_empty());
    }

    #[test]
    fn parses_new_showtime() {
        let showtime = NewShowtime {
            movie_id: 5,
            start_time: "10:00:00".into(),
            date: "23/11/2025".into(),
            format: "IMAX".into(),
            subtitle: "English".into(),
            hall_number: 2,
        }
        .into_db()
        .unwrap();
        assert_eq!(showtime.start_time, time!(10:00));
        assert_eq!(showtime.date, date!(2025 - 11 - 23));
    }

    #[test]
    fn patch_keeps_absent_fields_absent() {
        let patch = ShowtimePatch {
            hall_number: Some(3),
            ..Default::default()
        }
        .into_db()
        .unwrap();
        assert_eq!(patch.hall_number, Some(3));
        assert_eq!(patch.date, None);
        assert_eq!(patch.start_time, None);

        let bad = ShowtimePatch {
            date: Some("2025-11-23".into()),
            ..Default::default()
        };
        assert!(bad.into_db().is_err());
    }
}
