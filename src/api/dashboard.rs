use serde::{Deserialize, Serialize};
use time::Date;

use crate::{date, db};

/// `startDate`/`endDate` query parameters, both `YYYY-MM-DD`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl DateRange {
    /// Resolves the range, defaulting to the first of `today`'s month up to
    /// `today`.
    pub fn resolve(&self, today: Date) -> Result<(Date, Date), date::InvalidDate> {
        let start = match &self.start_date {
            Some(s) => date::parse_ymd(s)?,
            None => today.replace_day(1).unwrap_or(today),
        };
        let end = match &self.end_date {
            Some(s) => date::parse_ymd(s)?,
            None => today,
        };
        Ok((start, end))
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Period {
    pub start: String,
    pub end: String,
}

impl From<&db::dashboard::Period> for Period {
    fn from(p: &db::dashboard::Period) -> Self {
        Self {
            start: date::format_ymd(p.start),
            end: date::format_ymd(p.end),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TopMovie {
    pub name: String,
    pub value: f64,
}

impl From<db::dashboard::MovieRevenue> for TopMovie {
    fn from(m: db::dashboard::MovieRevenue) -> Self {
        Self {
            name: m.title,
            value: m.revenue,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DailyRevenue {
    pub date: String,
    pub ticket_revenue: f64,
    pub product_revenue: f64,
    pub total_revenue: f64,
}

impl From<db::dashboard::DailyRevenue> for DailyRevenue {
    fn from(d: db::dashboard::DailyRevenue) -> Self {
        Self {
            date: date::format_ymd(d.date),
            ticket_revenue: d.ticket_revenue,
            product_revenue: d.product_revenue,
            total_revenue: d.ticket_revenue + d.product_revenue,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Charts {
    pub top_movies: Vec<TopMovie>,
    pub revenue_trend: Vec<DailyRevenue>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Financials {
    pub net_revenue: f64,
    pub avg_receipt_value: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SystemStats {
    pub total_admins: i64,
    pub total_bookings: i64,
    pub total_movies: i64,
    pub occupancy_rate: f64,
}

/// Chain-wide dashboard.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Primary {
    pub period: Period,
    pub financials: Financials,
    pub system_stats: SystemStats,
    pub charts: Charts,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BranchStats {
    pub net_revenue: f64,
    pub occupancy_rate: f64,
}

/// Dashboard of a single branch.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Regular {
    pub branch_id: i32,
    pub period: Period,
    pub stats: BranchStats,
    pub charts: Charts,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AlertsQuery {
    pub month: i32,
    pub year: i32,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub branch_id: Option<i32>,
}

fn default_threshold() -> f64 {
    20.0
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LowOccupancy {
    #[serde(rename = "Movie_Name")]
    pub movie_name: String,
    #[serde(rename = "Branch_Name")]
    pub branch_name: String,
    #[serde(rename = "Duration")]
    pub duration: i32,
    #[serde(rename = "Start_time")]
    pub start_time: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Total_Capacity")]
    pub total_capacity: i64,
    #[serde(rename = "Booked_Seats")]
    pub booked_seats: i64,
    #[serde(rename = "Occupancy_Rate")]
    pub occupancy_rate: f64,
}

impl From<db::dashboard::LowOccupancy> for LowOccupancy {
    fn from(a: db::dashboard::LowOccupancy) -> Self {
        Self {
            movie_name: a.movie_name,
            branch_name: a.branch_name,
            duration: a.duration,
            start_time: date::format_hms(a.start_time),
            date: date::format_ymd(a.date),
            total_capacity: a.total_capacity,
            booked_seats: a.booked_seats,
            occupancy_rate: a.occupancy_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn range_defaults_to_current_month() {
        let today = date!(2025 - 11 - 23);
        let (start, end) = DateRange::default().resolve(today).unwrap();
        assert_eq!(start, date!(2025 - 11 - 01));
        assert_eq!(end, today);
    }

    #[test]
    fn range_takes_explicit_bounds() {
        let range = DateRange {
            start_date: Some("2025-01-01".into()),
            end_date: Some("2025-03-31".into()),
        };
        let (start, end) = range.resolve(date!(2025 - 11 - 23)).unwrap();
        assert_eq!(start, date!(2025 - 01 - 01));
        assert_eq!(end, date!(2025 - 03 - 31));
    }

    #[test]
    fn range_rejects_day_first_dates() {
        let range = DateRange {
            start_date: Some("01/01/2025".into()),
            end_date: None,
        };
        assert!(range.resolve(date!(2025 - 11 - 23)).is_err());
    }

    #[test]
    fn range_reads_camel_case_keys() {
        let range: DateRange = serde_json::from_value(serde_json::json!({
            "startDate": "2025-02-01",
        }))
        .unwrap();
        assert_eq!(range.start_date.as_deref(), Some("2025-02-01"));
        assert_eq!(range.end_date, None);
    }

    #[test]
    fn daily_revenue_adds_up() {
        let day = DailyRevenue::from(db::dashboard::DailyRevenue {
            date: date!(2025 - 11 - 02),
            ticket_revenue: 120.5,
            product_revenue: 30.0,
        });
        assert_eq!(day.date, "2025-11-02");
        assert_eq!(day.total_revenue, 150.5);
    }
}
