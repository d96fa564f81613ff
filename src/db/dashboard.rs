use time::{Date, Time};
use tokio_postgres::Error;

use super::Client;

/// Date range and optional branch a metric is computed over.
#[derive(Clone, Copy, Debug)]
pub struct Period {
    pub start: Date,
    pub end: Date,
    pub branch_id: Option<i32>,
}

#[derive(Clone, Debug)]
pub struct MovieRevenue {
    pub title: String,
    pub revenue: f64,
}

#[derive(Clone, Debug)]
pub struct DailyRevenue {
    pub date: Date,
    pub ticket_revenue: f64,
    pub product_revenue: f64,
}

#[derive(Clone, Debug)]
pub struct LowOccupancy {
    pub movie_name: String,
    pub branch_name: String,
    pub duration: i32,
    pub start_time: Time,
    pub date: Date,
    pub total_capacity: i64,
    pub booked_seats: i64,
    pub occupancy_rate: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct LowOccupancyQuery {
    pub month: i32,
    pub year: i32,
    pub threshold: f64,
    pub branch_id: Option<i32>,
    pub offset: i64,
    pub limit: i64,
}

impl Client {
    pub async fn get_net_revenue(&self, period: &Period) -> Result<f64, Error> {
        const SQL: &str =
            "SELECT COALESCE(fn_dynamic_revenue($1, $2, $3), 0)::FLOAT8";
        Ok(self
            .shared()
            .await
            .query_one(SQL, &[&period.start, &period.end, &period.branch_id])
            .await?
            .get(0))
    }

    pub async fn get_avg_receipt_value(
        &self,
        period: &Period,
    ) -> Result<f64, Error> {
        const SQL: &str =
            "SELECT COALESCE(fn_avg_receipt_value($1, $2), 0)::FLOAT8";
        Ok(self
            .shared()
            .await
            .query_one(SQL, &[&period.start, &period.end])
            .await?
            .get(0))
    }

    pub async fn get_total_admins(&self) -> Result<i64, Error> {
        const SQL: &str = "SELECT COALESCE(fn_total_admins(), 0)::INT8";
        Ok(self.shared().await.query_one(SQL, &[]).await?.get(0))
    }

    pub async fn get_total_bookings(&self) -> Result<i64, Error> {
        const SQL: &str = "SELECT COALESCE(fn_total_bookings(), 0)::INT8";
        Ok(self.shared().await.query_one(SQL, &[]).await?.get(0))
    }

    pub async fn get_movies_listed(&self) -> Result<i64, Error> {
        const SQL: &str = "SELECT COALESCE(fn_movies_listed(), 0)::INT8";
        Ok(self.shared().await.query_one(SQL, &[]).await?.get(0))
    }

    /// Occupancy over every branch for one calendar month.
    pub async fn get_system_occupancy(
        &self,
        month: i32,
        year: i32,
    ) -> Result<f64, Error> {
        const SQL: &str = "\
            SELECT COALESCE(\
                fn_system_monthly_occupancy_rate($1, $2), 0\
            )::FLOAT8";
        Ok(self
            .shared()
            .await
            .query_one(SQL, &[&month, &year])
            .await?
            .get(0))
    }

    pub async fn get_branch_occupancy(
        &self,
        branch_id: i32,
        year: i32,
        month: i32,
    ) -> Result<f64, Error> {
        const SQL: &str = "\
            SELECT COALESCE(\
                fn_monthly_occupancy_rate_by_branch($1, $2, $3), 0\
            )::FLOAT8";
        Ok(self
            .shared()
            .await
            .query_one(SQL, &[&branch_id, &year, &month])
            .await?
            .get(0))
    }

    pub async fn get_top_movies(
        &self,
        period: &Period,
        limit: i32,
    ) -> Result<Vec<MovieRevenue>, Error> {
        const SQL: &str = "\
            SELECT title, revenue::FLOAT8 AS revenue \
            FROM sp_get_top_movies_revenue($1, $2, $3, $4)";
        Ok(self
            .shared()
            .await
            .query(
                SQL,
                &[&period.start, &period.end, &period.branch_id, &limit],
            )
            .await?
            .into_iter()
            .map(|row| MovieRevenue {
                title: row.get("title"),
                revenue: row.get("revenue"),
            })
            .collect())
    }

    pub async fn get_revenue_trend(
        &self,
        period: &Period,
    ) -> Result<Vec<DailyRevenue>, Error> {
        const SQL: &str = "\
            SELECT date, ticket_revenue::FLOAT8 AS ticket_revenue, \
                   product_revenue::FLOAT8 AS product_revenue \
            FROM sp_get_daily_revenue_trend($1, $2, $3)";
        Ok(self
            .shared()
            .await
            .query(SQL, &[&period.start, &period.end, &period.branch_id])
            .await?
            .into_iter()
            .map(|row| DailyRevenue {
                date: row.get("date"),
                ticket_revenue: row.get("ticket_revenue"),
                product_revenue: row.get("product_revenue"),
            })
            .collect())
    }

    /// One page of showtimes under the occupancy threshold, along with the
    /// number of such showtimes overall.
    pub async fn get_low_occupancy_alerts(
        &self,
        query: &LowOccupancyQuery,
    ) -> Result<(Vec<LowOccupancy>, i64), Error> {
        const SQL: &str = "\
            SELECT movie_name, branch_name, duration, start_time, date, \
                   total_capacity::INT8 AS total_capacity, \
                   booked_seats::INT8 AS booked_seats, \
                   occupancy_rate::FLOAT8 AS occupancy_rate, \
                   total_count::INT8 AS total_count \
            FROM sp_get_monthly_low_occupancy_alerts(\
                $1, $2, $3::FLOAT8::NUMERIC, $4, $5::INT8::INT4, $6::INT8::INT4\
            )";

        let rows = self
            .shared()
            .await
            .query(
                SQL,
                &[
                    &query.month,
                    &query.year,
                    &query.threshold,
                    &query.branch_id,
                    &query.limit,
                    &query.offset,
                ],
            )
            .await?;

        let total = rows.first().map_or(0, |row| row.get("total_count"));
        let alerts = rows
            .into_iter()
            .map(|row| LowOccupancy {
                movie_name: row.get("movie_name"),
                branch_name: row.get("branch_name"),
                duration: row.get("duration"),
                start_time: row.get("start_time"),
                date: row.get("date"),
                total_capacity: row.get("total_capacity"),
                booked_seats: row.get("booked_seats"),
                occupancy_rate: row.get("occupancy_rate"),
            })
            .collect();
        Ok((alerts, total))
    }
}
