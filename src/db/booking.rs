use time::Date;
use tokio_postgres::{Error, Row};

use super::Client;

/// A receipt as listed on the admin bookings page.
#[derive(Clone, Debug)]
pub struct Booking {
    pub receipt_id: i32,
    pub customer_name: String,
    pub movie_title: Option<String>,
    pub seats: Option<String>,
    pub date: Date,
    pub total_amount: f64,
}

fn booking_from_row(row: &Row) -> Booking {
    Booking {
        receipt_id: row.get("receipt_id"),
        customer_name: row.get("customer_name"),
        movie_title: row.get("movie_title"),
        seats: row.get("seats"),
        date: row.get("date"),
        total_amount: row.get("total_amount"),
    }
}

impl Client {
    pub async fn get_all_receipts(&self) -> Result<Vec<Booking>, Error> {
        const SQL: &str = "\
            SELECT receipt_id, customer_name, movie_title, seats, date, \
                   total_amount::FLOAT8 AS total_amount \
            FROM get_all_receipts()";
        Ok(self
            .shared()
            .await
            .query(SQL, &[])
            .await?
            .iter()
            .map(booking_from_row)
            .collect())
    }

    pub async fn get_receipts_by_branch(
        &self,
        branch_id: i32,
    ) -> Result<Vec<Booking>, Error> {
        const SQL: &str = "\
            SELECT receipt_id, customer_name, movie_title, seats, date, \
                   total_amount::FLOAT8 AS total_amount \
            FROM get_receipts_by_branch($1)";
        Ok(self
            .shared()
            .await
            .query(SQL, &[&branch_id])
            .await?
            .iter()
            .map(booking_from_row)
            .collect())
    }
}
