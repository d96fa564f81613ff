use serde::{Deserialize, Serialize};

use crate::{date, db};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Booking {
    #[serde(rename = "Receipt_id")]
    pub receipt_id: i32,
    #[serde(rename = "Customer_Name")]
    pub customer_name: String,
    #[serde(rename = "Movie_Title")]
    pub movie_title: Option<String>,
    #[serde(rename = "Seats")]
    pub seats: Option<String>,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Total_Amount")]
    pub total_amount: f64,
}

impl From<db::booking::Booking> for Booking {
    fn from(b: db::booking::Booking) -> Self {
        Self {
            receipt_id: b.receipt_id,
            customer_name: b.customer_name,
            movie_title: b.movie_title,
            seats: b.seats,
            date: date::format_dmy(b.date),
            total_amount: b.total_amount,
        }
    }
}
