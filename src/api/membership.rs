use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{date, db};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Overview {
    pub customer_id: i32,
    pub full_name: String,
    pub membership: Membership,
    pub reviews: Vec<Review>,
    pub receipts: Vec<Receipt>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Membership {
    pub points: i32,
    pub membership_id: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub start_date: String,
    pub privileges: Vec<Privilege>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Privilege {
    pub privilege_id: i32,
    pub name: String,
    pub expiration: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Review {
    pub movie_id: i32,
    pub title: String,
    pub rating: f64,
    pub date: String,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Receipt {
    pub receipt_id: i32,
    pub date: String,
    pub method: String,
    pub voucher_id: Option<i32>,
    pub tickets: Vec<Ticket>,
    pub products: Vec<Product>,
    pub total_amount: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Ticket {
    pub ticket_id: i32,
    pub price: f64,
    pub movie_title: String,
    pub showtime: TicketShowtime,
    pub branch_name: String,
    pub hall: i32,
    pub seat: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TicketShowtime {
    pub date: String,
    pub start: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Product {
    pub product_id: i32,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}

/// Everything the store holds about one customer's membership.
pub struct Records {
    pub membership: db::customer::Membership,
    pub privileges: Vec<db::customer::Privilege>,
    pub reviews: Vec<db::customer::OwnReview>,
    pub receipts: Vec<db::customer::PastReceipt>,
    pub tickets: Vec<db::customer::PastTicket>,
    pub products: Vec<db::customer::PastProduct>,
}

impl From<Records> for Overview {
    fn from(records: Records) -> Self {
        let Records {
            membership,
            privileges,
            reviews,
            receipts,
            tickets,
            products,
        } = records;

        let mut tickets_by_receipt = HashMap::<i32, Vec<Ticket>>::new();
        for t in tickets {
            tickets_by_receipt.entry(t.receipt_id).or_default().push(Ticket {
                ticket_id: t.ticket_id,
                price: t.price,
                movie_title: t.movie_title,
                showtime: TicketShowtime {
                    date: date::format_dmy(t.show_date),
                    start: date::format_hm(t.start_time),
                },
                branch_name: t.branch_name,
                hall: t.hall_number,
                seat: t.seat_number,
            });
        }

        let mut products_by_receipt = HashMap::<i32, Vec<Product>>::new();
        for p in products {
            products_by_receipt.entry(p.receipt_id).or_default().push(
                Product {
                    product_id: p.product_id,
                    name: p.name,
                    price: p.price,
                    quantity: p.quantity,
                },
            );
        }

        let receipts = receipts
            .into_iter()
            .map(|r| {
                let tickets =
                    tickets_by_receipt.remove(&r.id).unwrap_or_default();
                let products =
                    products_by_receipt.remove(&r.id).unwrap_or_default();
                Receipt {
                    receipt_id: r.id,
                    date: format!("{} 00:00:00", date::format_dmy(r.date)),
                    method: r.method,
                    voucher_id: r.cv_id,
                    total_amount: total_amount(&tickets, &products),
                    tickets,
                    products,
                }
            })
            .collect();

        Self {
            customer_id: membership.customer_id,
            full_name: format!(
                "{} {}",
                membership.first_name, membership.last_name,
            ),
            membership: Membership {
                points: membership.loyal_point,
                membership_id: membership.membership_id,
                kind: membership.kind,
                start_date: date::format_ymd(membership.start_date),
                privileges: privileges
                    .into_iter()
                    .map(|p| Privilege {
                        privilege_id: p.id,
                        name: p.name,
                        expiration: p.expiration.map(date::format_ymd),
                        description: p.description,
                    })
                    .collect(),
            },
            reviews: reviews
                .into_iter()
                .map(|r| Review {
                    movie_id: r.movie_id,
                    title: r.title,
                    rating: r.rating,
                    date: date::format_ymd(r.date),
                    comment: r.comment,
                })
                .collect(),
            receipts,
        }
    }
}

/// Sum of ticket prices plus product prices times quantities.
pub fn total_amount(tickets: &[Ticket], products: &[Product]) -> f64 {
    let tickets = tickets.iter().map(|t| t.price).sum::<f64>();
    let products = products
        .iter()
        .map(|p| p.price * f64::from(p.quantity))
        .sum::<f64>();
    tickets + products
}

#[cfg(test)]
mod tests {
    use time::macros::{date, time};

    use super::*;

    fn records() -> Records {
        Records {
            membership: db::customer::Membership {
                customer_id: 7,
                first_name: "Lan".into(),
                last_name: "Nguyen".into(),
                loyal_point: 120,
                membership_id: 2,
                kind: "Silver".into(),
                start_date: date!(2024 - 01 - 15),
            },
            privileges: vec![],
            reviews: vec![],
            receipts: vec![
                db::customer::PastReceipt {
                    id: 11,
                    date: date!(2025 - 11 - 20),
                    method: "Card".into(),
                    cv_id: None,
                },
                db::customer::PastReceipt {
                    id: 10,
                    date: date!(2025 - 11 - 01),
                    method: "Cash".into(),
                    cv_id: Some(3),
                },
            ],
            tickets: vec![
                ticket(11, 100, 10.0, "A1"),
                ticket(11, 101, 12.5, "A2"),
            ],
            products: vec![
                db::customer::PastProduct {
                    receipt_id: 11,
                    product_id: 4,
                    name: "Popcorn".into(),
                    price: 3.0,
                    quantity: 2,
                },
                db::customer::PastProduct {
                    receipt_id: 10,
                    product_id: 5,
                    name: "Cola".into(),
                    price: 2.0,
                    quantity: 1,
                },
            ],
        }
    }

    fn ticket(
        receipt_id: i32,
        ticket_id: i32,
        price: f64,
        seat: &str,
    ) -> db::customer::PastTicket {
        db::customer::PastTicket {
            receipt_id,
            ticket_id,
            price,
            movie_title: "Forrest Gump".into(),
            show_date: date!(2025 - 11 - 23),
            start_time: time!(19:00),
            branch_name: "Central".into(),
            hall_number: 1,
            seat_number: seat.into(),
        }
    }

    #[test]
    fn groups_lines_under_their_receipts() {
        let overview = Overview::from(records());

        assert_eq!(overview.full_name, "Lan Nguyen");
        assert_eq!(overview.receipts.len(), 2);

        let newest = &overview.receipts[0];
        assert_eq!(newest.receipt_id, 11);
        assert_eq!(newest.date, "20/11/2025 00:00:00");
        assert_eq!(newest.tickets.len(), 2);
        assert_eq!(newest.tickets[1].seat, "A2");
        assert_eq!(newest.tickets[0].showtime.start, "19:00");
        assert_eq!(newest.total_amount, 10.0 + 12.5 + 3.0 * 2.0);

        let oldest = &overview.receipts[1];
        assert!(oldest.tickets.is_empty());
        assert_eq!(oldest.voucher_id, Some(3));
        assert_eq!(oldest.total_amount, 2.0);
    }

    #[test]
    fn receipt_without_lines_totals_zero() {
        assert_eq!(total_amount(&[], &[]), 0.0);
    }
}
