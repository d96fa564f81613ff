use time::{Date, Time};
use tokio_postgres::{Error, Row};

use super::{Client, Transaction};

#[derive(Clone, Debug)]
pub struct Customer {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Date,
    pub membership_id: i32,
    pub loyal_point: i32,
}

#[derive(Clone, Debug)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email: String,
    pub date_of_birth: Date,
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Clone, Debug)]
pub struct ProfileUpdate {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email: String,
    pub date_of_birth: Date,
    pub phone: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Membership {
    pub customer_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub loyal_point: i32,
    pub membership_id: i32,
    pub kind: String,
    pub start_date: Date,
}

#[derive(Clone, Debug)]
pub struct Privilege {
    pub id: i32,
    pub name: String,
    pub expiration: Option<Date>,
    pub description: Option<String>,
}

#[derive(Clone, Debug)]
pub struct OwnReview {
    pub movie_id: i32,
    pub title: String,
    pub rating: f64,
    pub date: Date,
    pub comment: Option<String>,
}

#[derive(Clone, Debug)]
pub struct PastReceipt {
    pub id: i32,
    pub date: Date,
    pub method: String,
    pub cv_id: Option<i32>,
}

#[derive(Clone, Debug)]
pub struct PastTicket {
    pub receipt_id: i32,
    pub ticket_id: i32,
    pub price: f64,
    pub movie_title: String,
    pub show_date: Date,
    pub start_time: Time,
    pub branch_name: String,
    pub hall_number: i32,
    pub seat_number: String,
}

#[derive(Clone, Debug)]
pub struct PastProduct {
    pub receipt_id: i32,
    pub product_id: i32,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}

macro_rules! select_customer {
    () => {
        "SELECT c.customer_id, c.fname, c.lname, c.gender, c.email, \
                MAX(cp.cphone) AS phone, c.date_of_birth, \
                c.membership_id, c.loyal_point \
         FROM customer c \
         LEFT JOIN customer_phone cp ON c.customer_id = cp.customer_id "
    };
}

macro_rules! group_customer {
    () => {
        " GROUP BY c.customer_id, c.fname, c.lname, c.gender, c.email, \
                   c.date_of_birth, c.membership_id, c.loyal_point"
    };
}

pub(super) fn customer_from_row(row: &Row) -> Customer {
    Customer {
        id: row.get("customer_id"),
        first_name: row.get("fname"),
        last_name: row.get("lname"),
        gender: row.get("gender"),
        email: row.get("email"),
        phone: row.get("phone"),
        date_of_birth: row.get("date_of_birth"),
        membership_id: row.get("membership_id"),
        loyal_point: row.get("loyal_point"),
    }
}

impl Client {
    /// Verifies the credentials; the store rejects a mismatch.
    pub async fn login_customer(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Customer>, Error> {
        const SQL: &str = "\
            SELECT customer_id, fname, lname, gender, email, phone, \
                   date_of_birth, membership_id, loyal_point \
            FROM login_customer($1, $2)";
        Ok(self
            .shared()
            .await
            .query_opt(SQL, &[&email, &password])
            .await?
            .as_ref()
            .map(customer_from_row))
    }

    pub async fn change_customer_password(
        &self,
        id: i32,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), Error> {
        const SQL: &str = "CALL change_customer_password($1, $2, $3)";
        self.shared()
            .await
            .execute(SQL, &[&id, &old_password, &new_password])
            .await
            .map(drop)
    }

    pub async fn get_membership(
        &self,
        customer_id: i32,
    ) -> Result<Option<Membership>, Error> {
        const SQL: &str = "\
            SELECT c.customer_id, c.loyal_point, c.fname, c.lname, \
                   m.membership_id, m.type, m.start_date \
            FROM customer c \
            JOIN membership m ON c.membership_id = m.membership_id \
            WHERE c.customer_id = $1";
        Ok(self
            .shared()
            .await
            .query_opt(SQL, &[&customer_id])
            .await?
            .map(|row| Membership {
                customer_id: row.get("customer_id"),
                first_name: row.get("fname"),
                last_name: row.get("lname"),
                loyal_point: row.get("loyal_point"),
                membership_id: row.get("membership_id"),
                kind: row.get("type"),
                start_date: row.get("start_date"),
            }))
    }

    pub async fn get_privileges(
        &self,
        membership_id: i32,
    ) -> Result<Vec<Privilege>, Error> {
        const SQL: &str = "\
            SELECT p.privilege_id, p.name, p.expiration, p.description \
            FROM access a \
            JOIN privilege p ON p.privilege_id = a.privilege_id \
            WHERE a.membership_id = $1";
        Ok(self
            .shared()
            .await
            .query(SQL, &[&membership_id])
            .await?
            .into_iter()
            .map(|row| Privilege {
                id: row.get("privilege_id"),
                name: row.get("name"),
                expiration: row.get("expiration"),
                description: row.get("description"),
            })
            .collect())
    }

    pub async fn get_customer_reviews(
        &self,
        customer_id: i32,
    ) -> Result<Vec<OwnReview>, Error> {
        const SQL: &str = "\
            SELECT r.movie_id, m.title, r.rating::FLOAT8 AS rating, \
                   r.date_comment, r.comment \
            FROM review r \
            JOIN movie m ON m.movie_id = r.movie_id \
            WHERE r.customer_id = $1";
        Ok(self
            .shared()
            .await
            .query(SQL, &[&customer_id])
            .await?
            .into_iter()
            .map(|row| OwnReview {
                movie_id: row.get("movie_id"),
                title: row.get("title"),
                rating: row.get("rating"),
                date: row.get("date_comment"),
                comment: row.get("comment"),
            })
            .collect())
    }

    /// Receipts of the customer, newest first.
    pub async fn get_customer_receipts(
        &self,
        customer_id: i32,
    ) -> Result<Vec<PastReceipt>, Error> {
        const SQL: &str = "\
            SELECT receipt_id, receipt_date, method, cv_id \
            FROM receipt \
            WHERE customer_id = $1 \
            ORDER BY receipt_id DESC";
        Ok(self
            .shared()
            .await
            .query(SQL, &[&customer_id])
            .await?
            .into_iter()
            .map(|row| PastReceipt {
                id: row.get("receipt_id"),
                date: row.get("receipt_date"),
                method: row.get("method"),
                cv_id: row.get("cv_id"),
            })
            .collect())
    }

    pub async fn get_customer_tickets(
        &self,
        customer_id: i32,
    ) -> Result<Vec<PastTicket>, Error> {
        const SQL: &str = "\
            SELECT t.receipt_id, t.ticket_id, t.price::FLOAT8 AS price, \
                   m.title, s.date, s.start_time, cb.name AS branch_name, \
                   t.hall_number, t.seat_number \
            FROM ticket t \
            JOIN movie m ON m.movie_id = t.movie_id \
            JOIN showtime s ON s.movie_id = t.movie_id \
                           AND s.showtime_id = t.showtime_id \
            JOIN cinema_branch cb ON cb.branch_id = t.branch_id \
            WHERE t.receipt_id IN ( \
                SELECT receipt_id FROM receipt WHERE customer_id = $1 \
            ) \
            ORDER BY t.ticket_id";
        Ok(self
            .shared()
            .await
            .query(SQL, &[&customer_id])
            .await?
            .into_iter()
            .map(|row| PastTicket {
                receipt_id: row.get("receipt_id"),
                ticket_id: row.get("ticket_id"),
                price: row.get("price"),
                movie_title: row.get("title"),
                show_date: row.get("date"),
                start_time: row.get("start_time"),
                branch_name: row.get("branch_name"),
                hall_number: row.get("hall_number"),
                seat_number: row.get("seat_number"),
            })
            .collect())
    }

    pub async fn get_customer_products(
        &self,
        customer_id: i32,
    ) -> Result<Vec<PastProduct>, Error> {
        const SQL: &str = "\
            SELECT op.receipt_id, p.product_id, p.name, \
                   p.price::FLOAT8 AS price, op.quantity \
            FROM order_product op \
            JOIN product p ON p.product_id = op.product_id \
            WHERE op.receipt_id IN ( \
                SELECT receipt_id FROM receipt WHERE customer_id = $1 \
            )";
        Ok(self
            .shared()
            .await
            .query(SQL, &[&customer_id])
            .await?
            .into_iter()
            .map(|row| PastProduct {
                receipt_id: row.get("receipt_id"),
                product_id: row.get("product_id"),
                name: row.get("name"),
                price: row.get("price"),
                quantity: row.get("quantity"),
            })
            .collect())
    }
}

/// Registers the customer and reads the stored profile back.
pub async fn create_customer(
    tx: &Transaction<'_>,
    customer: &NewCustomer,
) -> Result<Option<Customer>, Error> {
    const CREATE_SQL: &str =
        "CALL create_customer($1, $2, $3, $4, $5, $6, $7, $8)";
    const FETCH_SQL: &str =
        concat!(select_customer!(), "WHERE c.email = $1", group_customer!());

    tx.execute(
        CREATE_SQL,
        &[
            &customer.first_name,
            &customer.last_name,
            &customer.gender,
            &customer.email,
            &customer.date_of_birth,
            &0i32,
            &customer.phone,
            &customer.password,
        ],
    )
    .await?;

    Ok(tx
        .query_opt(FETCH_SQL, &[&customer.email])
        .await?
        .as_ref()
        .map(customer_from_row))
}

/// Updates the customer-editable part of a profile and reads it back.
///
/// Membership and loyalty points are left untouched.
pub async fn update_customer(
    tx: &Transaction<'_>,
    profile: &ProfileUpdate,
) -> Result<Option<Customer>, Error> {
    const UPDATE_SQL: &str = "\
        CALL update_customer($1, $2, $3, $4, $5, $6, NULL, NULL, $7)";
    const FETCH_SQL: &str = concat!(
        select_customer!(),
        "WHERE c.customer_id = $1",
        group_customer!(),
    );

    tx.execute(
        UPDATE_SQL,
        &[
            &profile.id,
            &profile.first_name,
            &profile.last_name,
            &profile.gender,
            &profile.email,
            &profile.date_of_birth,
            &profile.phone,
        ],
    )
    .await?;

    Ok(tx
        .query_opt(FETCH_SQL, &[&profile.id])
        .await?
        .as_ref()
        .map(customer_from_row))
}
