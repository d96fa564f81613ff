use time::Date;
use tokio_postgres::Error;

use super::Client;

/// A voucher issued to one customer.
#[derive(Clone, Debug)]
pub struct CustomerVoucher {
    pub cv_id: i32,
    pub voucher_id: i32,
    pub status: String,
    pub discount: f64,
    pub expiration: Date,
    pub condition: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Voucher {
    pub id: i32,
    pub discount: f64,
    pub expiration: Date,
    pub description: Option<String>,
    pub condition: String,
}

#[derive(Clone, Debug, Default)]
pub struct VoucherPatch {
    pub discount: Option<f64>,
    pub expiration: Option<Date>,
    pub description: Option<String>,
    pub condition: Option<String>,
}

impl Client {
    pub async fn get_customer_vouchers(
        &self,
        customer_id: i32,
    ) -> Result<Vec<CustomerVoucher>, Error> {
        const SQL: &str = "\
            SELECT cv.cv_id, cv.voucher_id, cv.status, \
                   v.discount::FLOAT8 AS discount, v.expiration, \
                   v.condition, v.description \
            FROM customer_voucher cv \
            JOIN voucher v ON cv.voucher_id = v.voucher_id \
            WHERE cv.customer_id = $1 \
            ORDER BY cv.cv_id";
        Ok(self
            .shared()
            .await
            .query(SQL, &[&customer_id])
            .await?
            .into_iter()
            .map(|row| CustomerVoucher {
                cv_id: row.get("cv_id"),
                voucher_id: row.get("voucher_id"),
                status: row.get("status"),
                discount: row.get("discount"),
                expiration: row.get("expiration"),
                condition: row.get("condition"),
                description: row.get("description"),
            })
            .collect())
    }

    pub async fn get_vouchers(&self) -> Result<Vec<Voucher>, Error> {
        const SQL: &str = "\
            SELECT voucher_id, discount::FLOAT8 AS discount, expiration, \
                   description, condition \
            FROM voucher \
            ORDER BY voucher_id";
        Ok(self
            .shared()
            .await
            .query(SQL, &[])
            .await?
            .into_iter()
            .map(|row| Voucher {
                id: row.get("voucher_id"),
                discount: row.get("discount"),
                expiration: row.get("expiration"),
                description: row.get("description"),
                condition: row.get("condition"),
            })
            .collect())
    }

    pub async fn create_voucher(
        &self,
        discount: f64,
        expiration: Date,
        description: Option<&str>,
        condition: &str,
    ) -> Result<(), Error> {
        const SQL: &str =
            "CALL create_voucher($1::FLOAT8::NUMERIC, $2, $3, $4)";
        self.shared()
            .await
            .execute(SQL, &[&discount, &expiration, &description, &condition])
            .await
            .map(drop)
    }

    pub async fn update_voucher(
        &self,
        id: i32,
        patch: &VoucherPatch,
    ) -> Result<(), Error> {
        const SQL: &str =
            "CALL update_voucher($1, $2::FLOAT8::NUMERIC, $3, $4, $5)";
        self.shared()
            .await
            .execute(
                SQL,
                &[
                    &id,
                    &patch.discount,
                    &patch.expiration,
                    &patch.description,
                    &patch.condition,
                ],
            )
            .await
            .map(drop)
    }

    pub async fn delete_voucher(&self, id: i32) -> Result<(), Error> {
        const SQL: &str = "CALL delete_voucher($1)";
        self.shared().await.execute(SQL, &[&id]).await.map(drop)
    }
}
