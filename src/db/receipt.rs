use async_trait::async_trait;
use tokio_postgres::Error;

use crate::receipt::{Header, Id, OrderLine, Store, TicketLine};

use super::Transaction;

#[async_trait]
impl<'a> Store for Transaction<'a> {
    type Error = Error;

    async fn create_receipt(
        &mut self,
        header: &Header,
        ticket: &TicketLine,
        product: Option<&OrderLine>,
    ) -> Result<Option<Id>, Error> {
        const SQL: &str = "\
            SELECT create_receipt($1, $2, $3, $4, $5, $6, \
                                  $7::FLOAT8::NUMERIC, \
                                  $8, $9, $10, $11, $12)";

        let product_id = product.map(|p| p.product_id);
        let quantity = product.map(|p| p.quantity);
        let row = self
            .query_opt(
                SQL,
                &[
                    &header.date,
                    &header.method,
                    &header.customer_id,
                    &header.cv_id,
                    &product_id,
                    &quantity,
                    &ticket.price,
                    &ticket.movie_id,
                    &ticket.showtime_id,
                    &ticket.branch_id,
                    &ticket.hall_number,
                    &ticket.seat_number,
                ],
            )
            .await?;
        Ok(row.and_then(|row| row.get::<_, Option<Id>>(0)))
    }

    async fn insert_header(
        &mut self,
        header: &Header,
    ) -> Result<Option<Id>, Error> {
        const SQL: &str = "\
            INSERT INTO receipt (receipt_date, method, customer_id, cv_id) \
            VALUES ($1, $2, $3, $4) \
            RETURNING receipt_id";

        Ok(self
            .query_opt(
                SQL,
                &[
                    &header.date,
                    &header.method,
                    &header.customer_id,
                    &header.cv_id,
                ],
            )
            .await?
            .map(|row| row.get("receipt_id")))
    }

    async fn attach_ticket(
        &mut self,
        receipt: Id,
        ticket: &TicketLine,
    ) -> Result<(), Error> {
        const SQL: &str = "\
            CALL create_ticket($1::FLOAT8::NUMERIC, $2, $3, $4, $5, $6, $7)";

        self.execute(
            SQL,
            &[
                &ticket.price,
                &receipt,
                &ticket.movie_id,
                &ticket.showtime_id,
                &ticket.branch_id,
                &ticket.hall_number,
                &ticket.seat_number,
            ],
        )
        .await
        .map(drop)
    }

    async fn attach_product(
        &mut self,
        receipt: Id,
        product: &OrderLine,
    ) -> Result<(), Error> {
        const SQL: &str = "CALL create_order_product($1, $2, $3)";

        self.execute(SQL, &[&receipt, &product.product_id, &product.quantity])
            .await
            .map(drop)
    }

    async fn redeem_voucher(
        &mut self,
        customer_id: i32,
        cv_id: i32,
    ) -> Result<bool, Error> {
        const SQL: &str = "\
            UPDATE customer_voucher \
            SET status = 'Used' \
            WHERE customer_id = $1 \
              AND cv_id = $2 \
              AND status = 'Available'";

        Ok(self.execute(SQL, &[&customer_id, &cv_id]).await? == 1)
    }

    async fn commit(self) -> Result<(), Error> {
        Transaction::commit(self).await
    }

    async fn rollback(self) -> Result<(), Error> {
        Transaction::rollback(self).await
    }
}
