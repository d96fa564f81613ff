//! Receipt assembly.
//!
//! The store can't create an empty receipt together with its lines in one
//! go: its `create_receipt` routine creates a receipt along with exactly one
//! ticket and at most one product. So a purchase is persisted as a sequence
//! of calls inside a single transaction:
//!
//! - with tickets: one combined call for the header, the first ticket and
//!   the first product, then one call per remaining ticket and product;
//! - without tickets: a bare header insert, then one call per product, then
//!   the voucher (if any) is marked as used.
//!
//! Any failure rolls the whole transaction back, so a receipt is never
//! observed with only a part of its lines.

use std::error::Error as StdError;

use async_trait::async_trait;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use time::Date;
use tokio_postgres::types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};

use crate::date;

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize,
)]
pub struct Id(i32);

impl From<i32> for Id {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl FromSql<'_> for Id {
    accepts!(INT4);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        i32::from_sql(ty, raw).map(Self)
    }
}

impl ToSql for Id {
    accepts!(INT4);

    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.0.to_sql(ty, out)
    }
}

/// One seat sold for one showtime.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TicketLine {
    pub movie_id: i32,
    pub showtime_id: i32,
    pub branch_id: i32,
    pub hall_number: i32,
    pub seat_number: String,
    pub price: f64,
}

/// One purchased product.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct OrderLine {
    pub product_id: i32,
    pub quantity: i32,
}

/// A purchase as submitted by the caller.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Purchase {
    /// `DD/MM/YYYY`.
    pub receipt_date: String,
    pub method: String,
    pub customer_id: i32,
    #[serde(default)]
    pub cv_id: Option<i32>,
    #[serde(default)]
    pub products: Vec<OrderLine>,
    #[serde(default)]
    pub tickets: Vec<TicketLine>,
}

/// Receipt fields that aren't line items.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    pub date: Date,
    pub method: String,
    pub customer_id: i32,
    pub cv_id: Option<i32>,
}

/// A purchase that passed validation and may be handed to the store.
#[derive(Clone, Debug)]
pub struct Validated {
    header: Header,
    tickets: Vec<TicketLine>,
    products: Vec<OrderLine>,
}

#[derive(Clone, Debug, Display, PartialEq)]
pub enum Invalid {
    #[display("Receipt must contain at least one ticket or product")]
    Empty,

    #[display("{_0}")]
    Date(date::InvalidDate),
}

impl Purchase {
    pub fn validate(self) -> Result<Validated, Invalid> {
        if self.tickets.is_empty() && self.products.is_empty() {
            return Err(Invalid::Empty);
        }
        let date = date::parse_dmy(&self.receipt_date).map_err(Invalid::Date)?;

        Ok(Validated {
            header: Header {
                date,
                method: self.method,
                customer_id: self.customer_id,
                cv_id: self.cv_id,
            },
            tickets: self.tickets,
            products: self.products,
        })
    }
}

/// Persistence primitives the assembly is built from.
///
/// A value of this type is one open transaction; dropping it without
/// [`commit`](Self::commit) must discard every write made through it.
#[async_trait]
pub trait Store: Send {
    type Error: std::fmt::Debug + Send;

    /// Creates a receipt with its first ticket and, optionally, its first
    /// product. Returns the new receipt identifier.
    async fn create_receipt(
        &mut self,
        header: &Header,
        ticket: &TicketLine,
        product: Option<&OrderLine>,
    ) -> Result<Option<Id>, Self::Error>;

    /// Inserts a receipt with no lines. Returns the new receipt identifier.
    async fn insert_header(
        &mut self,
        header: &Header,
    ) -> Result<Option<Id>, Self::Error>;

    async fn attach_ticket(
        &mut self,
        receipt: Id,
        ticket: &TicketLine,
    ) -> Result<(), Self::Error>;

    async fn attach_product(
        &mut self,
        receipt: Id,
        product: &OrderLine,
    ) -> Result<(), Self::Error>;

    /// Marks an available voucher instance of the customer as used.
    /// Returns whether a voucher was actually marked.
    async fn redeem_voucher(
        &mut self,
        customer_id: i32,
        cv_id: i32,
    ) -> Result<bool, Self::Error>;

    async fn commit(self) -> Result<(), Self::Error>;

    async fn rollback(self) -> Result<(), Self::Error>;
}

#[derive(Debug, Display, PartialEq)]
pub enum Error<E> {
    #[display("Failed to create receipt")]
    MissingReceiptId,

    #[display("Voucher is not available")]
    VoucherUnavailable,

    #[display("store failure")]
    Store(E),
}

/// Persists the purchase through `store` and commits it.
///
/// On any failure the transaction is rolled back before the error is
/// returned.
pub async fn assemble<S: Store>(
    mut store: S,
    purchase: &Validated,
) -> Result<Id, Error<S::Error>> {
    match write_lines(&mut store, purchase).await {
        Ok(id) => {
            store.commit().await.map_err(Error::Store)?;
            tracing::info!(
                receipt_id = %id,
                tickets = purchase.tickets.len(),
                products = purchase.products.len(),
                "receipt created",
            );
            Ok(id)
        }
        Err(e) => {
            tracing::warn!(
                customer_id = purchase.header.customer_id,
                "receipt assembly failed, rolling back",
            );
            if let Err(err) = store.rollback().await {
                tracing::warn!(error = ?err, "receipt rollback failed");
            }
            Err(e)
        }
    }
}

async fn write_lines<S: Store>(
    store: &mut S,
    purchase: &Validated,
) -> Result<Id, Error<S::Error>> {
    let Validated {
        header,
        tickets,
        products,
    } = purchase;

    match tickets.split_first() {
        Some((first_ticket, other_tickets)) => {
            let first_product = products.first();
            let id = store
                .create_receipt(header, first_ticket, first_product)
                .await
                .map_err(Error::Store)?
                .ok_or(Error::MissingReceiptId)?;

            for ticket in other_tickets {
                store
                    .attach_ticket(id, ticket)
                    .await
                    .map_err(Error::Store)?;
            }
            for product in products.iter().skip(1) {
                store
                    .attach_product(id, product)
                    .await
                    .map_err(Error::Store)?;
            }

            Ok(id)
        }
        None => {
            let id = store
                .insert_header(header)
                .await
                .map_err(Error::Store)?
                .ok_or(Error::MissingReceiptId)?;

            for product in products {
                store
                    .attach_product(id, product)
                    .await
                    .map_err(Error::Store)?;
            }

            if let Some(cv_id) = header.cv_id {
                let redeemed = store
                    .redeem_voucher(header.customer_id, cv_id)
                    .await
                    .map_err(Error::Store)?;
                if !redeemed {
                    return Err(Error::VoucherUnavailable);
                }
            }

            Ok(id)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        sync::{Arc, Mutex},
    };

    use crate::db::Failure;

    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum Call {
        CreateReceipt {
            seat: String,
            product: Option<i32>,
        },
        InsertHeader,
        AttachTicket(Id, String),
        AttachProduct(Id, i32),
        RedeemVoucher(i32),
    }

    #[derive(Default)]
    struct Committed {
        receipts: Vec<Id>,
        tickets: Vec<(Id, String)>,
        products: Vec<(Id, i32)>,
        used_vouchers: HashSet<i32>,
        sold_seats: HashSet<String>,
        next_id: i32,
    }

    /// In-memory stand-in for one store transaction. Writes become visible
    /// in the shared state only on commit.
    struct FakeStore {
        shared: Arc<Mutex<Committed>>,
        calls: Arc<Mutex<Vec<Call>>>,
        fail_at: Option<usize>,
        fails_rollback: bool,
        returns_no_id: bool,
        pending: Committed,
    }

    impl FakeStore {
        fn new(shared: &Arc<Mutex<Committed>>) -> Self {
            Self {
                shared: Arc::clone(shared),
                calls: Arc::default(),
                fail_at: None,
                fails_rollback: false,
                returns_no_id: false,
                pending: Committed::default(),
            }
        }

        fn failing_at(mut self, call: usize) -> Self {
            self.fail_at = Some(call);
            self
        }

        fn record(&mut self, call: Call) -> Result<(), Failure> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(call);
            if self.fail_at == Some(calls.len() - 1) {
                return Err(Failure::Rejected("injected failure".into()));
            }
            Ok(())
        }

        fn new_receipt(&mut self) -> Option<Id> {
            if self.returns_no_id {
                return None;
            }
            let mut shared = self.shared.lock().unwrap();
            shared.next_id += 1;
            let id = Id(shared.next_id);
            self.pending.receipts.push(id);
            Some(id)
        }

        fn sell(&mut self, receipt: Id, seat: &str) -> Result<(), Failure> {
            let taken = self.shared.lock().unwrap().sold_seats.contains(seat)
                || self.pending.sold_seats.contains(seat);
            if taken {
                return Err(Failure::Rejected(format!(
                    "Seat {seat} is already booked"
                )));
            }
            self.pending.sold_seats.insert(seat.to_owned());
            self.pending.tickets.push((receipt, seat.to_owned()));
            Ok(())
        }

        fn use_voucher(&mut self, cv_id: i32) -> bool {
            let used = self.shared.lock().unwrap().used_vouchers.contains(&cv_id)
                || self.pending.used_vouchers.contains(&cv_id);
            !used && self.pending.used_vouchers.insert(cv_id)
        }
    }

    #[async_trait]
    impl Store for FakeStore {
        type Error = Failure;

        async fn create_receipt(
            &mut self,
            header: &Header,
            ticket: &TicketLine,
            product: Option<&OrderLine>,
        ) -> Result<Option<Id>, Failure> {
            self.record(Call::CreateReceipt {
                seat: ticket.seat_number.clone(),
                product: product.map(|p| p.product_id),
            })?;
            if let Some(cv_id) = header.cv_id {
                if !self.use_voucher(cv_id) {
                    return Err(Failure::Rejected(
                        "Voucher is not available".into(),
                    ));
                }
            }
            let Some(id) = self.new_receipt() else {
                return Ok(None);
            };
            self.sell(id, &ticket.seat_number)?;
            if let Some(p) = product {
                self.pending.products.push((id, p.product_id));
            }
            Ok(Some(id))
        }

        async fn insert_header(
            &mut self,
            _: &Header,
        ) -> Result<Option<Id>, Failure> {
            self.record(Call::InsertHeader)?;
            Ok(self.new_receipt())
        }

        async fn attach_ticket(
            &mut self,
            receipt: Id,
            ticket: &TicketLine,
        ) -> Result<(), Failure> {
            self.record(Call::AttachTicket(
                receipt,
                ticket.seat_number.clone(),
            ))?;
            self.sell(receipt, &ticket.seat_number)
        }

        async fn attach_product(
            &mut self,
            receipt: Id,
            product: &OrderLine,
        ) -> Result<(), Failure> {
            self.record(Call::AttachProduct(receipt, product.product_id))?;
            self.pending.products.push((receipt, product.product_id));
            Ok(())
        }

        async fn redeem_voucher(
            &mut self,
            _: i32,
            cv_id: i32,
        ) -> Result<bool, Failure> {
            self.record(Call::RedeemVoucher(cv_id))?;
            Ok(self.use_voucher(cv_id))
        }

        async fn commit(self) -> Result<(), Failure> {
            let mut shared = self.shared.lock().unwrap();
            let pending = self.pending;
            shared.receipts.extend(pending.receipts);
            shared.tickets.extend(pending.tickets);
            shared.products.extend(pending.products);
            shared.used_vouchers.extend(pending.used_vouchers);
            shared.sold_seats.extend(pending.sold_seats);
            Ok(())
        }

        async fn rollback(self) -> Result<(), Failure> {
            if self.fails_rollback {
                return Err(Failure::Rejected("connection lost".into()));
            }
            Ok(())
        }
    }

    fn ticket(seat: &str) -> TicketLine {
        TicketLine {
            movie_id: 5,
            showtime_id: 2,
            branch_id: 1,
            hall_number: 1,
            seat_number: seat.into(),
            price: 10.0,
        }
    }

    fn product(product_id: i32) -> OrderLine {
        OrderLine {
            product_id,
            quantity: 2,
        }
    }

    fn purchase(
        tickets: Vec<TicketLine>,
        products: Vec<OrderLine>,
        cv_id: Option<i32>,
    ) -> Purchase {
        Purchase {
            receipt_date: "20/03/2026".into(),
            method: "Card".into(),
            customer_id: 7,
            cv_id,
            products,
            tickets,
        }
    }

    #[test]
    fn rejects_empty_purchase() {
        let err = purchase(vec![], vec![], None).validate().unwrap_err();
        assert_eq!(err, Invalid::Empty);
        assert_eq!(
            err.to_string(),
            "Receipt must contain at least one ticket or product",
        );
    }

    #[test]
    fn rejects_malformed_date() {
        let mut p = purchase(vec![ticket("A1")], vec![], None);
        p.receipt_date = "2026-03-20".into();
        let err = p.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid date format. Use dd/mm/yyyy");
    }

    #[tokio::test]
    async fn single_ticket_and_product_use_one_call() {
        let shared = Arc::default();
        let store = FakeStore::new(&shared);
        let calls = Arc::clone(&store.calls);
        let p = purchase(vec![ticket("A1")], vec![product(3)], None)
            .validate()
            .unwrap();

        let id = assemble(store, &p).await.unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            [Call::CreateReceipt {
                seat: "A1".into(),
                product: Some(3),
            }],
        );
        let state = shared.lock().unwrap();
        assert_eq!(state.receipts, [id]);
        assert_eq!(state.tickets, [(id, "A1".to_owned())]);
        assert_eq!(state.products, [(id, 3)]);
    }

    #[tokio::test]
    async fn attaches_remaining_lines_in_order() {
        let shared = Arc::default();
        let store = FakeStore::new(&shared);
        let calls = Arc::clone(&store.calls);
        let p = purchase(
            vec![ticket("A1"), ticket("A2"), ticket("A3")],
            vec![product(3), product(4)],
            None,
        )
        .validate()
        .unwrap();

        let id = assemble(store, &p).await.unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            [
                Call::CreateReceipt {
                    seat: "A1".into(),
                    product: Some(3),
                },
                Call::AttachTicket(id, "A2".into()),
                Call::AttachTicket(id, "A3".into()),
                Call::AttachProduct(id, 4),
            ],
        );
        let state = shared.lock().unwrap();
        assert_eq!(state.tickets.len(), 3);
        assert_eq!(state.products.len(), 2);
        assert!(state.tickets.iter().all(|(r, _)| *r == id));
        assert!(state.products.iter().all(|(r, _)| *r == id));
    }

    #[tokio::test]
    async fn tickets_without_products_leave_product_slot_empty() {
        let shared = Arc::default();
        let store = FakeStore::new(&shared);
        let calls = Arc::clone(&store.calls);
        let p = purchase(vec![ticket("A1"), ticket("A2")], vec![], None)
            .validate()
            .unwrap();

        let id = assemble(store, &p).await.unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            [
                Call::CreateReceipt {
                    seat: "A1".into(),
                    product: None,
                },
                Call::AttachTicket(id, "A2".into()),
            ],
        );
        assert!(shared.lock().unwrap().products.is_empty());
    }

    #[tokio::test]
    async fn products_only_insert_bare_header() {
        let shared = Arc::default();
        let store = FakeStore::new(&shared);
        let calls = Arc::clone(&store.calls);
        let p = purchase(vec![], vec![product(3), product(4)], Some(11))
            .validate()
            .unwrap();

        let id = assemble(store, &p).await.unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            [
                Call::InsertHeader,
                Call::AttachProduct(id, 3),
                Call::AttachProduct(id, 4),
                Call::RedeemVoucher(11),
            ],
        );
        let state = shared.lock().unwrap();
        assert_eq!(state.products, [(id, 3), (id, 4)]);
        assert!(state.used_vouchers.contains(&11));
    }

    #[tokio::test]
    async fn failure_at_any_step_persists_nothing() {
        let lines = || {
            purchase(
                vec![ticket("A1"), ticket("A2")],
                vec![product(3), product(4)],
                None,
            )
            .validate()
            .unwrap()
        };

        for step in 0..3 {
            let shared = Arc::default();
            let store = FakeStore::new(&shared).failing_at(step);

            let err = assemble(store, &lines()).await.unwrap_err();

            assert_eq!(
                err,
                Error::Store(Failure::Rejected("injected failure".into())),
            );
            let state = shared.lock().unwrap();
            assert!(state.receipts.is_empty(), "step {step}");
            assert!(state.tickets.is_empty(), "step {step}");
            assert!(state.products.is_empty(), "step {step}");
        }
    }

    #[tokio::test]
    async fn products_only_failure_persists_nothing() {
        for step in 0..4 {
            let shared = Arc::default();
            let store = FakeStore::new(&shared).failing_at(step);
            let p = purchase(vec![], vec![product(3), product(4)], Some(11))
                .validate()
                .unwrap();

            assert!(assemble(store, &p).await.is_err());

            let state = shared.lock().unwrap();
            assert!(state.receipts.is_empty(), "step {step}");
            assert!(state.products.is_empty(), "step {step}");
            assert!(state.used_vouchers.is_empty(), "step {step}");
        }
    }

    #[tokio::test]
    async fn failed_rollback_keeps_assembly_error() {
        let shared = Arc::default();
        let mut store = FakeStore::new(&shared).failing_at(1);
        store.fails_rollback = true;
        let p = purchase(vec![ticket("A1"), ticket("A2")], vec![], None)
            .validate()
            .unwrap();

        let err = assemble(store, &p).await.unwrap_err();

        assert_eq!(
            err,
            Error::Store(Failure::Rejected("injected failure".into())),
        );
        assert!(shared.lock().unwrap().receipts.is_empty());
    }

    #[tokio::test]
    async fn double_sold_seat_rolls_back_receipt() {
        let shared = Arc::default();
        let p = purchase(vec![ticket("A1")], vec![], None).validate().unwrap();
        assemble(FakeStore::new(&shared), &p).await.unwrap();

        let p = purchase(vec![ticket("B1"), ticket("A1")], vec![], None)
            .validate()
            .unwrap();
        let err = assemble(FakeStore::new(&shared), &p).await.unwrap_err();

        assert_eq!(
            err,
            Error::Store(Failure::Rejected("Seat A1 is already booked".into())),
        );
        let state = shared.lock().unwrap();
        assert_eq!(state.receipts.len(), 1);
        assert_eq!(state.tickets.len(), 1);
        assert!(!state.sold_seats.contains("B1"));
    }

    #[tokio::test]
    async fn voucher_is_redeemed_once() {
        let shared = Arc::default();
        let p = purchase(vec![], vec![product(3)], Some(11))
            .validate()
            .unwrap();

        assemble(FakeStore::new(&shared), &p).await.unwrap();
        let err = assemble(FakeStore::new(&shared), &p).await.unwrap_err();

        assert_eq!(err, Error::VoucherUnavailable);
        let state = shared.lock().unwrap();
        assert_eq!(state.receipts.len(), 1);
        assert_eq!(state.products.len(), 1);
    }

    #[tokio::test]
    async fn voucher_reuse_with_tickets_is_rejected_by_store() {
        let shared = Arc::default();
        let first = purchase(vec![ticket("A1")], vec![], Some(11))
            .validate()
            .unwrap();
        let second = purchase(vec![ticket("A2")], vec![], Some(11))
            .validate()
            .unwrap();

        assemble(FakeStore::new(&shared), &first).await.unwrap();
        let err = assemble(FakeStore::new(&shared), &second)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            Error::Store(Failure::Rejected("Voucher is not available".into())),
        );
        assert_eq!(shared.lock().unwrap().receipts.len(), 1);
    }

    #[tokio::test]
    async fn missing_receipt_id_fails() {
        let shared = Arc::default();
        let mut store = FakeStore::new(&shared);
        store.returns_no_id = true;
        let p = purchase(vec![], vec![product(3)], None).validate().unwrap();

        let err = assemble(store, &p).await.unwrap_err();

        assert_eq!(err, Error::MissingReceiptId);
        assert!(shared.lock().unwrap().products.is_empty());
    }
}
