pub mod admin;
pub mod booking;
pub mod branch;
pub mod customer;
pub mod dashboard;
pub mod event;
pub mod hall;
pub mod mood;
pub mod movie;
pub mod product;
pub mod receipt;
pub mod review;
pub mod showtime;
pub mod voucher;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio_postgres::{error::SqlState, tls::NoTlsStream, NoTls, Socket};

use crate::config;

pub use tokio_postgres::{Error, Row, Transaction};

pub type Connection = tokio_postgres::Connection<Socket, NoTlsStream>;

pub async fn connect(
    config: config::Db,
) -> Result<(Client, Connection), Error> {
    let (client, connection) =
        tokio_postgres::connect(&config.url, NoTls).await?;

    if let Some(timeout) = config.statement_timeout {
        let sql = format!("SET statement_timeout = {}", timeout.as_millis());
        client.batch_execute(&sql).await?;
    }

    Ok((Client(RwLock::new(client)), connection))
}

/// The single store connection.
///
/// Plain reads and single-statement writes share the connection. Multi-step
/// writes take it exclusively for the lifetime of their transaction, so no
/// foreign statement can land inside an open transaction.
pub struct Client(RwLock<tokio_postgres::Client>);

impl Client {
    async fn shared(&self) -> RwLockReadGuard<'_, tokio_postgres::Client> {
        self.0.read().await
    }

    pub async fn exclusive(&self) -> Exclusive<'_> {
        Exclusive(self.0.write().await)
    }
}

pub struct Exclusive<'a>(RwLockWriteGuard<'a, tokio_postgres::Client>);

impl Exclusive<'_> {
    pub async fn transaction(&mut self) -> Result<Transaction<'_>, Error> {
        self.0.transaction().await
    }
}

/// How a store failure should be reported to the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum Failure {
    /// A constraint or a routine rejected the request.
    Rejected(String),

    /// A routine reported that a referenced row doesn't exist.
    NotFound(String),

    /// Connectivity problems and anything else unexpected.
    Unclassified(String),
}

pub fn classify(err: &Error) -> Failure {
    let Some(db_err) = err.as_db_error() else {
        return Failure::Unclassified(err.to_string());
    };

    let message = strip_error_prefix(db_err.message()).to_owned();
    let code = db_err.code();
    if *code == SqlState::RAISE_EXCEPTION || code.code().starts_with("23") {
        Failure::Rejected(message)
    } else if *code == SqlState::NO_DATA_FOUND {
        Failure::NotFound(message)
    } else {
        Failure::Unclassified(message)
    }
}

/// Store routines prefix their messages with `ERROR: `, which callers
/// don't need to see.
pub fn strip_error_prefix(message: &str) -> &str {
    match message.rfind("ERROR: ") {
        Some(at) => &message[at + "ERROR: ".len()..],
        None => message,
    }
}

/// Splits a `", "`-joined aggregate into its items.
///
/// An absent or empty aggregate yields no items.
pub fn split_list(joined: Option<String>) -> Vec<String> {
    match joined {
        Some(s) if !s.is_empty() => s.split(", ").map(str::to_owned).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_error_prefix() {
        assert_eq!(
            strip_error_prefix("ERROR: Seat A1 is already booked"),
            "Seat A1 is already booked",
        );
        assert_eq!(
            strip_error_prefix("db: ERROR: Voucher is not available"),
            "Voucher is not available",
        );
        assert_eq!(strip_error_prefix("duplicate key"), "duplicate key");
    }

    #[test]
    fn splits_joined_lists() {
        assert_eq!(
            split_list(Some("Tom Hanks, Robin Wright".into())),
            ["Tom Hanks", "Robin Wright"],
        );
        assert_eq!(split_list(Some("IMAX".into())), ["IMAX"]);
    }

    #[test]
    fn empty_aggregate_is_empty_list() {
        assert!(split_list(None).is_empty());
        assert!(split_list(Some(String::new())).is_empty());
    }

    #[test]
    fn join_then_split_preserves_order() {
        let genres = vec![
            "Drama".to_owned(),
            "Romance".to_owned(),
            "Sci-Fi".to_owned(),
        ];
        assert_eq!(split_list(Some(genres.join(", "))), genres);
        assert!(split_list(Some(Vec::<String>::new().join(", "))).is_empty());
    }
}
