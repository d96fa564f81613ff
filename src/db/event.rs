use time::Date;
use tokio_postgres::{Error, Row};

use super::Client;

#[derive(Clone, Debug)]
pub struct Event {
    pub id: i32,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub title: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub kind: String,
}

#[derive(Clone, Debug)]
pub struct EventInput {
    pub start_date: Date,
    pub end_date: Date,
    pub title: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub admin_id: i32,
    pub kind: String,
}

fn event_from_row(row: &Row) -> Event {
    Event {
        id: row.get("event_id"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        title: row.get("title"),
        image: row.get("image"),
        description: row.get("description"),
        kind: row.get("type"),
    }
}

impl Client {
    pub async fn get_events(&self) -> Result<Vec<Event>, Error> {
        const SQL: &str = "\
            SELECT event_id, start_date, end_date, title, image, \
                   description, type \
            FROM event \
            ORDER BY event_id ASC";
        Ok(self
            .shared()
            .await
            .query(SQL, &[])
            .await?
            .iter()
            .map(event_from_row)
            .collect())
    }

    /// Events, latest start first.
    pub async fn get_events_by_start(&self) -> Result<Vec<Event>, Error> {
        const SQL: &str = "\
            SELECT event_id, start_date, end_date, title, image, \
                   description, type \
            FROM event \
            ORDER BY start_date DESC";
        Ok(self
            .shared()
            .await
            .query(SQL, &[])
            .await?
            .iter()
            .map(event_from_row)
            .collect())
    }

    pub async fn get_event_by_id(&self, id: i32) -> Result<Option<Event>, Error> {
        const SQL: &str = "\
            SELECT event_id, start_date, end_date, title, image, \
                   description, type \
            FROM event \
            WHERE event_id = $1";
        Ok(self
            .shared()
            .await
            .query_opt(SQL, &[&id])
            .await?
            .as_ref()
            .map(event_from_row))
    }

    pub async fn create_event(&self, event: &EventInput) -> Result<(), Error> {
        const SQL: &str = "CALL create_event($1, $2, $3, $4, $5, $6, $7)";
        self.shared()
            .await
            .execute(
                SQL,
                &[
                    &event.start_date,
                    &event.end_date,
                    &event.title,
                    &event.image,
                    &event.description,
                    &event.admin_id,
                    &event.kind,
                ],
            )
            .await
            .map(drop)
    }

    pub async fn update_event(
        &self,
        id: i32,
        event: &EventInput,
    ) -> Result<(), Error> {
        const SQL: &str = "CALL update_event($1, $2, $3, $4, $5, $6, $7, $8)";
        self.shared()
            .await
            .execute(
                SQL,
                &[
                    &id,
                    &event.start_date,
                    &event.end_date,
                    &event.title,
                    &event.image,
                    &event.description,
                    &event.admin_id,
                    &event.kind,
                ],
            )
            .await
            .map(drop)
    }

    pub async fn delete_event(&self, id: i32) -> Result<(), Error> {
        const SQL: &str = "CALL delete_event($1)";
        self.shared().await.execute(SQL, &[&id]).await.map(drop)
    }
}
