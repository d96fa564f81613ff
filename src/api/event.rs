use serde::{Deserialize, Serialize};

use crate::{date, db};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Event {
    #[serde(rename = "Event_id")]
    pub event_id: i32,
    #[serde(rename = "Start_date")]
    pub start_date: Option<String>,
    #[serde(rename = "End_date")]
    pub end_date: Option<String>,
    pub title: String,
    pub image: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "Type")]
    pub kind: String,
}

impl From<db::event::Event> for Event {
    fn from(e: db::event::Event) -> Self {
        Self {
            event_id: e.id,
            start_date: e.start_date.map(date::format_dmy),
            end_date: e.end_date.map(date::format_dmy),
            title: e.title,
            image: e.image,
            description: e.description,
            kind: e.kind,
        }
    }
}

/// Event as shown in the admin panel.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminEvent {
    pub id: i32,
    pub title: String,
    pub poster: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    /// The admin panel derives the actual status from the dates.
    pub status: String,
}

impl From<db::event::Event> for AdminEvent {
    fn from(e: db::event::Event) -> Self {
        Self {
            id: e.id,
            title: e.title,
            poster: e.image,
            description: e.description,
            start_date: e.start_date.map(date::format_ymd),
            end_date: e.end_date.map(date::format_ymd),
            kind: e.kind,
            status: "Upcoming".to_owned(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    /// `YYYY-MM-DD`.
    pub start_date: String,
    /// `YYYY-MM-DD`.
    pub end_date: String,
    pub admin_id: i32,
}

impl EventInput {
    pub fn into_db(self) -> Result<db::event::EventInput, date::InvalidDate> {
        Ok(db::event::EventInput {
            start_date: date::parse_ymd(&self.start_date)?,
            end_date: date::parse_ymd(&self.end_date)?,
            title: self.title,
            image: self.image,
            description: self.description,
            admin_id: self.admin_id,
            kind: self.kind,
        })
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Created {
    pub message: String,
    pub title: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Deleted {
    pub message: String,
    pub event_id: i32,
}
