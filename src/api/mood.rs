use serde::{Deserialize, Serialize};

use crate::db;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Vote {
    pub movie_id: i32,
    pub customer_id: i32,
    pub mood_id: i32,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MoodCount {
    pub mood_id: i32,
    pub mood_name: String,
    pub count: i64,
}

impl From<db::mood::MoodCount> for MoodCount {
    fn from(m: db::mood::MoodCount) -> Self {
        Self {
            mood_id: m.mood_id,
            mood_name: m.mood_name,
            count: m.count,
        }
    }
}
