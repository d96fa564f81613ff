use serde::{Deserialize, Serialize};

pub use crate::receipt::{Id, OrderLine, Purchase, TicketLine};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Created {
    pub message: String,
    pub code: u16,
    pub receipt_id: Id,
}

impl Created {
    pub fn new(receipt_id: Id) -> Self {
        Self {
            message: "Receipt created successfully".to_owned(),
            code: 200,
            receipt_id,
        }
    }
}
