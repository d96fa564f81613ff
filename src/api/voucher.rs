use serde::{Deserialize, Serialize};

use crate::{date, db};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerVoucher {
    #[serde(rename = "CV_id")]
    pub cv_id: i32,
    #[serde(rename = "Voucher_id")]
    pub voucher_id: i32,
    pub status: String,
    pub discount: f64,
    /// `DD/MM/YYYY`.
    pub expiration: String,
    pub condition: String,
    pub description: Option<String>,
}

impl From<db::voucher::CustomerVoucher> for CustomerVoucher {
    fn from(v: db::voucher::CustomerVoucher) -> Self {
        Self {
            cv_id: v.cv_id,
            voucher_id: v.voucher_id,
            status: v.status,
            discount: v.discount,
            expiration: date::format_dmy(v.expiration),
            condition: v.condition,
            description: v.description,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Voucher {
    pub voucher_id: i32,
    pub discount: f64,
    /// `DD/MM/YYYY`.
    pub expiration: String,
    pub description: Option<String>,
    pub condition: String,
}

impl From<db::voucher::Voucher> for Voucher {
    fn from(v: db::voucher::Voucher) -> Self {
        Self {
            voucher_id: v.id,
            discount: v.discount,
            expiration: date::format_dmy(v.expiration),
            description: v.description,
            condition: v.condition,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewVoucher {
    pub discount: f64,
    /// `DD/MM/YYYY`.
    pub expiration: String,
    #[serde(default)]
    pub description: Option<String>,
    pub condition: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct VoucherPatch {
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub expiration: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
}

impl VoucherPatch {
    pub fn into_db(self) -> Result<db::voucher::VoucherPatch, date::InvalidDate> {
        Ok(db::voucher::VoucherPatch {
            discount: self.discount,
            expiration: self
                .expiration
                .as_deref()
                .map(date::parse_dmy)
                .transpose()?,
            description: self.description,
            condition: self.condition,
        })
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Changed {
    pub message: String,
    pub voucher_id: i32,
}
