//! Mobile Money transaction records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One Mobile Money transaction, as served by the transactions endpoint.
///
/// Only the fields consumed by the dashboard are modeled. Unknown fields in the JSON records
/// are ignored.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub struct Transaction {
    /// Server-assigned record ID.
    #[serde(rename = "TransactionID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Transaction value in currency units. Non-negative.
    #[serde(rename = "Amount")]
    pub amount: Decimal,

    /// Date-time string whose first 10 characters are a `YYYY-MM-DD` calendar date.
    #[serde(rename = "DateTime")]
    pub date_time: String,

    /// Short category label, e.g. `cashin` or `payment`.
    #[serde(rename = "TransactionType")]
    pub transaction_type: String,

    /// Currency code, when the server provides one.
    #[serde(rename = "Currency", default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl Transaction {
    /// The calendar date portion of the `DateTime` string.
    ///
    /// A plain prefix slice. No timezone conversion, no locale parsing.
    pub fn date_only(&self) -> &str {
        self.date_time.get(..10).unwrap_or(&self.date_time)
    }
}
