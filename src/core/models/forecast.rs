use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Externally computed spending forecast. Stored and returned as received.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetForecast {
    /// Calendar month the forecast is for, `YYYY-MM`.
    pub month: String,
    pub predicted_amount: Decimal,
    pub confidence: f64,
}
