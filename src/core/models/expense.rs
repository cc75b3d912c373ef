use super::user::UserRef;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Utilities,
    Groceries,
    Internet,
    Maintenance,
    Rent,
    Cleaning,
    Furniture,
    Other,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    Active,
    Paid,
    Settled,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user_id: UserRef,
    pub name: String,
    pub amount: Decimal,
    pub is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub flat_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: ExpenseCategory,
    pub total_amount: Decimal,
    pub status: ExpenseStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserRef>,
    pub participants: Vec<Participant>,
}

impl ExpenseRecord {
    pub fn all_paid(&self) -> bool {
        !self.participants.is_empty() && self.participants.iter().all(|p| p.is_paid)
    }
}
