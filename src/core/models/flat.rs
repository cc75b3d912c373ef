use super::forecast::BudgetForecast;
use super::user::UserRef;
use crate::core::ledger::extract_id;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Admin,
    CoTenant,
    Subtenant,
    Guest,
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MemberRole::Admin => "admin",
            MemberRole::CoTenant => "co_tenant",
            MemberRole::Subtenant => "subtenant",
            MemberRole::Guest => "guest",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Inactive,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlatMember {
    pub user: UserRef,
    pub name: String,
    pub role: MemberRole,
    pub status: MemberStatus,
    pub joined_at: DateTime<Utc>,
}

impl FlatMember {
    pub fn user_id(&self) -> &str {
        extract_id(&self.user)
    }

    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }

    pub fn is_admin(&self) -> bool {
        self.role == MemberRole::Admin
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Flat {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub join_code: String,
    pub rent: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_budget: Option<Decimal>,
    pub admin: UserRef,
    pub members: Vec<FlatMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast: Option<BudgetForecast>,
    pub created_at: DateTime<Utc>,
}

impl Flat {
    pub fn admin_id(&self) -> &str {
        extract_id(&self.admin)
    }

    pub fn member(&self, user_id: &str) -> Option<&FlatMember> {
        self.members.iter().find(|m| m.user_id() == user_id)
    }

    pub fn is_active_member(&self, user_id: &str) -> bool {
        self.member(user_id).is_some_and(FlatMember::is_active)
    }

    pub fn active_members(&self) -> impl Iterator<Item = &FlatMember> {
        self.members.iter().filter(|m| m.is_active())
    }
}
