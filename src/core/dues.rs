//! Merges flat payments and split-expense shares into one dues view.

use crate::core::aggregator::{dedup_by_id, is_pending_for};
use crate::core::errors::SmartRentError;
use crate::core::ledger::{extract_id, is_created_by, resolve_participant};
use crate::core::models::expense::{ExpenseCategory, ExpenseRecord, ExpenseStatus};
use crate::core::models::payment::{Payment, PaymentStatus, PaymentType};
use crate::core::money::sum_currency;
use chrono::{DateTime, Datelike, Utc};
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    All,
    Month,
    Quarter,
    Year,
}

impl Period {
    /// Whether `at` falls in the same period as `now`.
    pub fn contains(self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Period::All => true,
            Period::Month => at.year() == now.year() && at.month0() == now.month0(),
            Period::Quarter => at.year() == now.year() && at.month0() / 3 == now.month0() / 3,
            Period::Year => at.year() == now.year(),
        }
    }

    /// Like [`Period::contains`], but an absent timestamp only qualifies for `All`.
    pub fn contains_opt(self, at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match at {
            Some(at) => self.contains(at, now),
            None => self == Period::All,
        }
    }
}

impl FromStr for Period {
    type Err = SmartRentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Period::All),
            "month" => Ok(Period::Month),
            "quarter" => Ok(Period::Quarter),
            "year" => Ok(Period::Year),
            _ => Err(SmartRentError::InvalidPeriod(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DueSource {
    Payment,
    Expense,
}

/// One line of the dues view, from either a flat payment or an expense share.
#[derive(Clone, Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DueEntry {
    pub source: DueSource,
    /// Payment id or expense id.
    pub reference_id: String,
    pub title: String,
    /// Counterparty: the payment recipient, or the member who owes the share.
    pub counterparty: String,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ExpenseCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PaymentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DuesView {
    pub period: Period,
    /// Pending payments, high priority and soonest due first.
    pub outstanding: Vec<Payment>,
    pub pending_shares: Vec<DueEntry>,
    pub owed_to_me: Vec<DueEntry>,
    pub history: Vec<DueEntry>,
    pub total_outstanding: Decimal,
    pub total_owed_to_me: Decimal,
    pub total_paid_in_period: Decimal,
}

pub fn resolve_dues(
    payments: &[Payment],
    expenses: &[ExpenseRecord],
    current_user_id: &str,
    period: Period,
) -> DuesView {
    resolve_dues_at(payments, expenses, current_user_id, period, Utc::now())
}

pub fn resolve_dues_at(
    payments: &[Payment],
    expenses: &[ExpenseRecord],
    current_user_id: &str,
    period: Period,
    now: DateTime<Utc>,
) -> DuesView {
    let expenses = dedup_by_id(expenses);

    let mut outstanding: Vec<Payment> = payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Pending)
        .cloned()
        .collect();
    outstanding.sort_by_key(|p| (Reverse(p.priority.rank()), p.due_date));

    let pending_shares: Vec<DueEntry> = expenses
        .iter()
        .filter(|e| is_pending_for(e, current_user_id))
        .filter_map(|e| share_entry(e, current_user_id))
        .collect();

    let owed_to_me: Vec<DueEntry> = expenses
        .iter()
        .filter(|e| e.status == ExpenseStatus::Active && is_created_by(e, current_user_id))
        .flat_map(|e| {
            e.participants
                .iter()
                .filter(|p| !p.is_paid && extract_id(&p.user_id) != current_user_id)
                .map(move |p| DueEntry {
                    source: DueSource::Expense,
                    reference_id: e.id.clone(),
                    title: e.title.clone(),
                    counterparty: p.name.clone(),
                    amount: p.amount,
                    category: Some(e.category),
                    payment_type: None,
                    paid_at: None,
                })
        })
        .collect();

    let mut history: Vec<DueEntry> = payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Paid)
        .filter(|p| p.paid_at.is_some_and(|at| period.contains(at, now)))
        .map(|p| DueEntry {
            source: DueSource::Payment,
            reference_id: p.id.clone(),
            title: p.title.clone(),
            counterparty: p.recipient.clone(),
            amount: p.amount,
            category: None,
            payment_type: Some(p.kind),
            paid_at: p.paid_at,
        })
        .collect();
    history.extend(expenses.iter().filter_map(|e| {
        let share = resolve_participant(e, current_user_id)?;
        if !share.is_paid || !period.contains_opt(share.paid_at, now) {
            return None;
        }
        share_entry(e, current_user_id)
    }));
    // Most recent first; entries without a timestamp go last.
    history.sort_by_key(|entry| (entry.paid_at.is_none(), Reverse(entry.paid_at)));

    let total_outstanding = sum_currency(
        outstanding
            .iter()
            .map(|p| p.amount)
            .chain(pending_shares.iter().map(|s| s.amount)),
    );
    let total_owed_to_me = sum_currency(owed_to_me.iter().map(|d| d.amount));
    let total_paid_in_period = sum_currency(history.iter().map(|d| d.amount));

    debug!(
        "Resolved dues for user {} ({:?}): {} outstanding, {} pending shares, {} history",
        current_user_id,
        period,
        outstanding.len(),
        pending_shares.len(),
        history.len()
    );

    DuesView {
        period,
        outstanding,
        pending_shares,
        owed_to_me,
        history,
        total_outstanding,
        total_owed_to_me,
        total_paid_in_period,
    }
}

/// The user's own share of an expense; the amount is the share, not the expense total.
fn share_entry(expense: &ExpenseRecord, user_id: &str) -> Option<DueEntry> {
    let share = resolve_participant(expense, user_id)?;
    let counterparty = expense
        .created_by
        .as_ref()
        .map(|creator| extract_id(creator).to_string())
        .unwrap_or_default();
    Some(DueEntry {
        source: DueSource::Expense,
        reference_id: expense.id.clone(),
        title: expense.title.clone(),
        counterparty,
        amount: share.amount,
        category: Some(expense.category),
        payment_type: None,
        paid_at: share.paid_at,
    })
}

