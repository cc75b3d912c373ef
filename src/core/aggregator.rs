//! Folds a flat's expense records into the figures the dashboard shows.

use crate::core::dues::Period;
use crate::core::ledger::{extract_id, resolve_participant};
use crate::core::models::expense::{ExpenseCategory, ExpenseRecord, ExpenseStatus};
use crate::core::models::flat::Flat;
use crate::core::money::{round_currency, sum_currency};
use chrono::{DateTime, Utc};
use log::debug;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};
use utoipa::ToSchema;

#[derive(Clone, Debug, Default, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_owed: Decimal,
    pub paid_amount: Decimal,
    pub pending_amount: Decimal,
    pub total_participations: usize,
}

#[derive(Clone, Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlatSummary {
    pub active: Vec<ExpenseRecord>,
    pub paid: Vec<ExpenseRecord>,
    pub settled: Vec<ExpenseRecord>,
    pub total_flat_expenses: Decimal,
    /// Paid shares of every participant, not only the current user.
    pub total_paid_amount: Decimal,
    pub category_breakdown: BTreeMap<ExpenseCategory, Decimal>,
    /// Member id to total assigned share, paid or not.
    pub member_contributions: BTreeMap<String, Decimal>,
    pub pending_for_user: Vec<ExpenseRecord>,
    pub user_stats: UserStats,
}

#[derive(Clone, Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub monthly_budget: Option<Decimal>,
    pub spent_this_month: Decimal,
    pub remaining: Option<Decimal>,
    pub over_budget: bool,
}

/// Drops repeated expense ids; the first occurrence wins and input order is kept.
pub fn dedup_by_id(expenses: &[ExpenseRecord]) -> Vec<&ExpenseRecord> {
    let mut first_seen: HashMap<&str, &ExpenseRecord> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for expense in expenses {
        if let Entry::Vacant(slot) = first_seen.entry(expense.id.as_str()) {
            slot.insert(expense);
            order.push(expense.id.as_str());
        }
    }
    order
        .into_iter()
        .filter_map(|id| first_seen.get(id).copied())
        .collect()
}

/// An expense is pending for a user only while it is active and their share is unpaid.
pub fn is_pending_for(expense: &ExpenseRecord, user_id: &str) -> bool {
    expense.status == ExpenseStatus::Active
        && resolve_participant(expense, user_id).is_some_and(|p| !p.is_paid)
}

pub fn aggregate(expenses: &[ExpenseRecord], current_user_id: &str) -> FlatSummary {
    let unique = dedup_by_id(expenses);
    debug!(
        "Aggregating {} expenses ({} unique) for user {}",
        expenses.len(),
        unique.len(),
        current_user_id
    );

    let mut active = Vec::new();
    let mut paid = Vec::new();
    let mut settled = Vec::new();
    let mut pending_for_user = Vec::new();
    let mut category_breakdown: BTreeMap<ExpenseCategory, Decimal> = BTreeMap::new();
    let mut stats = UserStats::default();

    for expense in &unique {
        match expense.status {
            ExpenseStatus::Active => active.push((*expense).clone()),
            ExpenseStatus::Paid => paid.push((*expense).clone()),
            ExpenseStatus::Settled => settled.push((*expense).clone()),
        }

        *category_breakdown.entry(expense.category).or_insert(Decimal::ZERO) += expense.total_amount;

        if let Some(share) = resolve_participant(expense, current_user_id) {
            stats.total_participations += 1;
            stats.total_owed += share.amount;
            if share.is_paid {
                stats.paid_amount += share.amount;
            }
        }
        if is_pending_for(expense, current_user_id) {
            pending_for_user.push((*expense).clone());
        }
    }

    let total_flat_expenses = sum_currency(unique.iter().map(|e| e.total_amount));
    let total_paid_amount = sum_currency(
        unique
            .iter()
            .flat_map(|e| e.participants.iter())
            .filter(|p| p.is_paid)
            .map(|p| p.amount),
    );
    let pending_amount = sum_currency(
        pending_for_user
            .iter()
            .filter_map(|e| resolve_participant(e, current_user_id))
            .map(|p| p.amount),
    );

    for amount in category_breakdown.values_mut() {
        *amount = round_currency(*amount);
    }

    FlatSummary {
        active,
        paid,
        settled,
        total_flat_expenses,
        total_paid_amount,
        category_breakdown,
        member_contributions: contributions(&unique),
        pending_for_user,
        user_stats: UserStats {
            total_owed: round_currency(stats.total_owed),
            paid_amount: round_currency(stats.paid_amount),
            pending_amount,
            total_participations: stats.total_participations,
        },
    }
}

/// Total share assigned to `member_id` across `expenses`, regardless of paid status.
pub fn member_contribution(expenses: &[ExpenseRecord], member_id: &str) -> Decimal {
    sum_currency(
        dedup_by_id(expenses)
            .into_iter()
            .filter_map(|e| resolve_participant(e, member_id))
            .map(|p| p.amount),
    )
}

fn contributions(expenses: &[&ExpenseRecord]) -> BTreeMap<String, Decimal> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for expense in expenses {
        // resolve_participant only ever sees the first row of a repeated member
        let mut counted = HashSet::new();
        for participant in &expense.participants {
            let id = extract_id(&participant.user_id);
            if counted.insert(id) {
                *totals.entry(id.to_string()).or_insert(Decimal::ZERO) += participant.amount;
            }
        }
    }
    for amount in totals.values_mut() {
        *amount = round_currency(*amount);
    }
    totals
}

/// Monthly rent divided across active members.
pub fn rent_per_person(flat: &Flat) -> Decimal {
    let active = flat.active_members().count();
    if active == 0 {
        return Decimal::ZERO;
    }
    round_currency(flat.rent / Decimal::from(active))
}

/// Compares the flat's monthly budget with expenses created in `now`'s month.
pub fn budget_status(flat: &Flat, expenses: &[ExpenseRecord], now: DateTime<Utc>) -> BudgetStatus {
    let spent_this_month = sum_currency(
        dedup_by_id(expenses)
            .into_iter()
            .filter(|e| Period::Month.contains(e.created_at, now))
            .map(|e| e.total_amount),
    );
    let remaining = flat.monthly_budget.map(|budget| round_currency(budget - spent_this_month));
    BudgetStatus {
        monthly_budget: flat.monthly_budget,
        spent_this_month,
        remaining,
        over_budget: flat.monthly_budget.is_some_and(|budget| spent_this_month > budget),
    }
}
