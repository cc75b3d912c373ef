use crate::core::aggregator::{aggregate, budget_status, dedup_by_id, member_contribution, rent_per_person};
use crate::core::models::expense::{ExpenseCategory, ExpenseStatus};
use crate::core::models::flat::{Flat, FlatMember, MemberRole, MemberStatus};
use crate::core::models::user::UserRef;
use crate::tests::{at, dec, expense, share};
use rust_decimal::Decimal;

fn flat_with(rent: &str, budget: Option<&str>, statuses: &[MemberStatus]) -> Flat {
    Flat {
        id: "flat-1".to_string(),
        name: "Maple Street".to_string(),
        join_code: "ABC123".to_string(),
        rent: dec(rent),
        monthly_budget: budget.map(dec),
        admin: UserRef::Id("u0".to_string()),
        members: statuses
            .iter()
            .enumerate()
            .map(|(i, status)| FlatMember {
                user: UserRef::Id(format!("u{}", i)),
                name: format!("Member {}", i),
                role: if i == 0 { MemberRole::Admin } else { MemberRole::CoTenant },
                status: *status,
                joined_at: at(2026, 1, 1),
            })
            .collect(),
        forecast: None,
        created_at: at(2026, 1, 1),
    }
}

#[test]
fn test_duplicate_ids_counted_once_first_wins() {
    let first = expense("e1", "100", ExpenseStatus::Active, vec![share("u1", "100", false)]);
    let second = expense("e1", "999", ExpenseStatus::Active, vec![share("u1", "999", false)]);
    let expenses = vec![first, second];

    let unique = dedup_by_id(&expenses);
    assert_eq!(unique.len(), 1);

    let summary = aggregate(&expenses, "u1");
    assert_eq!(summary.total_flat_expenses, dec("100"));
    assert_eq!(summary.active.len(), 1);
    assert_eq!(summary.active[0].total_amount, dec("100"));
    assert_eq!(summary.user_stats.total_owed, dec("100"));
    assert_eq!(summary.user_stats.total_participations, 1);
}

#[test]
fn test_dedup_keeps_first_seen_order() {
    let expenses = vec![
        expense("e2", "1", ExpenseStatus::Active, vec![]),
        expense("e1", "1", ExpenseStatus::Active, vec![]),
        expense("e2", "1", ExpenseStatus::Paid, vec![]),
        expense("e3", "1", ExpenseStatus::Active, vec![]),
    ];
    let ids: Vec<&str> = dedup_by_id(&expenses).iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["e2", "e1", "e3"]);
}

#[test]
fn test_paid_expense_with_unpaid_row_is_not_pending() {
    let expenses = vec![expense(
        "e1",
        "50",
        ExpenseStatus::Paid,
        vec![share("u1", "25", false), share("u2", "25", true)],
    )];
    let summary = aggregate(&expenses, "u1");

    assert!(summary.pending_for_user.is_empty());
    assert_eq!(summary.user_stats.pending_amount, Decimal::ZERO);
    assert_eq!(summary.user_stats.total_owed, dec("25"));
    assert_eq!(summary.paid.len(), 1);
}

#[test]
fn test_member_contribution_differs_from_flat_paid_total() {
    let expenses = vec![
        expense(
            "e1",
            "200",
            ExpenseStatus::Active,
            vec![share("u1", "100", true), share("u2", "100", false)],
        ),
        expense(
            "e2",
            "100",
            ExpenseStatus::Active,
            vec![share("u1", "50", false), share("u2", "50", false)],
        ),
    ];

    assert_eq!(member_contribution(&expenses, "u1"), dec("150"));
    let summary = aggregate(&expenses, "u2");
    assert_eq!(summary.total_paid_amount, dec("100"));
    assert_eq!(summary.member_contributions.get("u1"), Some(&dec("150")));
    assert_eq!(summary.member_contributions.get("u2"), Some(&dec("150")));
}

#[test]
fn test_buckets_categories_and_user_stats() {
    let mut internet = expense(
        "e2",
        "60",
        ExpenseStatus::Paid,
        vec![share("u1", "30", true), share("u2", "30", true)],
    );
    internet.category = ExpenseCategory::Internet;
    let expenses = vec![
        expense(
            "e1",
            "90",
            ExpenseStatus::Active,
            vec![share("u1", "45", false), share("u2", "45", true)],
        ),
        internet,
        expense("e3", "40", ExpenseStatus::Settled, vec![share("u2", "40", true)]),
        expense(
            "e4",
            "10.50",
            ExpenseStatus::Active,
            vec![share("u1", "5.25", true), share("u3", "5.25", false)],
        ),
    ];
    let summary = aggregate(&expenses, "u1");

    let active: Vec<&str> = summary.active.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(active, vec!["e1", "e4"]);
    assert_eq!(summary.paid.len(), 1);
    assert_eq!(summary.settled.len(), 1);

    assert_eq!(summary.total_flat_expenses, dec("200.50"));
    assert_eq!(summary.category_breakdown.get(&ExpenseCategory::Groceries), Some(&dec("140.50")));
    assert_eq!(summary.category_breakdown.get(&ExpenseCategory::Internet), Some(&dec("60")));
    assert!(!summary.category_breakdown.contains_key(&ExpenseCategory::Rent));

    let pending: Vec<&str> = summary.pending_for_user.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(pending, vec!["e1"]);
    assert_eq!(summary.user_stats.total_participations, 3);
    assert_eq!(summary.user_stats.total_owed, dec("80.25"));
    assert_eq!(summary.user_stats.paid_amount, dec("35.25"));
    assert_eq!(summary.user_stats.pending_amount, dec("45"));
}

#[test]
fn test_user_outside_every_expense_has_empty_stats() {
    let expenses = vec![expense("e1", "20", ExpenseStatus::Active, vec![share("u1", "20", false)])];
    let summary = aggregate(&expenses, "stranger");
    assert_eq!(summary.user_stats.total_participations, 0);
    assert_eq!(summary.user_stats.total_owed, Decimal::ZERO);
    assert!(summary.pending_for_user.is_empty());
}

#[test]
fn test_rent_per_person_counts_active_members_only() {
    let flat = flat_with(
        "1000",
        None,
        &[MemberStatus::Active, MemberStatus::Active, MemberStatus::Inactive, MemberStatus::Active],
    );
    assert_eq!(rent_per_person(&flat), dec("333.33"));

    let empty = flat_with("1000", None, &[MemberStatus::Inactive]);
    assert_eq!(rent_per_person(&empty), Decimal::ZERO);
}

#[test]
fn test_budget_status_uses_current_month_only() {
    let flat = flat_with("1000", Some("150"), &[MemberStatus::Active]);
    let mut old = expense("e1", "500", ExpenseStatus::Settled, vec![]);
    old.created_at = at(2026, 9, 30);
    let mut recent = expense("e2", "120", ExpenseStatus::Active, vec![]);
    recent.created_at = at(2026, 10, 2);
    let mut latest = expense("e3", "40", ExpenseStatus::Active, vec![]);
    latest.created_at = at(2026, 10, 15);

    let status = budget_status(&flat, &[old, recent, latest], at(2026, 10, 16));
    assert_eq!(status.spent_this_month, dec("160"));
    assert_eq!(status.remaining, Some(dec("-10")));
    assert!(status.over_budget);

    let no_budget = flat_with("1000", None, &[MemberStatus::Active]);
    let status = budget_status(&no_budget, &[], at(2026, 10, 16));
    assert_eq!(status.remaining, None);
    assert!(!status.over_budget);
}
