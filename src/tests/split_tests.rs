use crate::core::errors::SmartRentError;
use crate::core::ledger::extract_id;
use crate::core::split::{build_participants, compute_equal_split};
use crate::tests::dec;
use rust_decimal::Decimal;

#[test]
fn test_remainder_goes_to_last_participant() {
    let shares = compute_equal_split(dec("100.00"), 3).unwrap();
    assert_eq!(shares, vec![dec("33.33"), dec("33.33"), dec("33.34")]);
}

#[test]
fn test_single_participant_takes_total() {
    let shares = compute_equal_split(dec("50.00"), 1).unwrap();
    assert_eq!(shares, vec![dec("50.00")]);
}

#[test]
fn test_shares_always_reconcile_with_total() {
    let totals = ["0", "0.01", "0.05", "1", "10.00", "99.99", "100.00", "1234.57", "999999.99"];
    for total in totals {
        for n in 1..=13 {
            let shares = compute_equal_split(dec(total), n).unwrap();
            assert_eq!(shares.len(), n);
            assert_eq!(shares.iter().copied().sum::<Decimal>(), dec(total), "total {} n {}", total, n);
            assert!(shares.iter().all(|s| *s >= Decimal::ZERO), "total {} n {}", total, n);
        }
    }
}

#[test]
fn test_small_total_truncates_to_zero_shares() {
    let shares = compute_equal_split(dec("0.02"), 3).unwrap();
    assert_eq!(shares, vec![dec("0.00"), dec("0.00"), dec("0.02")]);
}

#[test]
fn test_invalid_split_inputs() {
    assert!(matches!(compute_equal_split(dec("10"), 0), Err(SmartRentError::InvalidSplit(_))));
    assert!(matches!(compute_equal_split(dec("-1"), 2), Err(SmartRentError::InvalidSplit(_))));
}

#[test]
fn test_build_participants_in_selection_order() {
    let members = vec![
        ("u2".to_string(), "Bob".to_string()),
        ("u1".to_string(), "Alice".to_string()),
        ("u3".to_string(), "Carol".to_string()),
    ];
    let participants = build_participants(dec("100.00"), &members).unwrap();

    let ids: Vec<&str> = participants.iter().map(|p| extract_id(&p.user_id)).collect();
    assert_eq!(ids, vec!["u2", "u1", "u3"]);
    assert_eq!(participants[2].name, "Carol");
    assert_eq!(participants[2].amount, dec("33.34"));
    assert!(participants.iter().all(|p| !p.is_paid && p.paid_at.is_none()));
}

#[test]
fn test_build_participants_rejects_duplicates() {
    let members = vec![
        ("u1".to_string(), "Alice".to_string()),
        ("u1".to_string(), "Alice".to_string()),
    ];
    let result = build_participants(dec("10.00"), &members);
    assert!(matches!(result, Err(SmartRentError::InvalidSplit(_))));
}
