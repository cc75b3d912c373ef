use crate::core::errors::SmartRentError;
use crate::core::money::{ensure_non_negative, from_f64, round_currency, sum_currency};
use crate::tests::dec;

#[test]
fn test_round_currency_half_up() {
    assert_eq!(round_currency(dec("10.005")), dec("10.01"));
    assert_eq!(round_currency(dec("10.004")), dec("10.00"));
    assert_eq!(round_currency(dec("2.675")), dec("2.68"));
    assert_eq!(round_currency(dec("7")), dec("7.00"));
}

#[test]
fn test_repeated_additions_do_not_drift() {
    let total = sum_currency(std::iter::repeat_n(dec("0.1"), 10));
    assert_eq!(total, dec("1.00"));
}

#[test]
fn test_ensure_non_negative() {
    assert_eq!(ensure_non_negative("rent", dec("0")).unwrap(), dec("0"));
    assert_eq!(ensure_non_negative("rent", dec("12.50")).unwrap(), dec("12.50"));
    let result = ensure_non_negative("rent", dec("-0.01"));
    assert!(matches!(result, Err(SmartRentError::InvalidAmount(_))));
}

#[test]
fn test_from_f64_rejects_non_finite() {
    assert_eq!(from_f64("amount", 19.999).unwrap(), dec("20.00"));
    assert!(matches!(from_f64("amount", f64::NAN), Err(SmartRentError::InvalidAmount(_))));
    assert!(matches!(from_f64("amount", f64::INFINITY), Err(SmartRentError::InvalidAmount(_))));
}
