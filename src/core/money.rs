//! Currency helpers shared by the split, aggregation and dues code.
//!
//! Amounts are `Decimal` so repeated additions never drift; every figure that
//! is compared or displayed goes through [`round_currency`] first.

use crate::core::errors::SmartRentError;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places in a displayed amount.
pub const CURRENCY_SCALE: u32 = 2;

/// Rounds to cents, half-up.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Truncates to cents. Only meaningful for non-negative amounts, where it equals floor.
pub fn truncate_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::ToZero)
}

pub fn ensure_non_negative(field: &str, amount: Decimal) -> Result<Decimal, SmartRentError> {
    if amount < Decimal::ZERO {
        return Err(SmartRentError::InvalidAmount(format!(
            "{} must not be negative, got {}",
            field, amount
        )));
    }
    Ok(amount)
}

/// Converts a float coming from an untyped boundary into a currency value.
pub fn from_f64(field: &str, amount: f64) -> Result<Decimal, SmartRentError> {
    if !amount.is_finite() {
        return Err(SmartRentError::InvalidAmount(format!(
            "{} must be a finite number",
            field
        )));
    }
    Decimal::from_f64(amount)
        .map(round_currency)
        .ok_or_else(|| SmartRentError::InvalidAmount(format!("{} is out of range: {}", field, amount)))
}

pub fn sum_currency<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    round_currency(amounts.into_iter().sum())
}
