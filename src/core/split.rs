use crate::core::errors::SmartRentError;
use crate::core::models::expense::Participant;
use crate::core::models::user::UserRef;
use crate::core::money::truncate_cents;
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Splits `total` into `participant_count` shares that add back up to `total` exactly.
///
/// Every share but the last is `total / n` truncated to cents; the last one absorbs
/// the remainder. With `total = 100.00` and three participants this yields
/// `[33.33, 33.33, 33.34]`.
pub fn compute_equal_split(total: Decimal, participant_count: usize) -> Result<Vec<Decimal>, SmartRentError> {
    if participant_count == 0 {
        return Err(SmartRentError::InvalidSplit(
            "participant count must be greater than 0".to_string(),
        ));
    }
    if total < Decimal::ZERO {
        return Err(SmartRentError::InvalidSplit(format!("total must not be negative, got {}", total)));
    }

    let share = truncate_cents(total / Decimal::from(participant_count));
    let mut shares = vec![share; participant_count - 1];
    let assigned: Decimal = shares.iter().copied().sum();
    shares.push(total - assigned);

    debug!("Split {} across {} participants: {:?}", total, participant_count, shares);
    Ok(shares)
}

/// Builds unpaid participant rows for `members` in selection order.
///
/// `members` holds `(user_id, display_name)` pairs; the last selected member
/// carries the split remainder.
pub fn build_participants(total: Decimal, members: &[(String, String)]) -> Result<Vec<Participant>, SmartRentError> {
    let mut seen = HashSet::new();
    for (user_id, _) in members {
        if !seen.insert(user_id.as_str()) {
            return Err(SmartRentError::InvalidSplit(format!(
                "user {} selected more than once",
                user_id
            )));
        }
    }

    let shares = compute_equal_split(total, members.len())?;
    Ok(members
        .iter()
        .zip(shares)
        .map(|((user_id, name), amount)| Participant {
            user_id: UserRef::from(user_id.as_str()),
            name: name.clone(),
            amount,
            is_paid: false,
            paid_at: None,
        })
        .collect())
}
