use crate::core::models::expense::{ExpenseRecord, Participant};
use crate::core::models::user::UserRef;

/// Underlying id of a user reference, whichever shape the backend sent.
pub fn extract_id(user: &UserRef) -> &str {
    match user {
        UserRef::Id(id) => id,
        UserRef::Populated(populated) => &populated.id,
    }
}

/// Finds `user_id`'s participant row in `expense`.
///
/// `None` means the user has no stake in the expense, which is a normal outcome.
/// When a user appears more than once only the first row is considered.
pub fn resolve_participant<'a>(expense: &'a ExpenseRecord, user_id: &str) -> Option<&'a Participant> {
    expense
        .participants
        .iter()
        .find(|p| extract_id(&p.user_id) == user_id)
}

pub fn is_participant(expense: &ExpenseRecord, user_id: &str) -> bool {
    resolve_participant(expense, user_id).is_some()
}

/// Whether the expense was fronted by `user_id`.
pub fn is_created_by(expense: &ExpenseRecord, user_id: &str) -> bool {
    expense
        .created_by
        .as_ref()
        .is_some_and(|creator| extract_id(creator) == user_id)
}
