pub const USER_ADDED: &str = "USER_ADDED";
pub const FLAT_CREATED: &str = "FLAT_CREATED";
pub const MEMBER_JOINED: &str = "MEMBER_JOINED";
pub const MEMBER_REJOINED: &str = "MEMBER_REJOINED";
pub const MEMBER_LEFT: &str = "MEMBER_LEFT";
pub const MEMBER_ROLE_CHANGED: &str = "MEMBER_ROLE_CHANGED";
pub const BUDGET_UPDATED: &str = "BUDGET_UPDATED";
pub const FORECAST_UPDATED: &str = "FORECAST_UPDATED";
pub const EXPENSE_CREATED: &str = "EXPENSE_CREATED";
pub const SHARE_PAID: &str = "SHARE_PAID";
pub const EXPENSE_SETTLED: &str = "EXPENSE_SETTLED";
pub const PAYMENT_CREATED: &str = "PAYMENT_CREATED";
pub const PAYMENT_PAID: &str = "PAYMENT_PAID";

/// Length of a flat join code.
pub const JOIN_CODE_LENGTH: usize = 6;
/// Attempts at drawing an unused join code before giving up.
pub const JOIN_CODE_ATTEMPTS: usize = 16;
