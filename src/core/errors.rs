use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

#[derive(Error, Debug, Serialize)]
pub enum SmartRentError {
    /// Negative or non-finite value where a non-negative currency value is required
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    /// Split request cannot be satisfied (no participants, negative total, duplicates)
    #[error("Invalid split: {0}")]
    InvalidSplit(String),
    #[error("Email is required")]
    MissingEmail,
    #[error("Email {0} already registered")]
    EmailAlreadyRegistered(String),
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),
    #[error("User {0} not found")]
    UserNotFound(String),
    #[error("Flat {0} not found")]
    FlatNotFound(String),
    #[error("Join code {0} not found")]
    JoinCodeNotFound(String),
    #[error("User {0} is already a flat member")]
    AlreadyFlatMember(String),
    #[error("User {0} is not an active flat member")]
    NotFlatMember(String),
    #[error("User {0} is not the flat admin")]
    NotFlatAdmin(String),
    #[error("Flat admin {0} cannot leave the flat")]
    AdminCannotLeave(String),
    #[error("Expense {0} not found")]
    ExpenseNotFound(String),
    #[error("User {0} is not a participant of this expense")]
    NotParticipant(String),
    #[error("Share of user {0} is already paid")]
    ParticipantAlreadyPaid(String),
    #[error("Expense {0} is not fully paid")]
    ExpenseNotPaid(String),
    #[error("Payment {0} not found")]
    PaymentNotFound(String),
    #[error("Payment {0} already paid")]
    PaymentAlreadyPaid(String),
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),
    #[error("Internal server error: {0}")]
    InternalServerError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Logging error: {0}")]
    LoggingError(String),
}
