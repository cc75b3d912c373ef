use crate::core::errors::SmartRentError;
use crate::core::models::{
    audit::FlatAudit, expense::ExpenseRecord, flat::Flat, payment::Payment, user::User,
};
use async_trait::async_trait;

/// Repository the service reads records from and writes them back to.
///
/// Reads return owned copies; callers replace whole records on save.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_user_if_not_exists(&self, user: User) -> Result<Option<User>, SmartRentError>;
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, SmartRentError>;
    async fn save_flat(&self, flat: Flat) -> Result<(), SmartRentError>;
    async fn get_flat(&self, flat_id: &str) -> Result<Option<Flat>, SmartRentError>;
    async fn get_flat_by_join_code(&self, join_code: &str) -> Result<Option<Flat>, SmartRentError>;
    async fn save_expense(&self, expense: ExpenseRecord) -> Result<(), SmartRentError>;
    async fn get_expense(&self, expense_id: &str) -> Result<Option<ExpenseRecord>, SmartRentError>;
    /// Expenses of a flat, most recently created first.
    async fn get_expenses(&self, flat_id: &str) -> Result<Vec<ExpenseRecord>, SmartRentError>;
    async fn save_payment(&self, payment: Payment) -> Result<(), SmartRentError>;
    async fn get_payment(&self, payment_id: &str) -> Result<Option<Payment>, SmartRentError>;
    /// Payments of a flat owed by `payer_id`, most recently created first.
    async fn get_payments(&self, flat_id: &str, payer_id: &str) -> Result<Vec<Payment>, SmartRentError>;
    async fn save_flat_audit(&self, audit: FlatAudit) -> Result<(), SmartRentError>;
    async fn get_flat_audits(&self, flat_id: &str) -> Result<Vec<FlatAudit>, SmartRentError>;
}

pub mod in_memory;
