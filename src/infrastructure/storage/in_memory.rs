use crate::core::errors::SmartRentError;
use crate::core::models::{
    audit::FlatAudit, expense::ExpenseRecord, flat::Flat, payment::Payment, user::User,
};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryStorage {
    users: RwLock<HashMap<String, User>>,
    emails: RwLock<HashMap<String, String>>, // registered email -> user_id
    flats: RwLock<HashMap<String, Flat>>,
    join_codes: RwLock<HashMap<String, String>>, // join code -> flat_id
    // Insertion ordered; saving an existing id replaces it in place.
    expenses: RwLock<Vec<ExpenseRecord>>,
    payments: RwLock<Vec<Payment>>,
    flat_audits: RwLock<HashMap<String, Vec<FlatAudit>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn upsert<T>(records: &mut Vec<T>, record: T, same: impl Fn(&T, &T) -> bool) {
    match records.iter_mut().find(|existing| same(existing, &record)) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_user_if_not_exists(&self, user: User) -> Result<Option<User>, SmartRentError> {
        let mut emails = self.emails.write().await;
        let mut users = self.users.write().await;
        if emails.contains_key(&user.email) || users.contains_key(&user.id) {
            return Ok(None);
        }
        emails.insert(user.email.clone(), user.id.clone());
        users.insert(user.id.clone(), user.clone());
        Ok(Some(user))
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, SmartRentError> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn save_flat(&self, flat: Flat) -> Result<(), SmartRentError> {
        let mut flats = self.flats.write().await;
        let mut join_codes = self.join_codes.write().await;
        if let Some(owner) = join_codes.get(&flat.join_code) {
            if *owner != flat.id {
                return Err(SmartRentError::StorageError(format!(
                    "join code {} already belongs to another flat",
                    flat.join_code
                )));
            }
        }
        join_codes.insert(flat.join_code.clone(), flat.id.clone());
        flats.insert(flat.id.clone(), flat);
        Ok(())
    }

    async fn get_flat(&self, flat_id: &str) -> Result<Option<Flat>, SmartRentError> {
        Ok(self.flats.read().await.get(flat_id).cloned())
    }

    async fn get_flat_by_join_code(&self, join_code: &str) -> Result<Option<Flat>, SmartRentError> {
        let flat_id = self.join_codes.read().await.get(join_code).cloned();
        Ok(match flat_id {
            Some(id) => self.flats.read().await.get(&id).cloned(),
            None => None,
        })
    }

    async fn save_expense(&self, expense: ExpenseRecord) -> Result<(), SmartRentError> {
        let mut expenses = self.expenses.write().await;
        upsert(&mut expenses, expense, |a, b| a.id == b.id);
        Ok(())
    }

    async fn get_expense(&self, expense_id: &str) -> Result<Option<ExpenseRecord>, SmartRentError> {
        Ok(self
            .expenses
            .read()
            .await
            .iter()
            .find(|e| e.id == expense_id)
            .cloned())
    }

    async fn get_expenses(&self, flat_id: &str) -> Result<Vec<ExpenseRecord>, SmartRentError> {
        Ok(self
            .expenses
            .read()
            .await
            .iter()
            .rev()
            .filter(|e| e.flat_id == flat_id)
            .cloned()
            .collect())
    }

    async fn save_payment(&self, payment: Payment) -> Result<(), SmartRentError> {
        let mut payments = self.payments.write().await;
        upsert(&mut payments, payment, |a, b| a.id == b.id);
        Ok(())
    }

    async fn get_payment(&self, payment_id: &str) -> Result<Option<Payment>, SmartRentError> {
        Ok(self
            .payments
            .read()
            .await
            .iter()
            .find(|p| p.id == payment_id)
            .cloned())
    }

    async fn get_payments(&self, flat_id: &str, payer_id: &str) -> Result<Vec<Payment>, SmartRentError> {
        Ok(self
            .payments
            .read()
            .await
            .iter()
            .rev()
            .filter(|p| p.flat_id == flat_id && p.payer_id == payer_id)
            .cloned()
            .collect())
    }

    async fn save_flat_audit(&self, audit: FlatAudit) -> Result<(), SmartRentError> {
        self.flat_audits
            .write()
            .await
            .entry(audit.flat_id.clone())
            .or_default()
            .push(audit);
        Ok(())
    }

    async fn get_flat_audits(&self, flat_id: &str) -> Result<Vec<FlatAudit>, SmartRentError> {
        Ok(self
            .flat_audits
            .read()
            .await
            .get(flat_id)
            .cloned()
            .unwrap_or_default())
    }
}
