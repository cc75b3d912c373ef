use crate::core::errors::SmartRentError;
use crate::core::models::{
    audit::FlatAudit, expense::ExpenseCategory, expense::ExpenseRecord, expense::ExpenseStatus, flat::Flat,
    payment::Payment, payment::PaymentStatus, payment::PaymentType, payment::Priority, user::User,
};
use crate::core::services::{NewPayment, SmartRentService};
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::Storage;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use crate::tests::{dec, user};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::time::Duration as StdDuration;
use tokio::time::sleep;

/// Repository that yields after every read, the way a networked store would.
#[derive(Default)]
struct LaggingStorage {
    inner: InMemoryStorage,
}

const LAG: StdDuration = StdDuration::from_millis(5);

#[async_trait]
impl Storage for LaggingStorage {
    async fn create_user_if_not_exists(&self, user: User) -> Result<Option<User>, SmartRentError> {
        self.inner.create_user_if_not_exists(user).await
    }
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, SmartRentError> {
        self.inner.get_user(user_id).await
    }
    async fn save_flat(&self, flat: Flat) -> Result<(), SmartRentError> {
        self.inner.save_flat(flat).await
    }
    async fn get_flat(&self, flat_id: &str) -> Result<Option<Flat>, SmartRentError> {
        let flat = self.inner.get_flat(flat_id).await;
        sleep(LAG).await;
        flat
    }
    async fn get_flat_by_join_code(&self, join_code: &str) -> Result<Option<Flat>, SmartRentError> {
        let flat = self.inner.get_flat_by_join_code(join_code).await;
        sleep(LAG).await;
        flat
    }
    async fn save_expense(&self, expense: ExpenseRecord) -> Result<(), SmartRentError> {
        self.inner.save_expense(expense).await
    }
    async fn get_expense(&self, expense_id: &str) -> Result<Option<ExpenseRecord>, SmartRentError> {
        let expense = self.inner.get_expense(expense_id).await;
        sleep(LAG).await;
        expense
    }
    async fn get_expenses(&self, flat_id: &str) -> Result<Vec<ExpenseRecord>, SmartRentError> {
        self.inner.get_expenses(flat_id).await
    }
    async fn save_payment(&self, payment: Payment) -> Result<(), SmartRentError> {
        self.inner.save_payment(payment).await
    }
    async fn get_payment(&self, payment_id: &str) -> Result<Option<Payment>, SmartRentError> {
        let payment = self.inner.get_payment(payment_id).await;
        sleep(LAG).await;
        payment
    }
    async fn get_payments(&self, flat_id: &str, payer_id: &str) -> Result<Vec<Payment>, SmartRentError> {
        self.inner.get_payments(flat_id, payer_id).await
    }
    async fn save_flat_audit(&self, audit: FlatAudit) -> Result<(), SmartRentError> {
        self.inner.save_flat_audit(audit).await
    }
    async fn get_flat_audits(&self, flat_id: &str) -> Result<Vec<FlatAudit>, SmartRentError> {
        self.inner.get_flat_audits(flat_id).await
    }
}

type LaggingService = SmartRentService<InMemoryLogging, LaggingStorage>;

fn lagging_service() -> LaggingService {
    let _ = env_logger::try_init();
    SmartRentService::new(LaggingStorage::default(), InMemoryLogging::new())
}

async fn shared_flat(service: &LaggingService, alice: &User, bob: &User) -> Flat {
    let flat = service
        .create_flat("Maple Street".to_string(), dec("1200"), None, alice)
        .await
        .unwrap();
    service.join_flat(&flat.join_code, bob).await.unwrap();
    flat
}

#[tokio::test]
async fn test_simultaneous_share_payments_are_both_kept() {
    let service = lagging_service();
    let alice = user("alice", "Alice");
    let bob = user("bob", "Bob");
    let flat = shared_flat(&service, &alice, &bob).await;
    let expense = service
        .create_split_expense(
            &flat.id,
            "Internet".to_string(),
            String::new(),
            ExpenseCategory::Internet,
            dec("60"),
            vec!["alice".to_string(), "bob".to_string()],
            &alice,
        )
        .await
        .unwrap();

    let (by_alice, by_bob) = tokio::join!(
        service.mark_participant_paid(&expense.id, "alice", &alice),
        service.mark_participant_paid(&expense.id, "bob", &bob),
    );
    by_alice.unwrap();
    by_bob.unwrap();

    let stored = service.list_expenses(&flat.id, &alice).await.unwrap();
    assert!(stored[0].participants.iter().all(|p| p.is_paid));
    assert_eq!(stored[0].status, ExpenseStatus::Paid);
}

#[tokio::test]
async fn test_simultaneous_joins_keep_every_member() {
    let service = lagging_service();
    let alice = user("alice", "Alice");
    let flat = service
        .create_flat("Maple Street".to_string(), dec("1200"), None, &alice)
        .await
        .unwrap();

    let (bob, carol) = (user("bob", "Bob"), user("carol", "Carol"));
    let (first, second) = tokio::join!(
        service.join_flat(&flat.join_code, &bob),
        service.join_flat(&flat.join_code, &carol),
    );
    first.unwrap();
    second.unwrap();

    let dashboard = service.flat_dashboard(&flat.id, &alice).await.unwrap();
    assert_eq!(dashboard.active_members, 3);
}

#[tokio::test]
async fn test_double_payment_is_rejected_once() {
    let service = lagging_service();
    let alice = user("alice", "Alice");
    let bob = user("bob", "Bob");
    let flat = shared_flat(&service, &alice, &bob).await;
    let rent = service
        .create_payment(
            &flat.id,
            NewPayment {
                payer_id: "bob".to_string(),
                title: "Rent".to_string(),
                recipient: "Landlord".to_string(),
                amount: dec("600"),
                due_date: Utc::now() + Duration::days(3),
                kind: PaymentType::Rent,
                priority: Priority::High,
            },
            &alice,
        )
        .await
        .unwrap();

    let (by_bob, by_alice) = tokio::join!(
        service.mark_payment_paid(&rent.id, &bob),
        service.mark_payment_paid(&rent.id, &alice),
    );
    assert!(by_bob.is_ok() != by_alice.is_ok());
    let failure = if by_bob.is_err() { by_bob } else { by_alice };
    assert!(matches!(failure, Err(SmartRentError::PaymentAlreadyPaid(_))));

    let payments = service.list_payments(&flat.id, &bob).await.unwrap();
    assert_eq!(payments[0].status, PaymentStatus::Paid);
}
