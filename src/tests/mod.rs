mod aggregator_tests;
mod audit_tests;
mod concurrency_tests;
mod money_tests;
mod split_tests;

use crate::core::models::expense::{ExpenseCategory, ExpenseRecord, ExpenseStatus, Participant};
use crate::core::models::payment::{Payment, PaymentStatus, PaymentType, Priority};
use crate::core::models::user::{User, UserRef};
use crate::core::services::SmartRentService;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

pub fn create_test_service() -> SmartRentService<InMemoryLogging, InMemoryStorage> {
    let _ = env_logger::try_init();
    SmartRentService::new(InMemoryStorage::new(), InMemoryLogging::new())
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

pub fn user(id: &str, name: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", id),
    }
}

pub fn share(user_id: &str, amount: &str, is_paid: bool) -> Participant {
    Participant {
        user_id: UserRef::Id(user_id.to_string()),
        name: user_id.to_uppercase(),
        amount: dec(amount),
        is_paid,
        paid_at: if is_paid { Some(at(2026, 10, 1)) } else { None },
    }
}

pub fn expense(id: &str, total: &str, status: ExpenseStatus, participants: Vec<Participant>) -> ExpenseRecord {
    ExpenseRecord {
        id: id.to_string(),
        flat_id: "flat-1".to_string(),
        title: format!("Expense {}", id),
        description: String::new(),
        category: ExpenseCategory::Groceries,
        total_amount: dec(total),
        status,
        created_at: at(2026, 10, 1),
        created_by: None,
        participants,
    }
}

pub fn payment(id: &str, amount: &str, priority: Priority, due: DateTime<Utc>) -> Payment {
    Payment {
        id: id.to_string(),
        flat_id: "flat-1".to_string(),
        payer_id: "u1".to_string(),
        title: format!("Payment {}", id),
        recipient: "Landlord".to_string(),
        amount: dec(amount),
        due_date: due,
        kind: PaymentType::Rent,
        priority,
        status: PaymentStatus::Pending,
        paid_at: None,
    }
}
