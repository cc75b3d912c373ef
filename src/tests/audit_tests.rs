use crate::constants::EXPENSE_CREATED;
use crate::core::errors::SmartRentError;
use crate::core::models::audit::{AppLog, FlatAudit, details_map};
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use serde_json::json;

#[test]
fn test_details_must_be_an_object() {
    let details = details_map(json!({ "expense_id": "e1", "amount": "10.00" })).unwrap();
    assert_eq!(details.get("expense_id"), Some(&json!("e1")));

    assert!(matches!(details_map(json!(["e1"])), Err(SmartRentError::LoggingError(_))));
    assert!(matches!(
        AppLog::new(EXPENSE_CREATED, json!("e1"), None),
        Err(SmartRentError::LoggingError(_))
    ));
}

#[test]
fn test_flat_audit_copies_log_entry() {
    let entry = AppLog::new(EXPENSE_CREATED, json!({ "expense_id": "e1" }), Some("alice")).unwrap();
    let audit = FlatAudit::from_log("flat-1", &entry);

    assert_eq!(audit.flat_id, "flat-1");
    assert_eq!(audit.action, EXPENSE_CREATED);
    assert_eq!(audit.user_id.as_deref(), Some("alice"));
    assert_eq!(audit.details, entry.details);
    assert_eq!(audit.timestamp, entry.timestamp);
    assert_ne!(audit.id, entry.id);
}

#[tokio::test]
async fn test_in_memory_logging_keeps_insertion_order() {
    let logging = InMemoryLogging::new();
    for action in ["FIRST", "SECOND"] {
        logging.record(AppLog::new(action, json!({}), None).unwrap()).await.unwrap();
    }
    let shared = logging.clone();
    let actions: Vec<String> = shared.get_logs().await.unwrap().into_iter().map(|l| l.action).collect();
    assert_eq!(actions, vec!["FIRST", "SECOND"]);
}
