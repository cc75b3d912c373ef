use crate::core::errors::SmartRentError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

pub type Details = HashMap<String, serde_json::Value>;

/// Action details must be a JSON object; anything else is a logging error.
pub fn details_map(details: serde_json::Value) -> Result<Details, SmartRentError> {
    match details {
        serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(SmartRentError::LoggingError(format!(
            "log details must be a JSON object, got {}",
            other
        ))),
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppLog {
    pub id: String,
    pub action: String,
    pub user_id: Option<String>,
    #[schema(value_type = Object)]
    pub details: Details,
    pub timestamp: DateTime<Utc>,
}

impl AppLog {
    pub fn new(action: &str, details: serde_json::Value, user_id: Option<&str>) -> Result<Self, SmartRentError> {
        Ok(AppLog {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            user_id: user_id.map(String::from),
            details: details_map(details)?,
            timestamp: Utc::now(),
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlatAudit {
    pub id: String,
    pub flat_id: String,
    pub action: String,
    pub user_id: Option<String>,
    #[schema(value_type = Object)]
    pub details: Details,
    pub timestamp: DateTime<Utc>,
}

impl FlatAudit {
    /// Copies an action log entry into a flat's audit trail.
    pub fn from_log(flat_id: &str, entry: &AppLog) -> Self {
        FlatAudit {
            id: Uuid::new_v4().to_string(),
            flat_id: flat_id.to_string(),
            action: entry.action.clone(),
            user_id: entry.user_id.clone(),
            details: entry.details.clone(),
            timestamp: entry.timestamp,
        }
    }
}
