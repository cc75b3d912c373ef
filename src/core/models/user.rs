use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

/// User object embedded in place of a bare id when the backend populates a reference.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PopulatedUser {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A reference to a user that may or may not be populated.
///
/// Compare references only through [`crate::core::ledger::extract_id`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum UserRef {
    Id(String),
    Populated(PopulatedUser),
}

impl From<&str> for UserRef {
    fn from(id: &str) -> Self {
        UserRef::Id(id.to_string())
    }
}

impl From<String> for UserRef {
    fn from(id: String) -> Self {
        UserRef::Id(id)
    }
}
