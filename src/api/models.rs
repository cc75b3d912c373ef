use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::dues::Period;
use crate::core::errors::SmartRentError;
use crate::core::models::{
    expense::ExpenseCategory,
    flat::MemberRole,
    forecast::BudgetForecast,
    payment::{PaymentType, Priority},
};

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFlatRequest {
    pub name: String,
    pub rent: Decimal,
    pub monthly_budget: Option<Decimal>,
    pub created_by_id: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinFlatRequest {
    pub join_code: String,
    pub user_id: String,
}

/// Body for requests that only identify the acting user.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActingUserRequest {
    pub user_id: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRoleRequest {
    pub member_id: String,
    pub role: MemberRole,
    pub updated_by_id: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetBudgetRequest {
    pub monthly_budget: Option<Decimal>,
    pub updated_by_id: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetForecastRequest {
    pub forecast: BudgetForecast,
    pub updated_by_id: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: ExpenseCategory,
    pub total_amount: Decimal,
    pub participant_ids: Vec<String>,
    pub created_by_id: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkSharePaidRequest {
    /// Whose share is being marked; defaults to the acting user.
    pub participant_id: Option<String>,
    pub marked_by_id: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub payer_id: String,
    pub title: String,
    pub recipient: String,
    pub amount: Decimal,
    pub due_date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: PaymentType,
    pub priority: Priority,
    pub created_by_id: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DuesRequest {
    pub user_id: String,
    #[serde(default)]
    pub period: Period,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SplitPreviewRequest {
    pub total_amount: Decimal,
    pub participant_count: usize,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SplitPreviewResponse {
    pub shares: Vec<Decimal>,
}

// Error response struct
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for SmartRentError to implement IntoResponse
pub struct ApiError(pub SmartRentError);

impl From<SmartRentError> for ApiError {
    fn from(err: SmartRentError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            SmartRentError::InvalidAmount(_)
            | SmartRentError::InvalidSplit(_)
            | SmartRentError::MissingEmail
            | SmartRentError::InvalidEmail(_)
            | SmartRentError::InvalidPeriod(_)
            | SmartRentError::InvalidInput(_, _) => StatusCode::BAD_REQUEST,
            SmartRentError::UserNotFound(_)
            | SmartRentError::FlatNotFound(_)
            | SmartRentError::JoinCodeNotFound(_)
            | SmartRentError::ExpenseNotFound(_)
            | SmartRentError::PaymentNotFound(_) => StatusCode::NOT_FOUND,
            SmartRentError::EmailAlreadyRegistered(_)
            | SmartRentError::AlreadyFlatMember(_)
            | SmartRentError::ParticipantAlreadyPaid(_)
            | SmartRentError::PaymentAlreadyPaid(_)
            | SmartRentError::ExpenseNotPaid(_) => StatusCode::CONFLICT,
            SmartRentError::NotFlatMember(_)
            | SmartRentError::NotFlatAdmin(_)
            | SmartRentError::AdminCannotLeave(_)
            | SmartRentError::NotParticipant(_) => StatusCode::FORBIDDEN,
            SmartRentError::InternalServerError(_)
            | SmartRentError::StorageError(_)
            | SmartRentError::LoggingError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }
        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}
