use crate::{
    api::models::*,
    core::{
        dues::DuesView,
        errors::SmartRentError,
        models::{
            audit::{AppLog, FlatAudit},
            expense::ExpenseRecord,
            flat::Flat,
            payment::Payment,
            user::User,
        },
        services::{FlatDashboard, NewPayment, SmartRentService},
    },
    infrastructure::{logging::in_memory::InMemoryLogging, storage::in_memory::InMemoryStorage},
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;

pub type AppService = SmartRentService<InMemoryLogging, InMemoryStorage>;

async fn load_user(service: &AppService, user_id: &str) -> Result<User, SmartRentError> {
    service
        .get_user(user_id)
        .await?
        .ok_or_else(|| SmartRentError::UserNotFound(user_id.to_string()))
}

// Define API routes
pub fn api_routes(service: Arc<AppService>) -> Router {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/{user_id}", get(get_user))
        .route("/flats", post(create_flat))
        .route("/flats/join", post(join_flat))
        .route("/flats/{flat_id}/leave", post(leave_flat))
        .route("/flats/{flat_id}/members/role", post(update_member_role))
        .route("/flats/{flat_id}/budget", post(set_monthly_budget))
        .route("/flats/{flat_id}/forecast", post(set_budget_forecast))
        .route("/flats/{flat_id}/expenses", post(create_expense))
        .route("/flats/{flat_id}/expenses/list", post(list_expenses))
        .route("/expenses/{expense_id}/pay", post(mark_share_paid))
        .route("/expenses/{expense_id}/settle", post(settle_expense))
        .route("/flats/{flat_id}/payments", post(create_payment))
        .route("/flats/{flat_id}/payments/list", post(list_payments))
        .route("/payments/{payment_id}/pay", post(mark_payment_paid))
        .route("/flats/{flat_id}/dashboard", post(flat_dashboard))
        .route("/flats/{flat_id}/dues", post(flat_dues))
        .route("/split/preview", post(preview_split))
        .route("/logs", get(get_app_logs))
        .route("/flats/{flat_id}/audits", get(get_flat_audits))
        .with_state(service)
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = User),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub(crate) async fn create_user(
    State(service): State<Arc<AppService>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = service
        .add_user(User {
            id: req.id,
            name: req.name,
            email: req.email,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    params(("user_id" = String, Path, description = "ID of the user to retrieve")),
    responses(
        (status = 200, description = "User retrieved successfully", body = User),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub(crate) async fn get_user(
    State(service): State<Arc<AppService>>,
    Path(user_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(load_user(&service, &user_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/flats",
    request_body = CreateFlatRequest,
    responses(
        (status = 201, description = "Flat created; the creator is its admin", body = Flat),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub(crate) async fn create_flat(
    State(service): State<Arc<AppService>>,
    Json(req): Json<CreateFlatRequest>,
) -> Result<(StatusCode, Json<Flat>), ApiError> {
    let created_by = load_user(&service, &req.created_by_id).await?;
    let flat = service
        .create_flat(req.name, req.rent, req.monthly_budget, &created_by)
        .await?;
    Ok((StatusCode::CREATED, Json(flat)))
}

#[utoipa::path(
    post,
    path = "/api/flats/join",
    request_body = JoinFlatRequest,
    responses(
        (status = 200, description = "Joined flat", body = Flat),
        (status = 404, description = "Join code or user not found", body = ErrorResponse),
        (status = 409, description = "Already an active member", body = ErrorResponse)
    )
)]
pub(crate) async fn join_flat(
    State(service): State<Arc<AppService>>,
    Json(req): Json<JoinFlatRequest>,
) -> Result<Json<Flat>, ApiError> {
    let user = load_user(&service, &req.user_id).await?;
    Ok(Json(service.join_flat(&req.join_code, &user).await?))
}

#[utoipa::path(
    post,
    path = "/api/flats/{flat_id}/leave",
    params(("flat_id" = String, Path, description = "ID of the flat")),
    request_body = ActingUserRequest,
    responses(
        (status = 200, description = "Membership marked inactive", body = Flat),
        (status = 403, description = "Not a member, or the admin", body = ErrorResponse)
    )
)]
pub(crate) async fn leave_flat(
    State(service): State<Arc<AppService>>,
    Path(flat_id): Path<String>,
    Json(req): Json<ActingUserRequest>,
) -> Result<Json<Flat>, ApiError> {
    let user = load_user(&service, &req.user_id).await?;
    Ok(Json(service.leave_flat(&flat_id, &user).await?))
}

#[utoipa::path(
    post,
    path = "/api/flats/{flat_id}/members/role",
    params(("flat_id" = String, Path, description = "ID of the flat")),
    request_body = UpdateMemberRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = Flat),
        (status = 400, description = "Invalid role", body = ErrorResponse),
        (status = 403, description = "Not the flat admin", body = ErrorResponse)
    )
)]
pub(crate) async fn update_member_role(
    State(service): State<Arc<AppService>>,
    Path(flat_id): Path<String>,
    Json(req): Json<UpdateMemberRoleRequest>,
) -> Result<Json<Flat>, ApiError> {
    let updated_by = load_user(&service, &req.updated_by_id).await?;
    let flat = service
        .update_member_role(&flat_id, &req.member_id, req.role, &updated_by)
        .await?;
    Ok(Json(flat))
}

#[utoipa::path(
    post,
    path = "/api/flats/{flat_id}/budget",
    params(("flat_id" = String, Path, description = "ID of the flat")),
    request_body = SetBudgetRequest,
    responses(
        (status = 200, description = "Budget updated", body = Flat),
        (status = 403, description = "Not the flat admin", body = ErrorResponse)
    )
)]
pub(crate) async fn set_monthly_budget(
    State(service): State<Arc<AppService>>,
    Path(flat_id): Path<String>,
    Json(req): Json<SetBudgetRequest>,
) -> Result<Json<Flat>, ApiError> {
    let updated_by = load_user(&service, &req.updated_by_id).await?;
    let flat = service
        .set_monthly_budget(&flat_id, req.monthly_budget, &updated_by)
        .await?;
    Ok(Json(flat))
}

#[utoipa::path(
    post,
    path = "/api/flats/{flat_id}/forecast",
    params(("flat_id" = String, Path, description = "ID of the flat")),
    request_body = SetForecastRequest,
    responses(
        (status = 200, description = "Forecast stored", body = Flat),
        (status = 403, description = "Not the flat admin", body = ErrorResponse)
    )
)]
pub(crate) async fn set_budget_forecast(
    State(service): State<Arc<AppService>>,
    Path(flat_id): Path<String>,
    Json(req): Json<SetForecastRequest>,
) -> Result<Json<Flat>, ApiError> {
    let updated_by = load_user(&service, &req.updated_by_id).await?;
    let flat = service
        .set_budget_forecast(&flat_id, req.forecast, &updated_by)
        .await?;
    Ok(Json(flat))
}

#[utoipa::path(
    post,
    path = "/api/flats/{flat_id}/expenses",
    params(("flat_id" = String, Path, description = "ID of the flat")),
    request_body = CreateExpenseRequest,
    responses(
        (status = 201, description = "Expense split equally among participants", body = ExpenseRecord),
        (status = 400, description = "Invalid amount or split", body = ErrorResponse),
        (status = 403, description = "Creator or participant is not a member", body = ErrorResponse)
    )
)]
pub(crate) async fn create_expense(
    State(service): State<Arc<AppService>>,
    Path(flat_id): Path<String>,
    Json(req): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<ExpenseRecord>), ApiError> {
    let created_by = load_user(&service, &req.created_by_id).await?;
    futures::future::try_join_all(req.participant_ids.iter().map(|id| load_user(&service, id))).await?;
    let expense = service
        .create_split_expense(
            &flat_id,
            req.title,
            req.description,
            req.category,
            req.total_amount,
            req.participant_ids,
            &created_by,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

#[utoipa::path(
    post,
    path = "/api/flats/{flat_id}/expenses/list",
    params(("flat_id" = String, Path, description = "ID of the flat")),
    request_body = ActingUserRequest,
    responses(
        (status = 200, description = "Expenses, newest first", body = Vec<ExpenseRecord>),
        (status = 403, description = "Not a member", body = ErrorResponse)
    )
)]
pub(crate) async fn list_expenses(
    State(service): State<Arc<AppService>>,
    Path(flat_id): Path<String>,
    Json(req): Json<ActingUserRequest>,
) -> Result<Json<Vec<ExpenseRecord>>, ApiError> {
    let user = load_user(&service, &req.user_id).await?;
    Ok(Json(service.list_expenses(&flat_id, &user).await?))
}

#[utoipa::path(
    post,
    path = "/api/expenses/{expense_id}/pay",
    params(("expense_id" = String, Path, description = "ID of the expense")),
    request_body = MarkSharePaidRequest,
    responses(
        (status = 200, description = "Share marked paid", body = ExpenseRecord),
        (status = 403, description = "Not allowed or not a participant", body = ErrorResponse),
        (status = 409, description = "Share already paid", body = ErrorResponse)
    )
)]
pub(crate) async fn mark_share_paid(
    State(service): State<Arc<AppService>>,
    Path(expense_id): Path<String>,
    Json(req): Json<MarkSharePaidRequest>,
) -> Result<Json<ExpenseRecord>, ApiError> {
    let marked_by = load_user(&service, &req.marked_by_id).await?;
    let participant_id = req.participant_id.unwrap_or_else(|| marked_by.id.clone());
    let expense = service
        .mark_participant_paid(&expense_id, &participant_id, &marked_by)
        .await?;
    Ok(Json(expense))
}

#[utoipa::path(
    post,
    path = "/api/expenses/{expense_id}/settle",
    params(("expense_id" = String, Path, description = "ID of the expense")),
    request_body = ActingUserRequest,
    responses(
        (status = 200, description = "Expense settled", body = ExpenseRecord),
        (status = 409, description = "Expense not fully paid", body = ErrorResponse)
    )
)]
pub(crate) async fn settle_expense(
    State(service): State<Arc<AppService>>,
    Path(expense_id): Path<String>,
    Json(req): Json<ActingUserRequest>,
) -> Result<Json<ExpenseRecord>, ApiError> {
    let user = load_user(&service, &req.user_id).await?;
    Ok(Json(service.settle_expense(&expense_id, &user).await?))
}

#[utoipa::path(
    post,
    path = "/api/flats/{flat_id}/payments",
    params(("flat_id" = String, Path, description = "ID of the flat")),
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment recorded as pending", body = Payment),
        (status = 400, description = "Bad request", body = ErrorResponse)
    )
)]
pub(crate) async fn create_payment(
    State(service): State<Arc<AppService>>,
    Path(flat_id): Path<String>,
    Json(req): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    let created_by = load_user(&service, &req.created_by_id).await?;
    let payment = service
        .create_payment(
            &flat_id,
            NewPayment {
                payer_id: req.payer_id,
                title: req.title,
                recipient: req.recipient,
                amount: req.amount,
                due_date: req.due_date,
                kind: req.kind,
                priority: req.priority,
            },
            &created_by,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

#[utoipa::path(
    post,
    path = "/api/flats/{flat_id}/payments/list",
    params(("flat_id" = String, Path, description = "ID of the flat")),
    request_body = ActingUserRequest,
    responses(
        (status = 200, description = "Payments owed by the user", body = Vec<Payment>),
        (status = 403, description = "Not a member", body = ErrorResponse)
    )
)]
pub(crate) async fn list_payments(
    State(service): State<Arc<AppService>>,
    Path(flat_id): Path<String>,
    Json(req): Json<ActingUserRequest>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    let user = load_user(&service, &req.user_id).await?;
    Ok(Json(service.list_payments(&flat_id, &user).await?))
}

#[utoipa::path(
    post,
    path = "/api/payments/{payment_id}/pay",
    params(("payment_id" = String, Path, description = "ID of the payment")),
    request_body = ActingUserRequest,
    responses(
        (status = 200, description = "Payment marked paid", body = Payment),
        (status = 409, description = "Payment already paid", body = ErrorResponse)
    )
)]
pub(crate) async fn mark_payment_paid(
    State(service): State<Arc<AppService>>,
    Path(payment_id): Path<String>,
    Json(req): Json<ActingUserRequest>,
) -> Result<Json<Payment>, ApiError> {
    let user = load_user(&service, &req.user_id).await?;
    Ok(Json(service.mark_payment_paid(&payment_id, &user).await?))
}

#[utoipa::path(
    post,
    path = "/api/flats/{flat_id}/dashboard",
    params(("flat_id" = String, Path, description = "ID of the flat")),
    request_body = ActingUserRequest,
    responses(
        (status = 200, description = "Flat summary for the user", body = FlatDashboard),
        (status = 403, description = "Not a member", body = ErrorResponse)
    )
)]
pub(crate) async fn flat_dashboard(
    State(service): State<Arc<AppService>>,
    Path(flat_id): Path<String>,
    Json(req): Json<ActingUserRequest>,
) -> Result<Json<FlatDashboard>, ApiError> {
    let user = load_user(&service, &req.user_id).await?;
    Ok(Json(service.flat_dashboard(&flat_id, &user).await?))
}

#[utoipa::path(
    post,
    path = "/api/flats/{flat_id}/dues",
    params(("flat_id" = String, Path, description = "ID of the flat")),
    request_body = DuesRequest,
    responses(
        (status = 200, description = "Outstanding dues and payment history", body = DuesView),
        (status = 403, description = "Not a member", body = ErrorResponse)
    )
)]
pub(crate) async fn flat_dues(
    State(service): State<Arc<AppService>>,
    Path(flat_id): Path<String>,
    Json(req): Json<DuesRequest>,
) -> Result<Json<DuesView>, ApiError> {
    let user = load_user(&service, &req.user_id).await?;
    Ok(Json(service.dues(&flat_id, &user, req.period).await?))
}

#[utoipa::path(
    post,
    path = "/api/split/preview",
    request_body = SplitPreviewRequest,
    responses(
        (status = 200, description = "Equal shares, remainder on the last", body = SplitPreviewResponse),
        (status = 400, description = "Invalid split", body = ErrorResponse)
    )
)]
pub(crate) async fn preview_split(
    State(service): State<Arc<AppService>>,
    Json(req): Json<SplitPreviewRequest>,
) -> Result<Json<SplitPreviewResponse>, ApiError> {
    let shares = service.preview_split(req.total_amount, req.participant_count)?;
    Ok(Json(SplitPreviewResponse { shares }))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    responses(
        (status = 200, description = "Application logs retrieved successfully", body = Vec<AppLog>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn get_app_logs(State(service): State<Arc<AppService>>) -> Result<Json<Vec<AppLog>>, ApiError> {
    Ok(Json(service.get_app_logs().await?))
}

#[utoipa::path(
    get,
    path = "/api/flats/{flat_id}/audits",
    params(("flat_id" = String, Path, description = "ID of the flat")),
    responses(
        (status = 200, description = "Flat audits retrieved successfully", body = Vec<FlatAudit>),
        (status = 404, description = "Flat not found", body = ErrorResponse)
    )
)]
pub(crate) async fn get_flat_audits(
    State(service): State<Arc<AppService>>,
    Path(flat_id): Path<String>,
) -> Result<Json<Vec<FlatAudit>>, ApiError> {
    Ok(Json(service.get_flat_audits(&flat_id).await?))
}
