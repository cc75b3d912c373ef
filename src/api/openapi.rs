use utoipa::OpenApi;

use crate::{
    api::models::{
        ActingUserRequest, CreateExpenseRequest, CreateFlatRequest, CreatePaymentRequest, CreateUserRequest,
        DuesRequest, ErrorResponse, JoinFlatRequest, MarkSharePaidRequest, SetBudgetRequest, SetForecastRequest,
        SplitPreviewRequest, SplitPreviewResponse, UpdateMemberRoleRequest,
    },
    core::{
        aggregator::{BudgetStatus, FlatSummary, UserStats},
        dues::{DueEntry, DueSource, DuesView, Period},
        models::{
            audit::{AppLog, FlatAudit},
            expense::{ExpenseCategory, ExpenseRecord, ExpenseStatus, Participant},
            flat::{Flat, FlatMember, MemberRole, MemberStatus},
            forecast::BudgetForecast,
            payment::{Payment, PaymentStatus, PaymentType, Priority},
            user::{PopulatedUser, User, UserRef},
        },
        services::FlatDashboard,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::create_user,
        super::handlers::get_user,
        super::handlers::create_flat,
        super::handlers::join_flat,
        super::handlers::leave_flat,
        super::handlers::update_member_role,
        super::handlers::set_monthly_budget,
        super::handlers::set_budget_forecast,
        super::handlers::create_expense,
        super::handlers::list_expenses,
        super::handlers::mark_share_paid,
        super::handlers::settle_expense,
        super::handlers::create_payment,
        super::handlers::list_payments,
        super::handlers::mark_payment_paid,
        super::handlers::flat_dashboard,
        super::handlers::flat_dues,
        super::handlers::preview_split,
        super::handlers::get_app_logs,
        super::handlers::get_flat_audits
    ),
    components(schemas(
        CreateUserRequest,
        CreateFlatRequest,
        JoinFlatRequest,
        ActingUserRequest,
        UpdateMemberRoleRequest,
        SetBudgetRequest,
        SetForecastRequest,
        CreateExpenseRequest,
        MarkSharePaidRequest,
        CreatePaymentRequest,
        DuesRequest,
        SplitPreviewRequest,
        SplitPreviewResponse,
        ErrorResponse,
        User,
        UserRef,
        PopulatedUser,
        Flat,
        FlatMember,
        MemberRole,
        MemberStatus,
        BudgetForecast,
        ExpenseRecord,
        ExpenseCategory,
        ExpenseStatus,
        Participant,
        Payment,
        PaymentType,
        PaymentStatus,
        Priority,
        FlatSummary,
        UserStats,
        BudgetStatus,
        FlatDashboard,
        DuesView,
        DueEntry,
        DueSource,
        Period,
        AppLog,
        FlatAudit
    )),
    info(
        title = "Smart Rent API",
        description = "Flat sharing: split expenses, record dues and track who owes what",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
