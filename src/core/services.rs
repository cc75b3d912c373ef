use crate::config::CONFIG;
use crate::constants::{
    BUDGET_UPDATED, EXPENSE_CREATED, EXPENSE_SETTLED, FLAT_CREATED, FORECAST_UPDATED, JOIN_CODE_ATTEMPTS,
    JOIN_CODE_LENGTH, MEMBER_JOINED, MEMBER_LEFT, MEMBER_REJOINED, MEMBER_ROLE_CHANGED, PAYMENT_CREATED,
    PAYMENT_PAID, SHARE_PAID, USER_ADDED,
};
use crate::core::aggregator::{BudgetStatus, FlatSummary, aggregate, budget_status, rent_per_person};
use crate::core::dues::{DuesView, Period, resolve_dues};
use crate::core::errors::{FieldError, SmartRentError};
use crate::core::ledger::extract_id;
use crate::core::models::{
    audit::{AppLog, FlatAudit},
    expense::{ExpenseCategory, ExpenseRecord, ExpenseStatus},
    flat::{Flat, FlatMember, MemberRole, MemberStatus},
    forecast::BudgetForecast,
    payment::{Payment, PaymentStatus, PaymentType, Priority},
    user::{User, UserRef},
};
use crate::core::money::{CURRENCY_SCALE, ensure_non_negative, round_currency};
use crate::core::split::{build_participants, compute_equal_split};
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::Storage;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use tokio::sync::Mutex;
use utoipa::ToSchema;
use uuid::Uuid;

/// Everything the flat home screen shows for one member.
#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlatDashboard {
    pub flat_id: String,
    pub flat_name: String,
    pub rent: Decimal,
    pub rent_per_person: Decimal,
    pub active_members: usize,
    pub budget: BudgetStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<BudgetForecast>,
    pub summary: FlatSummary,
}

pub struct NewPayment {
    pub payer_id: String,
    pub title: String,
    pub recipient: String,
    pub amount: Decimal,
    pub due_date: DateTime<Utc>,
    pub kind: PaymentType,
    pub priority: Priority,
}

pub struct SmartRentService<L: LoggingService, S: Storage> {
    storage: S,
    logging: L,
    /// Held across every read-modify-write of a stored record so concurrent
    /// updates cannot overwrite each other.
    writes: Mutex<()>,
}

impl<L: LoggingService, S: Storage> SmartRentService<L, S> {
    pub fn new(storage: S, logging: L) -> Self {
        SmartRentService {
            storage,
            logging,
            writes: Mutex::new(()),
        }
    }

    async fn get_flat_or_err(&self, flat_id: &str) -> Result<Flat, SmartRentError> {
        self.storage
            .get_flat(flat_id)
            .await?
            .ok_or_else(|| SmartRentError::FlatNotFound(flat_id.to_string()))
    }

    async fn validate_flat_membership(&self, flat_id: &str, user_id: &str) -> Result<Flat, SmartRentError> {
        let flat = self.get_flat_or_err(flat_id).await?;
        if !flat.is_active_member(user_id) {
            warn!("User {} is not an active member of flat {}", user_id, flat_id);
            return Err(SmartRentError::NotFlatMember(user_id.to_string()));
        }
        Ok(flat)
    }

    async fn validate_flat_admin(&self, flat_id: &str, user_id: &str) -> Result<Flat, SmartRentError> {
        let flat = self.validate_flat_membership(flat_id, user_id).await?;
        if flat.admin_id() != user_id {
            warn!("User {} attempted an admin action on flat {}", user_id, flat_id);
            return Err(SmartRentError::NotFlatAdmin(user_id.to_string()));
        }
        Ok(flat)
    }

    async fn log_and_audit(
        &self,
        flat_id: Option<&str>,
        action: &str,
        log_details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), SmartRentError> {
        let entry = AppLog::new(action, log_details, user_id)?;
        self.logging.record(entry.clone()).await?;
        if let Some(fid) = flat_id {
            self.storage.save_flat_audit(FlatAudit::from_log(fid, &entry)).await?;
        }
        Ok(())
    }

    fn validate_string_input(&self, field: &str, value: &str, max_length: usize) -> Result<(), SmartRentError> {
        if value.trim().is_empty() {
            return Err(SmartRentError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("Invalid {}", field),
                    description: format!("{} cannot be empty", field),
                },
            ));
        }
        if value.chars().count() > max_length {
            return Err(SmartRentError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("{} Too Long", field),
                    description: format!("{} cannot exceed {} characters", field, max_length),
                },
            ));
        }
        if value.chars().any(|c| c.is_control() || "<>{}[]".contains(c)) {
            return Err(SmartRentError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("Invalid {}", field),
                    description: format!("{} contains invalid characters", field),
                },
            ));
        }
        Ok(())
    }

    /// Non-negative, at most two decimal places, within the configured ceiling.
    /// `allow_zero` is false for expenses and payments.
    fn validate_amount_input(&self, field: &str, amount: Decimal, allow_zero: bool) -> Result<Decimal, SmartRentError> {
        let amount = ensure_non_negative(field, amount)?;
        if amount.is_zero() && !allow_zero {
            return Err(SmartRentError::InvalidAmount(format!("{} must be greater than 0", field)));
        }
        if amount > CONFIG.max_amount {
            return Err(SmartRentError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Amount Too Large".to_string(),
                    description: format!("Amount cannot exceed {}", CONFIG.max_amount),
                },
            ));
        }
        if amount.normalize().scale() > CURRENCY_SCALE {
            return Err(SmartRentError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Invalid Amount".to_string(),
                    description: "Amount cannot have more than 2 decimal places".to_string(),
                },
            ));
        }
        Ok(amount)
    }

    async fn generate_join_code(&self) -> Result<String, SmartRentError> {
        for _ in 0..JOIN_CODE_ATTEMPTS {
            let code: String = Uuid::new_v4()
                .simple()
                .to_string()
                .chars()
                .take(JOIN_CODE_LENGTH)
                .collect::<String>()
                .to_ascii_uppercase();
            if self.storage.get_flat_by_join_code(&code).await?.is_none() {
                return Ok(code);
            }
            debug!("Join code {} already taken, drawing another", code);
        }
        Err(SmartRentError::InternalServerError(
            "could not allocate a unique join code".to_string(),
        ))
    }

    // USERS

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, SmartRentError> {
        self.storage.get_user(user_id).await
    }

    pub async fn add_user(&self, user: User) -> Result<User, SmartRentError> {
        if user.email.is_empty() {
            return Err(SmartRentError::MissingEmail);
        }
        if !user.email.contains('@') || !user.email.contains('.') || user.email.len() < 5 {
            return Err(SmartRentError::InvalidEmail(user.email.clone()));
        }
        self.validate_string_input("id", &user.id, 64)?;
        self.validate_string_input("name", &user.name, 100)?;

        let created = self
            .storage
            .create_user_if_not_exists(user.clone())
            .await?
            .ok_or_else(|| SmartRentError::EmailAlreadyRegistered(user.email.clone()))?;
        info!("User {} added", created.id);

        self.log_and_audit(
            None,
            USER_ADDED,
            json!({ "user_id": created.id, "name": created.name, "email": created.email }),
            Some(created.id.as_str()),
        )
        .await?;
        Ok(created)
    }

    // FLATS

    pub async fn create_flat(
        &self,
        name: String,
        rent: Decimal,
        monthly_budget: Option<Decimal>,
        created_by: &User,
    ) -> Result<Flat, SmartRentError> {
        let _writes = self.writes.lock().await;
        self.validate_string_input("name", &name, 100)?;
        let rent = self.validate_amount_input("rent", rent, true)?;
        let monthly_budget = monthly_budget
            .map(|b| self.validate_amount_input("monthly_budget", b, true))
            .transpose()?;
        let join_code = self.generate_join_code().await?;
        let now = Utc::now();

        let flat = Flat {
            id: Uuid::new_v4().to_string(),
            name,
            join_code,
            rent,
            monthly_budget,
            admin: UserRef::from(created_by.id.as_str()),
            members: vec![FlatMember {
                user: UserRef::from(created_by.id.as_str()),
                name: created_by.name.clone(),
                role: MemberRole::Admin,
                status: MemberStatus::Active,
                joined_at: now,
            }],
            forecast: None,
            created_at: now,
        };
        self.storage.save_flat(flat.clone()).await?;
        info!("Flat {} created by {} with join code {}", flat.id, created_by.id, flat.join_code);

        self.log_and_audit(
            Some(&flat.id),
            FLAT_CREATED,
            json!({ "flat_id": flat.id, "name": flat.name, "join_code": flat.join_code, "rent": flat.rent }),
            Some(created_by.id.as_str()),
        )
        .await?;
        Ok(flat)
    }

    /// Joins by code as a co-tenant. Codes never expire and may be reused;
    /// a former member who left is reactivated instead of added twice.
    pub async fn join_flat(&self, join_code: &str, user: &User) -> Result<Flat, SmartRentError> {
        let _writes = self.writes.lock().await;
        let code = join_code.trim().to_ascii_uppercase();
        self.validate_string_input("join_code", &code, JOIN_CODE_LENGTH)?;
        let mut flat = self
            .storage
            .get_flat_by_join_code(&code)
            .await?
            .ok_or_else(|| SmartRentError::JoinCodeNotFound(code.clone()))?;

        let action = match flat.members.iter_mut().find(|m| m.user_id() == user.id) {
            Some(member) if member.is_active() => {
                return Err(SmartRentError::AlreadyFlatMember(user.id.clone()));
            }
            Some(member) => {
                member.status = MemberStatus::Active;
                member.name = user.name.clone();
                member.joined_at = Utc::now();
                MEMBER_REJOINED
            }
            None => {
                flat.members.push(FlatMember {
                    user: UserRef::from(user.id.clone()),
                    name: user.name.clone(),
                    role: MemberRole::CoTenant,
                    status: MemberStatus::Active,
                    joined_at: Utc::now(),
                });
                MEMBER_JOINED
            }
        };
        self.storage.save_flat(flat.clone()).await?;
        info!("User {} joined flat {}", user.id, flat.id);

        self.log_and_audit(
            Some(&flat.id),
            action,
            json!({ "flat_id": flat.id, "user_id": user.id, "name": user.name, "join_code": code }),
            Some(user.id.as_str()),
        )
        .await?;
        Ok(flat)
    }

    pub async fn leave_flat(&self, flat_id: &str, user: &User) -> Result<Flat, SmartRentError> {
        let _writes = self.writes.lock().await;
        let mut flat = self.validate_flat_membership(flat_id, &user.id).await?;
        if flat.admin_id() == user.id {
            return Err(SmartRentError::AdminCannotLeave(user.id.clone()));
        }
        if let Some(member) = flat.members.iter_mut().find(|m| m.user_id() == user.id) {
            member.status = MemberStatus::Inactive;
        }
        self.storage.save_flat(flat.clone()).await?;

        self.log_and_audit(
            Some(flat_id),
            MEMBER_LEFT,
            json!({ "flat_id": flat_id, "user_id": user.id }),
            Some(user.id.as_str()),
        )
        .await?;
        Ok(flat)
    }

    pub async fn update_member_role(
        &self,
        flat_id: &str,
        member_id: &str,
        role: MemberRole,
        updated_by: &User,
    ) -> Result<Flat, SmartRentError> {
        let _writes = self.writes.lock().await;
        let mut flat = self.validate_flat_admin(flat_id, &updated_by.id).await?;
        if role == MemberRole::Admin || member_id == flat.admin_id() {
            return Err(SmartRentError::InvalidInput(
                "role".to_string(),
                FieldError {
                    field: "role".to_string(),
                    title: "Invalid role".to_string(),
                    description: "A flat has exactly one admin".to_string(),
                },
            ));
        }
        let member = flat
            .members
            .iter_mut()
            .find(|m| m.user_id() == member_id && m.is_active())
            .ok_or_else(|| SmartRentError::NotFlatMember(member_id.to_string()))?;
        member.role = role;
        self.storage.save_flat(flat.clone()).await?;

        self.log_and_audit(
            Some(flat_id),
            MEMBER_ROLE_CHANGED,
            json!({ "flat_id": flat_id, "user_id": member_id, "role": role.to_string() }),
            Some(updated_by.id.as_str()),
        )
        .await?;
        Ok(flat)
    }

    pub async fn set_monthly_budget(
        &self,
        flat_id: &str,
        monthly_budget: Option<Decimal>,
        updated_by: &User,
    ) -> Result<Flat, SmartRentError> {
        let _writes = self.writes.lock().await;
        let mut flat = self.validate_flat_admin(flat_id, &updated_by.id).await?;
        flat.monthly_budget = monthly_budget
            .map(|b| self.validate_amount_input("monthly_budget", b, true))
            .transpose()?;
        self.storage.save_flat(flat.clone()).await?;

        self.log_and_audit(
            Some(flat_id),
            BUDGET_UPDATED,
            json!({ "flat_id": flat_id, "monthly_budget": flat.monthly_budget }),
            Some(updated_by.id.as_str()),
        )
        .await?;
        Ok(flat)
    }

    /// Stores a forecast computed elsewhere; its figures are not interpreted.
    pub async fn set_budget_forecast(
        &self,
        flat_id: &str,
        forecast: BudgetForecast,
        updated_by: &User,
    ) -> Result<Flat, SmartRentError> {
        let _writes = self.writes.lock().await;
        let mut flat = self.validate_flat_admin(flat_id, &updated_by.id).await?;
        flat.forecast = Some(forecast.clone());
        self.storage.save_flat(flat.clone()).await?;

        self.log_and_audit(
            Some(flat_id),
            FORECAST_UPDATED,
            json!({ "flat_id": flat_id, "month": forecast.month }),
            Some(updated_by.id.as_str()),
        )
        .await?;
        Ok(flat)
    }

    // EXPENSES

    pub fn preview_split(&self, total: Decimal, participant_count: usize) -> Result<Vec<Decimal>, SmartRentError> {
        let total = self.validate_amount_input("total_amount", total, true)?;
        compute_equal_split(total, participant_count)
    }

    /// Splits `total_amount` equally among `participant_ids` in the given order.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_split_expense(
        &self,
        flat_id: &str,
        title: String,
        description: String,
        category: ExpenseCategory,
        total_amount: Decimal,
        participant_ids: Vec<String>,
        created_by: &User,
    ) -> Result<ExpenseRecord, SmartRentError> {
        let flat = self.validate_flat_membership(flat_id, &created_by.id).await?;
        self.validate_string_input("title", &title, 100)?;
        if !description.is_empty() {
            self.validate_string_input("description", &description, 500)?;
        }
        let total_amount = self.validate_amount_input("total_amount", total_amount, false)?;

        let mut selected = Vec::with_capacity(participant_ids.len());
        for user_id in &participant_ids {
            let member = flat
                .member(user_id)
                .filter(|m| m.is_active())
                .ok_or_else(|| SmartRentError::NotFlatMember(user_id.clone()))?;
            selected.push((user_id.clone(), member.name.clone()));
        }
        let participants = build_participants(total_amount, &selected)?;

        let expense = ExpenseRecord {
            id: Uuid::new_v4().to_string(),
            flat_id: flat_id.to_string(),
            title,
            description,
            category,
            total_amount,
            status: ExpenseStatus::Active,
            created_at: Utc::now(),
            created_by: Some(UserRef::from(created_by.id.as_str())),
            participants,
        };
        self.storage.save_expense(expense.clone()).await?;
        info!(
            "Expense {} of {} split across {} members in flat {}",
            expense.id,
            expense.total_amount,
            expense.participants.len(),
            flat_id
        );

        self.log_and_audit(
            Some(flat_id),
            EXPENSE_CREATED,
            json!({
                "expense_id": expense.id,
                "title": expense.title,
                "category": expense.category,
                "total_amount": expense.total_amount,
                "participant_ids": participant_ids,
            }),
            Some(created_by.id.as_str()),
        )
        .await?;
        Ok(expense)
    }

    /// Marks `participant_id`'s share paid. Allowed for the participant and the flat admin.
    /// Once every share is paid the expense itself becomes paid.
    pub async fn mark_participant_paid(
        &self,
        expense_id: &str,
        participant_id: &str,
        marked_by: &User,
    ) -> Result<ExpenseRecord, SmartRentError> {
        let _writes = self.writes.lock().await;
        let mut expense = self
            .storage
            .get_expense(expense_id)
            .await?
            .ok_or_else(|| SmartRentError::ExpenseNotFound(expense_id.to_string()))?;
        let flat = self.validate_flat_membership(&expense.flat_id, &marked_by.id).await?;
        if marked_by.id != participant_id && flat.admin_id() != marked_by.id {
            return Err(SmartRentError::NotFlatAdmin(marked_by.id.clone()));
        }

        let share = expense
            .participants
            .iter_mut()
            .find(|p| extract_id(&p.user_id) == participant_id)
            .ok_or_else(|| SmartRentError::NotParticipant(participant_id.to_string()))?;
        if share.is_paid {
            return Err(SmartRentError::ParticipantAlreadyPaid(participant_id.to_string()));
        }
        share.is_paid = true;
        share.paid_at = Some(Utc::now());
        let amount = share.amount;

        if expense.status == ExpenseStatus::Active && expense.all_paid() {
            expense.status = ExpenseStatus::Paid;
            debug!("Expense {} fully paid", expense.id);
        }
        self.storage.save_expense(expense.clone()).await?;

        self.log_and_audit(
            Some(&expense.flat_id),
            SHARE_PAID,
            json!({
                "expense_id": expense.id,
                "user_id": participant_id,
                "amount": amount,
                "status": expense.status,
            }),
            Some(marked_by.id.as_str()),
        )
        .await?;
        Ok(expense)
    }

    pub async fn settle_expense(&self, expense_id: &str, settled_by: &User) -> Result<ExpenseRecord, SmartRentError> {
        let _writes = self.writes.lock().await;
        let mut expense = self
            .storage
            .get_expense(expense_id)
            .await?
            .ok_or_else(|| SmartRentError::ExpenseNotFound(expense_id.to_string()))?;
        self.validate_flat_admin(&expense.flat_id, &settled_by.id).await?;
        if expense.status != ExpenseStatus::Paid {
            return Err(SmartRentError::ExpenseNotPaid(expense_id.to_string()));
        }
        expense.status = ExpenseStatus::Settled;
        self.storage.save_expense(expense.clone()).await?;

        self.log_and_audit(
            Some(&expense.flat_id),
            EXPENSE_SETTLED,
            json!({ "expense_id": expense.id }),
            Some(settled_by.id.as_str()),
        )
        .await?;
        Ok(expense)
    }

    pub async fn list_expenses(&self, flat_id: &str, user: &User) -> Result<Vec<ExpenseRecord>, SmartRentError> {
        self.validate_flat_membership(flat_id, &user.id).await?;
        self.storage.get_expenses(flat_id).await
    }

    // PAYMENTS

    pub async fn create_payment(
        &self,
        flat_id: &str,
        payment: NewPayment,
        created_by: &User,
    ) -> Result<Payment, SmartRentError> {
        let flat = self.validate_flat_membership(flat_id, &created_by.id).await?;
        if !flat.is_active_member(&payment.payer_id) {
            return Err(SmartRentError::NotFlatMember(payment.payer_id));
        }
        self.validate_string_input("title", &payment.title, 100)?;
        self.validate_string_input("recipient", &payment.recipient, 100)?;
        let amount = self.validate_amount_input("amount", payment.amount, false)?;

        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            flat_id: flat_id.to_string(),
            payer_id: payment.payer_id,
            title: payment.title,
            recipient: payment.recipient,
            amount,
            due_date: payment.due_date,
            kind: payment.kind,
            priority: payment.priority,
            status: PaymentStatus::Pending,
            paid_at: None,
        };
        self.storage.save_payment(payment.clone()).await?;

        self.log_and_audit(
            Some(flat_id),
            PAYMENT_CREATED,
            json!({
                "payment_id": payment.id,
                "payer_id": payment.payer_id,
                "amount": payment.amount,
                "due_date": payment.due_date,
            }),
            Some(created_by.id.as_str()),
        )
        .await?;
        Ok(payment)
    }

    pub async fn mark_payment_paid(&self, payment_id: &str, paid_by: &User) -> Result<Payment, SmartRentError> {
        let _writes = self.writes.lock().await;
        let mut payment = self
            .storage
            .get_payment(payment_id)
            .await?
            .ok_or_else(|| SmartRentError::PaymentNotFound(payment_id.to_string()))?;
        let flat = self.validate_flat_membership(&payment.flat_id, &paid_by.id).await?;
        if payment.payer_id != paid_by.id && flat.admin_id() != paid_by.id {
            return Err(SmartRentError::NotFlatAdmin(paid_by.id.clone()));
        }
        if payment.status == PaymentStatus::Paid {
            return Err(SmartRentError::PaymentAlreadyPaid(payment_id.to_string()));
        }
        payment.status = PaymentStatus::Paid;
        payment.paid_at = Some(Utc::now());
        self.storage.save_payment(payment.clone()).await?;

        self.log_and_audit(
            Some(&payment.flat_id),
            PAYMENT_PAID,
            json!({ "payment_id": payment.id, "amount": payment.amount }),
            Some(paid_by.id.as_str()),
        )
        .await?;
        Ok(payment)
    }

    pub async fn list_payments(&self, flat_id: &str, user: &User) -> Result<Vec<Payment>, SmartRentError> {
        self.validate_flat_membership(flat_id, &user.id).await?;
        self.storage.get_payments(flat_id, &user.id).await
    }

    // VIEWS

    pub async fn flat_dashboard(&self, flat_id: &str, user: &User) -> Result<FlatDashboard, SmartRentError> {
        let flat = self.validate_flat_membership(flat_id, &user.id).await?;
        let expenses = self.storage.get_expenses(flat_id).await?;

        Ok(FlatDashboard {
            flat_id: flat.id.clone(),
            flat_name: flat.name.clone(),
            rent: round_currency(flat.rent),
            rent_per_person: rent_per_person(&flat),
            active_members: flat.active_members().count(),
            budget: budget_status(&flat, &expenses, Utc::now()),
            forecast: flat.forecast.clone(),
            summary: aggregate(&expenses, &user.id),
        })
    }

    pub async fn dues(&self, flat_id: &str, user: &User, period: Period) -> Result<DuesView, SmartRentError> {
        self.validate_flat_membership(flat_id, &user.id).await?;
        let payments = self.storage.get_payments(flat_id, &user.id).await?;
        let expenses = self.storage.get_expenses(flat_id).await?;
        Ok(resolve_dues(&payments, &expenses, &user.id, period))
    }

    // LOGS

    pub async fn get_app_logs(&self) -> Result<Vec<AppLog>, SmartRentError> {
        self.logging.get_logs().await
    }

    pub async fn get_flat_audits(&self, flat_id: &str) -> Result<Vec<FlatAudit>, SmartRentError> {
        self.get_flat_or_err(flat_id).await?;
        self.storage.get_flat_audits(flat_id).await
    }
}
