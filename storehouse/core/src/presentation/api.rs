// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0
//! HTTP API
//!
//! REST surface under `/api/v1`. Handlers parse path and query input, call
//! exactly one application service and serialize the resulting view.
//! Every failure is rendered as `{"error": "<message>"}` with a status code
//! derived from [`ErrorKind`].

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::application::account_service::{CreateAccountRequest, UpdateAccountRequest};
use crate::application::error::{ErrorKind, ServiceError};
use crate::application::expenditure_service::{CreateExpenditureRequest, UpdateExpenditureRequest};
use crate::application::member_service::{CreateMemberRequest, UpdateMemberRequest};
use crate::application::members_group_service::{CreateGroupRequest, UpdateGroupRequest};
use crate::application::receipt_service::{CreateReceiptRequest, UpdateReceiptRequest};
use crate::application::services::Services;
use crate::application::transaction_service::{CreateTransactionRequest, UpdateTransactionRequest};
use crate::application::transfer_service::{CreateTransferRequest, UpdateTransferRequest};
use crate::application::user_service::{
    ChangePasswordRequest, CreateUserRequest, LoginRequest, UpdateUserRequest,
};
use crate::domain::account::{AccountId, AccountView};
use crate::domain::expenditure::{ExpenditureId, ExpenditureView};
use crate::domain::member::{MemberId, MemberView};
use crate::domain::members_group::{GroupId, GroupView};
use crate::domain::period::DateRange;
use crate::domain::receipt::{ReceiptId, ReceiptView};
use crate::domain::transaction::{TransactionId, TransactionView};
use crate::domain::transfer::{TransferId, TransferView};
use crate::domain::user::{UserId, UserView};
use crate::domain::validation::{parse_id, ValidationError};

/// Header carrying the id of the caller recorded as `created_by`.
pub const USER_ID_HEADER: &str = "x-user-id";
const DEFAULT_CREATOR: &str = "system";

/// Build the full router: `/health` plus the versioned API.
pub fn app(services: Services) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(services)
}

fn api_routes() -> Router<Services> {
    Router::new()
        // Accounts
        .route("/accounts", get(list_accounts).post(create_account))
        .route(
            "/accounts/{id}",
            get(get_account).put(update_account).delete(deactivate_account),
        )
        .route("/accounts/{id}/deactivate", post(deactivate_account))
        // Members
        .route("/members", get(list_members).post(create_member))
        .route("/members/search", get(search_members))
        .route("/members/phone/{phone}", get(member_by_phone))
        .route("/members/email/{email}", get(member_by_email))
        .route("/members/group/{group_id}", get(members_by_group))
        .route(
            "/members/{id}",
            get(get_member).put(update_member).delete(delete_member),
        )
        // Groups
        .route("/groups", get(list_groups).post(create_group))
        .route("/groups/with-count", get(groups_with_count))
        .route("/groups/name/{name}", get(group_by_name))
        .route("/groups/{id}/count", get(group_member_count))
        .route(
            "/groups/{id}",
            get(get_group).put(update_group).delete(delete_group),
        )
        // Transactions
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/transactions/ref/{reference}", get(transaction_by_ref))
        .route("/transactions/account/{id}", get(transactions_by_account))
        .route("/transactions/member/{id}", get(transactions_by_member))
        .route("/transactions/type/{kind}", get(transactions_by_type))
        .route("/transactions/date-range", get(transactions_by_date_range))
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
        // Receipts
        .route("/receipts", get(list_receipts).post(create_receipt))
        .route("/receipts/transaction/{id}", get(receipts_by_transaction))
        .route("/receipts/account/{id}", get(receipts_by_account))
        .route("/receipts/account/{id}/total", get(receipts_total))
        .route("/receipts/date-range", get(receipts_by_date_range))
        .route("/receipts/date-range/{account_id}", get(receipts_total_in_range))
        .route(
            "/receipts/{id}",
            get(get_receipt).put(update_receipt).delete(delete_receipt),
        )
        // Expenditures
        .route("/expenditures", get(list_expenditures).post(create_expenditure))
        .route("/expenditures/transaction/{id}", get(expenditures_by_transaction))
        .route("/expenditures/account/{id}", get(expenditures_by_account))
        .route("/expenditures/date-range", get(expenditures_by_date_range))
        .route(
            "/expenditures/{id}",
            get(get_expenditure)
                .put(update_expenditure)
                .delete(delete_expenditure),
        )
        // Transfers
        .route("/transfers", get(list_transfers).post(create_transfer))
        .route("/transfers/transaction/{id}", get(transfers_by_transaction))
        .route("/transfers/credit-account/{id}", get(transfers_by_credit_account))
        .route("/transfers/credit-account/{id}/total", get(transfers_total))
        .route("/transfers/date-range", get(transfers_by_date_range))
        .route("/transfers/date-range/{account_id}", get(transfers_total_in_range))
        .route(
            "/transfers/{id}",
            get(get_transfer).put(update_transfer).delete(delete_transfer),
        )
        // Users
        .route("/users", get(list_users).post(create_user))
        .route("/users/active", get(active_users))
        .route("/users/authenticate", post(authenticate))
        .route("/users/role/{role}", get(users_by_role))
        .route("/users/username/{username}", get(user_by_username))
        .route("/users/email/{email}", get(user_by_email))
        .route("/users/{id}/deactivate", post(deactivate_user))
        .route("/users/{id}/change-password", post(change_password))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

// ============================================================================
// Errors and shared extractors
// ============================================================================

/// A [`ServiceError`] rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError(ServiceError::Validation(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Unauthorized => match self.0 {
                ServiceError::AccountDeactivated => StatusCode::FORBIDDEN,
                _ => StatusCode::UNAUTHORIZED,
            },
            ErrorKind::Persistence => {
                error!(error = %self.0, "Request failed in persistence layer");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ValidationError::MalformedRequest(rejection.body_text()).into()
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ValidationError::MalformedRequest(rejection.body_text()).into()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ValidationError::MalformedRequest(rejection.body_text()).into()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// `axum::Json` whose rejections render as [`ApiError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

fn id<T: FromStr>(field: &'static str, raw: &str) -> ApiResult<T> {
    Ok(parse_id(field, raw)?)
}

/// Placeholder caller identity until authentication middleware exists.
fn creator(headers: &HeaderMap) -> String {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_CREATOR)
        .to_string()
}

fn views<T, V: for<'a> From<&'a T>>(rows: &[T]) -> Vec<V> {
    rows.iter().map(V::from).collect()
}

fn created<T: Serialize>(body: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(body))
}

fn message(text: &str) -> Json<serde_json::Value> {
    Json(json!({ "message": text }))
}

#[derive(Serialize)]
struct Total {
    total: Decimal,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExpandQuery {
    #[serde(default)]
    pub expand: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRangeQuery {
    fn range(&self) -> ApiResult<DateRange> {
        Ok(DateRange::parse(
            self.start_date.as_deref(),
            self.end_date.as_deref(),
        )?)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ============================================================================
// Accounts
// ============================================================================

async fn list_accounts(State(s): State<Services>) -> ApiResult<Json<Vec<AccountView>>> {
    Ok(Json(views(&s.accounts.list_all().await?)))
}

async fn create_account(
    State(s): State<Services>,
    headers: HeaderMap,
    Json(req): Json<CreateAccountRequest>,
) -> ApiResult<impl IntoResponse> {
    let account = s.accounts.create(req, &creator(&headers)).await?;
    Ok(created(AccountView::from(account)))
}

async fn get_account(State(s): State<Services>, Path(raw): Path<String>) -> ApiResult<Json<AccountView>> {
    let account = s.accounts.get(id("account id", &raw)?).await?;
    Ok(Json(account.into()))
}

async fn update_account(
    State(s): State<Services>,
    Path(raw): Path<String>,
    Json(req): Json<UpdateAccountRequest>,
) -> ApiResult<Json<AccountView>> {
    let account = s.accounts.update(id::<AccountId>("account id", &raw)?, req).await?;
    Ok(Json(account.into()))
}

async fn deactivate_account(
    State(s): State<Services>,
    Path(raw): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    s.accounts.deactivate(id("account id", &raw)?).await?;
    Ok(message("Account deactivated successfully"))
}

// ============================================================================
// Members
// ============================================================================

async fn list_members(State(s): State<Services>) -> ApiResult<Json<Vec<MemberView>>> {
    Ok(Json(views(&s.members.list_all().await?)))
}

async fn create_member(
    State(s): State<Services>,
    headers: HeaderMap,
    Json(req): Json<CreateMemberRequest>,
) -> ApiResult<impl IntoResponse> {
    let member = s.members.create(req, &creator(&headers)).await?;
    Ok(created(MemberView::from(member)))
}

async fn get_member(
    State(s): State<Services>,
    Path(raw): Path<String>,
    Query(q): Query<ExpandQuery>,
) -> ApiResult<Json<MemberView>> {
    let member_id: MemberId = id("member id", &raw)?;
    if q.expand {
        return Ok(Json(s.members.get_detailed(member_id).await?));
    }
    Ok(Json(s.members.get(member_id).await?.into()))
}

async fn update_member(
    State(s): State<Services>,
    Path(raw): Path<String>,
    Json(req): Json<UpdateMemberRequest>,
) -> ApiResult<Json<MemberView>> {
    let member = s.members.update(id("member id", &raw)?, req).await?;
    Ok(Json(member.into()))
}

async fn delete_member(
    State(s): State<Services>,
    Path(raw): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    s.members.delete(id("member id", &raw)?).await?;
    Ok(message("Member deleted successfully"))
}

async fn search_members(
    State(s): State<Services>,
    Query(q): Query<SearchQuery>,
) -> ApiResult<Json<Vec<MemberView>>> {
    let term = q
        .q
        .filter(|t| !t.trim().is_empty())
        .ok_or(ValidationError::MissingField("search query 'q'"))?;
    Ok(Json(views(&s.members.search(&term).await?)))
}

async fn member_by_phone(State(s): State<Services>, Path(phone): Path<String>) -> ApiResult<Json<MemberView>> {
    Ok(Json(s.members.find_by_phone(&phone).await?.into()))
}

async fn member_by_email(State(s): State<Services>, Path(email): Path<String>) -> ApiResult<Json<MemberView>> {
    Ok(Json(s.members.find_by_email(&email).await?.into()))
}

async fn members_by_group(
    State(s): State<Services>,
    Path(raw): Path<String>,
) -> ApiResult<Json<Vec<MemberView>>> {
    let group_id: GroupId = id("group id", &raw)?;
    Ok(Json(views(&s.members.list_by_group(group_id).await?)))
}

// ============================================================================
// Groups
// ============================================================================

async fn list_groups(State(s): State<Services>) -> ApiResult<Json<Vec<GroupView>>> {
    Ok(Json(views(&s.groups.list_all().await?)))
}

async fn create_group(
    State(s): State<Services>,
    headers: HeaderMap,
    Json(req): Json<CreateGroupRequest>,
) -> ApiResult<impl IntoResponse> {
    let group = s.groups.create(req, &creator(&headers)).await?;
    Ok(created(GroupView::from(group)))
}

async fn get_group(State(s): State<Services>, Path(raw): Path<String>) -> ApiResult<Json<GroupView>> {
    Ok(Json(s.groups.get(id("group id", &raw)?).await?.into()))
}

async fn update_group(
    State(s): State<Services>,
    Path(raw): Path<String>,
    Json(req): Json<UpdateGroupRequest>,
) -> ApiResult<Json<GroupView>> {
    Ok(Json(s.groups.update(id("group id", &raw)?, req).await?.into()))
}

async fn delete_group(
    State(s): State<Services>,
    Path(raw): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    s.groups.delete(id("group id", &raw)?).await?;
    Ok(message("Group deleted successfully"))
}

async fn groups_with_count(State(s): State<Services>) -> ApiResult<impl IntoResponse> {
    Ok(Json(s.groups.list_with_member_counts().await?))
}

async fn group_member_count(
    State(s): State<Services>,
    Path(raw): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let group_id: GroupId = id("group id", &raw)?;
    let count = s.groups.member_count(group_id).await?;
    Ok(Json(json!({ "group_id": group_id, "member_count": count })))
}

async fn group_by_name(State(s): State<Services>, Path(name): Path<String>) -> ApiResult<Json<GroupView>> {
    Ok(Json(s.groups.find_by_name(&name).await?.into()))
}

// ============================================================================
// Transactions
// ============================================================================

async fn list_transactions(State(s): State<Services>) -> ApiResult<Json<Vec<TransactionView>>> {
    Ok(Json(views(&s.transactions.list_all().await?)))
}

async fn create_transaction(
    State(s): State<Services>,
    headers: HeaderMap,
    Json(req): Json<CreateTransactionRequest>,
) -> ApiResult<impl IntoResponse> {
    let tx = s.transactions.create(req, &creator(&headers)).await?;
    Ok(created(TransactionView::from(tx)))
}

async fn get_transaction(
    State(s): State<Services>,
    Path(raw): Path<String>,
    Query(q): Query<ExpandQuery>,
) -> ApiResult<Json<TransactionView>> {
    let tx_id: TransactionId = id("transaction id", &raw)?;
    if q.expand {
        return Ok(Json(s.transactions.get_detailed(tx_id).await?));
    }
    Ok(Json(s.transactions.get(tx_id).await?.into()))
}

async fn update_transaction(
    State(s): State<Services>,
    Path(raw): Path<String>,
    Json(req): Json<UpdateTransactionRequest>,
) -> ApiResult<Json<TransactionView>> {
    let tx = s.transactions.update(id("transaction id", &raw)?, req).await?;
    Ok(Json(tx.into()))
}

async fn delete_transaction(
    State(s): State<Services>,
    Path(raw): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    s.transactions.delete(id("transaction id", &raw)?).await?;
    Ok(message("Transaction deleted successfully"))
}

async fn transaction_by_ref(
    State(s): State<Services>,
    Path(reference): Path<String>,
) -> ApiResult<Json<TransactionView>> {
    Ok(Json(s.transactions.find_by_reference(&reference).await?.into()))
}

async fn transactions_by_account(
    State(s): State<Services>,
    Path(raw): Path<String>,
) -> ApiResult<Json<Vec<TransactionView>>> {
    let account_id: AccountId = id("account id", &raw)?;
    Ok(Json(views(&s.transactions.list_by_account(account_id).await?)))
}

async fn transactions_by_member(
    State(s): State<Services>,
    Path(raw): Path<String>,
) -> ApiResult<Json<Vec<TransactionView>>> {
    let member_id: MemberId = id("member id", &raw)?;
    Ok(Json(views(&s.transactions.list_by_member(member_id).await?)))
}

async fn transactions_by_type(
    State(s): State<Services>,
    Path(kind): Path<String>,
) -> ApiResult<Json<Vec<TransactionView>>> {
    Ok(Json(views(&s.transactions.list_by_type(&kind).await?)))
}

async fn transactions_by_date_range(
    State(s): State<Services>,
    Query(q): Query<DateRangeQuery>,
) -> ApiResult<Json<Vec<TransactionView>>> {
    Ok(Json(views(&s.transactions.list_by_date_range(q.range()?).await?)))
}

// ============================================================================
// Receipts
// ============================================================================

async fn list_receipts(State(s): State<Services>) -> ApiResult<Json<Vec<ReceiptView>>> {
    Ok(Json(views(&s.receipts.list_all().await?)))
}

async fn create_receipt(
    State(s): State<Services>,
    Json(req): Json<CreateReceiptRequest>,
) -> ApiResult<impl IntoResponse> {
    Ok(created(ReceiptView::from(s.receipts.create(req).await?)))
}

async fn get_receipt(
    State(s): State<Services>,
    Path(raw): Path<String>,
    Query(q): Query<ExpandQuery>,
) -> ApiResult<Json<ReceiptView>> {
    let receipt_id: ReceiptId = id("receipt id", &raw)?;
    if q.expand {
        return Ok(Json(s.receipts.get_detailed(receipt_id).await?));
    }
    Ok(Json(s.receipts.get(receipt_id).await?.into()))
}

async fn update_receipt(
    State(s): State<Services>,
    Path(raw): Path<String>,
    Json(req): Json<UpdateReceiptRequest>,
) -> ApiResult<Json<ReceiptView>> {
    Ok(Json(s.receipts.update(id("receipt id", &raw)?, req).await?.into()))
}

async fn delete_receipt(
    State(s): State<Services>,
    Path(raw): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    s.receipts.delete(id("receipt id", &raw)?).await?;
    Ok(message("Receipt deleted successfully"))
}

async fn receipts_by_transaction(
    State(s): State<Services>,
    Path(raw): Path<String>,
) -> ApiResult<Json<Vec<ReceiptView>>> {
    let tx_id: TransactionId = id("transaction id", &raw)?;
    Ok(Json(views(&s.receipts.list_by_transaction(tx_id).await?)))
}

async fn receipts_by_account(
    State(s): State<Services>,
    Path(raw): Path<String>,
) -> ApiResult<Json<Vec<ReceiptView>>> {
    let account_id: AccountId = id("account id", &raw)?;
    Ok(Json(views(&s.receipts.list_by_account(account_id).await?)))
}

async fn receipts_total(State(s): State<Services>, Path(raw): Path<String>) -> ApiResult<impl IntoResponse> {
    let total = s.receipts.total_by_account(id("account id", &raw)?).await?;
    Ok(Json(Total { total }))
}

async fn receipts_by_date_range(
    State(s): State<Services>,
    Query(q): Query<DateRangeQuery>,
) -> ApiResult<Json<Vec<ReceiptView>>> {
    Ok(Json(views(&s.receipts.list_by_date_range(q.range()?).await?)))
}

async fn receipts_total_in_range(
    State(s): State<Services>,
    Path(raw): Path<String>,
    Query(q): Query<DateRangeQuery>,
) -> ApiResult<impl IntoResponse> {
    let account_id: AccountId = id("account id", &raw)?;
    let total = s.receipts.total_by_account_in_range(account_id, q.range()?).await?;
    Ok(Json(Total { total }))
}

// ============================================================================
// Expenditures
// ============================================================================

async fn list_expenditures(State(s): State<Services>) -> ApiResult<Json<Vec<ExpenditureView>>> {
    Ok(Json(views(&s.expenditures.list_all().await?)))
}

async fn create_expenditure(
    State(s): State<Services>,
    Json(req): Json<CreateExpenditureRequest>,
) -> ApiResult<impl IntoResponse> {
    Ok(created(ExpenditureView::from(s.expenditures.create(req).await?)))
}

async fn get_expenditure(
    State(s): State<Services>,
    Path(raw): Path<String>,
    Query(q): Query<ExpandQuery>,
) -> ApiResult<Json<ExpenditureView>> {
    let expenditure_id: ExpenditureId = id("expenditure id", &raw)?;
    if q.expand {
        return Ok(Json(s.expenditures.get_detailed(expenditure_id).await?));
    }
    Ok(Json(s.expenditures.get(expenditure_id).await?.into()))
}

async fn update_expenditure(
    State(s): State<Services>,
    Path(raw): Path<String>,
    Json(req): Json<UpdateExpenditureRequest>,
) -> ApiResult<Json<ExpenditureView>> {
    Ok(Json(s.expenditures.update(id("expenditure id", &raw)?, req).await?.into()))
}

async fn delete_expenditure(
    State(s): State<Services>,
    Path(raw): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    s.expenditures.delete(id("expenditure id", &raw)?).await?;
    Ok(message("Expenditure deleted successfully"))
}

async fn expenditures_by_transaction(
    State(s): State<Services>,
    Path(raw): Path<String>,
) -> ApiResult<Json<Vec<ExpenditureView>>> {
    let tx_id: TransactionId = id("transaction id", &raw)?;
    Ok(Json(views(&s.expenditures.list_by_transaction(tx_id).await?)))
}

async fn expenditures_by_account(
    State(s): State<Services>,
    Path(raw): Path<String>,
) -> ApiResult<Json<Vec<ExpenditureView>>> {
    let account_id: AccountId = id("account id", &raw)?;
    Ok(Json(views(&s.expenditures.list_by_account(account_id).await?)))
}

async fn expenditures_by_date_range(
    State(s): State<Services>,
    Query(q): Query<DateRangeQuery>,
) -> ApiResult<Json<Vec<ExpenditureView>>> {
    Ok(Json(views(&s.expenditures.list_by_date_range(q.range()?).await?)))
}

// ============================================================================
// Transfers
// ============================================================================

async fn list_transfers(State(s): State<Services>) -> ApiResult<Json<Vec<TransferView>>> {
    Ok(Json(views(&s.transfers.list_all().await?)))
}

async fn create_transfer(
    State(s): State<Services>,
    Json(req): Json<CreateTransferRequest>,
) -> ApiResult<impl IntoResponse> {
    Ok(created(TransferView::from(s.transfers.create(req).await?)))
}

async fn get_transfer(
    State(s): State<Services>,
    Path(raw): Path<String>,
    Query(q): Query<ExpandQuery>,
) -> ApiResult<Json<TransferView>> {
    let transfer_id: TransferId = id("transfer id", &raw)?;
    if q.expand {
        return Ok(Json(s.transfers.get_detailed(transfer_id).await?));
    }
    Ok(Json(s.transfers.get(transfer_id).await?.into()))
}

async fn update_transfer(
    State(s): State<Services>,
    Path(raw): Path<String>,
    Json(req): Json<UpdateTransferRequest>,
) -> ApiResult<Json<TransferView>> {
    Ok(Json(s.transfers.update(id("transfer id", &raw)?, req).await?.into()))
}

async fn delete_transfer(
    State(s): State<Services>,
    Path(raw): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    s.transfers.delete(id("transfer id", &raw)?).await?;
    Ok(message("Transfer deleted successfully"))
}

async fn transfers_by_transaction(
    State(s): State<Services>,
    Path(raw): Path<String>,
) -> ApiResult<Json<Vec<TransferView>>> {
    let tx_id: TransactionId = id("transaction id", &raw)?;
    Ok(Json(views(&s.transfers.list_by_transaction(tx_id).await?)))
}

async fn transfers_by_credit_account(
    State(s): State<Services>,
    Path(raw): Path<String>,
) -> ApiResult<Json<Vec<TransferView>>> {
    let account_id: AccountId = id("account id", &raw)?;
    Ok(Json(views(&s.transfers.list_by_credit_account(account_id).await?)))
}

async fn transfers_total(State(s): State<Services>, Path(raw): Path<String>) -> ApiResult<impl IntoResponse> {
    let total = s.transfers.total_by_credit_account(id("account id", &raw)?).await?;
    Ok(Json(Total { total }))
}

async fn transfers_by_date_range(
    State(s): State<Services>,
    Query(q): Query<DateRangeQuery>,
) -> ApiResult<Json<Vec<TransferView>>> {
    Ok(Json(views(&s.transfers.list_by_date_range(q.range()?).await?)))
}

async fn transfers_total_in_range(
    State(s): State<Services>,
    Path(raw): Path<String>,
    Query(q): Query<DateRangeQuery>,
) -> ApiResult<impl IntoResponse> {
    let account_id: AccountId = id("account id", &raw)?;
    let total = s
        .transfers
        .total_by_credit_account_in_range(account_id, q.range()?)
        .await?;
    Ok(Json(Total { total }))
}

// ============================================================================
// Users
// ============================================================================

async fn list_users(State(s): State<Services>) -> ApiResult<Json<Vec<UserView>>> {
    Ok(Json(views(&s.users.list_all().await?)))
}

async fn create_user(
    State(s): State<Services>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    Ok(created(UserView::from(s.users.create(req).await?)))
}

async fn get_user(State(s): State<Services>, Path(raw): Path<String>) -> ApiResult<Json<UserView>> {
    Ok(Json(s.users.get(id("user id", &raw)?).await?.into()))
}

async fn update_user(
    State(s): State<Services>,
    Path(raw): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserView>> {
    Ok(Json(s.users.update(id("user id", &raw)?, req).await?.into()))
}

async fn delete_user(
    State(s): State<Services>,
    Path(raw): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    s.users.delete(id("user id", &raw)?).await?;
    Ok(message("User deleted successfully"))
}

async fn deactivate_user(
    State(s): State<Services>,
    Path(raw): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    s.users.deactivate(id("user id", &raw)?).await?;
    Ok(message("User deactivated successfully"))
}

async fn change_password(
    State(s): State<Services>,
    Path(raw): Path<String>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let user_id: UserId = id("user id", &raw)?;
    s.users
        .change_password(user_id, &req.old_password, &req.new_password)
        .await?;
    Ok(message("Password changed successfully"))
}

async fn authenticate(
    State(s): State<Services>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<UserView>> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(ValidationError::MissingField("username and password").into());
    }
    Ok(Json(s.users.authenticate(&req.username, &req.password).await?.into()))
}

async fn active_users(State(s): State<Services>) -> ApiResult<Json<Vec<UserView>>> {
    Ok(Json(views(&s.users.list_active().await?)))
}

async fn users_by_role(State(s): State<Services>, Path(role): Path<String>) -> ApiResult<Json<Vec<UserView>>> {
    Ok(Json(views(&s.users.list_by_role(&role).await?)))
}

async fn user_by_username(State(s): State<Services>, Path(username): Path<String>) -> ApiResult<Json<UserView>> {
    Ok(Json(s.users.find_by_username(&username).await?.into()))
}

async fn user_by_email(State(s): State<Services>, Path(email): Path<String>) -> ApiResult<Json<UserView>> {
    Ok(Json(s.users.find_by_email(&email).await?.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_creator_defaults_to_system() {
        let mut headers = HeaderMap::new();
        assert_eq!(creator(&headers), "system");
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("  "));
        assert_eq!(creator(&headers), "system");
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("treasurer-1"));
        assert_eq!(creator(&headers), "treasurer-1");
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (ServiceError::not_found("member", "x"), StatusCode::NOT_FOUND),
            (ServiceError::DuplicatePhone("0712".into()), StatusCode::CONFLICT),
            (ServiceError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (ServiceError::AccountDeactivated, StatusCode::FORBIDDEN),
            (
                ServiceError::Validation(ValidationError::MissingField("q")),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::Validation(ValidationError::MalformedRequest("bad body".into())),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }
}
