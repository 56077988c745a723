//! # Account Handlers
//!
//! Routes under `/api/accounts`.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::handlers::{mutation_reply, status_reply, MESSAGE_417_DELETE, MESSAGE_417_UPDATE};
use crate::AppState;
use accounts_core::{AccountCreateDraft, AccountUpdateDraft, AccountView};

const MESSAGE_201: &str = "Account created successfully";

/// Query string of `GET /api/accounts`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAccountParams {
    pub customer_id: i64,
}

/// `POST /api/accounts`
pub async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<AccountCreateDraft>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(draft) = payload?;
    let view = state.account_service().create(&draft).await?;

    info!(
        account_id = view.account_id,
        customer_id = view.customer_id,
        "Account opening accepted"
    );
    Ok(status_reply(StatusCode::CREATED, MESSAGE_201))
}

/// `GET /api/accounts?customerId=..`
pub async fn current_account(
    State(state): State<AppState>,
    params: Result<Query<CurrentAccountParams>, QueryRejection>,
) -> Result<Json<AccountView>, ApiError> {
    let Query(params) = params?;
    Ok(Json(
        state.account_service().current_account(params.customer_id).await?,
    ))
}

/// `GET /api/accounts/all`
pub async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountView>>, ApiError> {
    let start = Instant::now();
    let accounts = state.account_service().list_all().await?;

    debug!(
        count = accounts.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Listed accounts with owners"
    );
    Ok(Json(accounts))
}

/// `GET /api/accounts/customerId/{customerId}`
pub async fn list_by_customer(
    State(state): State<AppState>,
    customer_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<AccountView>>, ApiError> {
    let Path(customer_id) = customer_id?;
    Ok(Json(
        state.account_service().list_by_customer(customer_id).await?,
    ))
}

/// `GET /api/accounts/branchName/{branchName}`
pub async fn search_by_branch_name(
    State(state): State<AppState>,
    term: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<AccountView>>, ApiError> {
    let Path(term) = term?;
    Ok(Json(state.account_service().search_by_branch_name(&term).await?))
}

/// `GET /api/accounts/accountType/{accountType}`
pub async fn search_by_account_type(
    State(state): State<AppState>,
    term: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<AccountView>>, ApiError> {
    let Path(term) = term?;
    Ok(Json(state.account_service().search_by_account_type(&term).await?))
}

/// `GET /api/accounts/accountStatus/{accountStatus}`
pub async fn search_by_account_status(
    State(state): State<AppState>,
    term: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<AccountView>>, ApiError> {
    let Path(term) = term?;
    Ok(Json(
        state.account_service().search_by_account_status(&term).await?,
    ))
}

/// `PUT /api/accounts/{accountId}`
pub async fn update_account(
    State(state): State<AppState>,
    account_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<AccountUpdateDraft>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Path(account_id) = account_id?;
    let Json(draft) = payload?;

    let updated = state.account_service().update(account_id, &draft).await?;
    Ok(mutation_reply(updated, MESSAGE_417_UPDATE))
}

/// `DELETE /api/accounts/{accountId}`
pub async fn delete_account(
    State(state): State<AppState>,
    account_id: Result<Path<i64>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(account_id) = account_id?;

    let deleted = state.account_service().delete(account_id).await?;
    Ok(mutation_reply(deleted, MESSAGE_417_DELETE))
}
