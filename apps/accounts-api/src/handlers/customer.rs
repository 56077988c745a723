//! # Customer Handlers
//!
//! Routes under `/api/customers`.

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
use accounts_core::{CustomerDraft, CustomerView};

const MESSAGE_201: &str = "Customer created successfully";

/// Query string of `GET /api/customers/lookup`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupParams {
    pub email: Option<String>,
    pub mobile_number: Option<String>,
}

/// `POST /api/customers`
pub async fn create_customer(
    State(state): State<AppState>,
    payload: Result<Json<CustomerDraft>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(draft) = payload?;
    let view = state.customer_service().create(&draft).await?;

    info!(customer_id = view.customer_id, "Customer signup accepted");
    Ok(status_reply(StatusCode::CREATED, MESSAGE_201))
}

/// `GET /api/customers`
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerView>>, ApiError> {
    let start = Instant::now();
    let customers = state.customer_service().list_all().await?;

    debug!(
        count = customers.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Listed customers"
    );
    Ok(Json(customers))
}

/// `GET /api/customers/{customerId}`
pub async fn get_customer(
    State(state): State<AppState>,
    customer_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<CustomerView>, ApiError> {
    let Path(customer_id) = customer_id?;
    Ok(Json(state.customer_service().get_by_id(customer_id).await?))
}

/// `GET /api/customers/lookup?email=..` or `?mobileNumber=..`
///
/// Exact match; email wins when both are given.
pub async fn lookup_customer(
    State(state): State<AppState>,
    params: Result<Query<LookupParams>, QueryRejection>,
) -> Result<Json<CustomerView>, ApiError> {
    let Query(params) = params?;
    let service = state.customer_service();

    let view = match (params.email, params.mobile_number) {
        (Some(email), _) => service.get_by_email(&email).await?,
        (None, Some(mobile_number)) => service.get_by_mobile_number(&mobile_number).await?,
        (None, None) => {
            return Err(ApiError::validation(
                "either email or mobileNumber is required",
            ))
        }
    };

    Ok(Json(view))
}

/// `GET /api/customers/email/{email}`
pub async fn search_by_email(
    State(state): State<AppState>,
    term: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<CustomerView>>, ApiError> {
    let Path(term) = term?;
    Ok(Json(state.customer_service().search_by_email(&term).await?))
}

/// `GET /api/customers/mobileNumber/{mobileNumber}`
pub async fn search_by_mobile_number(
    State(state): State<AppState>,
    term: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<CustomerView>>, ApiError> {
    let Path(term) = term?;
    Ok(Json(
        state.customer_service().search_by_mobile_number(&term).await?,
    ))
}

/// `GET /api/customers/documentNumber/{documentNumber}`
pub async fn search_by_document_number(
    State(state): State<AppState>,
    term: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<CustomerView>>, ApiError> {
    let Path(term) = term?;
    Ok(Json(
        state.customer_service().search_by_document_number(&term).await?,
    ))
}

/// `GET /api/customers/name/{name}`
pub async fn search_by_name(
    State(state): State<AppState>,
    term: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<CustomerView>>, ApiError> {
    let Path(term) = term?;
    Ok(Json(state.customer_service().search_by_name(&term).await?))
}

/// `PUT /api/customers/{customerId}`
pub async fn update_customer(
    State(state): State<AppState>,
    customer_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CustomerDraft>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Path(customer_id) = customer_id?;
    let Json(draft) = payload?;

    let updated = state.customer_service().update(customer_id, &draft).await?;
    Ok(mutation_reply(updated, MESSAGE_417_UPDATE))
}

/// `DELETE /api/customers/{customerId}`
pub async fn delete_customer(
    State(state): State<AppState>,
    customer_id: Result<Path<i64>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(customer_id) = customer_id?;

    let deleted = state.customer_service().delete(customer_id).await?;
    Ok(mutation_reply(deleted, MESSAGE_417_DELETE))
}
