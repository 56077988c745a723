//! # HTTP Handlers
//!
//! Thin axum handlers: extract, call a service, shape the response.
//!
//! Mutations answer with a [`StatusResponse`]; reads answer with views.
//! Update/delete report `false` from a service as 417 Expectation Failed.

pub mod account;
pub mod customer;
pub mod health;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

pub(crate) const MESSAGE_200: &str = "Request processed successfully";
pub(crate) const MESSAGE_417_UPDATE: &str =
    "Update operation failed. Please try again or contact Dev team";
pub(crate) const MESSAGE_417_DELETE: &str =
    "Delete operation failed. Please try again or contact Dev team";

/// Body returned by create/update/delete.
///
/// ```json
/// { "statusCode": "201", "statusMsg": "Customer created successfully" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status_code: String,
    pub status_msg: String,
}

impl StatusResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        StatusResponse {
            status_code: status.as_u16().to_string(),
            status_msg: message.into(),
        }
    }
}

/// Pairs a status code with a matching [`StatusResponse`] body.
pub(crate) fn status_reply(status: StatusCode, message: &str) -> Response {
    (status, Json(StatusResponse::new(status, message))).into_response()
}

/// 200 when the mutation was applied, 417 otherwise.
pub(crate) fn mutation_reply(applied: bool, failed_message: &str) -> Response {
    if applied {
        status_reply(StatusCode::OK, MESSAGE_200)
    } else {
        status_reply(StatusCode::EXPECTATION_FAILED, failed_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_response_shape() {
        let json =
            serde_json::to_value(StatusResponse::new(StatusCode::CREATED, "created")).unwrap();
        assert_eq!(json["statusCode"], "201");
        assert_eq!(json["statusMsg"], "created");
    }

    #[test]
    fn test_mutation_reply_status() {
        assert_eq!(mutation_reply(true, MESSAGE_417_UPDATE).status(), StatusCode::OK);
        assert_eq!(
            mutation_reply(false, MESSAGE_417_DELETE).status(),
            StatusCode::EXPECTATION_FAILED
        );
    }
}
