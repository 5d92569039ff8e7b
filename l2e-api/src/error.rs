//! API Error types

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use l2e_core::{StoreError, ValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidationErrors;

use crate::services::ModerationError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyDecided(String),

    #[error("{0}")]
    LedgerFailure(String),

    #[error("{0}")]
    StoreFailure(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    /// HTTP status and machine-readable code
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Duplicate(_) => (StatusCode::BAD_REQUEST, "DUPLICATE"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::AlreadyDecided(_) => (StatusCode::CONFLICT, "ALREADY_DECIDED"),
            ApiError::LedgerFailure(_) => (StatusCode::INTERNAL_SERVER_ERROR, "LEDGER_FAILURE"),
            ApiError::StoreFailure(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_FAILURE"),
            ApiError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self {
        let mut fields: Vec<_> = e.field_errors().into_iter().collect();
        fields.sort_by_key(|(name, _)| *name);

        let messages: Vec<String> = fields
            .into_iter()
            .filter_map(|(name, errors)| {
                let err = errors.first()?;
                let field = camel_case(name);
                Some(match err.code.as_ref() {
                    "required" => format!("Missing required field: {}", field),
                    "length" => match err.params.get("max") {
                        Some(max) => format!("Field {} must be 1 to {} characters", field, max),
                        None => format!("Field {} must not be empty", field),
                    },
                    code => format!("Invalid field {}: {}", field, code),
                })
            })
            .collect();

        ApiError::Validation(messages.join("; "))
    }
}

/// `display_name` -> `displayName`
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::Validation(e.body_text())
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(_) => {
                ApiError::Duplicate("You have already submitted a proof".to_string())
            }
            StoreError::NotFound(_) => ApiError::NotFound("No submission found".to_string()),
            StoreError::AlreadyDecided(id) => {
                ApiError::AlreadyDecided(format!("Submission for {} has already been decided", id))
            }
            other => ApiError::StoreFailure(other.to_string()),
        }
    }
}

impl From<ModerationError> for ApiError {
    fn from(e: ModerationError) -> Self {
        match e {
            ModerationError::Unauthorized => ApiError::Unauthorized,
            ModerationError::Validation(v) => v.into(),
            ModerationError::NotFound(_) => ApiError::NotFound("No submission found".to_string()),
            e @ ModerationError::AlreadyDecided(_) => ApiError::AlreadyDecided(e.to_string()),
            e @ ModerationError::LedgerFailure { .. } => ApiError::LedgerFailure(e.to_string()),
            e @ ModerationError::StoreFailure { .. } => ApiError::StoreFailure(e.to_string()),
            ModerationError::TaskFailed(reason) => ApiError::InternalError(reason),
        }
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::from(StoreError::Duplicate("0xaa".into())).status_and_code(),
            (StatusCode::BAD_REQUEST, "DUPLICATE")
        );
        assert_eq!(
            ApiError::from(ModerationError::Unauthorized).status_and_code(),
            (StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
        );
        assert_eq!(
            ApiError::from(ModerationError::AlreadyDecided("0xaa".into())).status_and_code(),
            (StatusCode::CONFLICT, "ALREADY_DECIDED")
        );
        assert_eq!(
            ApiError::from(ValidationError::MissingField("identity")).status_and_code(),
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        );
    }

    #[test]
    fn test_validation_errors_use_wire_names() {
        use crate::dto::CreateSubmissionRequest;
        use validator::Validate;

        let req = CreateSubmissionRequest {
            identity: Some("0xaa".into()),
            display_name: Some("n".repeat(300)),
            proof_reference: None,
        };
        let err = ApiError::from(req.validate().unwrap_err());
        assert_eq!(err.status_and_code().1, "VALIDATION_ERROR");
        assert_eq!(
            err.to_string(),
            "Field displayName must be 1 to 256 characters; Missing required field: proofReference"
        );
    }

    #[test]
    fn test_ledger_failure_message_keeps_reason() {
        let err = ApiError::from(ModerationError::LedgerFailure {
            reason: "Transaction was reverted".into(),
            tx_id: Some("0x2".into()),
        });
        assert_eq!(err.status_and_code().1, "LEDGER_FAILURE");
        assert_eq!(
            err.to_string(),
            "Failed to process on blockchain: Transaction was reverted"
        );
    }
}
