//! API Errors
//!
//! Every failure leaves the server as `{success: false, message, errors?}`, where
//! `message` is a stable machine-readable code and `errors` optionally maps request
//! fields to their problems.

use std::collections::BTreeMap;

use salvo::{
    Scribe,
    http::StatusCode,
    oapi::{self, Components, EndpointOutRegister, Operation, ToSchema},
    prelude::{Json, Response, StatusError},
};
use serde::{Deserialize, Serialize};

/// Field name to validation messages.
pub(crate) type FieldErrors = BTreeMap<String, Vec<String>>;

/// Error Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorResponse {
    /// Always `false`
    pub success: bool,

    /// Machine-readable error code
    pub message: String,

    /// Per-field problems, when the request itself was at fault
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

#[derive(Debug)]
pub(crate) struct ApiError {
    status: StatusCode,
    message: String,
    errors: Option<FieldErrors>,
}

impl ApiError {
    pub(crate) fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: None,
        }
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub(crate) fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthenticated")
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub(crate) fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub(crate) fn internal() -> Self {
        Self::internal_with("internal_error")
    }

    /// A 500 with a user-safe `message`; the cause is logged by the caller.
    pub(crate) fn internal_with(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Request validation failure listing each offending field.
    pub(crate) fn validation(errors: FieldErrors) -> Self {
        Self::unprocessable("validation_failed").with_errors(errors)
    }

    #[must_use]
    pub(crate) fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    pub(crate) fn status(&self) -> StatusCode {
        self.status
    }

    pub(crate) fn message(&self) -> &str {
        &self.message
    }
}

impl From<StatusError> for ApiError {
    fn from(error: StatusError) -> Self {
        let message = if error.brief.is_empty() {
            error.name
        } else {
            error.brief
        };

        Self::new(error.code, message)
    }
}

impl Scribe for ApiError {
    fn render(self, res: &mut Response) {
        res.status_code(self.status);
        res.render(Json(ErrorResponse {
            success: false,
            message: self.message,
            errors: self.errors,
        }));
    }
}

impl EndpointOutRegister for ApiError {
    fn register(components: &mut Components, operation: &mut Operation) {
        let schema = ErrorResponse::to_schema(components);

        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::UNAUTHORIZED,
            StatusCode::NOT_FOUND,
            StatusCode::UNPROCESSABLE_ENTITY,
            StatusCode::INTERNAL_SERVER_ERROR,
        ] {
            operation.responses.insert(
                status.as_str(),
                oapi::Response::new(status.canonical_reason().unwrap_or_default())
                    .add_content("application/json", oapi::Content::new(schema.clone())),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::{
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    #[handler]
    async fn failing() -> Result<&'static str, ApiError> {
        Err(ApiError::validation(FieldErrors::from([(
            "customer_email".to_string(),
            vec!["must be a valid email address".to_string()],
        )])))
    }

    #[handler]
    async fn missing() -> Result<&'static str, ApiError> {
        Err(ApiError::not_found("order_not_found"))
    }

    #[tokio::test]
    async fn renders_failure_envelope_with_field_errors() -> TestResult {
        let service = Service::new(Router::with_path("fail").get(failing));

        let mut res = TestClient::get("http://example.com/fail").send(&service).await;
        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert!(!body.success, "failure bodies are never successful");
        assert_eq!(body.message, "validation_failed");
        assert_eq!(
            body.errors.and_then(|errors| errors.get("customer_email").cloned()),
            Some(vec!["must be a valid email address".to_string()])
        );

        Ok(())
    }

    #[tokio::test]
    async fn omits_errors_when_none_were_collected() -> TestResult {
        let service = Service::new(Router::with_path("missing").get(missing));

        let mut res = TestClient::get("http://example.com/missing")
            .send(&service)
            .await;
        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(
            body,
            serde_json::json!({ "success": false, "message": "order_not_found" })
        );

        Ok(())
    }
}
