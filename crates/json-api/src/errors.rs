//! API errors and the failure envelope.
//!
//! Every failure leaves the server as `{ "success": false, "message": ... }`
//! with the status of its [`ErrorClass`].

use salvo::{
    Depot, FlowCtrl, Request, handler,
    http::{ResBody, StatusCode},
    oapi::{self, Components, EndpointOutRegister, Operation, ToSchema},
    prelude::{Json, Response, Scribe},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use topup_app::errors::{ClassifiedError, ErrorClass};

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Failure body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorBody {
    /// Always `false`
    pub success: bool,

    /// Human-readable reason
    pub message: String,
}

/// An error ready to be written as a failure envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub(crate) fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub(crate) fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub(crate) fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub(crate) fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub(crate) fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
    }

    pub(crate) fn status(&self) -> StatusCode {
        self.status
    }
}

/// HTTP status for an error class.
pub(crate) fn status_for(class: ErrorClass) -> StatusCode {
    match class {
        ErrorClass::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorClass::Auth => StatusCode::UNAUTHORIZED,
        ErrorClass::NotFound => StatusCode::NOT_FOUND,
        ErrorClass::InsufficientFunds => StatusCode::PAYMENT_REQUIRED,
        ErrorClass::Conflict => StatusCode::CONFLICT,
        ErrorClass::ExternalPayment => StatusCode::BAD_GATEWAY,
        ErrorClass::Storage => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl<E> From<E> for ApiError
where
    E: ClassifiedError,
{
    fn from(error: E) -> Self {
        let class = error.class();

        if class == ErrorClass::Storage {
            error!(
                error = %error,
                source = ?std::error::Error::source(&error),
                "storage failure"
            );

            return Self::internal();
        }

        Self::new(status_for(class), error.to_string())
    }
}

impl Scribe for ApiError {
    fn render(self, res: &mut Response) {
        res.status_code(self.status);
        res.render(Json(ErrorBody {
            success: false,
            message: self.message,
        }));
    }
}

impl EndpointOutRegister for ApiError {
    fn register(components: &mut Components, operation: &mut Operation) {
        let schema = ErrorBody::to_schema(components);

        for (status, description) in [
            (StatusCode::BAD_REQUEST, "Malformed request"),
            (StatusCode::UNAUTHORIZED, "Missing or invalid API token"),
            (StatusCode::FORBIDDEN, "Not allowed for this user"),
            (StatusCode::NOT_FOUND, "Resource not found"),
            (StatusCode::UNPROCESSABLE_ENTITY, "Validation failed"),
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        ] {
            operation.responses.insert(
                status.as_str(),
                oapi::Response::new(description).add_content("application/json", schema.clone()),
            );
        }
    }
}

/// Catcher hoop that rewrites framework errors (unknown routes, unparsable
/// bodies or path params) into the failure envelope.
#[handler]
pub(crate) async fn envelope_catcher(
    _req: &mut Request,
    _depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let status = res.status_code.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = match &res.body {
        ResBody::Error(error) if status.is_server_error() => {
            error!(status = status.as_u16(), brief = %error.brief, "unhandled server error");

            INTERNAL_MESSAGE.to_owned()
        }
        ResBody::Error(error) => error.brief.clone(),
        ResBody::None => status
            .canonical_reason()
            .unwrap_or(INTERNAL_MESSAGE)
            .to_owned(),
        _ => {
            ctrl.skip_rest();

            return;
        }
    };

    ApiError::new(status, message).render(res);

    ctrl.skip_rest();
}

#[cfg(test)]
mod tests {
    use topup_app::domain::{
        orders::OrdersServiceError, users::UsersServiceError, wallet::WalletServiceError,
    };

    use super::*;

    #[test]
    fn classes_map_to_statuses() {
        let cases = [
            (
                ApiError::from(OrdersServiceError::InvalidPlayerId("a b".to_owned())),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::from(OrdersServiceError::InsufficientBalance),
                StatusCode::PAYMENT_REQUIRED,
            ),
            (ApiError::from(OrdersServiceError::AlreadyPaid), StatusCode::CONFLICT),
            (ApiError::from(UsersServiceError::NotFound), StatusCode::NOT_FOUND),
            (
                ApiError::from(WalletServiceError::CaptureNotCompleted("DECLINED".to_owned())),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.status(), status, "unexpected status for {error:?}");
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("connection reset by 10.0.0.5")]
    struct StorageFailure;

    impl ClassifiedError for StorageFailure {
        fn class(&self) -> ErrorClass {
            ErrorClass::Storage
        }
    }

    #[test]
    fn storage_errors_hide_details() {
        let error = ApiError::from(StorageFailure);

        assert_eq!(error, ApiError::internal());
    }

    #[test]
    fn domain_messages_are_passed_through() {
        let error = ApiError::from(OrdersServiceError::InsufficientBalance);

        assert_eq!(error.message, "insufficient balance");
    }
}
