//! Result helpers for handlers.

use std::fmt::Display;

use tracing::error;

use crate::errors::ApiError;

pub(crate) trait ResultExt<T> {
    /// Log the error under `context` and answer with a generic 500.
    fn or_500(self, context: &'static str) -> Result<T, ApiError>;
}

impl<T, E: Display> ResultExt<T> for Result<T, E> {
    fn or_500(self, context: &'static str) -> Result<T, ApiError> {
        self.map_err(|source| {
            error!(%source, context, "handler failed");

            ApiError::internal()
        })
    }
}
