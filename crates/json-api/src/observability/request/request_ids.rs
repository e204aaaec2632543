//! Request ID resolution and response header helpers.

use salvo::{http::header::HeaderValue, prelude::Response};
use tracing::warn;
use uuid::Uuid;

pub(super) const REQUEST_ID_HEADER: &str = "x-request-id";

/// Client-supplied ids longer than this are replaced.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Reuse the caller's id when it is usable, otherwise mint a UUIDv7.
pub(super) fn resolve_request_id(header_value: Option<String>) -> String {
    header_value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty() && value.len() <= MAX_REQUEST_ID_LEN)
        .unwrap_or_else(|| Uuid::now_v7().to_string())
}

pub(super) fn set_request_id_header(res: &mut Response, request_id: &str) {
    match HeaderValue::from_str(request_id) {
        Ok(value) => {
            res.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Err(source) => {
            warn!(
                request_id,
                "could not encode request id for response header: {source}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_id_is_reused() {
        assert_eq!(resolve_request_id(Some(" abc-123 ".to_owned())), "abc-123");
    }

    #[test]
    fn blank_or_oversized_ids_are_replaced() {
        for value in [None, Some("   ".to_owned()), Some("x".repeat(129))] {
            let resolved = resolve_request_id(value);

            assert!(
                Uuid::parse_str(&resolved).is_ok(),
                "expected a generated uuid, got {resolved}"
            );
        }
    }
}
