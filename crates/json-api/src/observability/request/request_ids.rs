//! Request ids: echoed from `x-request-id` when usable, otherwise a fresh v7 uuid.

use salvo::{
    http::{StatusCode, header::HeaderValue},
    prelude::Response,
};
use tracing::warn;
use uuid::Uuid;

pub(super) const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_CLIENT_REQUEST_ID_LEN: usize = 128;

pub(super) fn resolve_request_id(header_value: Option<String>) -> String {
    header_value
        .map(|value| value.trim().to_string())
        .filter(|value| is_usable_client_id(value))
        .unwrap_or_else(generate_request_id)
}

/// Short printable ASCII only.
fn is_usable_client_id(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_CLIENT_REQUEST_ID_LEN
        && value.bytes().all(|byte| byte.is_ascii_graphic())
}

pub(super) fn set_request_id_header(res: &mut Response, request_id: &str) {
    let header_value = match HeaderValue::from_str(request_id) {
        Ok(value) => value,
        Err(source) => {
            warn!(
                request_id,
                "could not encode request id for response header: {source}"
            );

            return;
        }
    };

    res.headers_mut().insert(REQUEST_ID_HEADER, header_value);
}

pub(super) fn response_status_or_ok(status_code: Option<StatusCode>) -> StatusCode {
    status_code.unwrap_or(StatusCode::OK)
}

fn generate_request_id() -> String {
    Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_request_id_is_kept_unless_blank() {
        assert_eq!(resolve_request_id(Some("req-42".to_string())), "req-42");
        assert_eq!(resolve_request_id(Some(" checkout-7 ".to_string())), "checkout-7");

        let generated = resolve_request_id(Some("   ".to_string()));

        assert!(Uuid::parse_str(&generated).is_ok(), "expected a generated uuid");
    }

    #[test]
    fn oversized_or_unprintable_ids_are_replaced() {
        for header in [
            "x".repeat(MAX_CLIENT_REQUEST_ID_LEN + 1),
            "req 42".to_string(),
            "req\u{7}".to_string(),
            "طلب".to_string(),
        ] {
            let resolved = resolve_request_id(Some(header.clone()));

            assert!(Uuid::parse_str(&resolved).is_ok(), "{header:?} should be replaced");
        }

        let generated = resolve_request_id(None);

        assert!(Uuid::parse_str(&generated).is_ok(), "expected a generated uuid");
    }
}
