//! Request-level logging, request IDs, and parent trace extraction.

mod parent_context;
mod request_ids;
mod spans;

use std::time::{Duration, Instant};

use salvo::{
    Request, handler,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::{Instrument as _, Span, error, field, info, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use auvea_app::domain::{carts::data::SessionToken, users::records::UserUuid};

use super::{metrics, settings};

const REQUEST_ID_DEPOT_KEY: &str = "request_id";

/// Paths served outside request logging.
const UNLOGGED_PATHS: [&str; 2] = ["/metrics", "/healthcheck"];

/// What is logged about one request once it finishes.
#[derive(Debug)]
struct RequestLog {
    span: Span,
    request_id: String,
    method: String,
    path: String,
    route: String,
}

impl RequestLog {
    fn start(req: &Request, request_id: String) -> Self {
        let method = req.method().to_string();
        let path = req.uri().path().to_owned();
        let names = spans::request_span_name(&method, &path);

        let span = tracing::info_span!(
            parent: None,
            "http.request",
            otel.name = %names.otel_span_name,
            otel.kind = "server",
            request_id = %request_id,
            method = %method,
            path = %path,
            remote_addr = %req.remote_addr(),
            user_id = field::Empty,
            guest = field::Empty,
            status = field::Empty,
            duration_ms = field::Empty
        );

        Self {
            span,
            request_id,
            method,
            path,
            route: names.otel_path,
        }
    }

    /// Identity resolves inside the router, so it is recorded afterwards.
    fn record_shopper(&self, depot: &Depot) {
        if let Ok(user) = depot.obtain::<UserUuid>() {
            self.span.record("user_id", field::display(user));
        }

        self.span
            .record("guest", depot.obtain::<SessionToken>().is_ok());
    }

    fn finish(&self, status: StatusCode, elapsed: Duration) {
        let duration_ms = elapsed.as_millis();
        let threshold_ms = u128::from(settings::slow_request_threshold_ms());
        let (method, path, request_id) = (&self.method, &self.path, &self.request_id);

        metrics::observe_request(method, &self.route, status.as_u16(), elapsed.as_secs_f64());

        self.span.record("status", status.as_u16());
        self.span.record("duration_ms", duration_ms);

        self.span.in_scope(|| {
            info!(status = status.as_u16(), duration_ms, "request.completed");

            if status.is_server_error() {
                error!(status = status.as_u16(), %method, %path, %request_id, "server error response");
            } else if status.is_client_error() {
                warn!(status = status.as_u16(), %method, %path, %request_id, "client error response");
            }

            if duration_ms > threshold_ms {
                warn!(%method, %path, %request_id, duration_ms, threshold_ms, "slow request detected");
            }
        });
    }
}

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if UNLOGGED_PATHS.contains(&req.uri().path()) {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();
    let _in_flight = metrics::InFlightRequestGuard::track();

    let request_id =
        request_ids::resolve_request_id(req.header::<String>(request_ids::REQUEST_ID_HEADER));

    depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());
    request_ids::set_request_id_header(res, &request_id);

    let log = RequestLog::start(req, request_id);

    if settings::otel_parent_propagation_enabled()
        && let Some(parent) = parent_context::extract_parent_context(req.headers())
        && let Err(source) = log.span.set_parent(parent)
    {
        warn!("failed to set parent context on request span: {source}");
    }

    ctrl.call_next(req, depot, res)
        .instrument(log.span.clone())
        .await;

    log.record_shopper(depot);
    log.finish(
        request_ids::response_status_or_ok(res.status_code),
        started.elapsed(),
    );
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
    async fn echo_request_id(depot: &mut Depot) -> String {
        depot
            .get::<String>(REQUEST_ID_DEPOT_KEY)
            .cloned()
            .unwrap_or_default()
    }

    fn make_service() -> Service {
        Service::new(
            Router::new()
                .hoop(request_logging)
                .push(Router::with_path("echo").get(echo_request_id)),
        )
    }

    #[tokio::test]
    async fn request_id_is_echoed_and_exposed_to_handlers() -> TestResult {
        let mut res = TestClient::get("http://example.com/echo")
            .add_header(request_ids::REQUEST_ID_HEADER, "req-42", true)
            .send(&make_service())
            .await;

        let header = res
            .headers()
            .get(request_ids::REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        assert_eq!(header.as_deref(), Some("req-42"));
        assert_eq!(res.take_string().await?, "req-42");

        Ok(())
    }

    #[tokio::test]
    async fn missing_request_id_is_generated() -> TestResult {
        let mut res = TestClient::get("http://example.com/echo")
            .send(&make_service())
            .await;

        let body = res.take_string().await?;

        assert!(!body.is_empty(), "expected a generated request id");
        assert_eq!(
            res.headers()
                .get(request_ids::REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok()),
            Some(body.as_str())
        );

        Ok(())
    }
}
