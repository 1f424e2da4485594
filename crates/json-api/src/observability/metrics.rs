//! Prometheus metrics for HTTP traffic and checkout activity.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder, core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

const DURATION_BUCKETS: [f64; 13] = [
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Debug)]
struct StorefrontMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    orders_placed_total: IntCounter,
    checkout_rejections_total: IntCounterVec,
    coupon_attempts_total: IntCounterVec,
}

static METRICS: OnceLock<Option<StorefrontMetrics>> = OnceLock::new();

#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        let tracked = metrics().is_some_and(|metrics| {
            metrics.requests_in_flight.inc();
            true
        });

        Self { tracked }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if self.tracked
            && let Some(metrics) = metrics()
        {
            metrics.requests_in_flight.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_code_label = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[method, route, status_class(status_code), status_code_label.as_str()])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

/// Count a committed order.
pub(crate) fn record_order_placed() {
    if let Some(metrics) = metrics() {
        metrics.orders_placed_total.inc();
    }
}

/// Count a checkout turned away, by the machine code sent to the client.
pub(crate) fn record_checkout_rejection(reason: &str) {
    if let Some(metrics) = metrics() {
        metrics
            .checkout_rejections_total
            .with_label_values(&[reason])
            .inc();
    }
}

pub(crate) fn record_coupon_attempt(accepted: bool) {
    if let Some(metrics) = metrics() {
        let outcome = if accepted { "accepted" } else { "rejected" };

        metrics
            .coupon_attempts_total
            .with_label_values(&[outcome])
            .inc();
    }
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut encoded) {
        error!("failed to encode metrics response: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    match HeaderValue::from_str(encoder.format_type()) {
        Ok(content_type) => {
            res.headers_mut().insert(CONTENT_TYPE, content_type);
            res.render(String::from_utf8_lossy(&encoded).into_owned());
        }
        Err(source) => {
            error!("failed to encode metrics content type header: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}

fn metrics() -> Option<&'static StorefrontMetrics> {
    METRICS
        .get_or_init(|| {
            build_metrics()
                .inspect_err(|source| error!("failed to build metrics registry: {source}"))
                .ok()
        })
        .as_ref()
}

fn register<M>(registry: &Registry, metric: prometheus::Result<M>) -> prometheus::Result<M>
where
    M: Collector + Clone + 'static,
{
    let metric = metric?;

    registry.register(Box::new(metric.clone()))?;

    Ok(metric)
}

fn build_metrics() -> prometheus::Result<StorefrontMetrics> {
    let registry = Registry::new_custom(Some("auvea_json".to_string()), None)?;

    let requests_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                "http_requests_total",
                "Total HTTP requests partitioned by method, route, status class, and status code.",
            ),
            &["method", "route", "status_class", "status_code"],
        ),
    )?;

    let request_duration_seconds = register(
        &registry,
        HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds partitioned by method and route.",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &["method", "route"],
        ),
    )?;

    let requests_in_flight = register(
        &registry,
        IntGauge::new(
            "http_requests_in_flight",
            "Current number of in-flight HTTP requests.",
        ),
    )?;

    let orders_placed_total = register(
        &registry,
        IntCounter::new("orders_placed_total", "Orders committed at checkout."),
    )?;

    let checkout_rejections_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                "checkout_rejections_total",
                "Checkouts rejected during reconciliation, by reason.",
            ),
            &["reason"],
        ),
    )?;

    let coupon_attempts_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                "coupon_attempts_total",
                "Coupon applications to carts, by outcome.",
            ),
            &["outcome"],
        ),
    )?;

    Ok(StorefrontMetrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
        orders_placed_total,
        checkout_rejections_total,
        coupon_attempts_total,
    })
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use salvo::{
        Router, Service,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    #[test]
    fn status_codes_are_grouped_by_class() {
        assert_eq!(status_class(201), "2xx");
        assert_eq!(status_class(422), "4xx");
        assert_eq!(status_class(503), "5xx");
        assert_eq!(status_class(42), "other");
    }

    #[tokio::test]
    async fn metrics_endpoint_exposes_http_and_checkout_metrics() -> TestResult {
        observe_request("GET", "/cart", 200, 0.042);
        observe_request("POST", "/orders", 500, 0.123);
        record_order_placed();
        record_checkout_rejection("total_mismatch");
        record_coupon_attempt(false);

        let service =
            Service::new(Router::new().push(Router::with_path("metrics").get(metrics_handler)));

        let response = TestClient::get("http://example.com/metrics")
            .send(&service)
            .await
            .take_string()
            .await?;

        for name in [
            "auvea_json_http_requests_total",
            "auvea_json_http_request_duration_seconds",
            "auvea_json_http_requests_in_flight",
            "auvea_json_orders_placed_total",
            "auvea_json_checkout_rejections_total{reason=\"total_mismatch\"}",
            "auvea_json_coupon_attempts_total{outcome=\"rejected\"}",
        ] {
            assert!(response.contains(name), "expected {name} in response");
        }

        Ok(())
    }
}
