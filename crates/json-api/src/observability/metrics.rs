//! Prometheus metrics collection and exposition endpoint.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
    core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

#[derive(Debug)]
struct Metrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    orders_created_total: IntCounterVec,
    payments_confirmed_total: IntCounterVec,
    paypal_captures_total: IntCounterVec,
}

static METRICS: OnceLock<Option<Metrics>> = OnceLock::new();

#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        if let Some(metrics) = metrics() {
            metrics.requests_in_flight.inc();
            return Self { tracked: true };
        }

        Self { tracked: false }
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

    let status_class = status_class(status_code);
    let status_code = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[method, route, status_class, status_code.as_str()])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

/// Count an order accepted through the API, labelled by payment method.
pub(crate) fn record_order_created(payment_method: &str) {
    if let Some(metrics) = metrics() {
        metrics
            .orders_created_total
            .with_label_values(&[payment_method])
            .inc();
    }
}

/// Count an order flipping to paid. `source` is `balance` or `manual`.
pub(crate) fn record_payment_confirmed(source: &str) {
    if let Some(metrics) = metrics() {
        metrics
            .payments_confirmed_total
            .with_label_values(&[source])
            .inc();
    }
}

/// Count a PayPal capture attempt by outcome.
pub(crate) fn record_paypal_capture(outcome: &str) {
    if let Some(metrics) = metrics() {
        metrics
            .paypal_captures_total
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
    let metric_families = metrics.registry.gather();

    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metric_families, &mut encoded) {
        error!("failed to encode metrics response: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    let content_type = match HeaderValue::from_str(encoder.format_type()) {
        Ok(value) => value,
        Err(source) => {
            error!("failed to encode metrics content type header: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

            return;
        }
    };

    res.headers_mut().insert(CONTENT_TYPE, content_type);
    res.render(String::from_utf8_lossy(&encoded).into_owned());
}

fn metrics() -> Option<&'static Metrics> {
    METRICS.get_or_init(build_metrics).as_ref()
}

fn counter(name: &str, help: &str, labels: &[&str]) -> Option<IntCounterVec> {
    IntCounterVec::new(Opts::new(name, help), labels)
        .inspect_err(|source| error!("failed to create {name} metric: {source}"))
        .ok()
}

fn register<C>(registry: &Registry, collector: &C) -> Option<()>
where
    C: Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .inspect_err(|source| error!("failed to register metric: {source}"))
        .ok()
}

fn build_metrics() -> Option<Metrics> {
    let registry = Registry::new();

    let requests_total = counter(
        "topup_json_http_requests_total",
        "Total HTTP requests partitioned by method, route, status class, and status code.",
        &["method", "route", "status_class", "status_code"],
    )?;

    let request_duration_seconds = HistogramVec::new(
        HistogramOpts::new(
            "topup_json_http_request_duration_seconds",
            "HTTP request duration in seconds partitioned by method and route.",
        )
        .buckets(vec![
            0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "route"],
    )
    .inspect_err(|source| error!("failed to create request_duration metric: {source}"))
    .ok()?;

    let requests_in_flight = IntGauge::with_opts(Opts::new(
        "topup_json_http_requests_in_flight",
        "Current number of in-flight HTTP requests.",
    ))
    .inspect_err(|source| error!("failed to create in-flight gauge metric: {source}"))
    .ok()?;

    let orders_created_total = counter(
        "topup_json_orders_created_total",
        "Orders accepted, partitioned by payment method.",
        &["payment_method"],
    )?;

    let payments_confirmed_total = counter(
        "topup_json_payments_confirmed_total",
        "Orders marked paid, partitioned by how the payment was confirmed.",
        &["source"],
    )?;

    let paypal_captures_total = counter(
        "topup_json_paypal_captures_total",
        "PayPal deposit captures, partitioned by outcome.",
        &["outcome"],
    )?;

    register(&registry, &requests_total)?;
    register(&registry, &request_duration_seconds)?;
    register(&registry, &requests_in_flight)?;
    register(&registry, &orders_created_total)?;
    register(&registry, &payments_confirmed_total)?;
    register(&registry, &paypal_captures_total)?;

    Some(Metrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
        orders_created_total,
        payments_confirmed_total,
        paypal_captures_total,
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
