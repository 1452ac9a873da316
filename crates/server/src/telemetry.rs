use axum::{body::Body, http::Request, response::Response};
use opentelemetry::{
    global,
    trace::{SpanKind, TraceContextExt, Tracer},
    Context, KeyValue,
};
use opentelemetry_otlp::{WithExportConfig, WithTonicConfig};
use std::{
    future::Future,
    pin::Pin,
    sync::OnceLock,
    task::{Context as TaskContext, Poll},
};
use tower::{Layer, Service};

use crate::auth::jwt::Claims;

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_SERVICE_NAME: &str = "complaint-desk";

/// Keep the LoggerProvider alive for the process lifetime.
static LOGGER_PROVIDER: OnceLock<opentelemetry_sdk::logs::SdkLoggerProvider> = OnceLock::new();

/// Tokio runtime for the OTLP gRPC exporters. Tonic's `connect_lazy()`
/// calls `tokio::spawn`, and `dioxus::serve` may run our init closure before
/// a runtime context is entered.
static OTEL_RUNTIME: OnceLock<tokio::runtime::Runtime> = OnceLock::new();

fn tls_config(endpoint: &str) -> Option<opentelemetry_otlp::tonic_types::transport::ClientTlsConfig> {
    endpoint.starts_with("https://").then(|| {
        opentelemetry_otlp::tonic_types::transport::ClientTlsConfig::new().with_native_roots()
    })
}

/// Set up OTLP trace and log export.
///
/// Dioxus owns the tracing subscriber, so this only registers the global
/// TracerProvider (used by `OtelTraceLayer`) and bridges the `log` crate.
///
/// Environment:
///   - `OTEL_EXPORTER_OTLP_ENDPOINT`: collector gRPC address. Unset disables export.
///   - `OTEL_SERVICE_NAME`: service name tag (default `complaint-desk`)
///   - `DEPLOY_ENV`: deployment environment tag (default `development`)
pub fn init_telemetry() {
    let _ = dotenvy::dotenv();

    let Ok(endpoint) = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") else {
        tracing::info!("OTEL_EXPORTER_OTLP_ENDPOINT not set, skipping OTLP telemetry");
        return;
    };

    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string());
    let environment = std::env::var("DEPLOY_ENV").unwrap_or_else(|_| "development".to_string());

    let rt = match OTEL_RUNTIME.get() {
        Some(rt) => rt,
        None => match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .worker_threads(1)
            .build()
        {
            Ok(rt) => OTEL_RUNTIME.get_or_init(|| rt),
            Err(e) => {
                tracing::warn!(error = %e, "could not start telemetry runtime");
                return;
            }
        },
    };
    let _guard = rt.enter();

    let mut span_builder = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint);
    if let Some(tls) = tls_config(&endpoint) {
        span_builder = span_builder.with_tls_config(tls);
    }
    let span_exporter = match span_builder.build() {
        Ok(exporter) => exporter,
        Err(e) => {
            tracing::warn!(error = %e, "could not create OTLP span exporter");
            return;
        }
    };

    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(service_name)
        .with_attribute(KeyValue::new("service.version", APP_VERSION))
        .with_attribute(KeyValue::new("deployment.environment", environment))
        .build();

    let provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
        .with_batch_exporter(span_exporter)
        .with_resource(resource.clone())
        .build();
    global::set_tracer_provider(provider);

    let mut log_builder = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint);
    if let Some(tls) = tls_config(&endpoint) {
        log_builder = log_builder.with_tls_config(tls);
    }
    let log_exporter = match log_builder.build() {
        Ok(exporter) => exporter,
        Err(e) => {
            tracing::warn!(error = %e, "could not create OTLP log exporter, exporting traces only");
            return;
        }
    };

    let logger_provider = LOGGER_PROVIDER.get_or_init(|| {
        opentelemetry_sdk::logs::SdkLoggerProvider::builder()
            .with_batch_exporter(log_exporter)
            .with_resource(resource)
            .build()
    });

    // The `log` bridge is separate from the Dioxus tracing subscriber.
    let bridge = opentelemetry_appender_log::OpenTelemetryLogBridge::new(logger_provider);
    match log::set_boxed_logger(Box::new(bridge)) {
        Ok(()) => log::set_max_level(log::LevelFilter::Info),
        Err(_) => tracing::debug!("log bridge skipped, a logger is already set"),
    }

    tracing::info!(version = APP_VERSION, %endpoint, "telemetry initialized");
}

/// Detect client platform from User-Agent and optional X-Client-Platform header.
///
/// The explicit header wins. Native Dioxus clients send no User-Agent.
fn detect_platform(ua: &str, explicit: Option<&str>) -> &'static str {
    if let Some(p) = explicit {
        return match p {
            "desktop" => "desktop",
            "mobile" => "mobile",
            "web" => "web",
            _ => "unknown",
        };
    }

    if ua == "unknown" || ua.is_empty() {
        "native"
    } else if ua.contains("Mozilla") || ua.contains("Chrome") || ua.contains("Safari") {
        "web"
    } else {
        "native"
    }
}

/// Collapse complaint ids so spans group by route rather than by record.
fn route_name(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if uuid::Uuid::parse_str(segment).is_ok() {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Tower layer that creates an OpenTelemetry span for each HTTP request.
///
/// Captures method, route, client platform, request ID, response status and
/// the caller's role when signed in.
#[derive(Clone)]
pub struct OtelTraceLayer;

impl<S> Layer<S> for OtelTraceLayer {
    type Service = OtelTraceService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        OtelTraceService { inner }
    }
}

#[derive(Clone)]
pub struct OtelTraceService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for OtelTraceService<S>
where
    S: Service<Request<Body>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let tracer = global::tracer(DEFAULT_SERVICE_NAME);
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let user_agent = req
            .headers()
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        let explicit_platform = req
            .headers()
            .get("x-client-platform")
            .and_then(|v| v.to_str().ok());
        let client_platform = detect_platform(&user_agent, explicit_platform);

        let request_id = req
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let mut attributes = vec![
            KeyValue::new("http.method", method.clone()),
            KeyValue::new("http.target", path.clone()),
            KeyValue::new("http.user_agent", user_agent),
            KeyValue::new("client.platform", client_platform),
            KeyValue::new("http.request_id", request_id),
        ];
        match req.extensions().get::<Claims>() {
            Some(claims) => attributes.extend([
                KeyValue::new("user.id", claims.sub),
                KeyValue::new("user.role", claims.role.clone()),
                KeyValue::new("auth.status", "authenticated"),
            ]),
            None => attributes.push(KeyValue::new("auth.status", "anonymous")),
        }

        let span = tracer
            .span_builder(format!("{} {}", &method, route_name(&path)))
            .with_kind(SpanKind::Server)
            .with_attributes(attributes)
            .start(&tracer);

        let cx = Context::current_with_span(span);
        let mut inner = self.inner.clone();

        let guard = cx.clone().attach();
        let future = inner.call(req);
        drop(guard);

        Box::pin(async move {
            let response = future.await?;

            let span = cx.span();
            let status = response.status();
            span.set_attribute(KeyValue::new("http.status_code", status.as_u16() as i64));

            if status.is_server_error() {
                span.set_status(opentelemetry::trace::Status::error(status.to_string()));
            } else if status.is_client_error() {
                span.set_attribute(KeyValue::new("error.type", "client_error"));
            }

            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_header_takes_priority() {
        assert_eq!(detect_platform("Mozilla/5.0 Chrome", Some("desktop")), "desktop");
        assert_eq!(detect_platform("", Some("smartwatch")), "unknown");
    }

    #[test]
    fn browsers_are_web_and_the_rest_native() {
        assert_eq!(detect_platform("Mozilla/5.0 (Macintosh; Intel Mac OS X)", None), "web");
        assert_eq!(detect_platform("", None), "native");
        assert_eq!(detect_platform("curl/8.4.0", None), "native");
    }

    #[test]
    fn complaint_ids_collapse_in_route_names() {
        assert_eq!(
            route_name("/api/v1/complaints/6f1c2d3e-4b5a-4c6d-8e7f-9a0b1c2d3e4f/resolve"),
            "/api/v1/complaints/{id}/resolve"
        );
        assert_eq!(route_name("/api/v1/complaints/feed"), "/api/v1/complaints/feed");
    }
}
