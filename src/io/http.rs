//! Lead capture HTTP endpoints
//!
//! Serves the two endpoints the marketing site posts to, plus health and
//! Prometheus metrics. Uses hyper for the HTTP server. The marketing
//! site calls cross-origin, so responses carry permissive CORS headers.

use crate::infra::config::Config;
use crate::infra::metrics::Metrics;
use crate::io::crm::LeadSink;
use crate::services::leads::{validate_contact, validate_subscribe, ContactLead, SubscribeLead};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::fmt::Write;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Marker returned when leads are accepted without a configured CRM.
/// The external contract is that it contains "GHL not configured".
const DEV_NOTE: &str = "GHL not configured - lead logged locally";

struct AppState {
    metrics: Arc<Metrics>,
    crm: Option<Arc<dyn LeadSink>>,
}

/// Prometheus metric type
enum MetricType {
    Counter,
    Gauge,
}

impl MetricType {
    fn as_str(&self) -> &'static str {
        match self {
            MetricType::Counter => "counter",
            MetricType::Gauge => "gauge",
        }
    }
}

fn write_metric(output: &mut String, name: &str, help: &str, typ: MetricType, val: u64) {
    let _ = writeln!(output, "# HELP {name} {help}");
    let _ = writeln!(output, "# TYPE {name} {}", typ.as_str());
    let _ = writeln!(output, "{name} {val}");
}

/// Format metrics in Prometheus text exposition format
fn format_prometheus_metrics(metrics: &Metrics) -> String {
    let snap = metrics.snapshot();
    let mut output = String::with_capacity(2048);

    write_metric(
        &mut output,
        "retreat_leads_received_total",
        "Lead requests received across all endpoints",
        MetricType::Counter,
        snap.leads_received,
    );
    write_metric(
        &mut output,
        "retreat_leads_rejected_total",
        "Leads rejected by validation",
        MetricType::Counter,
        snap.leads_rejected,
    );
    write_metric(
        &mut output,
        "retreat_leads_malformed_total",
        "Requests with an unparseable body",
        MetricType::Counter,
        snap.leads_malformed,
    );
    write_metric(
        &mut output,
        "retreat_leads_forwarded_total",
        "Leads forwarded to the CRM",
        MetricType::Counter,
        snap.leads_forwarded,
    );
    write_metric(
        &mut output,
        "retreat_lead_forward_failures_total",
        "CRM forward attempts that failed",
        MetricType::Counter,
        snap.forward_failures,
    );
    write_metric(
        &mut output,
        "retreat_leads_logged_local_total",
        "Leads accepted without a configured CRM",
        MetricType::Counter,
        snap.leads_logged_local,
    );
    write_metric(
        &mut output,
        "retreat_uptime_seconds",
        "Service uptime in seconds",
        MetricType::Gauge,
        snap.uptime_secs,
    );

    output
}

fn json_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body)))
        .expect("static response should not fail")
}

fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    json_response(status, serde_json::json!({ "error": message }).to_string())
}

fn success_response(dev_note: Option<&str>) -> Response<Full<Bytes>> {
    let body = match dev_note {
        Some(note) => serde_json::json!({ "success": true, "_dev": note }),
        None => serde_json::json!({ "success": true }),
    };
    json_response(StatusCode::OK, body.to_string())
}

fn cors_preflight() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Full::new(Bytes::from("")))
        .expect("static response should not fail")
}

async fn contact_response(body: &[u8], state: &AppState) -> Response<Full<Bytes>> {
    state.metrics.record_lead_received();

    let lead: ContactLead = match serde_json::from_slice(body) {
        Ok(lead) => lead,
        Err(e) => {
            warn!(endpoint = "contact", error = %e, "lead_body_unparseable");
            state.metrics.record_lead_malformed();
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    if let Err(message) = validate_contact(&lead) {
        state.metrics.record_lead_rejected();
        info!(endpoint = "contact", reason = %message, "lead_rejected");
        return error_response(StatusCode::BAD_REQUEST, message);
    }

    match &state.crm {
        Some(crm) => match crm.forward_contact(&lead).await {
            Ok(()) => {
                state.metrics.record_lead_forwarded();
                success_response(None)
            }
            Err(e) => {
                state.metrics.record_forward_failure();
                error!(endpoint = "contact", error = %e, "lead_forward_failed");
                error_response(StatusCode::BAD_GATEWAY, "Failed to forward lead to CRM")
            }
        },
        None => {
            state.metrics.record_lead_logged_local();
            info!(
                endpoint = "contact",
                name = %lead.name,
                email = %lead.email,
                retreat = ?lead.retreat_slug,
                "lead_logged_locally"
            );
            success_response(Some(DEV_NOTE))
        }
    }
}

async fn subscribe_response(body: &[u8], state: &AppState) -> Response<Full<Bytes>> {
    state.metrics.record_lead_received();

    let lead: SubscribeLead = match serde_json::from_slice(body) {
        Ok(lead) => lead,
        Err(e) => {
            warn!(endpoint = "subscribe", error = %e, "lead_body_unparseable");
            state.metrics.record_lead_malformed();
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    if let Err(message) = validate_subscribe(&lead) {
        state.metrics.record_lead_rejected();
        info!(endpoint = "subscribe", reason = %message, "lead_rejected");
        return error_response(StatusCode::BAD_REQUEST, message);
    }

    match &state.crm {
        Some(crm) => match crm.forward_subscribe(&lead).await {
            Ok(()) => {
                state.metrics.record_lead_forwarded();
                success_response(None)
            }
            Err(e) => {
                state.metrics.record_forward_failure();
                error!(endpoint = "subscribe", error = %e, "lead_forward_failed");
                error_response(StatusCode::BAD_GATEWAY, "Failed to forward lead to CRM")
            }
        },
        None => {
            state.metrics.record_lead_logged_local();
            info!(endpoint = "subscribe", email = %lead.email, "lead_logged_locally");
            success_response(Some(DEV_NOTE))
        }
    }
}

/// Handle HTTP requests
async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();

    match (&parts.method, parts.uri.path()) {
        (&Method::POST, "/api/contact") => {
            let bytes = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(e) => {
                    warn!(error = %e, "body_read_failed");
                    return Ok(error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error",
                    ));
                }
            };
            Ok(contact_response(&bytes, &state).await)
        }
        (&Method::POST, "/api/subscribe") => {
            let bytes = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(e) => {
                    warn!(error = %e, "body_read_failed");
                    return Ok(error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error",
                    ));
                }
            };
            Ok(subscribe_response(&bytes, &state).await)
        }
        // CORS preflight for the lead endpoints
        (&Method::OPTIONS, "/api/contact" | "/api/subscribe") => Ok(cors_preflight()),
        (&Method::GET, "/health") => Ok(Response::builder()
            .status(StatusCode::OK)
            .body(Full::new(Bytes::from("ok")))
            .expect("static response should not fail")),
        (&Method::GET, "/metrics") => {
            let body = format_prometheus_metrics(&state.metrics);
            Ok(Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", "text/plain; version=0.0.4; charset=utf-8")
                .body(Full::new(Bytes::from(body)))
                .expect("static response should not fail"))
        }
        _ => Ok(Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::from("Not Found")))
            .expect("static response should not fail")),
    }
}

/// Serve connections on an already-bound listener until shutdown.
pub async fn serve(
    listener: TcpListener,
    metrics: Arc<Metrics>,
    crm: Option<Arc<dyn LeadSink>>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!(addr = %listener.local_addr()?, "http_server_started");
    let state = Arc::new(AppState { metrics, crm });

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, _addr)) => {
                        let io = TokioIo::new(stream);
                        let state = state.clone();

                        tokio::spawn(async move {
                            let service = service_fn(move |req| {
                                let state = state.clone();
                                async move { handle_request(req, state).await }
                            });

                            if let Err(e) = http1::Builder::new()
                                .serve_connection(io, service)
                                .await
                            {
                                error!(error = %e, "http_connection_error");
                            }
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "http_accept_error");
                    }
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!("http_server_shutdown");
                    return Ok(());
                }
            }
        }
    }
}

/// Bind the configured address and serve until shutdown.
pub async fn start_server(
    config: Arc<Config>,
    metrics: Arc<Metrics>,
    crm: Option<Arc<dyn LeadSink>>,
    shutdown: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr: SocketAddr = format!("{}:{}", config.bind_address(), config.port()).parse()?;
    let listener = TcpListener::bind(addr).await?;
    serve(listener, metrics, crm, shutdown).await
}
