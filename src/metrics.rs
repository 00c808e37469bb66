use autometrics::prometheus_exporter::{self, PrometheusResponse};
use lazy_static::lazy_static;
use prometheus::{IntCounterVec, Opts, Registry};
use tokio::sync::watch;
use warp::{Filter, Rejection, Reply};

lazy_static! {
    pub static ref BROADCASTS_SENT: IntCounterVec = IntCounterVec::new(
        Opts::new("broadcasts_sent", "Frames published on the bus, per topic"),
        &["node_id", "topic"]
    )
    .expect("metric can not be created");

    pub static ref CRITERIA_COMPARISONS: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "criteria_comparisons",
            "Inbound criteria compared against the local claim, by outcome"
        ),
        &["node_id", "outcome"]
    )
    .expect("metric can not be created");

    pub static ref VOTERS_RECORDED: IntCounterVec = IntCounterVec::new(
        Opts::new("voters_recorded", "Concessions counted towards unanimity"),
        &["node_id"]
    )
    .expect("metric can not be created");

    pub static ref MALFORMED_PAYLOADS: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "malformed_payloads",
            "Bus frames dropped because the payload failed to decode"
        ),
        &["node_id", "topic"]
    )
    .expect("metric can not be created");

    pub static ref ELECTIONS_DECIDED: IntCounterVec = IntCounterVec::new(
        Opts::new("elections_decided", "Election outcomes recorded locally"),
        &["node_id", "leader_id"]
    )
    .expect("metric can not be created");

    pub static ref REGISTRY: Registry = Registry::new();
}

fn register_custom_metrics() {
    REGISTRY
        .register(Box::new(BROADCASTS_SENT.clone()))
        .expect("collector can be registered");
    REGISTRY
        .register(Box::new(CRITERIA_COMPARISONS.clone()))
        .expect("collector can be registered");
    REGISTRY
        .register(Box::new(VOTERS_RECORDED.clone()))
        .expect("collector can be registered");
    REGISTRY
        .register(Box::new(MALFORMED_PAYLOADS.clone()))
        .expect("collector can be registered");
    REGISTRY
        .register(Box::new(ELECTIONS_DECIDED.clone()))
        .expect("collector can be registered");
}

pub async fn start_server(port: u16, mut shutdown_signal: watch::Receiver<()>) {
    register_custom_metrics();

    let metrics_route = warp::path!("metrics").and_then(metrics_handler);

    let (_, server) =
        warp::serve(metrics_route).bind_with_graceful_shutdown(([0, 0, 0, 0], port), async move {
            let _ = shutdown_signal.changed().await;
        });
    server.await;
}

async fn metrics_handler() -> Result<impl Reply, Rejection> {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        eprintln!("could not encode custom metrics: {}", e);
    };
    let mut res = match String::from_utf8(buffer.clone()) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("custom metrics could not be from_utf8'd: {}", e);
            String::default()
        }
    };
    buffer.clear();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        eprintln!("could not encode prometheus metrics: {}", e);
    };
    let res_custom = match String::from_utf8(buffer.clone()) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("prometheus metrics could not be from_utf8'd: {}", e);
            String::default()
        }
    };
    buffer.clear();

    let autometrics_metrics = get_metrics_body();
    res.push_str(&res_custom);
    res.push_str(&autometrics_metrics);
    Ok(res)
}

/// Export metrics for Prometheus to scrape
pub fn get_metrics_body() -> String {
    let autometrics_response = prometheus_exporter::encode_http_response();
    autometrics_response.into_body()
}
/// Export metrics for Prometheus to scrape
pub fn get_metrics() -> PrometheusResponse {
    prometheus_exporter::encode_http_response()
}
