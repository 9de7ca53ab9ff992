use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: bookings committed.
pub const BOOKINGS_CREATED_TOTAL: &str = "palapa_bookings_created_total";

/// Counter: booking attempts rejected by the exclusivity check.
pub const BOOKING_CONFLICTS_TOTAL: &str = "palapa_booking_conflicts_total";

/// Counter: payment increments recorded.
pub const PAYMENTS_RECORDED_TOTAL: &str = "palapa_payments_recorded_total";

/// Counter: bookings flagged by the overdue sweep.
pub const OVERDUE_FLAGGED_TOTAL: &str = "palapa_overdue_flagged_total";

// ── USE metrics (resource utilization) ──────────────────────────

/// Histogram: WAL append (encode + fsync) duration in seconds.
pub const WAL_APPEND_DURATION_SECONDS: &str = "palapa_wal_append_duration_seconds";

/// Install the fmt tracing subscriber and, if a port is given, a Prometheus
/// metrics exporter. Intended for embedding processes; safe to skip in tests.
pub fn init(metrics_port: Option<u16>) {
    let _ = tracing_subscriber::fmt::try_init();
    let Some(port) = metrics_port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}
