//! Storage metrics collection.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Record remote query duration.
pub fn record_query_duration(query_name: &str, duration_secs: f64) {
    histogram!(
        "remote_query_duration_seconds",
        "query" => query_name.to_string()
    )
    .record(duration_secs);
}

/// Record remote connection pool metrics.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let active = size.saturating_sub(idle);

    gauge!("remote_connections_active").set(active as f64);
    gauge!("remote_connections_idle").set(idle as f64);
    gauge!("remote_connections_total").set(size as f64);
}

/// Count an operation that had to be served from the local fallback store.
pub fn record_degraded_operation(operation: &'static str) {
    counter!("degraded_operations_total", "operation" => operation).increment(1);
}

/// A helper to time remote operations and record metrics.
///
/// Usage:
/// ```ignore
/// let timer = QueryTimer::new("find_invitation_by_slug");
/// let result = sqlx::query_as::<_, InvitationEntity>(...).fetch_optional(&pool).await;
/// timer.record();
/// result
/// ```
pub struct QueryTimer {
    query_name: String,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: impl Into<String>) -> Self {
        Self {
            query_name: query_name.into(),
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration to metrics.
    pub fn record(self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_query_duration(&self.query_name, duration);
    }
}
