//! Database metrics collection.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

use domain::models::TokenConsumption;

/// Record database query duration.
pub fn record_query_duration(query_name: &'static str, duration_secs: f64) {
    histogram!("database_query_duration_seconds", "query" => query_name).record(duration_secs);
}

/// Count an invite token consumption by its outcome.
pub fn record_token_consumption(outcome: TokenConsumption) {
    counter!("invite_token_consumptions_total", "result" => outcome.as_str()).increment(1);
}

/// Record database connection pool metrics.
///
/// Call this periodically to track pool health.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let active = size.saturating_sub(idle);

    gauge!("database_connections_active").set(active as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Times a database operation and records it on [`QueryTimer::record`]
/// or [`QueryTimer::finish`].
///
/// ```ignore
/// let timer = QueryTimer::new("find_group_by_id");
/// let result = sqlx::query_as::<_, GroupEntity>(...).fetch_optional(&pool).await;
/// timer.record();
/// result
/// ```
///
/// Multi-statement operations hand their whole result to `finish`, so
/// failed transactions are timed too.
pub struct QueryTimer {
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: &'static str) -> Self {
        Self {
            query_name,
            start: Instant::now(),
        }
    }

    pub fn record(self) {
        record_query_duration(self.query_name, self.start.elapsed().as_secs_f64());
    }

    /// Records the duration and passes `result` through unchanged.
    pub fn finish<T, E>(self, result: Result<T, E>) -> Result<T, E> {
        self.record();
        result
    }
}
