//! Background task recording connection pool metrics.

use std::time::Duration;

use sqlx::PgPool;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// How often pool gauges are refreshed.
pub const POOL_METRICS_INTERVAL: Duration = Duration::from_secs(10);

/// Spawns a task that records pool gauges every `interval` until the pool
/// is closed.
pub fn spawn_pool_metrics(pool: PgPool, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while !pool.is_closed() {
            ticker.tick().await;
            persistence::metrics::record_pool_metrics(&pool);
        }
        tracing::debug!("Pool closed, stopping pool metrics task");
    })
}
