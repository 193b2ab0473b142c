//! Connection gauges, refreshed by the task `create_pool` spawns.

use prometheus::{register_int_gauge_vec, IntGaugeVec};
use sqlx::PgPool;

lazy_static::lazy_static! {
    static ref DB_POOL_CONNECTIONS: IntGaugeVec = register_int_gauge_vec!(
        "db_pool_connections",
        "Database pool connections by state (idle, in_use, max)",
        &["service", "state"]
    ).expect("Prometheus metrics registration should succeed at startup");
}

pub(crate) fn record_pool_state(pool: &PgPool, service: &str) {
    let open = i64::from(pool.size());
    let idle = pool.num_idle() as i64;
    let max = i64::from(pool.options().get_max_connections());

    for (state, value) in [("idle", idle), ("in_use", open - idle), ("max", max)] {
        DB_POOL_CONNECTIONS
            .with_label_values(&[service, state])
            .set(value);
    }
}
