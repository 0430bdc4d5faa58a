use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use tokio_retry::strategy::FixedInterval;
use tokio_retry::Retry;
use tracing::{debug, info, warn};

use crate::config::DbConfig;

/// Build the shared pool. Connections are opened on first use, so this
/// never fails even while the database is unreachable.
pub fn create_pool(cfg: &DbConfig) -> PgPool {
    let options = PgConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .username(&cfg.user)
        .password(&cfg.password)
        .database(&cfg.name);

    PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .idle_timeout(cfg.idle_timeout)
        .acquire_timeout(cfg.connect_timeout)
        .after_connect(|_conn, _meta| {
            Box::pin(async move {
                debug!("Opened new database connection");
                Ok(())
            })
        })
        .connect_lazy_with(options)
}

/// Probe the database with `SELECT 1`, retrying at a fixed interval.
///
/// Makes at most `attempts` tries (at least one). Returns the number of
/// tries it took, or the last error once they are used up.
pub async fn wait_for_database(
    pool: &PgPool,
    attempts: usize,
    delay: Duration,
) -> Result<usize, sqlx::Error> {
    let attempts = attempts.max(1);
    let strategy = FixedInterval::new(delay).take(attempts - 1);

    let mut attempt = 0_usize;
    Retry::spawn(strategy, || {
        attempt += 1;
        let current = attempt;
        async move {
            match sqlx::query("SELECT 1").execute(pool).await {
                Ok(_) => {
                    info!(attempt = current, max_attempts = attempts, "Database connection established");
                    Ok(())
                }
                Err(e) if current < attempts => {
                    warn!(
                        attempt = current,
                        max_attempts = attempts,
                        retry_in_ms = delay.as_millis() as u64,
                        error = %e,
                        "Database connection failed"
                    );
                    Err(e)
                }
                Err(e) => {
                    warn!(
                        attempt = current,
                        max_attempts = attempts,
                        error = %e,
                        "Database connection failed, no attempts left"
                    );
                    Err(e)
                }
            }
        }
    })
    .await?;

    Ok(attempt)
}
