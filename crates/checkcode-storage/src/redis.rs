use async_trait::async_trait;
use checkcode_core::{Code, GuardError, UniquenessGuard};
use jiff::Timestamp;
use redis::AsyncCommands;
use tracing::{debug, trace, warn};

type Result<T> = std::result::Result<T, GuardError>;

pub const DEFAULT_KEY_PREFIX: &str = "cc:code:";

/// A Redis-backed guard that survives restarts and is shared by every
/// process pointed at the same server.
///
/// Each issued code is one key (`<prefix><code>`) whose value is the RFC 3339
/// issue time. `record_if_absent` is a single `SET NX`, which Redis executes
/// atomically.
#[derive(Debug, Clone)]
pub struct RedisGuard {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> GuardError {
    let message = format!("{operation}: {err}");
    if message.to_ascii_lowercase().contains("timed out") {
        GuardError::Timeout(message)
    } else {
        GuardError::Operation(message)
    }
}

impl RedisGuard {
    /// Creates a guard with the default `cc:code:` key prefix.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self::with_prefix(conn, DEFAULT_KEY_PREFIX)
    }

    /// Creates a guard with a custom key prefix, e.g. one per code space.
    pub fn with_prefix(
        conn: redis::aio::MultiplexedConnection,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    /// Opens a multiplexed connection to `url` and wraps it.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_prefix(url, DEFAULT_KEY_PREFIX).await
    }

    pub async fn connect_with_prefix(url: &str, key_prefix: impl Into<String>) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| GuardError::Unavailable(format!("invalid Redis URL: {e}")))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| GuardError::Unavailable(format!("failed to connect to Redis: {e}")))?;
        Ok(Self::with_prefix(conn, key_prefix))
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    fn key(&self, code: &Code) -> String {
        format!("{}{}", self.key_prefix, code.as_str())
    }
}

#[async_trait]
impl UniquenessGuard for RedisGuard {
    async fn contains(&self, code: &Code) -> Result<bool> {
        let key = self.key(code);
        let mut conn = self.conn.clone();
        conn.exists::<_, bool>(&key).await.map_err(|e| {
            warn!(code = %code, error = %e, "Redis error on exists");
            map_redis_error("failed to check code in Redis", e)
        })
    }

    async fn record(&self, code: &Code) -> Result<()> {
        let key = self.key(code);
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(&key, Timestamp::now().to_string())
            .await
            .map_err(|e| {
                warn!(code = %code, error = %e, "Redis error on set");
                map_redis_error("failed to record code in Redis", e)
            })?;
        debug!(code = %code, "recorded code in Redis");
        Ok(())
    }

    async fn record_if_absent(&self, code: &Code) -> Result<bool> {
        let key = self.key(code);
        let mut conn = self.conn.clone();
        let inserted = conn
            .set_nx::<_, _, bool>(&key, Timestamp::now().to_string())
            .await
            .map_err(|e| {
                warn!(code = %code, error = %e, "Redis error on set nx");
                map_redis_error("failed to record code in Redis", e)
            })?;
        if inserted {
            debug!(code = %code, "recorded new code in Redis");
        } else {
            trace!(code = %code, "code already present in Redis");
        }
        Ok(inserted)
    }
}
