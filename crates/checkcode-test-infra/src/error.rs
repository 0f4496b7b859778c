use thiserror::Error;

#[derive(Debug, Error)]
pub enum TestInfraError {
    #[error("failed to run test container: {0}")]
    Container(#[from] testcontainers::TestcontainersError),

    #[error("failed to talk to test Redis: {0}")]
    Redis(#[from] redis::RedisError),

    /// The container started but Redis never answered `PING`.
    #[error("Redis did not answer PING after {attempts} attempts")]
    NotReady { attempts: u32 },
}

pub type Result<T> = std::result::Result<T, TestInfraError>;
