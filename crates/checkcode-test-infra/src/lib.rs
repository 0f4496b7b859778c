//! Disposable containers for integration tests.

pub mod error;
pub mod redis;

pub use self::error::{Result, TestInfraError};
pub use self::redis::RedisServer;
