//! [`UniquenessGuard`](checkcode_core::UniquenessGuard) backends.

pub mod memory;
pub mod redis;

pub use self::memory::InMemoryGuard;
pub use self::redis::{RedisGuard, DEFAULT_KEY_PREFIX};
