use async_trait::async_trait;
use checkcode_core::{Code, GuardError, UniquenessGuard};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use smol_str::SmolStr;

type Result<T> = std::result::Result<T, GuardError>;

/// In-memory guard backed by a `DashMap` from code to issue time.
///
/// DashMap locks per shard, so `record_if_absent` holds the shard lock for
/// the whole check-and-insert and concurrent callers cannot both win the
/// same code. The set lives only as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryGuard {
    issued: DashMap<SmolStr, Timestamp>,
}

impl InMemoryGuard {
    pub fn new() -> Self {
        Self {
            issued: DashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            issued: DashMap::with_capacity(capacity),
        }
    }

    /// Number of recorded codes.
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }

    /// When `code` was first recorded, if ever.
    pub fn issued_at(&self, code: &Code) -> Option<Timestamp> {
        self.issued.get(code.as_str()).map(|entry| *entry.value())
    }
}

#[async_trait]
impl UniquenessGuard for InMemoryGuard {
    async fn contains(&self, code: &Code) -> Result<bool> {
        Ok(self.issued.contains_key(code.as_str()))
    }

    async fn record(&self, code: &Code) -> Result<()> {
        self.issued
            .entry(SmolStr::new(code.as_str()))
            .or_insert_with(Timestamp::now);
        Ok(())
    }

    async fn record_if_absent(&self, code: &Code) -> Result<bool> {
        match self.issued.entry(SmolStr::new(code.as_str())) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(Timestamp::now());
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn code(s: &str) -> Code {
        Code::new_unchecked(s)
    }

    #[tokio::test]
    async fn record_and_contains() {
        let guard = InMemoryGuard::new();
        assert!(guard.is_empty());
        assert!(!guard.contains(&code("23468F")).await.unwrap());

        guard.record(&code("23468F")).await.unwrap();

        assert!(guard.contains(&code("23468F")).await.unwrap());
        assert!(!guard.contains(&code("23468H")).await.unwrap());
        assert_eq!(guard.len(), 1);
    }

    #[tokio::test]
    async fn record_keeps_first_issue_time() {
        let guard = InMemoryGuard::new();
        guard.record(&code("V2346895")).await.unwrap();
        let first = guard.issued_at(&code("V2346895")).unwrap();

        guard.record(&code("V2346895")).await.unwrap();

        assert_eq!(guard.issued_at(&code("V2346895")), Some(first));
        assert_eq!(guard.len(), 1);
    }

    #[tokio::test]
    async fn record_if_absent_is_test_and_set() {
        let guard = InMemoryGuard::with_capacity(4);
        assert!(guard.record_if_absent(&code("V2346895")).await.unwrap());
        assert!(!guard.record_if_absent(&code("V2346895")).await.unwrap());
        assert!(guard.issued_at(&code("V2346895")).is_some());
        assert_eq!(guard.issued_at(&code("V2222229")), None);
    }

    #[tokio::test]
    async fn concurrent_record_if_absent_has_one_winner() {
        let guard = Arc::new(InMemoryGuard::new());
        let mut handles = vec![];

        for _ in 0..32 {
            let guard = Arc::clone(&guard);
            handles.push(tokio::spawn(async move {
                guard.record_if_absent(&code("23468F")).await.unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(guard.len(), 1);
    }
}
