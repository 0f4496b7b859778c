use crate::code::Code;
use crate::error::GuardError;
use async_trait::async_trait;
use std::sync::Arc;

type Result<T> = std::result::Result<T, GuardError>;

/// The set of codes already issued.
///
/// The core does not care where the set lives. An in-memory map is fine for
/// a single process; a shared key-value store keeps codes unique across
/// restarts and across processes.
///
/// Callers that may run concurrently must use [`record_if_absent`], which
/// implementations perform as one atomic test-and-set. A separate
/// `contains` followed by `record` lets two callers both pass the check
/// for the same code.
///
/// [`record_if_absent`]: UniquenessGuard::record_if_absent
#[async_trait]
pub trait UniquenessGuard: Send + Sync + 'static {
    /// Checks whether `code` has already been issued.
    async fn contains(&self, code: &Code) -> Result<bool>;

    /// Marks `code` as issued, whether or not it was already present.
    async fn record(&self, code: &Code) -> Result<()>;

    /// Marks `code` as issued only if it is not present yet.
    ///
    /// Returns `true` if this call recorded the code, `false` if it was
    /// already taken.
    async fn record_if_absent(&self, code: &Code) -> Result<bool>;
}

#[async_trait]
impl<G: UniquenessGuard + ?Sized> UniquenessGuard for Arc<G> {
    async fn contains(&self, code: &Code) -> Result<bool> {
        (**self).contains(code).await
    }

    async fn record(&self, code: &Code) -> Result<()> {
        (**self).record(code).await
    }

    async fn record_if_absent(&self, code: &Code) -> Result<bool> {
        (**self).record_if_absent(code).await
    }
}
