//! Check-character code generators.
//!
//! Two schemes share the same shape ([`CodeScheme`]) but compute their check
//! symbol differently:
//!
//! - [`ModularChecksumGenerator`]: the check character is the sum of the
//!   payload's alphabet indices modulo the alphabet size.
//! - [`LuhnVariantChecksumGenerator`]: a fixed prefix, an alphabet body and a
//!   decimal check digit computed with a Luhn-like alternating weighting.

pub mod checksum;
pub mod luhn;
pub mod modular;
pub mod settings;

pub use luhn::LuhnVariantChecksumGenerator;
pub use modular::ModularChecksumGenerator;
pub use settings::{LuhnSettings, ModularSettings, DEFAULT_MAX_ATTEMPTS};

use checkcode_core::{Alphabet, Code, CodeError, Result, UniquenessGuard, Validation};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Common shape of a check-character code scheme.
///
/// Implementations are pure: they draw random candidates and check strings,
/// but never consult storage. Uniqueness is layered on top with
/// [`issue_unique`].
pub trait CodeScheme: Send + Sync + 'static {
    /// The check symbol type this scheme appends.
    type Check: Copy + Eq + Display;

    fn alphabet(&self) -> &Alphabet;

    /// Total length of a code, check symbol included.
    fn code_length(&self) -> usize;

    /// Draws a fresh random code. No uniqueness is enforced here.
    fn draw(&self) -> Result<Code>;

    /// Computes the check symbol for `payload`.
    ///
    /// Fails with `InvalidCharacter` if the payload holds a character the
    /// scheme does not accept.
    fn compute_check_digit(&self, payload: &str) -> Result<Self::Check>;

    /// Checks `code` and returns the reason on failure.
    fn verify(&self, code: &str) -> Result<Code>;

    /// Total validation: never raises, the rejection reason travels inside
    /// the returned [`Validation`].
    fn validate(&self, code: &str) -> Validation {
        let validation = Validation::from(self.verify(code));
        if let Validation::Invalid(err) = &validation {
            debug!(code, reason = %err, "rejected code");
        }
        validation
    }

    /// Number of distinct codes this configuration can produce, saturating
    /// at `u128::MAX`.
    fn space(&self) -> u128;
}

/// `size ^ free_positions`, saturating at `u128::MAX`.
pub(crate) fn space_of(size: usize, free_positions: usize) -> u128 {
    u32::try_from(free_positions).map_or(u128::MAX, |exp| (size as u128).saturating_pow(exp))
}

/// Draws codes from `scheme` until `guard` accepts one as new.
///
/// Each candidate goes through the guard's atomic test-and-set, so two
/// concurrent callers can never both receive the same code. After
/// `max_attempts` duplicates the call fails with
/// [`CodeError::SpaceExhausted`]. A bound of zero is rejected up front as
/// [`CodeError::InvalidSettings`].
pub async fn issue_unique<S, G>(scheme: &S, guard: &G, max_attempts: u32) -> Result<Code>
where
    S: CodeScheme + ?Sized,
    G: UniquenessGuard + ?Sized,
{
    if max_attempts == 0 {
        return Err(CodeError::InvalidSettings(
            "max attempts must be at least 1".to_string(),
        ));
    }

    for attempt in 1..=max_attempts {
        let candidate = scheme.draw()?;
        if guard.record_if_absent(&candidate).await? {
            debug!(code = %candidate, attempt, "issued code");
            return Ok(candidate);
        }
        trace!(code = %candidate, attempt, "code already issued, drawing again");
    }

    warn!(max_attempts, "giving up after repeated duplicate codes");
    Err(CodeError::SpaceExhausted {
        attempts: max_attempts,
    })
}

/// Pairs any [`CodeScheme`] with a [`UniquenessGuard`].
///
/// The modular generator has no notion of uniqueness on its own; wrapping it
/// here gives it the same at-most-once issuance as the Luhn-variant
/// generator.
#[derive(Debug)]
pub struct UniqueIssuer<S, G> {
    scheme: Arc<S>,
    guard: Arc<G>,
    max_attempts: u32,
}

impl<S, G> Clone for UniqueIssuer<S, G> {
    fn clone(&self) -> Self {
        Self {
            scheme: Arc::clone(&self.scheme),
            guard: Arc::clone(&self.guard),
            max_attempts: self.max_attempts,
        }
    }
}

impl<S: CodeScheme, G: UniquenessGuard> UniqueIssuer<S, G> {
    pub fn new(scheme: S, guard: Arc<G>) -> Self {
        Self::with_max_attempts(scheme, guard, DEFAULT_MAX_ATTEMPTS)
    }

    pub fn with_max_attempts(scheme: S, guard: Arc<G>, max_attempts: u32) -> Self {
        Self {
            scheme: Arc::new(scheme),
            guard,
            max_attempts,
        }
    }

    pub fn scheme(&self) -> &S {
        &self.scheme
    }

    pub fn guard(&self) -> &G {
        &self.guard
    }

    /// Issues a code that the guard has never seen before.
    pub async fn issue(&self) -> Result<Code> {
        issue_unique(self.scheme.as_ref(), self.guard.as_ref(), self.max_attempts).await
    }
}
