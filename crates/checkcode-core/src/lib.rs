//! Core types and traits for check-character codes.
//!
//! This crate provides the alphabet lookup table, the code and check-value
//! types, the error model and the two capabilities a generator is handed
//! from outside: a random [`IndexSource`] and a [`UniquenessGuard`].

pub mod alphabet;
pub mod code;
pub mod error;
pub mod guard;
pub mod random;
pub mod validation;

pub use alphabet::{Alphabet, DEFAULT_ALPHABET};
pub use code::{CheckChar, Code, DecimalDigit};
pub use error::{CodeError, GuardError, Result};
pub use guard::UniquenessGuard;
pub use random::{IndexSource, ScriptedSource, SeededSource, ThreadRngSource};
pub use validation::Validation;
