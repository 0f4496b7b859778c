use crate::code::Code;
use crate::error::{CodeError, Result};

/// Outcome of validating a code string.
///
/// Validation is total: malformed input becomes `Invalid` with the reason
/// attached, it is never raised as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid(Code),
    Invalid(CodeError),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    /// Human-readable reason the code was rejected.
    pub fn reason(&self) -> Option<String> {
        self.error().map(ToString::to_string)
    }

    pub fn error(&self) -> Option<&CodeError> {
        match self {
            Validation::Valid(_) => None,
            Validation::Invalid(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<Code> {
        match self {
            Validation::Valid(code) => Ok(code),
            Validation::Invalid(err) => Err(err),
        }
    }
}

impl From<Result<Code>> for Validation {
    fn from(result: Result<Code>) -> Self {
        match result {
            Ok(code) => Validation::Valid(code),
            Err(err) => Validation::Invalid(err),
        }
    }
}

impl From<Validation> for bool {
    fn from(validation: Validation) -> Self {
        validation.is_valid()
    }
}
