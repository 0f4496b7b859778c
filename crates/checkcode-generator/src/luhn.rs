use crate::checksum::luhn_variant_digit;
use crate::settings::LuhnSettings;
use crate::{issue_unique, CodeScheme};
use checkcode_core::code::split_check;
use checkcode_core::{
    Alphabet, Code, CodeError, DecimalDigit, IndexSource, Result, ThreadRngSource,
    UniquenessGuard,
};
use std::sync::Arc;

/// Codes shaped `prefix + body + digit`.
///
/// The body is drawn from the alphabet and the trailing digit is computed
/// from the raw ASCII values of `prefix + body` (see
/// [`luhn_variant_digit`]). Every issued code is recorded in the injected
/// guard, so a generator never hands out the same code twice for as long as
/// the guard's backing store lives.
///
/// With prefix `'V'` and length 8, the body `"234689"` yields the digit 5 and
/// the code `"V2346895"`.
pub struct LuhnVariantChecksumGenerator<G, R = ThreadRngSource> {
    alphabet: Alphabet,
    code_length: usize,
    prefix: char,
    max_attempts: u32,
    guard: Arc<G>,
    source: R,
}

impl<G: UniquenessGuard> LuhnVariantChecksumGenerator<G, ThreadRngSource> {
    /// Creates a generator that draws from the thread-local RNG.
    pub fn new(settings: LuhnSettings, guard: Arc<G>) -> Result<Self> {
        Self::with_source(settings, guard, ThreadRngSource)
    }
}

impl<G: UniquenessGuard, R: IndexSource> LuhnVariantChecksumGenerator<G, R> {
    pub fn with_source(settings: LuhnSettings, guard: Arc<G>, source: R) -> Result<Self> {
        let alphabet = settings.resolve()?;
        Ok(Self {
            alphabet,
            code_length: settings.code_length,
            prefix: settings.prefix,
            max_attempts: settings.max_attempts,
            guard,
            source,
        })
    }

    pub fn prefix(&self) -> char {
        self.prefix
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn guard(&self) -> &G {
        &self.guard
    }

    /// Issues a code the guard has not seen before.
    ///
    /// A candidate that is already taken is thrown away and a fresh body is
    /// drawn. After `max_attempts` taken candidates the call fails with
    /// [`CodeError::SpaceExhausted`]. The returned code is already recorded.
    pub async fn generate(&self) -> Result<Code> {
        issue_unique(self, self.guard.as_ref(), self.max_attempts).await
    }

    fn draw_payload(&self) -> Result<String> {
        let mut payload = String::with_capacity(self.code_length);
        payload.push(self.prefix);
        for _ in 0..self.code_length - 2 {
            let index = self.source.next_index(self.alphabet.size());
            payload.push(self.alphabet.char_at(index)?);
        }
        Ok(payload)
    }

    /// Position 0 must be the prefix, every later position an alphabet character.
    fn check_payload(&self, payload: &str) -> Result<()> {
        let mut chars = payload.chars();
        match chars.next() {
            Some(c) if c == self.prefix => {}
            Some(c) => return Err(CodeError::invalid_character_at(c, 0)),
            None => {
                return Err(CodeError::InvalidLength {
                    expected: self.code_length - 1,
                    actual: 0,
                })
            }
        }
        for (offset, c) in chars.enumerate() {
            if !self.alphabet.contains(c) {
                return Err(CodeError::invalid_character_at(c, offset + 1));
            }
        }
        Ok(())
    }
}

impl<G: UniquenessGuard, R: IndexSource> CodeScheme for LuhnVariantChecksumGenerator<G, R> {
    type Check = DecimalDigit;

    fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    fn code_length(&self) -> usize {
        self.code_length
    }

    fn draw(&self) -> Result<Code> {
        let payload = self.draw_payload()?;
        let digit = luhn_variant_digit(payload.as_bytes());
        Ok(Code::from_parts(&payload, digit))
    }

    fn compute_check_digit(&self, payload: &str) -> Result<DecimalDigit> {
        self.check_payload(payload)?;
        Ok(luhn_variant_digit(payload.as_bytes()))
    }

    fn verify(&self, code: &str) -> Result<Code> {
        let actual = code.chars().count();
        if actual != self.code_length {
            return Err(CodeError::InvalidLength {
                expected: self.code_length,
                actual,
            });
        }

        let Some((payload, supplied)) = split_check(code) else {
            return Err(CodeError::InvalidLength {
                expected: self.code_length,
                actual,
            });
        };

        self.check_payload(payload)?;

        // The trailing digit is checked by range, not by alphabet membership.
        let Some(supplied) = DecimalDigit::from_char(supplied) else {
            return Err(CodeError::invalid_character_at(supplied, actual - 1));
        };

        let expected = luhn_variant_digit(payload.as_bytes());
        if expected != supplied {
            return Err(CodeError::ChecksumMismatch {
                expected: expected.to_string(),
                actual: supplied.to_string(),
            });
        }

        Ok(Code::new_unchecked(code))
    }

    /// The prefix and the check digit are not free choices.
    fn space(&self) -> u128 {
        crate::space_of(self.alphabet.size(), self.code_length - 2)
    }
}

impl<G, R> std::fmt::Debug for LuhnVariantChecksumGenerator<G, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LuhnVariantChecksumGenerator")
            .field("alphabet", &self.alphabet)
            .field("code_length", &self.code_length)
            .field("prefix", &self.prefix)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}
