use checkcode_core::{Alphabet, CodeError, Result, DEFAULT_ALPHABET};
use typed_builder::TypedBuilder;

/// Retry cap used when no explicit `max_attempts` is configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

/// Configures a [`ModularChecksumGenerator`](crate::ModularChecksumGenerator).
#[derive(Debug, Clone, TypedBuilder)]
pub struct ModularSettings {
    /// Characters a code may contain, check character included.
    #[builder(default = DEFAULT_ALPHABET.to_string(), setter(into))]
    pub alphabet: String,
    /// Total length, check character included. Must be at least 2.
    #[builder]
    pub code_length: usize,
}

/// Configures a [`LuhnVariantChecksumGenerator`](crate::LuhnVariantChecksumGenerator).
#[derive(Debug, Clone, TypedBuilder)]
pub struct LuhnSettings {
    /// Characters the body may contain.
    #[builder(default = DEFAULT_ALPHABET.to_string(), setter(into))]
    pub alphabet: String,
    /// Total length, prefix and check digit included. Must be at least 3.
    #[builder]
    pub code_length: usize,
    /// Fixed first character of every code. It does not have to belong to the
    /// alphabet, but must be ASCII because it feeds the checksum by its raw value.
    #[builder]
    pub prefix: char,
    /// How many fresh bodies to draw before giving up on finding an unused code.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,
}

impl ModularSettings {
    pub(crate) fn resolve(&self) -> Result<Alphabet> {
        if self.code_length < 2 {
            return Err(CodeError::InvalidSettings(format!(
                "code length must leave room for a payload and a check character, got {}",
                self.code_length
            )));
        }
        Alphabet::new(&self.alphabet)
    }
}

impl LuhnSettings {
    pub(crate) fn resolve(&self) -> Result<Alphabet> {
        if self.code_length < 3 {
            return Err(CodeError::InvalidSettings(format!(
                "code length must leave room for a prefix, a body and a check digit, got {}",
                self.code_length
            )));
        }
        if !self.prefix.is_ascii() || self.prefix.is_ascii_control() {
            return Err(CodeError::InvalidSettings(format!(
                "prefix must be a printable ASCII character, got {:?}",
                self.prefix
            )));
        }
        if self.max_attempts == 0 {
            return Err(CodeError::InvalidSettings(
                "max attempts must be at least 1".to_string(),
            ));
        }
        Alphabet::new(&self.alphabet)
    }
}
