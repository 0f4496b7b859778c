use crate::error::{CodeError, Result};
use std::fmt;

/// The 23 characters left after dropping look-alikes (0/O, 1/I/L, 5/S, 7/Z, ...).
pub const DEFAULT_ALPHABET: &str = "234689ACDEFHJKMNPRTVWXY";

const ASCII_TABLE_SIZE: usize = 128;
const UNMAPPED: u8 = u8::MAX;

/// Bidirectional lookup between alphabet characters and dense indices.
///
/// Both directions are fixed tables built once at construction: `symbols`
/// maps index to character and `lookup` maps an ASCII code point to its
/// index. Only ASCII alphabets are accepted, which keeps every index in a
/// `u8` and keeps the raw-ASCII checksum well defined.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
    lookup: [u8; ASCII_TABLE_SIZE],
}

impl Alphabet {
    /// Builds the lookup tables, rejecting empty, non-ASCII or repeated characters.
    pub fn new(symbols: &str) -> Result<Self> {
        if symbols.is_empty() {
            return Err(CodeError::InvalidAlphabet(
                "alphabet cannot be empty".to_string(),
            ));
        }

        let mut lookup = [UNMAPPED; ASCII_TABLE_SIZE];
        let mut table = Vec::with_capacity(symbols.len());

        for (index, c) in symbols.chars().enumerate() {
            if !c.is_ascii() || c.is_ascii_control() {
                return Err(CodeError::InvalidAlphabet(format!(
                    "only printable ASCII characters are supported, got {c:?}"
                )));
            }
            let slot = &mut lookup[c as usize];
            if *slot != UNMAPPED {
                return Err(CodeError::InvalidAlphabet(format!(
                    "duplicate character {c:?} at position {index}"
                )));
            }
            *slot = index as u8;
            table.push(c as u8);
        }

        Ok(Self {
            symbols: table,
            lookup,
        })
    }

    /// Returns the dense index of `c`, or `InvalidCharacter` if it is not in the alphabet.
    pub fn index_of(&self, c: char) -> Result<usize> {
        self.position(c).ok_or(CodeError::InvalidCharacter {
            character: c,
            position: None,
        })
    }

    /// Returns the character stored at `index`.
    pub fn char_at(&self, index: usize) -> Result<char> {
        self.symbols
            .get(index)
            .map(|&b| b as char)
            .ok_or(CodeError::IndexOutOfRange {
                index,
                size: self.size(),
            })
    }

    pub fn contains(&self, c: char) -> bool {
        self.position(c).is_some()
    }

    /// Number of distinct characters.
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    pub fn as_str(&self) -> &str {
        // Every byte was checked to be ASCII in `new`.
        std::str::from_utf8(&self.symbols).unwrap_or_default()
    }

    /// Finds the first character of `text` outside the alphabet.
    pub fn first_foreign(&self, text: &str) -> Option<(usize, char)> {
        text.chars().enumerate().find(|&(_, c)| !self.contains(c))
    }

    fn position(&self, c: char) -> Option<usize> {
        if !c.is_ascii() {
            return None;
        }
        match self.lookup[c as usize] {
            UNMAPPED => None,
            index => Some(index as usize),
        }
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHABET).expect("default alphabet is valid")
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Alphabet").field(&self.as_str()).finish()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
