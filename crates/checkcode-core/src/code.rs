use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::{self, Display};

/// A finished code: payload followed by exactly one check symbol.
///
/// A `Code` is never mutated after construction. Validation works on plain
/// `&str` input and only produces a `Code` once every check has passed.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Code(SmolStr);

impl Code {
    /// Appends the check symbol to `payload`.
    pub fn from_parts(payload: &str, check: impl Display) -> Self {
        Self(SmolStr::new(format!("{payload}{check}")))
    }

    /// Wraps a string without checking it against any scheme.
    ///
    /// Use this only for codes read back from a trusted store.
    pub fn new_unchecked(code: impl AsRef<str>) -> Self {
        Self(SmolStr::new(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters, check symbol included.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The code without its trailing check symbol.
    pub fn payload(&self) -> &str {
        split_check(&self.0).map_or("", |(payload, _)| payload)
    }

    /// The trailing check symbol.
    pub fn check_symbol(&self) -> Option<char> {
        split_check(&self.0).map(|(_, check)| check)
    }
}

/// Splits `code` into its payload and trailing check symbol.
pub fn split_check(code: &str) -> Option<(&str, char)> {
    let check = code.chars().next_back()?;
    Some((&code[..code.len() - check.len_utf8()], check))
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Code").field(&self.0).finish()
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Code {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Check symbol of the modular scheme: always drawn from the alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CheckChar(char);

impl CheckChar {
    pub fn new(c: char) -> Self {
        Self(c)
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl Display for CheckChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check digit of the Luhn-variant scheme, always in `0..=9`.
///
/// It is compared by value, never as a raw character, so `'7'` and the
/// digit `7` can't be mixed up with an alphabet symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DecimalDigit(u8);

impl DecimalDigit {
    /// Returns `None` for values above 9.
    pub fn new(value: u8) -> Option<Self> {
        (value <= 9).then_some(Self(value))
    }

    /// Reduces `value` modulo 10.
    pub fn from_remainder(value: u64) -> Self {
        Self((value % 10) as u8)
    }

    /// Parses one of the glyphs `'0'..='9'`.
    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10).map(|d| Self(d as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn as_char(self) -> char {
        char::from(b'0' + self.0)
    }
}

impl Display for DecimalDigit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_appends_check_symbol() {
        let code = Code::from_parts("23468", CheckChar::new('F'));
        assert_eq!(code.as_str(), "23468F");
        assert_eq!(code.payload(), "23468");
        assert_eq!(code.check_symbol(), Some('F'));
        assert_eq!(code.len(), 6);

        let code = Code::from_parts("V234689", DecimalDigit::new(5).unwrap());
        assert_eq!(code.as_str(), "V2346895");
    }

    #[test]
    fn empty_code_has_no_check_symbol() {
        let code = Code::new_unchecked("");
        assert!(code.is_empty());
        assert_eq!(code.payload(), "");
        assert_eq!(code.check_symbol(), None);
    }

    #[test]
    fn decimal_digit_range() {
        assert_eq!(DecimalDigit::new(9).map(DecimalDigit::value), Some(9));
        assert_eq!(DecimalDigit::new(10), None);
        assert_eq!(DecimalDigit::from_remainder(7).value(), 7);
        assert_eq!(DecimalDigit::from_remainder(10).value(), 0);
        assert_eq!(DecimalDigit::from_remainder(u64::MAX).value(), 5);
        assert_eq!(DecimalDigit::from_char('0').map(DecimalDigit::value), Some(0));
        assert_eq!(DecimalDigit::from_char('A'), None);
        assert_eq!(DecimalDigit::new(4).unwrap().as_char(), '4');
    }

    #[test]
    fn code_serializes_as_plain_string() {
        let code = Code::new_unchecked("23468F");
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"23468F\"");
        let back: Code = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);
    }
}
