//! Check-value arithmetic, free of any generator state.

use checkcode_core::{Alphabet, CheckChar, CodeError, DecimalDigit, Result};

/// Sum of alphabet indices modulo the alphabet size.
///
/// The sum is commutative, so reordering the payload never changes the
/// result and a transposition goes undetected.
pub fn modular_check_char(alphabet: &Alphabet, payload: &str) -> Result<CheckChar> {
    let mut sum = 0usize;
    for (position, c) in payload.chars().enumerate() {
        let index = alphabet
            .index_of(c)
            .map_err(|_| CodeError::invalid_character_at(c, position))?;
        sum += index;
    }
    alphabet.char_at(sum % alphabet.size()).map(CheckChar::new)
}

/// Luhn-style check digit over the raw ASCII values of `payload`.
///
/// Each byte is projected to `byte - 48`, so letters yield values above 9.
/// Walking from the right, positions `0, 2, 4, ...` contribute
/// `2d - 9 * floor(d / 5)` and the others contribute `d` unchanged. The
/// result is the amount needed to reach the next multiple of ten.
pub fn luhn_variant_digit(payload: &[u8]) -> DecimalDigit {
    let sum: i64 = payload
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &byte)| {
            let d = i64::from(byte) - 48;
            if i % 2 == 0 {
                2 * d - 9 * d.div_euclid(5)
            } else {
                d
            }
        })
        .sum();

    DecimalDigit::from_remainder(10 - (sum.unsigned_abs() + 10) % 10)
}
