use crate::checksum::modular_check_char;
use crate::settings::ModularSettings;
use crate::CodeScheme;
use checkcode_core::code::split_check;
use checkcode_core::{
    Alphabet, CheckChar, Code, CodeError, IndexSource, Result, ThreadRngSource,
};

/// Codes whose last character is the sum of all other characters' alphabet
/// indices, modulo the alphabet size.
///
/// With the default 23-character alphabet and a length of 6, `"23468"` has
/// the index sum `0 + 1 + 2 + 3 + 4 = 10`, so its check character is
/// `alphabet[10] = 'F'` and the full code is `"23468F"`.
///
/// The sum ignores character order, so swapping two payload characters is
/// not detected.
#[derive(Debug)]
pub struct ModularChecksumGenerator<R = ThreadRngSource> {
    alphabet: Alphabet,
    code_length: usize,
    source: R,
}

impl ModularChecksumGenerator<ThreadRngSource> {
    /// Creates a generator that draws from the thread-local RNG.
    pub fn new(settings: ModularSettings) -> Result<Self> {
        Self::with_source(settings, ThreadRngSource)
    }
}

impl<R: IndexSource> ModularChecksumGenerator<R> {
    pub fn with_source(settings: ModularSettings, source: R) -> Result<Self> {
        let alphabet = settings.resolve()?;
        Ok(Self {
            alphabet,
            code_length: settings.code_length,
            source,
        })
    }

    /// Draws `code_length - 1` independent characters and appends their check
    /// character.
    pub fn generate(&self) -> Result<Code> {
        let mut payload = String::with_capacity(self.code_length);
        for _ in 0..self.code_length - 1 {
            let index = self.source.next_index(self.alphabet.size());
            payload.push(self.alphabet.char_at(index)?);
        }
        let check = modular_check_char(&self.alphabet, &payload)?;
        Ok(Code::from_parts(&payload, check))
    }
}

impl<R: IndexSource> CodeScheme for ModularChecksumGenerator<R> {
    type Check = CheckChar;

    fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    fn code_length(&self) -> usize {
        self.code_length
    }

    fn draw(&self) -> Result<Code> {
        self.generate()
    }

    fn compute_check_digit(&self, payload: &str) -> Result<CheckChar> {
        modular_check_char(&self.alphabet, payload)
    }

    fn verify(&self, code: &str) -> Result<Code> {
        let actual = code.chars().count();
        if actual != self.code_length {
            return Err(CodeError::InvalidLength {
                expected: self.code_length,
                actual,
            });
        }

        // The check character is drawn from the alphabet too.
        if let Some((position, c)) = self.alphabet.first_foreign(code) {
            return Err(CodeError::invalid_character_at(c, position));
        }

        let Some((payload, supplied)) = split_check(code) else {
            return Err(CodeError::InvalidLength {
                expected: self.code_length,
                actual,
            });
        };

        let expected = self.compute_check_digit(payload)?;
        if expected != CheckChar::new(supplied) {
            return Err(CodeError::ChecksumMismatch {
                expected: expected.to_string(),
                actual: supplied.to_string(),
            });
        }

        Ok(Code::new_unchecked(code))
    }

    fn space(&self) -> u128 {
        crate::space_of(self.alphabet.size(), self.code_length - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkcode_core::{ScriptedSource, SeededSource};

    fn generator(length: usize) -> ModularChecksumGenerator {
        ModularChecksumGenerator::new(ModularSettings::builder().code_length(length).build())
            .unwrap()
    }

    #[test]
    fn known_code_validates() {
        let gen = generator(6);
        assert_eq!(gen.compute_check_digit("23468").unwrap(), CheckChar::new('F'));
        assert!(gen.validate("23468F").is_valid());
    }

    #[test]
    fn wrong_check_character_is_a_mismatch() {
        let gen = generator(6);
        let validation = gen.validate("23468H");
        assert!(!validation.is_valid());
        assert_eq!(
            validation.error(),
            Some(&CodeError::ChecksumMismatch {
                expected: "F".to_string(),
                actual: "H".to_string(),
            })
        );
    }

    #[test]
    fn foreign_check_character_is_rejected_as_character() {
        // 'G' is not part of the default alphabet.
        let gen = generator(6);
        let validation = gen.validate("23468G");
        assert!(!validation.is_valid());
        assert_eq!(
            validation.error(),
            Some(&CodeError::invalid_character_at('G', 5))
        );
    }

    #[test]
    fn wrong_length_is_reported_not_raised() {
        let gen = generator(6);
        let validation = gen.validate("23468");
        assert_eq!(
            validation.error(),
            Some(&CodeError::InvalidLength {
                expected: 6,
                actual: 5
            })
        );
        assert!(!gen.validate("").is_valid());
        assert!(!gen.validate("23468FF").is_valid());
    }

    #[test]
    fn repeated_character_code_from_demo_is_invalid() {
        // The sixth alphabet character repeated: "999999". Index 5 * 5 = 25,
        // 25 mod 23 = 2 -> '4', so the trailing '9' does not match.
        let gen = generator(6);
        let validation = gen.validate("999999");
        assert!(matches!(
            validation.error(),
            Some(CodeError::ChecksumMismatch { .. })
        ));
        assert!(gen.validate("999994").is_valid());
    }

    #[test]
    fn lowercase_input_is_rejected() {
        let gen = generator(6);
        assert!(matches!(
            gen.validate("2346af").error(),
            Some(CodeError::InvalidCharacter { .. })
        ));
    }

    #[test]
    fn compute_check_digit_rejects_foreign_payload() {
        let gen = generator(6);
        assert_eq!(
            gen.compute_check_digit("2346O"),
            Err(CodeError::invalid_character_at('O', 4))
        );
    }

    #[test]
    fn generated_codes_validate() {
        for length in 2..=12 {
            let gen = generator(length);
            for _ in 0..200 {
                let code = gen.generate().unwrap();
                assert_eq!(code.len(), length);
                assert!(gen.validate(code.as_str()).is_valid(), "{code} should validate");
            }
        }
    }

    #[test]
    fn generated_codes_validate_with_custom_alphabet() {
        let settings = ModularSettings::builder()
            .alphabet("ACEGHJ")
            .code_length(9)
            .build();
        let gen = ModularChecksumGenerator::with_source(settings, SeededSource::new(7)).unwrap();
        for _ in 0..100 {
            let code = gen.generate().unwrap();
            assert!(code.as_str().chars().all(|c| "ACEGHJ".contains(c)));
            assert!(gen.validate(code.as_str()).is_valid());
        }
    }

    #[test]
    fn scripted_source_builds_expected_code() {
        let settings = ModularSettings::builder().code_length(6).build();
        let gen =
            ModularChecksumGenerator::with_source(settings, ScriptedSource::new(vec![0, 1, 2, 3, 4]))
                .unwrap();
        assert_eq!(gen.generate().unwrap().as_str(), "23468F");
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let settings = ModularSettings::builder().code_length(6).build();
        let gen = ModularChecksumGenerator::with_source(settings, ScriptedSource::new(vec![99]))
            .unwrap();
        assert_eq!(
            gen.generate(),
            Err(CodeError::IndexOutOfRange {
                index: 99,
                size: 23
            })
        );
    }

    #[test]
    fn check_character_is_deterministic() {
        let gen = generator(8);
        let first = gen.compute_check_digit("ACDEFHJ").unwrap();
        for _ in 0..10 {
            assert_eq!(gen.compute_check_digit("ACDEFHJ").unwrap(), first);
        }
    }

    #[test]
    fn check_character_ignores_order() {
        // Transpositions are invisible to a plain sum.
        let gen = generator(6);
        let base = gen.compute_check_digit("2AMXY").unwrap();
        for permutation in ["AMXY2", "YXMA2", "M2YAX", "XY2AM", "2AMYX"] {
            assert_eq!(gen.compute_check_digit(permutation).unwrap(), base);
        }

        let code = Code::from_parts("2AMXY", base);
        let swapped = Code::from_parts("A2MXY", base);
        assert!(gen.validate(code.as_str()).is_valid());
        assert!(gen.validate(swapped.as_str()).is_valid());
    }

    #[test]
    fn space_for_default_alphabet() {
        assert_eq!(generator(6).space(), 6_436_343);
        assert_eq!(generator(2).space(), 23);
    }

    #[test]
    fn space_saturates() {
        assert_eq!(generator(200).space(), u128::MAX);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn space_saturates_for_lengths_beyond_u32() {
        // 2^32 + 1 payload characters would wrap to an exponent of 1 if truncated.
        assert_eq!(generator((1usize << 32) + 2).space(), u128::MAX);
    }
}
