//! Display formatting for document numbers
//!
//! Patterns use `X` as a digit placeholder; every other character is a literal
//! separator copied through unchanged.

use crate::domain::documents::{BrDocsError, BrDocsResult, DigitString};

/// Placeholder character in display patterns
pub const PLACEHOLDER: char = 'X';

/// Display pattern for a CNH followed by its issuing state code
pub const CNH_STATE_PATTERN: &str = "XXX.XXX.XXX-XX.XX";

/// Characters that [`DocumentFormatter::strip_separators`] removes
const SEPARATORS: &[char] = &['.', '-', '/'];

/// Applies placeholder patterns to digit strings
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentFormatter;

impl DocumentFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Number of digit placeholders in a pattern
    pub fn placeholder_count(pattern: &str) -> usize {
        pattern.chars().filter(|c| *c == PLACEHOLDER).count()
    }

    /// Substitute digits into the pattern's placeholders, in order
    pub fn format(&self, digits: &DigitString, pattern: &str) -> BrDocsResult<String> {
        let expected = Self::placeholder_count(pattern);
        if expected != digits.len() {
            return Err(BrDocsError::invalid_format(format!(
                "pattern '{pattern}' needs {expected} digits, got {}",
                digits.len()
            )));
        }

        let mut source = digits.iter();
        let mut output = String::with_capacity(pattern.len());
        for c in pattern.chars() {
            if c == PLACEHOLDER {
                // counts matched above
                if let Some(d) = source.next() {
                    output.push(char::from(b'0' + d));
                }
            } else {
                output.push(c);
            }
        }
        Ok(output)
    }

    /// Parse a raw string and format it
    pub fn format_str(&self, raw: &str, pattern: &str) -> BrDocsResult<String> {
        self.format(&DigitString::parse(raw)?, pattern)
    }

    /// Remove display separators and whitespace, leaving anything else in place
    pub fn strip_separators(input: &str) -> String {
        input.chars().filter(|c| !c.is_whitespace() && !SEPARATORS.contains(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_cpf_pattern() {
        let formatter = DocumentFormatter::new();
        assert_eq!(formatter.format_str("12345678909", "XXX.XXX.XXX-XX").unwrap(), "123.456.789-09");
    }

    #[test]
    fn test_cnh_state_pattern() {
        let formatter = DocumentFormatter::new();
        assert_eq!(
            formatter.format_str("1234567890125", CNH_STATE_PATTERN).unwrap(),
            "123.456.789-01.25"
        );
    }

    #[test]
    fn test_pattern_without_separators() {
        let formatter = DocumentFormatter::new();
        assert_eq!(formatter.format_str("0042", "XXXX").unwrap(), "0042");
    }

    #[rstest]
    #[case("1234567890")]
    #[case("123456789012")]
    fn test_wrong_length_is_invalid_format(#[case] raw: &str) {
        let err = DocumentFormatter::new().format_str(raw, "XXX.XXX.XXX-XX").unwrap_err();
        assert!(err.is_invalid_format());
    }

    #[test]
    fn test_non_digit_input_is_invalid_format() {
        let err = DocumentFormatter::new().format_str("1234567890x", "XXX.XXX.XXX-XX").unwrap_err();
        assert!(err.is_invalid_format());
    }

    #[rstest]
    #[case("123.456.789-09", "12345678909")]
    #[case(" 123 456 789 09 ", "12345678909")]
    #[case("123/456", "123456")]
    #[case("12a.34", "12a34")]
    fn test_strip_separators(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(DocumentFormatter::strip_separators(input), expected);
    }

    #[test]
    fn test_placeholder_count() {
        assert_eq!(DocumentFormatter::placeholder_count("XXX.XXX.XXX-XX"), 11);
        assert_eq!(DocumentFormatter::placeholder_count(CNH_STATE_PATTERN), 13);
        assert_eq!(DocumentFormatter::placeholder_count("---"), 0);
    }
}
