//! Check digit computation and verification
//!
//! CDD Principle: Domain Services - the engine interprets a DocumentSpec as data
//! - Each pass is a weighted sum reduced modulo the document's modulus
//! - Chained passes see the check digits produced before them, independent passes do not
//! - Validation re-derives the trailing digits and compares them exactly

use crate::domain::documents::{BrDocsError, BrDocsResult, DigitString, DocumentSpec, WeightPass};

/// Stateless check digit engine
#[derive(Debug, Clone, Copy, Default)]
pub struct ChecksumEngine;

impl ChecksumEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compute the check digits for a prefix of free digits
    pub fn compute_check_digits(
        &self,
        free: &DigitString,
        spec: &DocumentSpec,
    ) -> BrDocsResult<DigitString> {
        if free.len() != spec.free_digit_count {
            return Err(BrDocsError::invalid_format(format!(
                "expected {} free digits, got {}",
                spec.free_digit_count,
                free.len()
            )));
        }

        let mut checks = DigitString::default();
        for pass in spec.passes {
            let input = if pass.chained { free.concat(&checks) } else { free.clone() };
            let digit = self.run_pass(&input, pass, spec)?;
            checks.push(digit);
        }

        tracing::debug!("Computed check digits {} for prefix {}", checks, free);
        Ok(checks)
    }

    /// Append check digits to a free prefix, producing a complete number
    pub fn complete(&self, free: &DigitString, spec: &DocumentSpec) -> BrDocsResult<DigitString> {
        let checks = self.compute_check_digits(free, spec)?;
        Ok(free.concat(&checks))
    }

    /// Verify a complete number against its scheme
    ///
    /// Returns `Err(InvalidFormat)` when the length is wrong and `Ok(false)` when the
    /// number is well-formed but fails the checksum or consists of one repeated digit.
    pub fn validate(&self, full: &DigitString, spec: &DocumentSpec) -> BrDocsResult<bool> {
        if full.len() != spec.total_len() {
            return Err(BrDocsError::invalid_format(format!(
                "expected {} digits, got {}",
                spec.total_len(),
                full.len()
            )));
        }

        if spec.reject_repeated_digits && full.all_identical() {
            tracing::debug!("Rejected repeated-digit number {}", full);
            return Ok(false);
        }

        let (free, trailing) = full.split_at(spec.free_digit_count)?;
        let expected = self.compute_check_digits(&free, spec)?;
        Ok(expected == trailing)
    }

    /// Parse then verify a candidate string
    pub fn validate_str(&self, candidate: &str, spec: &DocumentSpec) -> BrDocsResult<bool> {
        let digits = DigitString::parse(candidate)?;
        self.validate(&digits, spec)
    }

    fn run_pass(
        &self,
        input: &DigitString,
        pass: &WeightPass,
        spec: &DocumentSpec,
    ) -> BrDocsResult<u8> {
        if input.len() != pass.input_len() {
            return Err(BrDocsError::invalid_format(format!(
                "checksum pass expects {} digits, got {}",
                pass.input_len(),
                input.len()
            )));
        }

        let sum: u32 = input.iter().zip(pass.weights).map(|(d, w)| u32::from(d) * w).sum();
        let remainder = sum % spec.modulus;
        let digit = if remainder < spec.remainder_threshold { 0 } else { spec.modulus - remainder };

        // a modulus above 11 could yield a two-digit value
        u8::try_from(digit).ok().filter(|d| *d <= 9).ok_or_else(|| {
            BrDocsError::invalid_format(format!("checksum produced non-digit value {digit}"))
        })
    }
}
