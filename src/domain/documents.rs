//! Core domain models for Brazilian document numbers
//!
//! Architecture: Value Objects - digit strings and algorithm descriptors are immutable
//! - DigitString can only be built through checked parsing, so every digit is 0..=9
//! - DocumentSpec describes a checksum scheme as data rather than code
//! - DocumentType is the lookup key that callers use to pick a scheme

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An ordered sequence of decimal digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DigitString {
    digits: Vec<u8>,
}

impl DigitString {
    /// Parse a string made only of ASCII digits
    pub fn parse(input: &str) -> BrDocsResult<Self> {
        let digits = input
            .chars()
            .enumerate()
            .map(|(position, c)| {
                c.to_digit(10).map(|d| d as u8).ok_or_else(|| {
                    BrDocsError::invalid_format(format!(
                        "non-digit character '{c}' at position {}",
                        position + 1
                    ))
                })
            })
            .collect::<BrDocsResult<Vec<u8>>>()?;

        Ok(Self { digits })
    }

    /// Build from numeric digit values, rejecting anything above 9
    pub fn from_digits(digits: Vec<u8>) -> BrDocsResult<Self> {
        if let Some(bad) = digits.iter().find(|d| **d > 9) {
            return Err(BrDocsError::invalid_format(format!("{bad} is not a decimal digit")));
        }
        Ok(Self { digits })
    }

    /// Number of digits
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    /// Whether the string holds no digits
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Borrow the digit values
    pub fn as_slice(&self) -> &[u8] {
        &self.digits
    }

    /// Iterate over digit values
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.digits.iter().copied()
    }

    /// Whether every digit is the same (e.g. "00000000000")
    pub fn all_identical(&self) -> bool {
        match self.digits.first() {
            Some(first) => self.digits.iter().all(|d| d == first),
            None => false,
        }
    }

    /// Split into a prefix of `at` digits and the remainder
    pub fn split_at(&self, at: usize) -> BrDocsResult<(DigitString, DigitString)> {
        if at > self.digits.len() {
            return Err(BrDocsError::invalid_format(format!(
                "cannot split {} digits at position {at}",
                self.digits.len()
            )));
        }
        let (head, tail) = self.digits.split_at(at);
        Ok((Self { digits: head.to_vec() }, Self { digits: tail.to_vec() }))
    }

    /// Return a new string with `other` appended
    pub fn concat(&self, other: &DigitString) -> DigitString {
        let mut digits = Vec::with_capacity(self.len() + other.len());
        digits.extend_from_slice(&self.digits);
        digits.extend_from_slice(&other.digits);
        Self { digits }
    }

    /// Append a single digit value
    pub(crate) fn push(&mut self, digit: u8) {
        debug_assert!(digit <= 9);
        self.digits.push(digit);
    }
}

impl fmt::Display for DigitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.digits {
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

impl FromStr for DigitString {
    type Err = BrDocsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DigitString {
    type Error = BrDocsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DigitString> for String {
    fn from(value: DigitString) -> Self {
        value.to_string()
    }
}

/// One weighted-sum pass of a checksum scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightPass {
    /// Weights applied position by position to the pass input
    pub weights: &'static [u32],
    /// Whether check digits computed by earlier passes are appended to the input
    pub chained: bool,
}

impl WeightPass {
    /// Number of digits this pass consumes
    pub fn input_len(&self) -> usize {
        self.weights.len()
    }
}

/// Algorithm descriptor for a fixed-length document number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSpec {
    /// Digits that are not determined by the checksum
    pub free_digit_count: usize,
    /// Trailing check digits, one per pass
    pub check_digit_count: usize,
    /// Weighted-sum passes, in the order their digits appear
    pub passes: &'static [WeightPass],
    /// Divisor for the weighted sum
    pub modulus: u32,
    /// Remainders below this value map to a zero check digit
    pub remainder_threshold: u32,
    /// Reject numbers made of one repeated digit even if the checksum matches
    pub reject_repeated_digits: bool,
}

impl DocumentSpec {
    /// Total length of a complete number
    pub fn total_len(&self) -> usize {
        self.free_digit_count + self.check_digit_count
    }
}

/// CPF: pass two runs over the free digits plus the first check digit
pub const CPF_SPEC: DocumentSpec = DocumentSpec {
    free_digit_count: 9,
    check_digit_count: 2,
    passes: &[
        WeightPass { weights: &[10, 9, 8, 7, 6, 5, 4, 3, 2], chained: false },
        WeightPass { weights: &[11, 10, 9, 8, 7, 6, 5, 4, 3, 2], chained: true },
    ],
    modulus: 11,
    remainder_threshold: 2,
    reject_repeated_digits: true,
};

/// CNH: both passes run over the same nine free digits
pub const CNH_SPEC: DocumentSpec = DocumentSpec {
    free_digit_count: 9,
    check_digit_count: 2,
    passes: &[
        WeightPass { weights: &[9, 8, 7, 6, 5, 4, 3, 2, 1], chained: false },
        WeightPass { weights: &[1, 2, 3, 4, 5, 6, 7, 8, 9], chained: false },
    ],
    modulus: 11,
    remainder_threshold: 2,
    reject_repeated_digits: true,
};

/// Supported document types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// Cadastro de Pessoas Físicas
    Cpf,
    /// Carteira Nacional de Habilitação
    Cnh,
}

impl DocumentType {
    /// All supported types
    pub fn all() -> &'static [DocumentType] {
        &[Self::Cpf, Self::Cnh]
    }

    /// Checksum scheme for this type
    pub fn spec(self) -> &'static DocumentSpec {
        match self {
            Self::Cpf => &CPF_SPEC,
            Self::Cnh => &CNH_SPEC,
        }
    }

    /// Lowercase identifier
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cpf => "cpf",
            Self::Cnh => "cnh",
        }
    }

    /// Human-readable name
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Cpf => "CPF (Cadastro de Pessoas Físicas)",
            Self::Cnh => "CNH (Carteira Nacional de Habilitação)",
        }
    }

    /// Display pattern used when no configuration overrides it
    pub fn default_pattern(self) -> &'static str {
        match self {
            Self::Cpf | Self::Cnh => "XXX.XXX.XXX-XX",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = BrDocsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpf" => Ok(Self::Cpf),
            "cnh" => Ok(Self::Cnh),
            _ => Err(BrDocsError::UnsupportedDocumentType { name: s.to_string() }),
        }
    }
}

/// A freshly generated number in raw and display form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub document_type: DocumentType,
    pub raw: DigitString,
    pub formatted: String,
}

/// Error types for document operations
#[derive(Debug, thiserror::Error)]
pub enum BrDocsError {
    /// Wrong length, non-digit characters or pattern mismatch
    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    /// No checksum scheme is registered under this name
    #[error("Unsupported document type: '{name}'")]
    UnsupportedDocumentType { name: String },

    /// Unknown Brazilian state abbreviation or code
    #[error("Unknown state: '{code}'")]
    UnknownState { code: String },

    /// Unknown driver's license category
    #[error("Unknown license category: '{code}'")]
    UnknownCategory { code: String },

    /// Unknown country for dial code lookup
    #[error("Unknown country: '{code}'")]
    UnknownCountry { code: String },

    /// Configuration file could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File could not be read or accessed
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Report or config could not be serialized
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl BrDocsError {
    /// Create an invalid format error
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat { message: message.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization { message: message.into() }
    }

    /// Whether this error came from malformed caller input
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, Self::InvalidFormat { .. })
    }
}

/// Result type for document operations
pub type BrDocsResult<T> = Result<T, BrDocsError>;
