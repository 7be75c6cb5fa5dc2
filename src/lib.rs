//! br-docs - Brazilian document number generation and validation
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Pure checksum logic separated from configuration and presentation
//! - Random digit sources are injected, so callers control reproducibility
//! - UI layers call `generate` and `validate` and render the results themselves

pub mod checksum;
pub mod config;
pub mod domain;
pub mod format;
pub mod random;
pub mod report;
pub mod whatsapp;

// Re-export main types for convenient access
pub use domain::documents::{
    BrDocsError, BrDocsResult, DigitString, DocumentSpec, DocumentType, GeneratedDocument,
    WeightPass, CNH_SPEC, CPF_SPEC,
};
pub use domain::outcomes::{
    CandidateStatus, OutcomeCounts, ValidationOutcome, ValidationReport, ValidationSummary,
};
pub use domain::regions::{BrazilianState, Country, LicenseCategory, STATE_CODE_LEN};

pub use checksum::ChecksumEngine;
pub use config::{ConfigBuilder, DocumentSettings, ToolkitConfig};
pub use format::DocumentFormatter;
pub use random::{DigitSource, SeededSource, ThreadRngSource};
pub use report::{OutputFormat, ReportFormatter, ReportOptions};

use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;
use url::Url;

/// Upper bound on redraws when a draw completes to a repeated-digit number
const MAX_DRAWS: usize = 64;

/// Main entry point bundling configuration, a digit source and the checksum engine
pub struct DocumentToolkit {
    config: ToolkitConfig,
    source: Box<dyn DigitSource + Send + Sync>,
    engine: ChecksumEngine,
    formatter: DocumentFormatter,
}

/// Options for batch validation
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Whether to use parallel processing
    pub parallel: bool,
    /// Return the first malformed candidate as an error instead of recording it
    pub fail_fast: bool,
    /// Remove display separators before parsing
    pub strip_separators: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { parallel: true, fail_fast: false, strip_separators: false }
    }
}

/// A CNH accepted together with its issuing state suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCnh {
    pub number: DigitString,
    pub state: BrazilianState,
}

impl DocumentToolkit {
    /// Create a toolkit with the given configuration and a thread-local random source
    pub fn new_with_config(config: ToolkitConfig) -> BrDocsResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            source: Box::new(ThreadRngSource),
            engine: ChecksumEngine::new(),
            formatter: DocumentFormatter::new(),
        })
    }

    /// Create a toolkit with default configuration
    pub fn new() -> BrDocsResult<Self> {
        Self::new_with_config(ToolkitConfig::default())
    }

    /// Create a toolkit loading configuration from file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> BrDocsResult<Self> {
        Self::new_with_config(ToolkitConfig::load_from_file(path)?)
    }

    /// Replace the random digit source
    pub fn with_source<S: DigitSource + Send + Sync + 'static>(mut self, source: S) -> Self {
        self.source = Box::new(source);
        self
    }

    /// Use a reproducible source seeded from `seed`
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_source(SeededSource::new(seed))
    }

    /// Active configuration
    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    /// Generate one number with random free digits
    ///
    /// Draws that complete to a single repeated digit are discarded, so every
    /// generated number passes `validate`.
    pub fn generate(&mut self, doc: DocumentType) -> BrDocsResult<GeneratedDocument> {
        let spec = doc.spec();
        let raw = self.draw_valid(spec)?;
        let formatted = self.formatter.format(&raw, self.config.pattern_for(doc))?;

        tracing::debug!("Generated {} {}", doc, raw);
        Ok(GeneratedDocument { document_type: doc, raw, formatted })
    }

    fn draw_valid(&mut self, spec: &DocumentSpec) -> BrDocsResult<DigitString> {
        for _ in 0..MAX_DRAWS {
            let free = self.source.next_digits(spec.free_digit_count);
            let raw = self.engine.complete(&free, spec)?;
            if spec.reject_repeated_digits && raw.all_identical() {
                tracing::debug!("Discarding repeated-digit draw {}", raw);
                continue;
            }
            return Ok(raw);
        }
        Err(BrDocsError::invalid_format(format!(
            "digit source produced only repeated-digit numbers in {MAX_DRAWS} draws"
        )))
    }

    /// Generate `count` numbers
    pub fn generate_many(
        &mut self,
        doc: DocumentType,
        count: usize,
    ) -> BrDocsResult<Vec<GeneratedDocument>> {
        (0..count).map(|_| self.generate(doc)).collect()
    }

    /// Validate one candidate
    ///
    /// Wrong length and non-digit characters are errors, not `false`.
    pub fn validate(&self, doc: DocumentType, candidate: &str) -> BrDocsResult<bool> {
        self.engine.validate_str(candidate, doc.spec())
    }

    /// Format a raw digit string with the configured pattern
    pub fn format(&self, doc: DocumentType, raw: &str) -> BrDocsResult<String> {
        let digits = DigitString::parse(raw)?;
        let spec = doc.spec();
        if digits.len() != spec.total_len() {
            return Err(BrDocsError::invalid_format(format!(
                "{} needs {} digits, got {}",
                doc,
                spec.total_len(),
                digits.len()
            )));
        }
        self.formatter.format(&digits, self.config.pattern_for(doc))
    }

    /// Validate many candidates, recording malformed input as outcomes
    pub fn validate_batch<S: AsRef<str> + Sync>(
        &self,
        doc: DocumentType,
        candidates: &[S],
        options: &BatchOptions,
    ) -> BrDocsResult<ValidationReport> {
        let start_time = Instant::now();
        let mut report = ValidationReport::new(doc);

        let evaluate = |(position, candidate): (usize, &S)| {
            self.evaluate_candidate(doc, position + 1, candidate.as_ref(), options)
        };

        let outcomes: Vec<BrDocsResult<ValidationOutcome>> =
            if options.parallel && candidates.len() > 1 {
                candidates.par_iter().enumerate().map(evaluate).collect()
            } else {
                candidates.iter().enumerate().map(evaluate).collect()
            };

        for outcome in outcomes {
            report.add_outcome(outcome?);
        }

        report.sort_outcomes();
        report.set_execution_time(start_time.elapsed().as_millis() as u64);
        Ok(report)
    }

    fn evaluate_candidate(
        &self,
        doc: DocumentType,
        index: usize,
        candidate: &str,
        options: &BatchOptions,
    ) -> BrDocsResult<ValidationOutcome> {
        let cleaned = if options.strip_separators {
            DocumentFormatter::strip_separators(candidate)
        } else {
            candidate.to_string()
        };

        match self.validate(doc, &cleaned) {
            Ok(true) => Ok(ValidationOutcome::new(index, candidate, CandidateStatus::Valid)),
            Ok(false) => Ok(ValidationOutcome::new(index, candidate, CandidateStatus::Invalid)),
            Err(e) if options.fail_fast => Err(e),
            Err(BrDocsError::InvalidFormat { message }) => {
                tracing::warn!("Candidate #{} is malformed: {}", index, message);
                Ok(ValidationOutcome::new(index, candidate, CandidateStatus::Malformed)
                    .with_detail(message))
            }
            Err(e) => Err(e),
        }
    }

    /// Generate a CNH followed by the two-digit code of the issuing state
    ///
    /// Falls back to the configured default state when `state` is `None`.
    pub fn generate_cnh_for_state(
        &mut self,
        state: Option<BrazilianState>,
    ) -> BrDocsResult<GeneratedDocument> {
        let state = match state {
            Some(state) => state,
            None => self.config.default_state()?.ok_or_else(|| {
                BrDocsError::UnknownState { code: "<none>".to_string() }
            })?,
        };

        let base = self.generate(DocumentType::Cnh)?;
        let suffix = DigitString::parse(&state.code_str())?;
        let raw = base.raw.concat(&suffix);
        let formatted = self.formatter.format(&raw, &self.config.cnh_state_pattern)?;

        Ok(GeneratedDocument { document_type: DocumentType::Cnh, raw, formatted })
    }

    /// Validate a CNH followed by a state code, returning the state when valid
    pub fn validate_cnh_for_state(&self, candidate: &str) -> BrDocsResult<Option<IssuedCnh>> {
        let digits = DigitString::parse(candidate)?;
        let spec = DocumentType::Cnh.spec();
        let expected = spec.total_len() + STATE_CODE_LEN;
        if digits.len() != expected {
            return Err(BrDocsError::invalid_format(format!(
                "expected {} digits, got {}",
                expected,
                digits.len()
            )));
        }

        let (number, suffix) = digits.split_at(spec.total_len())?;
        let code = suffix.iter().fold(0u8, |acc, d| acc * 10 + d);
        let state = match BrazilianState::from_code(code) {
            Ok(state) => state,
            Err(_) => return Ok(None),
        };

        if self.engine.validate(&number, spec)? {
            Ok(Some(IssuedCnh { number, state }))
        } else {
            Ok(None)
        }
    }

    /// Build a wa.me link; uses the configured default country when `country` is `None`
    pub fn whatsapp_link(
        &self,
        country: Option<&str>,
        phone: &str,
        message: Option<&str>,
    ) -> BrDocsResult<Url> {
        let country = match country {
            Some(code) => Country::lookup(code)?,
            None => self.config.default_country()?,
        };
        whatsapp::build_link(country, phone, message)
    }
}

/// Generate one number with the default configuration and a thread-local random source
pub fn generate(doc: DocumentType) -> BrDocsResult<GeneratedDocument> {
    DocumentToolkit::new()?.generate(doc)
}

/// Validate one candidate with the default configuration
pub fn validate(doc: DocumentType, candidate: &str) -> BrDocsResult<bool> {
    ChecksumEngine::new().validate_str(candidate, doc.spec())
}
