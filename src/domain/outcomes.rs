//! Validation outcomes and the batch report aggregate
//!
//! Architecture: Rich Domain Models - each candidate carries its own verdict
//! - ValidationReport is the aggregate root that keeps counts in step with entries
//! - Malformed input is recorded as an outcome in batch mode instead of aborting the run

use crate::domain::documents::DocumentType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Verdict for one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStatus {
    /// Well-formed and the check digits match
    Valid,
    /// Well-formed but the check digits do not match, or all digits are identical
    Invalid,
    /// Wrong length or non-digit characters
    Malformed,
}

impl CandidateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Malformed => "malformed",
        }
    }

    /// Whether this outcome should fail a batch run
    pub fn is_failure(self) -> bool {
        !matches!(self, Self::Valid)
    }
}

/// Result of validating one candidate string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// 1-based position in the input batch
    pub index: usize,
    /// Candidate exactly as supplied
    pub candidate: String,
    pub status: CandidateStatus,
    /// Reason for a malformed verdict
    pub detail: Option<String>,
}

impl ValidationOutcome {
    pub fn new(index: usize, candidate: impl Into<String>, status: CandidateStatus) -> Self {
        Self { index, candidate: candidate.into(), status, detail: None }
    }

    /// Attach a reason
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Format outcome for display
    pub fn format_display(&self) -> String {
        match &self.detail {
            Some(detail) => format!(
                "#{} {} [{}] {}",
                self.index,
                self.candidate,
                self.status.as_str(),
                detail
            ),
            None => format!("#{} {} [{}]", self.index, self.candidate, self.status.as_str()),
        }
    }
}

/// Count of outcomes by status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub valid: usize,
    pub invalid: usize,
    pub malformed: usize,
}

impl OutcomeCounts {
    pub fn total(&self) -> usize {
        self.valid + self.invalid + self.malformed
    }

    pub fn failures(&self) -> usize {
        self.invalid + self.malformed
    }

    pub fn add(&mut self, status: CandidateStatus) {
        match status {
            CandidateStatus::Valid => self.valid += 1,
            CandidateStatus::Invalid => self.invalid += 1,
            CandidateStatus::Malformed => self.malformed += 1,
        }
    }
}

/// Summary statistics for a validation report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub counts: OutcomeCounts,
    /// Total execution time in milliseconds
    pub execution_time_ms: u64,
    pub validated_at: DateTime<Utc>,
}

/// All outcomes for one batch of candidates of a single document type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub document_type: DocumentType,
    pub outcomes: Vec<ValidationOutcome>,
    pub summary: ValidationSummary,
}

impl ValidationReport {
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            document_type,
            outcomes: Vec::new(),
            summary: ValidationSummary { validated_at: Utc::now(), ..Default::default() },
        }
    }

    /// Add an outcome, keeping counts in step
    pub fn add_outcome(&mut self, outcome: ValidationOutcome) {
        self.summary.counts.add(outcome.status);
        self.outcomes.push(outcome);
    }

    /// Whether any candidate was invalid or malformed
    pub fn has_failures(&self) -> bool {
        self.summary.counts.failures() > 0
    }

    /// Outcomes with a given status
    pub fn outcomes_with_status(
        &self,
        status: CandidateStatus,
    ) -> impl Iterator<Item = &ValidationOutcome> {
        self.outcomes.iter().filter(move |o| o.status == status)
    }

    pub fn set_execution_time(&mut self, duration_ms: u64) {
        self.summary.execution_time_ms = duration_ms;
    }

    /// Restore input order after parallel evaluation
    pub fn sort_outcomes(&mut self) {
        self.outcomes.sort_by_key(|o| o.index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut report = ValidationReport::new(DocumentType::Cpf);
        report.add_outcome(ValidationOutcome::new(1, "12345678909", CandidateStatus::Valid));
        report.add_outcome(ValidationOutcome::new(2, "12345678900", CandidateStatus::Invalid));
        report.add_outcome(
            ValidationOutcome::new(3, "123", CandidateStatus::Malformed)
                .with_detail("expected 11 digits, got 3"),
        );

        assert!(report.has_failures());
        assert_eq!(report.summary.counts.total(), 3);
        assert_eq!(report.summary.counts.failures(), 2);
        assert_eq!(report.outcomes_with_status(CandidateStatus::Valid).count(), 1);
    }

    #[test]
    fn test_all_valid_has_no_failures() {
        let mut report = ValidationReport::new(DocumentType::Cnh);
        report.add_outcome(ValidationOutcome::new(1, "12345678901", CandidateStatus::Valid));
        assert!(!report.has_failures());
    }

    #[test]
    fn test_sort_restores_input_order() {
        let mut report = ValidationReport::new(DocumentType::Cpf);
        report.add_outcome(ValidationOutcome::new(3, "c", CandidateStatus::Malformed));
        report.add_outcome(ValidationOutcome::new(1, "a", CandidateStatus::Malformed));
        report.add_outcome(ValidationOutcome::new(2, "b", CandidateStatus::Malformed));
        report.sort_outcomes();

        let order: Vec<_> = report.outcomes.iter().map(|o| o.index).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_outcome_display() {
        let outcome = ValidationOutcome::new(2, "abc", CandidateStatus::Malformed)
            .with_detail("non-digit character 'a' at position 1");
        assert_eq!(
            outcome.format_display(),
            "#2 abc [malformed] non-digit character 'a' at position 1"
        );
        assert!(CandidateStatus::Invalid.is_failure());
        assert!(!CandidateStatus::Valid.is_failure());
    }
}
