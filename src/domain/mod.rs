//! Domain layer for br-docs
//!
//! CDD Principle: Domain Model - Pure value types for Brazilian document numbers
//! - Digit strings, checksum descriptors and document types
//! - Reference tables for issuing states, license categories and dial codes
//! - Validation outcomes aggregated into batch reports

pub mod documents;
pub mod outcomes;
pub mod regions;

// Re-export main domain types for convenience
pub use documents::*;
pub use outcomes::*;
pub use regions::*;
