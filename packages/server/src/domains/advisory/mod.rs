//! Advisory agreement intake: extraction, IGO/NIGO review and synthetic data.

pub mod actions;
pub mod analyzer;
pub mod cache;
pub mod error;
pub mod generator;
pub mod models;
pub mod overrides;
pub mod prompts;
pub mod scanner;
pub mod validity;

pub use analyzer::{AgreementAnalyzer, DocumentAnalyzer};
pub use cache::{ExtractionCache, MemoryExtractionCache};
pub use error::{AdvisoryError, AdvisoryResult};
pub use overrides::OverrideStore;
pub use scanner::{DocumentScanner, ScanOutcome};
pub use validity::{evaluate, is_valid, ComplianceStatus, ContractVersion, StatusReport};
