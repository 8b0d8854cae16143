//! Core library for First Notice of Loss (FNOL) claim intake.
//!
//! This crate provides:
//! - Document processing (PDF and plain-text extraction)
//! - Line indexing and rule-based field resolution
//! - Mandatory field validation
//! - Claim routing (fast track, manual review, specialist queue, investigation)
//! - Claim persistence (in-memory and JSON file stores)

pub mod error;
pub mod models;
pub mod document;
pub mod claim;
pub mod store;

pub use error::{FnolError, Result};
pub use models::claim::{
    ClaimAnalysis, ClaimField, ClaimRoute, ExtractedFields, RoutingDecision, StoredClaim,
};
pub use models::config::FnolConfig;
pub use document::{DocumentExtractor, Upload};
pub use claim::{ClaimAnalyzer, ClaimProcessor, FieldResolver, FieldRules, LineIndex, RoutingEngine};
pub use store::{open_store, ClaimStore, JsonFileStore, MemoryStore, NewClaim};
