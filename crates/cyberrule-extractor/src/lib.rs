//! CyberRule Extractor - Rule-based extraction engine
//!
//! Turns CVE descriptions into typed classes, relation triples and
//! subsumption axioms using a fixed, prioritized pattern registry.
//! Every extraction is a pure function of the registry and the input.

use serde::{Deserialize, Serialize};

use cyberrule_core::{Category, ExtractionResult, Result};

/// A match of one pattern in a description.
///
/// Offsets are character (not byte) offsets, half-open `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
    pub matched_text: String,
    pub confidence: f64,
}

impl MatchSpan {
    /// Check whether two spans share at least one character
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        !(self.end <= start || self.start >= end)
    }
}

/// A matched span mapped to its canonical identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEntity {
    pub category: Category,
    pub canonical_id: String,
    /// Name of the pattern that produced the entity
    pub pattern: String,
    pub source_span: Option<MatchSpan>,
}

impl NormalizedEntity {
    /// Confidence of the underlying match, 1.0 when there is none
    pub fn confidence(&self) -> f64 {
        self.source_span.as_ref().map_or(1.0, |s| s.confidence)
    }
}

/// Trait for description extractors
pub trait Extractor: Send + Sync {
    fn extract(&self, id: &str, description: &str) -> Result<ExtractionResult>;
}

pub mod batch;
pub mod engine;
pub mod matcher;
pub mod normalize;
pub mod pattern;
pub mod registry;
pub mod rules;
pub mod synthesis;

pub use batch::{BatchOutput, BatchProcessor, BatchSummary, CveRecord, EnrichedRecord};
pub use engine::{ExtractionEngine, ExtractorStatistics};
pub use normalize::Normalizer;
pub use pattern::Pattern;
pub use registry::PatternRegistry;
