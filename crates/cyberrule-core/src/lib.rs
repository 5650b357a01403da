//! CyberRule Core - Domain models, errors, and shared types
//!
//! This crate defines the core abstractions used throughout CyberRule:
//! - Rule categories (vulnerability type, product, component, privilege)
//! - Relation triples and per-description extraction results
//! - Common error types
//! - Configuration management

pub mod config;

pub use config::{AppConfig, BatchConfig, ConfigError, LoggingConfig, NamingConfig};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for CyberRule operations
#[derive(Error, Debug)]
pub enum CyberRuleError {
    #[error("Invalid pattern {name}: {message}")]
    InvalidPattern { name: String, message: String },

    #[error("Duplicate pattern {name} in category {category}")]
    DuplicatePattern { category: Category, name: String },

    #[error("Input error: {0}")]
    InputError(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CyberRuleError>;

// ============================================================================
// Categories
// ============================================================================

/// Closed set of rule categories.
///
/// Declaration order is also the category order used by ordered maps
/// (statistics output, category index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    VulnerabilityType,
    Product,
    Component,
    Privilege,
}

impl Category {
    /// All categories in declaration order
    pub const ALL: [Category; 4] = [
        Category::VulnerabilityType,
        Category::Product,
        Category::Component,
        Category::Privilege,
    ];

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VulnerabilityType => "VulnerabilityType",
            Self::Product => "Product",
            Self::Component => "Component",
            Self::Privilege => "Privilege",
        }
    }

    /// Predicate used when a pattern does not name one: `has<Category>`
    pub fn default_predicate(&self) -> String {
        format!("has{}", self.as_str())
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Triples
// ============================================================================

/// A relation fact (Subject, Predicate, Object) between canonical identifiers.
///
/// Equality and hashing only look at the subject, predicate and object.
/// Confidence and provenance are in-memory metadata and are never
/// serialized, so the wire shape stays `{subject, predicate, object}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,

    /// Confidence score (0.0 - 1.0)
    #[serde(skip)]
    pub confidence: Option<f64>,

    /// Rule provenance, e.g. `SQLInjection->AdminPanel`
    #[serde(skip)]
    pub provenance: Option<String>,
}

impl Triple {
    /// Create a new triple without metadata
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            confidence: None,
            provenance: None,
        }
    }

    /// Set confidence score
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Set provenance tag
    pub fn with_provenance(mut self, provenance: impl Into<String>) -> Self {
        self.provenance = Some(provenance.into());
        self
    }

    /// Check whether this triple states `subject predicate object`
    pub fn is(&self, subject: &str, predicate: &str, object: &str) -> bool {
        self.subject == subject && self.predicate == predicate && self.object == object
    }
}

impl PartialEq for Triple {
    fn eq(&self, other: &Self) -> bool {
        self.subject == other.subject
            && self.predicate == other.predicate
            && self.object == other.object
    }
}

impl Eq for Triple {}

impl Hash for Triple {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.subject.hash(state);
        self.predicate.hash(state);
        self.object.hash(state);
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {} → {}", self.subject, self.predicate, self.object)
    }
}

// ============================================================================
// Extraction Result
// ============================================================================

/// Separator used in subsumption axioms (`Sub ⊑ Super`)
pub const SUBSUMPTION: &str = "⊑";

/// Format a subsumption axiom string
pub fn subsumption(sub: &str, sup: &str) -> String {
    format!("{sub} {SUBSUMPTION} {sup}")
}

/// Semantic facts extracted from one description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Canonical identifiers, sorted ascending, unique
    pub classes: Vec<String>,

    /// Relations in synthesis order
    pub relations: Vec<Triple>,

    /// Subsumption statements (`Sub ⊑ Super`)
    pub axioms: Vec<String>,
}

impl ExtractionResult {
    /// Build a result from a class set; the set fixes ordering and uniqueness
    pub fn new(classes: BTreeSet<String>, relations: Vec<Triple>, axioms: Vec<String>) -> Self {
        Self {
            classes: classes.into_iter().collect(),
            relations,
            axioms,
        }
    }

    /// Result with no classes, relations or axioms
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.relations.is_empty() && self.axioms.is_empty()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.binary_search_by(|c| c.as_str().cmp(class)).is_ok()
    }

    pub fn has_relation(&self, subject: &str, predicate: &str, object: &str) -> bool {
        self.relations
            .iter()
            .any(|t| t.is(subject, predicate, object))
    }

    pub fn has_axiom(&self, axiom: &str) -> bool {
        self.axioms.iter().any(|a| a == axiom)
    }
}

// ============================================================================
// Tests
// ============================================================================
