//! Extraction engine
//!
//! Runs the full pipeline for one description:
//! match -> resolve overlaps -> normalize -> synthesize relations -> axioms.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use cyberrule_core::{
    AppConfig, Category, CyberRuleError, ExtractionResult, NamingConfig, Result,
};

use crate::matcher::{first_chars, resolve_matches};
use crate::normalize::Normalizer;
use crate::registry::PatternRegistry;
use crate::synthesis::{synthesize_axioms, synthesize_relations, CategorizedEntities};
use crate::{Extractor, NormalizedEntity};

/// Characters after a product match searched for a version
const VERSION_WINDOW: usize = 30;
const VERSION_PATTERN: &str = r"[0-9]+\.[0-9]+(?:\.[0-9]+)?";

/// Pattern counts for observability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorStatistics {
    pub total_patterns: usize,
    pub patterns_by_category: BTreeMap<Category, usize>,
    pub patterns_by_source: BTreeMap<String, usize>,
    pub naming_version: String,
}

/// Deterministic rule-based extractor.
///
/// Holds only read-only state, so one engine can serve any number of
/// threads at once.
#[derive(Debug, Clone)]
pub struct ExtractionEngine {
    registry: PatternRegistry,
    normalizer: Normalizer,
    version_matcher: Regex,
}

impl ExtractionEngine {
    /// Create an engine over a registry and naming table
    pub fn new(registry: PatternRegistry, naming: &NamingConfig) -> Result<Self> {
        let version_matcher =
            Regex::new(VERSION_PATTERN).map_err(|e| CyberRuleError::InvalidPattern {
                name: "ProductVersion".to_string(),
                message: e.to_string(),
            })?;
        let normalizer = Normalizer::new(naming);

        info!(
            patterns = registry.len(),
            naming = normalizer.version(),
            "Initialized extraction engine"
        );

        Ok(Self {
            registry,
            normalizer,
            version_matcher,
        })
    }

    /// Engine over the built-in rules and default naming table
    pub fn builtin() -> Result<Self> {
        Self::new(PatternRegistry::builtin()?, &NamingConfig::default())
    }

    /// Engine over the built-in rules with the configured naming table
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(PatternRegistry::builtin()?, &config.naming)
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Match, resolve and normalize: the entities of one description
    pub fn entities(&self, description: &str) -> CategorizedEntities {
        let mut entities = CategorizedEntities::default();

        for (pattern, span) in resolve_matches(&self.registry, description) {
            let canonical_id = self.normalizer.normalize(pattern.name(), pattern.category());
            if canonical_id.is_empty() {
                debug!(pattern = pattern.name(), "Pattern label normalizes to nothing");
                continue;
            }

            let version = match pattern.category() {
                Category::Product => self.detect_version(description, span.end),
                _ => None,
            };

            entities.push(
                NormalizedEntity {
                    category: pattern.category(),
                    canonical_id,
                    pattern: pattern.name().to_string(),
                    source_span: Some(span),
                },
                version,
            );
        }

        entities
    }

    /// Version number in the characters following a match ending at `end`
    fn detect_version(&self, description: &str, end: usize) -> Option<String> {
        let byte_end = description
            .char_indices()
            .nth(end)
            .map_or(description.len(), |(idx, _)| idx);
        let window = first_chars(&description[byte_end..], VERSION_WINDOW);

        self.version_matcher
            .find(window)
            .map(|m| m.as_str().to_string())
    }

    /// Extract classes, relations and axioms from one description.
    ///
    /// An empty description yields an empty result; an empty id is an
    /// input error.
    pub fn extract(&self, id: &str, description: &str) -> Result<ExtractionResult> {
        if id.trim().is_empty() {
            return Err(CyberRuleError::InputError(
                "extraction id must not be empty".to_string(),
            ));
        }

        let entities = self.entities(description);
        let mut classes = entities.class_set();
        let mut relations = synthesize_relations(&entities);
        let axioms = synthesize_axioms(description, &mut classes, &mut relations);

        debug!(
            id,
            entities = entities.len(),
            classes = classes.len(),
            relations = relations.len(),
            axioms = axioms.len(),
            "Extracted description"
        );

        Ok(ExtractionResult::new(classes, relations, axioms))
    }

    /// Pattern counts by category and source
    pub fn statistics(&self) -> ExtractorStatistics {
        ExtractorStatistics {
            total_patterns: self.registry.len(),
            patterns_by_category: self.registry.count_by_category(),
            patterns_by_source: self.registry.count_by_source(),
            naming_version: self.normalizer.version().to_string(),
        }
    }
}

impl Extractor for ExtractionEngine {
    fn extract(&self, id: &str, description: &str) -> Result<ExtractionResult> {
        ExtractionEngine::extract(self, id, description)
    }
}
