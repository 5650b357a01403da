//! Compiled extraction rules

use regex::{Regex, RegexBuilder};

use cyberrule_core::{Category, CyberRuleError, Result};

/// Source tag used when a pattern does not name one
pub const DEFAULT_SOURCE: &str = "Custom";

/// A compiled, case-insensitive text rule with its metadata.
///
/// The name doubles as the rule's canonical label (e.g. `SQLInjection`);
/// the normalizer turns it into the identifier emitted for every match.
#[derive(Debug, Clone)]
pub struct Pattern {
    name: String,
    matcher: Regex,
    category: Category,
    predicate: String,
    priority: i32,
    source: String,
}

impl Pattern {
    /// Compile a new pattern; fails if the rule does not compile
    pub fn new(name: impl Into<String>, regex: &str, category: Category) -> Result<Self> {
        let name = name.into();
        let matcher = RegexBuilder::new(regex)
            .case_insensitive(true)
            .build()
            .map_err(|e| CyberRuleError::InvalidPattern {
                name: name.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            name,
            matcher,
            category,
            predicate: category.default_predicate(),
            priority: 0,
            source: DEFAULT_SOURCE.to_string(),
        })
    }

    /// Set the relation label
    pub fn with_predicate(mut self, predicate: impl Into<String>) -> Self {
        self.predicate = predicate.into();
        self
    }

    /// Set priority (higher wins overlaps)
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set provenance tag
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}
