//! Pattern registry
//!
//! An immutable, priority-ordered collection of patterns. It is built once
//! and shared read-only by every extraction.

use std::collections::{BTreeMap, HashSet};

use cyberrule_core::{Category, CyberRuleError, Result};

use crate::pattern::Pattern;
use crate::rules;

/// Patterns sorted by descending priority, ties kept in registration order
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    patterns: Vec<Pattern>,
    /// Category -> indices into `patterns`, in processing order
    category_index: BTreeMap<Category, Vec<usize>>,
}

impl PatternRegistry {
    /// Build a registry from patterns in registration order.
    ///
    /// Fails without building anything if a name repeats within a category.
    pub fn new(mut patterns: Vec<Pattern>) -> Result<Self> {
        let mut seen = HashSet::new();
        for pattern in &patterns {
            if !seen.insert((pattern.category(), pattern.name().to_string())) {
                return Err(CyberRuleError::DuplicatePattern {
                    category: pattern.category(),
                    name: pattern.name().to_string(),
                });
            }
        }

        // sort_by is stable: equal priorities keep registration order
        patterns.sort_by(|a, b| b.priority().cmp(&a.priority()));

        let mut category_index: BTreeMap<Category, Vec<usize>> = BTreeMap::new();
        for (idx, pattern) in patterns.iter().enumerate() {
            category_index
                .entry(pattern.category())
                .or_default()
                .push(idx);
        }

        Ok(Self {
            patterns,
            category_index,
        })
    }

    /// Registry over the built-in rule tables
    pub fn builtin() -> Result<Self> {
        Self::new(rules::builtin_patterns()?)
    }

    /// All patterns in processing order
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Patterns of one category in processing order
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Pattern> + '_ {
        self.category_index
            .get(&category)
            .into_iter()
            .flatten()
            .map(|&idx| &self.patterns[idx])
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Pattern counts per category; categories without patterns are omitted
    pub fn count_by_category(&self) -> BTreeMap<Category, usize> {
        self.category_index
            .iter()
            .map(|(category, indices)| (*category, indices.len()))
            .collect()
    }

    /// Pattern counts per provenance source
    pub fn count_by_source(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for pattern in &self.patterns {
            *counts.entry(pattern.source().to_string()).or_insert(0) += 1;
        }
        counts
    }
}
