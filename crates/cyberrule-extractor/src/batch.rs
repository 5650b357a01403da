//! Batch driver
//!
//! Runs an extractor over a batch of CVE records and produces the
//! interchange format consumed by downstream tooling:
//!
//! ```json
//! [{ "id": "...", "prompt_input": "...",
//!    "llm_output": { "classes": [], "relations": [], "axioms": [] } }]
//! ```
//!
//! Records are independent, so extraction fans out over rayon workers;
//! output order always matches input order. A record that fails is logged
//! and replaced by an empty result instead of aborting the batch.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use cyberrule_core::{BatchConfig, CyberRuleError, ExtractionResult, Result};

use crate::Extractor;

// ============================================================================
// Records
// ============================================================================

/// One input record; the text is read from `description`, falling back to
/// `prompt_input`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CveRecord {
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_input: Option<Value>,
}

impl CveRecord {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: Some(Value::String(description.into())),
            prompt_input: None,
        }
    }

    /// The description text; missing, null or non-string is an input error
    pub fn description(&self) -> Result<&str> {
        let value = self
            .description
            .as_ref()
            .filter(|v| !v.is_null())
            .or_else(|| self.prompt_input.as_ref().filter(|v| !v.is_null()));

        match value {
            Some(Value::String(text)) => Ok(text),
            Some(other) => Err(CyberRuleError::InputError(format!(
                "record {:?}: description must be a string, got {}",
                self.id,
                json_kind(other)
            ))),
            None => Err(CyberRuleError::InputError(format!(
                "record {:?}: missing description",
                self.id
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One output record of the interchange format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub id: String,
    pub prompt_input: String,
    pub llm_output: ExtractionResult,
}

// ============================================================================
// Summary
// ============================================================================

/// Totals over one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_records: usize,
    /// Records with at least one class
    pub records_with_extractions: usize,
    /// Records replaced by an empty result
    pub failed_records: usize,
    pub total_classes: usize,
    pub total_relations: usize,
    pub total_axioms: usize,
}

impl BatchSummary {
    fn record(&mut self, output: &ExtractionResult, succeeded: bool) {
        self.total_records += 1;
        if !succeeded {
            self.failed_records += 1;
        }
        if !output.classes.is_empty() {
            self.records_with_extractions += 1;
        }
        self.total_classes += output.classes.len();
        self.total_relations += output.relations.len();
        self.total_axioms += output.axioms.len();
    }

    pub fn avg_classes_per_record(&self) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            self.total_classes as f64 / self.total_records as f64
        }
    }
}

/// Enriched records in input order plus their summary
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub records: Vec<EnrichedRecord>,
    pub summary: BatchSummary,
}

// ============================================================================
// Processor
// ============================================================================

/// Applies an extractor to batches of records
pub struct BatchProcessor<'a, E: Extractor + ?Sized> {
    extractor: &'a E,
    config: BatchConfig,
}

impl<'a, E: Extractor + ?Sized> BatchProcessor<'a, E> {
    pub fn new(extractor: &'a E, config: BatchConfig) -> Self {
        Self { extractor, config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Process up to `max_records` records
    pub fn run(&self, records: &[CveRecord]) -> BatchOutput {
        let records = &records[..records.len().min(self.config.max_records)];
        let total = records.len();
        let interval = self.config.progress_interval.max(1);
        let processed = AtomicUsize::new(0);

        let process = |record: &CveRecord| {
            let outcome = self.process_one(record);
            let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
            if done % interval == 0 || done == total {
                info!(processed = done, total, "Batch progress");
            }
            outcome
        };

        let outcomes: Vec<(EnrichedRecord, bool)> = if self.config.parallel {
            records.par_iter().map(&process).collect()
        } else {
            records.iter().map(&process).collect()
        };

        let mut summary = BatchSummary::default();
        let mut enriched = Vec::with_capacity(outcomes.len());
        for (record, succeeded) in outcomes {
            summary.record(&record.llm_output, succeeded);
            enriched.push(record);
        }

        info!(
            total = summary.total_records,
            with_extractions = summary.records_with_extractions,
            failed = summary.failed_records,
            classes = summary.total_classes,
            relations = summary.total_relations,
            "Batch complete"
        );

        BatchOutput {
            records: enriched,
            summary,
        }
    }

    /// Extract one record, substituting an empty result on failure
    fn process_one(&self, record: &CveRecord) -> (EnrichedRecord, bool) {
        let extracted = record
            .description()
            .and_then(|text| self.extractor.extract(&record.id, text));
        let prompt_input = record.description().unwrap_or_default().to_string();

        match extracted {
            Ok(llm_output) => (
                EnrichedRecord {
                    id: record.id.clone(),
                    prompt_input,
                    llm_output,
                },
                true,
            ),
            Err(e) => {
                warn!(id = %record.id, error = %e, "Extraction failed, using empty result");
                (
                    EnrichedRecord {
                        id: record.id.clone(),
                        prompt_input,
                        llm_output: ExtractionResult::empty(),
                    },
                    false,
                )
            }
        }
    }
}

// ============================================================================
// Files
// ============================================================================

/// Read a JSON array of records
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<CveRecord>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| CyberRuleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Write enriched records as pretty JSON, creating parent directories
pub fn write_results(path: impl AsRef<Path>, records: &[EnrichedRecord]) -> Result<()> {
    let path = path.as_ref();
    let io_error = |source| CyberRuleError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).map_err(io_error)
}
