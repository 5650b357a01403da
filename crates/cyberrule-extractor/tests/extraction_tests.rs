//! End-to-end extraction and batch tests

use cyberrule_core::{BatchConfig, Category, CyberRuleError, NamingConfig};
use cyberrule_extractor::batch::{load_records, write_results};
use cyberrule_extractor::{BatchProcessor, CveRecord, ExtractionEngine, Pattern, PatternRegistry};
use serde_json::{json, Value};

fn engine() -> ExtractionEngine {
    ExtractionEngine::builtin().expect("builtin rules compile")
}

// =============================================================================
// Extraction Scenarios
// =============================================================================

#[test]
fn test_sql_injection_in_tomcat() {
    let result = engine()
        .extract(
            "CVE-2023-TEST-001",
            "SQL injection vulnerability in Apache Tomcat 8.5 allows remote attackers to \
             execute arbitrary code via the admin panel",
        )
        .unwrap();

    for class in ["SqlInjection", "Apache", "AdminPanel"] {
        assert!(result.has_class(class), "missing class {class}");
    }
    assert!(result.has_relation("SqlInjection", "affects", "AdminPanel"));
    assert!(result.has_axiom("SQLInjection ⊑ DatabaseAttack"));
}

#[test]
fn test_xss_with_javascript() {
    let result = engine()
        .extract(
            "CVE-2023-TEST-002",
            "XSS in the login page allows injection of arbitrary javascript",
        )
        .unwrap();

    assert_eq!(result.classes, vec!["CrossSiteScripting", "JavaScriptInjection"]);
    assert!(result.has_relation("JavaScriptInjection", "leadsTo", "CrossSiteScripting"));
    assert_eq!(result.axioms, vec!["CrossSiteScripting ⊑ ClientSideAttack"]);
}

#[test]
fn test_xss_in_versioned_product() {
    let result = engine()
        .extract(
            "CVE-2023-TEST-003",
            "Cross-site scripting in WordPress 5.8 login page via JavaScript payload",
        )
        .unwrap();

    assert_eq!(
        result.classes,
        vec![
            "CrossSiteScripting",
            "JavaScriptInjection",
            "WordPress",
            "WordPress_v5.8"
        ]
    );
    assert!(result.has_relation("CrossSiteScripting", "inProduct", "WordPress_v5.8"));
    assert_eq!(result.relations.len(), 2);
}

#[test]
fn test_no_recognizable_terms() {
    let result = engine().extract("CVE-0000-0000", "The quick brown fox").unwrap();

    assert!(result.classes.is_empty());
    assert!(result.relations.is_empty());
    assert!(result.axioms.is_empty());
}

#[test]
fn test_buffer_overflow_with_version() {
    let result = engine()
        .extract("CVE-2023-TEST-004", "Buffer overflow in Windows 10.1 kernel driver")
        .unwrap();

    assert_eq!(result.classes, vec!["BufferOverflow", "Windows", "Windows_v10.1"]);
    assert!(result.has_relation("BufferOverflow", "inProduct", "Windows_v10.1"));
    assert_eq!(result.axioms, vec!["BufferOverflow ⊑ MemoryCorruption"]);
}

#[test]
fn test_privilege_relations() {
    let result = engine()
        .extract(
            "CVE-2023-TEST-005",
            "Privilege escalation in the Linux kernel allows a local user to gain root",
        )
        .unwrap();

    assert!(result.has_class("PrivilegeEscalation"));
    assert!(result.has_relation("PrivilegeEscalation", "requires", "LocalUser"));
    assert!(result.has_relation("PrivilegeEscalation", "requires", "RootAccess"));
    assert!(result.has_relation("PrivilegeEscalation", "inProduct", "Linux_Kernel"));
    assert!(result.axioms.is_empty());
}

#[test]
fn test_acronym_vulnerability_type() {
    let result = engine()
        .extract("CVE-2023-TEST-006", "CSRF in the admin panel of Joomla")
        .unwrap();

    assert_eq!(result.classes, vec!["AdminPanel", "Csrf", "Joomla"]);
    assert!(result.has_relation("Csrf", "affects", "AdminPanel"));
    assert!(result.has_relation("Csrf", "inProduct", "Joomla"));
}

#[test]
fn test_overlapping_component_rules() {
    let component = |name: &str, regex: &str, priority: i32| {
        Pattern::new(name, regex, Category::Component)
            .unwrap()
            .with_priority(priority)
    };
    let vuln = Pattern::new("BufferOverflow", r"\bbuffer overflow\b", Category::VulnerabilityType)
        .unwrap()
        .with_priority(100);

    // higher priority wins regardless of registration order
    let registry = PatternRegistry::new(vec![
        vuln.clone(),
        component("Panel", r"\bpanel\b", 70),
        component("ControlPanel", r"\bcontrol panel\b", 100),
    ])
    .unwrap();
    let engine = ExtractionEngine::new(registry, &NamingConfig::default()).unwrap();
    let result = engine
        .extract("id", "Buffer overflow in the control panel")
        .unwrap();
    assert_eq!(result.classes, vec!["BufferOverflow", "ControlPanel"]);

    // equal priority: first registered wins
    let registry = PatternRegistry::new(vec![
        vuln,
        component("Panel", r"\bpanel\b", 80),
        component("ControlPanel", r"\bcontrol panel\b", 80),
    ])
    .unwrap();
    let engine = ExtractionEngine::new(registry, &NamingConfig::default()).unwrap();
    let result = engine
        .extract("id", "Buffer overflow in the control panel")
        .unwrap();
    assert_eq!(result.classes, vec!["BufferOverflow", "Panel"]);
    assert!(result.has_relation("BufferOverflow", "affects", "Panel"));
}

#[test]
fn test_result_wire_shape() {
    let result = engine()
        .extract("CVE-2023-TEST-004", "Buffer overflow in Windows 10.1 kernel driver")
        .unwrap();

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "classes": ["BufferOverflow", "Windows", "Windows_v10.1"],
            "relations": [{
                "subject": "BufferOverflow",
                "predicate": "inProduct",
                "object": "Windows_v10.1"
            }],
            "axioms": ["BufferOverflow ⊑ MemoryCorruption"]
        })
    );
}

#[test]
fn test_empty_id_is_input_error() {
    let err = engine().extract("", "SQL injection").unwrap_err();
    assert!(matches!(err, CyberRuleError::InputError(_)));
}

// =============================================================================
// Batch Tests
// =============================================================================

fn records() -> Vec<CveRecord> {
    serde_json::from_value(json!([
        { "id": "CVE-1", "description": "Buffer overflow in Windows 10.1 kernel driver" },
        { "id": "CVE-2", "prompt_input": "The quick brown fox" },
        { "id": "CVE-3", "description": null, "prompt_input": "CSRF in the admin panel of Joomla" },
        { "id": "CVE-4", "description": 7 },
        { "id": "", "description": "SQL injection" }
    ]))
    .unwrap()
}

#[test]
fn test_batch_matches_single_extraction() {
    let engine = engine();
    let records = records();
    let config = BatchConfig {
        max_records: 100,
        parallel: true,
        progress_interval: 1,
    };

    let output = BatchProcessor::new(&engine, config).run(&records);
    let ids: Vec<&str> = output.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["CVE-1", "CVE-2", "CVE-3", "CVE-4", ""]);

    let single = engine
        .extract("CVE-1", "Buffer overflow in Windows 10.1 kernel driver")
        .unwrap();
    assert_eq!(output.records[0].llm_output, single);
    assert_eq!(output.records[2].prompt_input, "CSRF in the admin panel of Joomla");
    assert!(output.records[2].llm_output.has_class("Csrf"));

    // non-string description and empty id fall back to empty results
    assert!(output.records[3].llm_output.is_empty());
    assert_eq!(output.records[3].prompt_input, "");
    assert!(output.records[4].llm_output.is_empty());

    assert_eq!(output.summary.total_records, 5);
    assert_eq!(output.summary.failed_records, 2);
    assert_eq!(output.summary.records_with_extractions, 2);
    assert_eq!(output.summary.total_axioms, 1);
}

#[test]
fn test_parallel_and_sequential_agree() {
    let engine = engine();
    let records = records();
    let parallel = BatchProcessor::new(&engine, BatchConfig::default()).run(&records);
    let sequential = BatchProcessor::new(
        &engine,
        BatchConfig {
            parallel: false,
            ..BatchConfig::default()
        },
    )
    .run(&records);

    assert_eq!(parallel.records, sequential.records);
    assert_eq!(parallel.summary, sequential.summary);
}

#[test]
fn test_results_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.json");
    let output = dir.path().join("nested/out/results.json");

    std::fs::write(&input, serde_json::to_string(&records()).unwrap()).unwrap();
    let loaded = load_records(&input).unwrap();
    assert_eq!(loaded.len(), 5);

    let engine = engine();
    let batch = BatchProcessor::new(&engine, BatchConfig::default()).run(&loaded);
    write_results(&output, &batch.records).unwrap();

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let first = &written[0];
    assert_eq!(first["id"], "CVE-1");
    assert_eq!(first["prompt_input"], "Buffer overflow in Windows 10.1 kernel driver");
    assert_eq!(
        first["llm_output"]["classes"],
        json!(["BufferOverflow", "Windows", "Windows_v10.1"])
    );
    assert_eq!(written.as_array().unwrap().len(), 5);
}

#[test]
fn test_load_records_rejects_malformed_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.json");
    std::fs::write(&input, "{ not json").unwrap();

    let err = load_records(&input).unwrap_err();
    assert!(matches!(err, CyberRuleError::Serialization(_)));
}
