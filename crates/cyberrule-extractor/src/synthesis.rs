//! Relation and axiom synthesis
//!
//! Relations are a full cross-product between the vulnerability types of a
//! description and its components, privileges and products. Axioms come
//! from a fixed subsumption table plus contextual triggers that run once
//! all classes are known.

use std::collections::BTreeSet;

use cyberrule_core::{subsumption, Category, Triple};

use crate::NormalizedEntity;

pub const AFFECTS: &str = "affects";
pub const REQUIRES: &str = "requires";
pub const IN_PRODUCT: &str = "inProduct";
pub const LEADS_TO: &str = "leadsTo";

/// Cross-site scripting classes, by either naming convention
pub const XSS_CLASSES: &[&str] = &["CrossSiteScripting", "Xss"];
pub const JAVASCRIPT_INJECTION: &str = "JavaScriptInjection";

/// `Sub ⊑ Super`, emitted when the class set holds any trigger class
#[derive(Debug, Clone, Copy)]
pub struct SubsumptionRule {
    pub triggers: &'static [&'static str],
    pub sub: &'static str,
    pub sup: &'static str,
}

pub const SUBSUMPTION_RULES: [SubsumptionRule; 3] = [
    SubsumptionRule {
        triggers: XSS_CLASSES,
        sub: "CrossSiteScripting",
        sup: "ClientSideAttack",
    },
    SubsumptionRule {
        triggers: &["SqlInjection", "SQLInjection"],
        sub: "SQLInjection",
        sup: "DatabaseAttack",
    },
    SubsumptionRule {
        triggers: &["BufferOverflow"],
        sub: "BufferOverflow",
        sup: "MemoryCorruption",
    },
];

/// A product entity with the version found right after its match
#[derive(Debug, Clone, PartialEq)]
pub struct ProductEntity {
    pub entity: NormalizedEntity,
    pub version: Option<String>,
}

impl ProductEntity {
    /// `<Product>_v<version>` when a version was detected
    pub fn versioned_id(&self) -> Option<String> {
        self.version
            .as_ref()
            .map(|v| format!("{}_v{}", self.entity.canonical_id, v))
    }

    /// Identifier used as the `inProduct` object
    pub fn qualified_id(&self) -> String {
        self.versioned_id()
            .unwrap_or_else(|| self.entity.canonical_id.clone())
    }
}

/// Entities of one description, per category, in discovery order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorizedEntities {
    pub vulnerabilities: Vec<NormalizedEntity>,
    pub products: Vec<ProductEntity>,
    pub components: Vec<NormalizedEntity>,
    pub privileges: Vec<NormalizedEntity>,
}

impl CategorizedEntities {
    /// File an entity under its category; `version` only applies to products
    pub fn push(&mut self, entity: NormalizedEntity, version: Option<String>) {
        match entity.category {
            Category::VulnerabilityType => self.vulnerabilities.push(entity),
            Category::Product => self.products.push(ProductEntity { entity, version }),
            Category::Component => self.components.push(entity),
            Category::Privilege => self.privileges.push(entity),
        }
    }

    pub fn len(&self) -> usize {
        self.vulnerabilities.len()
            + self.products.len()
            + self.components.len()
            + self.privileges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every canonical identifier plus versioned product identifiers
    pub fn class_set(&self) -> BTreeSet<String> {
        let mut classes = BTreeSet::new();
        for entity in self
            .vulnerabilities
            .iter()
            .chain(self.components.iter())
            .chain(self.privileges.iter())
        {
            classes.insert(entity.canonical_id.clone());
        }
        for product in &self.products {
            classes.insert(product.entity.canonical_id.clone());
            if let Some(versioned) = product.versioned_id() {
                classes.insert(versioned);
            }
        }
        classes
    }
}

fn relation(
    subject: &NormalizedEntity,
    predicate: &str,
    object: &NormalizedEntity,
    object_id: String,
) -> Triple {
    Triple::new(subject.canonical_id.clone(), predicate, object_id)
        .with_confidence(subject.confidence().min(object.confidence()))
        .with_provenance(format!("{}->{}", subject.pattern, object.pattern))
}

/// Cross every vulnerability type with every component, privilege and
/// product: components first, then privileges, then products
pub fn synthesize_relations(entities: &CategorizedEntities) -> Vec<Triple> {
    let mut relations = Vec::new();

    for vuln in &entities.vulnerabilities {
        for component in &entities.components {
            relations.push(relation(vuln, AFFECTS, component, component.canonical_id.clone()));
        }
        for privilege in &entities.privileges {
            relations.push(relation(vuln, REQUIRES, privilege, privilege.canonical_id.clone()));
        }
        for product in &entities.products {
            relations.push(relation(vuln, IN_PRODUCT, &product.entity, product.qualified_id()));
        }
    }

    relations
}

fn contains_any(classes: &BTreeSet<String>, names: &[&str]) -> bool {
    names.iter().any(|name| classes.contains(*name))
}

/// Emit subsumption axioms and run contextual triggers.
///
/// Triggers may add classes and relations; they never feed back into
/// matching.
pub fn synthesize_axioms(
    description: &str,
    classes: &mut BTreeSet<String>,
    relations: &mut Vec<Triple>,
) -> Vec<String> {
    let mut axioms = Vec::new();
    for rule in &SUBSUMPTION_RULES {
        if contains_any(classes, rule.triggers) {
            axioms.push(subsumption(rule.sub, rule.sup));
        }
    }

    if description.to_lowercase().contains("javascript") && contains_any(classes, XSS_CLASSES) {
        classes.insert(JAVASCRIPT_INJECTION.to_string());
        relations.push(
            Triple::new(JAVASCRIPT_INJECTION, LEADS_TO, "CrossSiteScripting")
                .with_provenance("context:javascript"),
        );
    }

    axioms
}
