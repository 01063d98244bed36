// WHY: Entity extraction composes fixed shape recognizers with a
// caller-programmable keyword automaton; families stay independent and
// overlapping spans across families are reported as-is

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matcher::AhoCorasickAutomaton;

mod recognizers;

use recognizers::{
    compile_set, ShapeRecognizer, AMOUNT_CONFIDENCE, AMOUNT_PATTERNS, DATE_CONFIDENCE,
    DATE_PATTERNS, EMAIL_CONFIDENCE, EMAIL_PATTERN,
};

/// Closed set of entity classifications, mapped 1:1 across the call
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Date,
    Person,
    Organization,
    Amount,
    Email,
    Unknown,
}

/// A typed entity extracted from text.
///
/// `value` is the materialized slice `text[start..end]` at extraction time.
/// Entities from different recognizer families may overlap in span; the
/// extractor performs no cross-family dedup or merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub value: String,
    pub entity_type: EntityType,
    pub start: usize,
    pub end: usize,
    pub confidence: f32,
    pub metadata: HashMap<String, String>,
}

/// Composes the fixed date/amount/email shape recognizers with an
/// internally owned keyword automaton.
///
/// The email recognizer is always active; date and amount recognizers are
/// installed by their `add_*_patterns` calls. Keywords registered through
/// [`EntityExtractor::add_keywords`] get monotonically assigned pattern ids
/// that are never reused; the id-to-type table maps automaton matches back
/// to their registered entity type.
pub struct EntityExtractor {
    date_recognizers: Vec<ShapeRecognizer>,
    amount_recognizers: Vec<ShapeRecognizer>,
    email_recognizer: Option<ShapeRecognizer>,
    keyword_automaton: AhoCorasickAutomaton,
    keyword_types: HashMap<usize, EntityType>,
    next_keyword_id: usize,
}

impl EntityExtractor {
    pub fn new() -> Self {
        // A compile failure here degrades to zero email matches, the same
        // contract every shape recognizer has.
        let email_recognizer =
            ShapeRecognizer::compile(EMAIL_PATTERN, EntityType::Email, EMAIL_CONFIDENCE, false)
                .map_err(|err| {
                    tracing::warn!(error = %err, "email recognizer failed to compile");
                    err
                })
                .ok();

        Self {
            date_recognizers: Vec::new(),
            amount_recognizers: Vec::new(),
            email_recognizer,
            keyword_automaton: AhoCorasickAutomaton::new(),
            keyword_types: HashMap::new(),
            next_keyword_id: 0,
        }
    }

    /// Install the fixed date shape recognizers, replacing any previous
    /// set. Patterns the facility rejects are skipped.
    pub fn add_date_patterns(&mut self) {
        self.date_recognizers =
            compile_set(DATE_PATTERNS, EntityType::Date, DATE_CONFIDENCE, true);
    }

    /// Install the fixed amount shape recognizers, replacing any previous
    /// set.
    pub fn add_amount_patterns(&mut self) {
        self.amount_recognizers =
            compile_set(AMOUNT_PATTERNS, EntityType::Amount, AMOUNT_CONFIDENCE, true);
    }

    /// Register keywords to be reported as `entity_type`. Ids are assigned
    /// monotonically and never reused, so repeated registrations of the
    /// same keyword under different types each produce their own matches.
    pub fn add_keywords(&mut self, entity_type: EntityType, keywords: &[&str]) {
        for keyword in keywords {
            self.keyword_automaton.add_pattern(keyword, self.next_keyword_id);
            self.keyword_types.insert(self.next_keyword_id, entity_type);
            self.next_keyword_id += 1;
        }
    }

    /// Run every recognizer family over `text` and return the combined
    /// results sorted by start offset ascending.
    pub fn extract(&mut self, text: &str) -> Vec<Entity> {
        let mut entities = self.extract_dates(text);
        entities.extend(self.extract_amounts(text));
        entities.extend(self.extract_emails(text));

        if !self.keyword_types.is_empty() {
            self.keyword_automaton.build();
            for m in self.keyword_automaton.search(text) {
                if let Some(&entity_type) = self.keyword_types.get(&m.pattern_id) {
                    entities.push(Entity {
                        value: text[m.start..m.end].to_string(),
                        entity_type,
                        start: m.start,
                        end: m.end,
                        confidence: m.confidence,
                        metadata: HashMap::new(),
                    });
                }
            }
        }

        entities.sort_by_key(|e| e.start);

        debug!(
            text_len = text.len(),
            entities = entities.len(),
            "extraction complete"
        );

        entities
    }

    /// Short-circuit to a single recognizer family for Date, Amount, and
    /// Email. Keyword-tagged types have no dedicated fast path: any other
    /// type runs the full extraction and filters.
    pub fn extract_type(&mut self, text: &str, entity_type: EntityType) -> Vec<Entity> {
        match entity_type {
            EntityType::Date => self.extract_dates(text),
            EntityType::Amount => self.extract_amounts(text),
            EntityType::Email => self.extract_emails(text),
            _ => self
                .extract(text)
                .into_iter()
                .filter(|e| e.entity_type == entity_type)
                .collect(),
        }
    }

    pub fn keyword_count(&self) -> usize {
        self.keyword_types.len()
    }

    fn extract_dates(&self, text: &str) -> Vec<Entity> {
        self.date_recognizers
            .iter()
            .flat_map(|r| r.recognize(text))
            .collect()
    }

    fn extract_amounts(&self, text: &str) -> Vec<Entity> {
        self.amount_recognizers
            .iter()
            .flat_map(|r| r.recognize(text))
            .collect()
    }

    fn extract_emails(&self, text: &str) -> Vec<Entity> {
        self.email_recognizer
            .iter()
            .flat_map(|r| r.recognize(text))
            .collect()
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}
