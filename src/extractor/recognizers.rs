// WHY: Shape recognizers are fixed, hard-coded textual forms; they compile
// once and a recognizer that fails to compile contributes zero matches
// instead of aborting extraction

use regex_automata::meta::Regex;
use regex_automata::util::syntax;
use tracing::warn;

use super::{Entity, EntityType};
use crate::error::EngineError;

pub(crate) const DATE_CONFIDENCE: f32 = 0.85;
pub(crate) const AMOUNT_CONFIDENCE: f32 = 0.9;
pub(crate) const EMAIL_CONFIDENCE: f32 = 0.95;

/// Numeric date forms in day-first or year-first order, plus month-name
/// dates with full and abbreviated names.
pub(crate) const DATE_PATTERNS: &[&str] = &[
    r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}",
    r"\d{4}[/-]\d{1,2}[/-]\d{1,2}",
    r"(January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},?\s+\d{4}",
    r"(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+\d{1,2},?\s+\d{4}",
];

/// Dollar amounts, currency-coded and currency-word amounts, and
/// magnitude-suffixed amounts like "3 million".
pub(crate) const AMOUNT_PATTERNS: &[&str] = &[
    r"\$[\d,]+(\.\d{2})?",
    r"[\d,]+\s*(USD|EUR|GBP|dollars?|euros?)",
    r"\d+\s*(million|billion|thousand|[MBK])\b",
];

pub(crate) const EMAIL_PATTERN: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";

/// One compiled shape pattern bound to the entity type and confidence it
/// reports.
pub(crate) struct ShapeRecognizer {
    regex: Regex,
    entity_type: EntityType,
    confidence: f32,
}

impl ShapeRecognizer {
    pub(crate) fn compile(
        pattern: &str,
        entity_type: EntityType,
        confidence: f32,
        case_insensitive: bool,
    ) -> Result<Self, EngineError> {
        let regex = Regex::builder()
            .syntax(syntax::Config::new().case_insensitive(case_insensitive))
            .build(pattern)?;
        Ok(Self {
            regex,
            entity_type,
            confidence,
        })
    }

    pub(crate) fn recognize(&self, text: &str) -> Vec<Entity> {
        self.regex
            .find_iter(text)
            .map(|m| Entity {
                value: text[m.range()].to_string(),
                entity_type: self.entity_type,
                start: m.start(),
                end: m.end(),
                confidence: self.confidence,
                metadata: Default::default(),
            })
            .collect()
    }
}

/// Compile a fixed pattern set, skipping any pattern the facility rejects.
pub(crate) fn compile_set(
    patterns: &[&str],
    entity_type: EntityType,
    confidence: f32,
    case_insensitive: bool,
) -> Vec<ShapeRecognizer> {
    patterns
        .iter()
        .filter_map(|pattern| {
            match ShapeRecognizer::compile(pattern, entity_type, confidence, case_insensitive) {
                Ok(recognizer) => Some(recognizer),
                Err(err) => {
                    warn!(pattern, error = %err, "skipping recognizer that failed to compile");
                    None
                }
            }
        })
        .collect()
}
