// WHY: Shared matcher types live here so the literal scanner and the
// automaton report occurrences through one record shape

use serde::{Deserialize, Serialize};

pub mod aho_corasick;
pub mod literal;

// Re-export core types
pub use aho_corasick::AhoCorasickAutomaton;
pub use literal::LiteralScanner;

/// A single pattern occurrence in a scanned buffer.
///
/// `start` and `end` are byte offsets into the text passed to the scan call
/// and are only meaningful for that buffer. `pattern_id` is the id the
/// caller supplied at registration; duplicate ids are permitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    pub pattern_id: usize,
    pub confidence: f32,
}

/// Caller-supplied matching configuration.
///
/// Only `case_sensitive` participates in matching today; `whole_word` and
/// `base_confidence` are accepted and carried so existing callers keep
/// working when those gain behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternConfig {
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub base_confidence: f32,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            whole_word: false,
            base_confidence: 0.8,
        }
    }
}
