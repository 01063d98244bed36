// WHY: Per-pattern first-byte candidate scanning beats automaton construction
// when the pattern set is small or changes often; there is no build step to
// amortize and registration stays O(pattern length)

use memchr::memchr_iter;
use tracing::debug;

use super::{Match, PatternConfig};

struct Pattern {
    text: Vec<u8>,
    folded: Vec<u8>,
    id: usize,
    confidence: f32,
}

/// Literal substring scanner with per-pattern confidence.
///
/// Matching is case-insensitive by default: each pattern is folded to ASCII
/// lowercase once at registration, and the haystack is folded once per
/// query. Candidate positions come from a vectorized scan for the pattern's
/// first byte (memchr picks the widest SIMD the host supports), then each
/// candidate is verified by exact byte comparison.
pub struct LiteralScanner {
    patterns: Vec<Pattern>,
    config: PatternConfig,
}

impl LiteralScanner {
    pub fn new() -> Self {
        Self::with_config(PatternConfig::default())
    }

    pub fn with_config(config: PatternConfig) -> Self {
        Self {
            patterns: Vec::new(),
            config,
        }
    }

    /// Register a literal pattern. Ids are caller-assigned and need not be
    /// unique. An empty pattern is accepted but never matches.
    pub fn add_pattern(&mut self, text: &str, id: usize, confidence: f32) {
        let bytes = text.as_bytes().to_vec();
        let folded = bytes.to_ascii_lowercase();
        self.patterns.push(Pattern {
            text: bytes,
            folded,
            id,
            confidence,
        });
    }

    /// Find every occurrence of every registered pattern, sorted by start
    /// offset ascending. Ties keep pattern registration order (stable sort).
    pub fn find_all(&self, text: &str) -> Vec<Match> {
        let mut matches = Vec::new();

        if self.patterns.is_empty() || text.is_empty() {
            return matches;
        }

        let folded_haystack;
        let haystack: &[u8] = if self.config.case_sensitive {
            text.as_bytes()
        } else {
            folded_haystack = text.as_bytes().to_ascii_lowercase();
            &folded_haystack
        };

        for pattern in &self.patterns {
            let needle: &[u8] = if self.config.case_sensitive {
                &pattern.text
            } else {
                &pattern.folded
            };

            if needle.is_empty() || needle.len() > haystack.len() {
                continue;
            }

            for pos in memchr_iter(needle[0], haystack) {
                if pos + needle.len() <= haystack.len()
                    && &haystack[pos..pos + needle.len()] == needle
                {
                    matches.push(Match {
                        start: pos,
                        end: pos + needle.len(),
                        pattern_id: pattern.id,
                        confidence: pattern.confidence,
                    });
                }
            }
        }

        matches.sort_by_key(|m| m.start);

        debug!(
            patterns = self.patterns.len(),
            text_len = text.len(),
            matches = matches.len(),
            "literal scan complete"
        );

        matches
    }

    pub fn count_matches(&self, text: &str) -> usize {
        self.find_all(text).len()
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

impl Default for LiteralScanner {
    fn default() -> Self {
        Self::new()
    }
}
