//! High-throughput text analysis: literal scanning, multi-pattern automaton
//! search, typed-span tokenization, and typed entity extraction, exposed
//! through a C call boundary (`ffi`) for hosts in other languages.

pub mod byte_class;
pub mod error;
pub mod extractor;
pub mod ffi;
pub mod matcher;
pub mod parallel_extraction;
pub mod tokenizer;

// Re-export main types for convenient access
pub use byte_class::ByteClassifier;
pub use error::EngineError;
pub use extractor::{Entity, EntityExtractor, EntityType};
pub use matcher::{AhoCorasickAutomaton, LiteralScanner, Match, PatternConfig};
pub use parallel_extraction::extract_all_parallel;
pub use tokenizer::{Token, TokenType, Tokenizer};
