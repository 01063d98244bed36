// WHY: Single error type so the call boundary can map every internal failure
// to a stable status code without downcasting

use thiserror::Error;

/// Failures the engine can surface to callers.
///
/// Recognizer compilation failures are swallowed inside the extractor (a
/// recognizer that does not compile contributes zero matches); the variant
/// exists so that path is explicit and testable rather than a catch-all.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A shape-recognizer pattern was rejected by the pattern facility.
    #[error("recognizer pattern failed to compile: {0}")]
    Recognizer(#[from] regex_automata::meta::BuildError),

    /// Text handed across the call boundary was not valid UTF-8.
    #[error("input text is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}
