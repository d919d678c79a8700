//! Morphological tagger contract.

use crate::error::EngineResult;
use crate::types::WordToken;

/// Part-of-speech tagger collaborator.
///
/// Tagging a raw sentence string yields zero or more sentence segments, each
/// a list of tagged tokens. A compound input string produces more than one
/// segment; the extractor skips those (single-sentence assumption).
///
/// Implementations are expected to be heavyweight to construct (model load)
/// and immutable afterwards; build one at startup and share it.
pub trait Tagger: Send + Sync {
    /// Tag one raw sentence string.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TaggingFailure`](crate::error::EngineError) on
    /// a per-sentence tagging fault; callers treat this as non-fatal.
    fn pos_tag(&self, sentence: &str) -> EngineResult<Vec<Vec<WordToken>>>;
}
