//! Whitespace tokenizing tagger stub.

use crate::error::EngineResult;
use crate::traits::Tagger;
use crate::types::WordToken;

/// Tagger that segments on sentence-final punctuation and tokenizes on
/// whitespace.
///
/// Lemmas are lowercased tokens with surrounding punctuation stripped; every
/// token is tagged `NN` so downstream noun selection sees all of them. Good
/// enough for pipeline tests, useless for linguistics.
///
/// # Example
///
/// ```
/// use review_clusters_core::stubs::WhitespaceTagger;
/// use review_clusters_core::traits::Tagger;
///
/// let segments = WhitespaceTagger.pos_tag("Battery lasts long.").unwrap();
/// assert_eq!(segments.len(), 1);
/// assert_eq!(segments[0][0].lemma, "battery");
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceTagger;

impl WhitespaceTagger {
    pub fn new() -> Self {
        Self
    }
}

impl Tagger for WhitespaceTagger {
    fn pos_tag(&self, sentence: &str) -> EngineResult<Vec<Vec<WordToken>>> {
        let segments = sentence
            .split(['.', '!', '?'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|segment| {
                segment
                    .split_whitespace()
                    .map(|token| WordToken::new(token, lemma_of(token), "NN"))
                    .collect()
            })
            .collect();

        Ok(segments)
    }
}

fn lemma_of(token: &str) -> String {
    token
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}
