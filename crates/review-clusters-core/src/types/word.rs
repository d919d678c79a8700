//! Tagged word tokens produced by the morphological tagger.

use serde::{Deserialize, Serialize};

/// One token of a tagged sentence segment.
///
/// Produced by the [`Tagger`](crate::traits::Tagger) collaborator; the engine
/// only reads the lemma and the leading character of the part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordToken {
    /// Surface form as it appeared in the sentence.
    pub token: String,
    /// Dictionary base form.
    pub lemma: String,
    /// Part-of-speech tag; nouns start with `N`.
    pub tag: String,
}

impl WordToken {
    /// Create a new word token.
    pub fn new(
        token: impl Into<String>,
        lemma: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            lemma: lemma.into(),
            tag: tag.into(),
        }
    }

    /// Whether this token is a noun (tag starts with `N`).
    ///
    /// Salient-term selection only considers nouns.
    #[inline]
    pub fn is_noun(&self) -> bool {
        self.tag.starts_with('N')
    }
}
