//! Sentence/cluster polarity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a sentence or cluster pertains to positive ("pros") or negative
/// ("cons") review content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Positive review content (pros list).
    Pos,
    /// Negative review content (cons list).
    Con,
}

impl Polarity {
    /// Both polarities, in pipeline processing order.
    pub const BOTH: [Polarity; 2] = [Polarity::Pos, Polarity::Con];

    /// Canonical lowercase name, matching the persisted document field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Pos => "pos",
            Polarity::Con => "con",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polarity_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Polarity::Pos).unwrap(), "\"pos\"");
        assert_eq!(serde_json::to_string(&Polarity::Con).unwrap(), "\"con\"");

        let back: Polarity = serde_json::from_str("\"con\"").unwrap();
        assert_eq!(back, Polarity::Con);
    }

    #[test]
    fn test_polarity_display() {
        assert_eq!(Polarity::Pos.to_string(), "pos");
        assert_eq!(Polarity::Con.to_string(), "con");
    }
}
