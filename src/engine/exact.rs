use std::fmt::{Display, Error, Formatter};

use crate::engine::util::tokenize;
use crate::{CaseMatching, MatchTier};

//------------------------------------------------------------------------------
// Exact engine
/// Conjunctive substring engine.
///
/// Every token of the query must occur in the text. The first token alone decides the
/// tier: the whole text, a prefix of it, or anywhere else.
#[derive(Debug, Clone)]
pub struct ExactEngine {
    tokens: Vec<String>,
    case: CaseMatching,
}

impl ExactEngine {
    /// Builds an engine for `query` under the given case mode
    pub fn builder(query: &str, case: CaseMatching) -> Self {
        ExactEngine {
            tokens: tokenize(query, case),
            case,
        }
    }

    /// Finalizes the builder
    pub fn build(self) -> Self {
        self
    }

    /// Number of query tokens
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Matches one text, returning its tier if every token occurs in it
    pub fn match_text(&self, text: &str) -> Option<MatchTier> {
        let text = self.case.fold(text);

        if !self.tokens.iter().all(|token| text.contains(token.as_str())) {
            return None;
        }

        let Some(first) = self.tokens.first() else {
            return Some(MatchTier::Exact);
        };

        if *text == **first {
            Some(MatchTier::Exact)
        } else if text.starts_with(first.as_str()) {
            Some(MatchTier::Prefix)
        } else {
            Some(MatchTier::Substring)
        }
    }
}

impl Display for ExactEngine {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(
            f,
            "(Exact|{}{})",
            if self.case == CaseMatching::Ignore { "(?i)" } else { "" },
            self.tokens.join(" & ")
        )
    }
}
