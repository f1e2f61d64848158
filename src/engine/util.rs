use crate::CaseMatching;

/// Splits a query into its whitespace-separated tokens, folded for `case`.
///
/// Runs of whitespace collapse, so no token is ever empty.
pub fn tokenize(query: &str, case: CaseMatching) -> Vec<String> {
    query
        .split_whitespace()
        .map(|token| case.fold(token).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert!(tokenize("", CaseMatching::Respect).is_empty());
        assert!(tokenize("   \t ", CaseMatching::Respect).is_empty());
        assert_eq!(tokenize("  a  Bc d ", CaseMatching::Respect), vec!["a", "Bc", "d"]);
        assert_eq!(tokenize("Apple PIE", CaseMatching::Ignore), vec!["apple", "pie"]);
    }
}
