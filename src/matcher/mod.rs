//! Matcher trait and verdict chaining.

mod ip;
mod string;
mod subnet;

pub use ip::IpMatcher;
pub use string::{PatternOracle, StringMatcher};
pub use subnet::SubnetIndex;

use std::sync::Arc;

use crate::MatchResult;

/// RuleMatcher is the interface shared by all ban-rule matchers.
///
/// Orchestration holds a homogeneous collection of `Arc<dyn RuleMatcher>`
/// without knowing concrete kinds. Evaluation is a pure function of the
/// current rule snapshot and the input: no locking, no mutation, safe to
/// call from any number of peer-check threads concurrently.
pub trait RuleMatcher: Send + Sync {
    /// Evaluate raw evidence (an address or peer-id string) against the
    /// current rule snapshot.
    ///
    /// Evidence the matcher cannot normalize into its domain type yields
    /// [`MatchResult::Default`], never an error. A `True` verdict carries
    /// the name of the firing rule.
    fn evaluate(&self, content: &str) -> MatchResult;

    /// Stable identifier, globally unique per matcher implementation
    /// (not per instance). Used upstream for deduplication and
    /// registration.
    fn matcher_identifier(&self) -> &'static str;

    /// Diagnostic label parameterized by the current rule name.
    fn matcher_name(&self) -> String;
}

/// Evaluate matchers in order. `Default` continues down the chain; any
/// other verdict is terminal. An exhausted chain yields `Default`.
pub fn decide_chain(matchers: &[Arc<dyn RuleMatcher>], content: &str) -> MatchResult {
    for matcher in matchers {
        match matcher.evaluate(content) {
            MatchResult::Default => continue,
            verdict => return verdict,
        }
    }
    MatchResult::Default
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedMatcher(MatchResult);

    impl RuleMatcher for FixedMatcher {
        fn evaluate(&self, _content: &str) -> MatchResult {
            self.0.clone()
        }

        fn matcher_identifier(&self) -> &'static str {
            "banrule:fixed"
        }

        fn matcher_name(&self) -> String {
            "fixed".to_string()
        }
    }

    #[test]
    fn test_chain_stops_at_first_true() {
        let matchers: Vec<Arc<dyn RuleMatcher>> = vec![
            Arc::new(FixedMatcher(MatchResult::Default)),
            Arc::new(FixedMatcher(MatchResult::True(Arc::from("first")))),
            Arc::new(FixedMatcher(MatchResult::True(Arc::from("second")))),
        ];
        let verdict = decide_chain(&matchers, "anything");
        assert_eq!(verdict.rule_name(), Some("first"));
    }

    #[test]
    fn test_chain_false_is_terminal() {
        let matchers: Vec<Arc<dyn RuleMatcher>> = vec![
            Arc::new(FixedMatcher(MatchResult::False)),
            Arc::new(FixedMatcher(MatchResult::True(Arc::from("late")))),
        ];
        assert_eq!(decide_chain(&matchers, "anything"), MatchResult::False);
    }

    #[test]
    fn test_exhausted_chain_is_default() {
        let matchers: Vec<Arc<dyn RuleMatcher>> = vec![
            Arc::new(FixedMatcher(MatchResult::Default)),
            Arc::new(FixedMatcher(MatchResult::Default)),
        ];
        assert_eq!(decide_chain(&matchers, "anything"), MatchResult::Default);
        assert_eq!(decide_chain(&[], "anything"), MatchResult::Default);
    }
}
