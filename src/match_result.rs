//! Tri-state verdict returned by rule matchers.

use std::fmt;
use std::sync::Arc;

/// MatchResult is the outcome of evaluating one piece of evidence
/// against one matcher.
///
/// Chain evaluators treat `Default` as "continue to the next matcher"
/// and anything else as terminal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchResult {
    /// Evidence satisfied a configured rule and the peer is a ban
    /// candidate. The payload names the firing rule so operators can
    /// audit the ban.
    True(Arc<str>),
    /// Evidence was explicitly checked and cleared.
    False,
    /// No opinion: unparseable evidence, empty rule set, or no hit.
    Default,
}

impl MatchResult {
    /// Whether this verdict marks the evidence as ban-worthy.
    pub fn is_true(&self) -> bool {
        matches!(self, MatchResult::True(_))
    }

    /// Name of the firing rule. Only meaningful for `True` verdicts.
    pub fn rule_name(&self) -> Option<&str> {
        match self {
            MatchResult::True(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchResult::True(name) => write!(f, "TRUE ({})", name),
            MatchResult::False => write!(f, "FALSE"),
            MatchResult::Default => write!(f, "DEFAULT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_true() {
        assert!(MatchResult::True(Arc::from("rule")).is_true());
        assert!(!MatchResult::False.is_true());
        assert!(!MatchResult::Default.is_true());
    }

    #[test]
    fn test_rule_name_only_on_true() {
        let result = MatchResult::True(Arc::from("transit blocklist"));
        assert_eq!(result.rule_name(), Some("transit blocklist"));
        assert_eq!(MatchResult::False.rule_name(), None);
        assert_eq!(MatchResult::Default.rule_name(), None);
    }

    #[test]
    fn test_display() {
        let result = MatchResult::True(Arc::from("r1"));
        assert_eq!(result.to_string(), "TRUE (r1)");
        assert_eq!(MatchResult::Default.to_string(), "DEFAULT");
    }
}
