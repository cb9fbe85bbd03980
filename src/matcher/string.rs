//! Pattern-oracle driven matcher for peer-id and client-name rules.

use arc_swap::ArcSwap;
use std::sync::Arc;

use super::RuleMatcher;
use crate::MatchResult;

/// Boolean oracle deciding whether a candidate string satisfies a rule
/// pattern (glob-style at minimum). The implementation lives outside
/// this crate; the matcher treats it as opaque.
pub trait PatternOracle: Send + Sync {
    fn matches(&self, candidate: &str, pattern: &str) -> bool;
}

impl<F> PatternOracle for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn matches(&self, candidate: &str, pattern: &str) -> bool {
        self(candidate, pattern)
    }
}

struct StringRuleState {
    rule_name: Arc<str>,
    patterns: Vec<Arc<str>>,
}

/// StringMatcher evaluates peer-id or client-name strings against a list
/// of patterns through a [`PatternOracle`].
///
/// The first accepted pattern wins and the verdict carries the rule name;
/// empty evidence and an empty pattern list both yield `Default`. The
/// pattern list is snapshot-swapped on reload exactly like the IP
/// matcher's rule state.
pub struct StringMatcher<O> {
    rule_id: String,
    oracle: O,
    state: ArcSwap<StringRuleState>,
}

impl<O: PatternOracle> StringMatcher<O> {
    pub fn new<I, S>(rule_id: impl Into<String>, rule_name: &str, patterns: I, oracle: O) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            rule_id: rule_id.into(),
            oracle,
            state: ArcSwap::from_pointee(compile(rule_name, patterns)),
        }
    }

    /// Replace the pattern list atomically.
    pub fn reload<I, S>(&self, rule_name: &str, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.state.store(Arc::new(compile(rule_name, patterns)));
    }

    /// Stable key identifying this rule across reloads.
    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    /// Display name of the currently loaded rule.
    pub fn rule_name(&self) -> Arc<str> {
        self.state.load().rule_name.clone()
    }

    /// Number of patterns in the current snapshot.
    pub fn pattern_count(&self) -> usize {
        self.state.load().patterns.len()
    }
}

fn compile<I, S>(rule_name: &str, patterns: I) -> StringRuleState
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let patterns: Vec<Arc<str>> = patterns
        .into_iter()
        .map(|p| Arc::from(p.as_ref()))
        .collect();
    log::debug!(
        "compiled string rule '{}': {} patterns",
        rule_name,
        patterns.len()
    );
    StringRuleState {
        rule_name: Arc::from(rule_name),
        patterns,
    }
}

impl<O: PatternOracle> RuleMatcher for StringMatcher<O> {
    fn evaluate(&self, content: &str) -> MatchResult {
        let content = content.trim();
        if content.is_empty() {
            return MatchResult::Default;
        }
        let state = self.state.load();
        for pattern in &state.patterns {
            if self.oracle.matches(content, pattern) {
                return MatchResult::True(state.rule_name.clone());
            }
        }
        MatchResult::Default
    }

    fn matcher_identifier(&self) -> &'static str {
        "banrule:stringmatcher"
    }

    fn matcher_name(&self) -> String {
        format!("String blacklist rule: {}", self.state.load().rule_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix_oracle() -> impl PatternOracle {
        |candidate: &str, pattern: &str| candidate.starts_with(pattern)
    }

    #[test]
    fn test_first_accepted_pattern_wins() {
        let m = StringMatcher::new(
            "peer-id-blacklist",
            "banned peer ids",
            ["-XL0012-", "-SD01"],
            prefix_oracle(),
        );
        let verdict = m.evaluate("-XL0012-abcdefghij");
        assert_eq!(verdict.rule_name(), Some("banned peer ids"));
        assert!(m.evaluate("-SD0100-xxxxxxxxxx").is_true());
        assert_eq!(m.evaluate("-qB4500-xxxxxxxxxx"), MatchResult::Default);
    }

    #[test]
    fn test_empty_content_and_patterns() {
        let m = StringMatcher::new(
            "peer-id-blacklist",
            "banned peer ids",
            Vec::<&str>::new(),
            prefix_oracle(),
        );
        assert_eq!(m.evaluate("-XL0012-abcdefghij"), MatchResult::Default);
        assert_eq!(m.evaluate(""), MatchResult::Default);
        assert_eq!(m.evaluate("   "), MatchResult::Default);
    }

    #[test]
    fn test_reload_swaps_patterns() {
        let m = StringMatcher::new("r", "old", ["-XL"], prefix_oracle());
        assert!(m.evaluate("-XL0012-").is_true());

        m.reload("new", ["-SD"]);
        assert_eq!(m.evaluate("-XL0012-"), MatchResult::Default);
        assert_eq!(m.evaluate("-SD0100-").rule_name(), Some("new"));
        assert_eq!(m.pattern_count(), 1);
    }

    #[test]
    fn test_identifier_and_name() {
        let m = StringMatcher::new("r", "banned clients", ["x"], prefix_oracle());
        assert_eq!(m.matcher_identifier(), "banrule:stringmatcher");
        assert_eq!(m.matcher_name(), "String blacklist rule: banned clients");
        assert_eq!(m.rule_id(), "r");
    }
}
