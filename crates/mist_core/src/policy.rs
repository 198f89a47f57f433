//! Segment boundary policy.
//!
//! A policy is a list of independent rules combined with logical OR. Rules
//! are pure functions of the state before and after the current record.

use crate::state::Progress;

/// One boundary-triggering rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitRule {
    /// Split once the open segment would hold more than this many records.
    MaxLines(u64),
    /// Split once the open segment would hold more than this many attachment bytes.
    MaxBytes(u64),
}

impl SplitRule {
    /// Returns `true` if the record that produced `after` should start a new
    /// segment.
    #[must_use]
    pub fn should_split(&self, _before: &Progress, after: &Progress) -> bool {
        match *self {
            Self::MaxLines(limit) => after.part_lines > limit,
            Self::MaxBytes(limit) => after.part_size > limit,
        }
    }

    const fn limit(self) -> u64 {
        match self {
            Self::MaxLines(limit) | Self::MaxBytes(limit) => limit,
        }
    }
}

/// Composition of [`SplitRule`]s. Any rule voting to split wins.
///
/// An empty policy never splits, producing a single unbounded segment.
///
/// # Example
///
/// ```
/// use mist_core::{Progress, SplitPolicy};
///
/// let policy = SplitPolicy::from_limits(2, 0);
/// let before = Progress::default().advance(0).advance(0);
/// assert!(policy.should_split(&before, &before.advance(0)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitPolicy {
    rules: Vec<SplitRule>,
}

impl SplitPolicy {
    /// Creates a policy that never splits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a policy from record and byte limits. A zero limit is left out.
    #[must_use]
    pub fn from_limits(max_lines: u64, max_bytes: u64) -> Self {
        Self::new()
            .with_rule(SplitRule::MaxLines(max_lines))
            .with_rule(SplitRule::MaxBytes(max_bytes))
    }

    /// Adds a rule. Rules with a zero limit are disabled and not added.
    #[must_use]
    pub fn with_rule(mut self, rule: SplitRule) -> Self {
        if rule.limit() != 0 {
            self.rules.push(rule);
        }
        self
    }

    /// The active rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[SplitRule] {
        &self.rules
    }

    /// Returns `true` if no rule is active.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns `true` if any rule votes to split.
    #[must_use]
    pub fn should_split(&self, before: &Progress, after: &Progress) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.should_split(before, after))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn state(part_lines: u64, part_size: u64) -> Progress {
        Progress {
            total_lines: part_lines,
            part_lines,
            total_size: part_size,
            part_size,
        }
    }

    #[test]
    fn line_rule() {
        let rule = SplitRule::MaxLines(2);
        assert!(!rule.should_split(&state(1, 0), &state(2, 0)));
        assert!(rule.should_split(&state(2, 0), &state(3, 0)));
    }

    #[test]
    fn byte_rule() {
        let rule = SplitRule::MaxBytes(100);
        assert!(!rule.should_split(&state(0, 0), &state(1, 100)));
        assert!(rule.should_split(&state(0, 0), &state(1, 150)));
    }

    #[test]
    fn zero_limits_are_dropped() {
        assert!(SplitPolicy::from_limits(0, 0).is_unbounded());
        assert_eq!(
            SplitPolicy::from_limits(5, 0).rules(),
            &[SplitRule::MaxLines(5)]
        );
        assert_eq!(
            SplitPolicy::from_limits(0, 7).rules(),
            &[SplitRule::MaxBytes(7)]
        );
        assert_eq!(SplitPolicy::from_limits(5, 7).rules().len(), 2);
    }

    #[test]
    fn any_rule_triggers() {
        let policy = SplitPolicy::from_limits(10, 100);
        assert!(policy.should_split(&state(2, 90), &state(3, 120)));
        assert!(policy.should_split(&state(10, 0), &state(11, 0)));
        assert!(!policy.should_split(&state(9, 99), &state(10, 100)));
    }

    proptest! {
        #[test]
        fn unbounded_never_splits(lines in any::<u64>(), size in any::<u64>()) {
            let policy = SplitPolicy::new();
            prop_assert!(!policy.should_split(&Progress::default(), &state(lines, size)));
        }

        #[test]
        fn composite_is_or_of_rules(
            max_lines in 0u64..20,
            max_bytes in 0u64..2_000,
            lines in 0u64..40,
            size in 0u64..4_000,
        ) {
            let policy = SplitPolicy::from_limits(max_lines, max_bytes);
            let after = state(lines, size);
            let expected = (max_lines != 0 && lines > max_lines) || (max_bytes != 0 && size > max_bytes);
            prop_assert_eq!(policy.should_split(&Progress::default(), &after), expected);
        }
    }
}
