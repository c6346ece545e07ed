//! Rule lookups.
//!
//! The three rule tables (multiplicative base, max addend, max subtrahend)
//! share one resolution contract: scan the table linearly and keep the value
//! of the **last** entry whose range contains the number. Later declarations
//! override earlier ones on overlap. A number no entry matches is simply not
//! constructable by that mechanism, reported as `None`.
//!
//! The resolver also owns the exception index. An exception `(number, range,
//! literal)` is keyed by `number`; whether it applies is decided against the
//! *target* number under construction, which is why the lookups here take
//! both operand and target.
//!
//! Nothing here mutates: a `Resolver` borrows one grammar and is passed down
//! the call chain, so there is no process-wide rule state.

use std::collections::BTreeMap;

use crate::grammar::{Exception, Grammar, RangeRule};

bitflags::bitflags! {
    /// The composition devices a grammar licenses.
    ///
    /// Scanned once per record; used to validate, report, and label which
    /// mechanisms could ever fire for a grammar.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MechanismSet: u8 {
        const MULTIPLICATIVE = 1 << 0;
        const ADDITIVE       = 1 << 1;
        const SUBTRACTIVE    = 1 << 2;
    }
}

impl MechanismSet {
    /// Derive the capability set from a grammar's rule tables.
    pub fn scan(grammar: &Grammar) -> Self {
        let mut mechanisms = MechanismSet::empty();
        if !grammar.base_rules.is_empty() {
            mechanisms |= MechanismSet::MULTIPLICATIVE;
        }
        if !grammar.addition_bounds.is_empty() {
            mechanisms |= MechanismSet::ADDITIVE;
        }
        if !grammar.subtraction_bounds.is_empty() {
            mechanisms |= MechanismSet::SUBTRACTIVE;
        }
        mechanisms
    }
}

/// Range-scoped rule lookups over one grammar.
#[derive(Debug)]
pub(crate) struct Resolver<'a> {
    grammar: &'a Grammar,
    /// number -> exception entry; when a record lists several entries for
    /// one number, the last one wins.
    exceptions: BTreeMap<i64, &'a Exception>,
}

impl<'a> Resolver<'a> {
    pub fn new(grammar: &'a Grammar) -> Self {
        let mut exceptions = BTreeMap::new();
        for exception in &grammar.exceptions {
            let _ = exceptions.insert(exception.number, exception);
        }
        Resolver { grammar, exceptions }
    }

    /// Value of the last rule whose range contains `n`.
    fn last_match(rules: &[RangeRule], n: i64) -> Option<i64> {
        rules.iter().rev().find(|rule| rule.range.contains(n)).map(|rule| rule.value)
    }

    /// The multiplicative base in force for `n`.
    pub fn active_base(&self, n: i64) -> Option<i64> {
        Self::last_match(&self.grammar.base_rules, n)
    }

    /// Largest number allowed after a phrase in `phrase + number` (exclusive).
    pub fn max_addend(&self, n: i64) -> Option<i64> {
        Self::last_match(&self.grammar.addition_bounds, n)
    }

    /// Largest number allowed after a phrase in `phrase - number` (exclusive).
    pub fn max_subtrahend(&self, n: i64) -> Option<i64> {
        Self::last_match(&self.grammar.subtraction_bounds, n)
    }

    /// The exception entry listed for `n`, if any. Applicability of its
    /// range is the caller's concern: seeding ignores it, phrase building
    /// and operand overrides check it against the target number.
    pub fn exception_for(&self, n: i64) -> Option<&'a Exception> {
        self.exceptions.get(&n).copied()
    }

    /// The literal that replaces `operand`'s candidate set while `target`
    /// is being constructed, if an exception scopes it that way.
    pub fn operand_override(&self, operand: i64, target: i64) -> Option<&'a str> {
        self.exception_for(operand)
            .filter(|exception| exception.range.contains(target))
            .map(|exception| exception.literal.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{RangeRule, RangeSpec};

    fn rule(start: i64, stop: i64, value: i64) -> RangeRule {
        RangeRule { range: RangeSpec::Span { start, stop }, value }
    }

    fn grammar_with_rules(base_rules: Vec<RangeRule>) -> Grammar {
        let mut grammar = Grammar::decimal();
        grammar.base_rules = base_rules;
        grammar
    }

    #[test]
    fn later_rules_win_on_overlap() {
        let grammar = grammar_with_rules(vec![rule(10, 100, 10), rule(20, 40, 20)]);
        let resolver = Resolver::new(&grammar);
        assert_eq!(resolver.active_base(15), Some(10));
        assert_eq!(resolver.active_base(25), Some(20));
        assert_eq!(resolver.active_base(45), Some(10));
    }

    #[test]
    fn unmatched_numbers_have_no_base() {
        let grammar = grammar_with_rules(vec![rule(10, 100, 10)]);
        let resolver = Resolver::new(&grammar);
        assert_eq!(resolver.active_base(5), None);
        assert_eq!(resolver.max_addend(5), None);
        assert_eq!(resolver.max_subtrahend(15), None);
    }

    #[test]
    fn exception_overrides_are_scoped_to_the_target() {
        let mut grammar = Grammar::decimal();
        grammar.exceptions = vec![Exception {
            number: 10,
            range: RangeSpec::Span { start: 10, stop: 30 },
            literal: "ten".to_string(),
        }];
        let resolver = Resolver::new(&grammar);
        assert_eq!(resolver.operand_override(10, 11), Some("ten"));
        assert_eq!(resolver.operand_override(10, 29), Some("ten"));
        assert_eq!(resolver.operand_override(10, 30), None);
        assert_eq!(resolver.operand_override(9, 11), None);
    }

    #[test]
    fn duplicate_exception_entries_keep_the_last() {
        let mut grammar = Grammar::decimal();
        grammar.exceptions = vec![
            Exception { number: 10, range: RangeSpec::Span { start: 10, stop: 100 }, literal: "old".to_string() },
            Exception { number: 10, range: RangeSpec::Span { start: 10, stop: 100 }, literal: "new".to_string() },
        ];
        let resolver = Resolver::new(&grammar);
        assert_eq!(resolver.exception_for(10).map(|e| e.literal.as_str()), Some("new"));
    }

    #[test]
    fn mechanism_scan() {
        let grammar = Grammar::decimal();
        let mechanisms = MechanismSet::scan(&grammar);
        assert!(mechanisms.contains(MechanismSet::MULTIPLICATIVE | MechanismSet::ADDITIVE));
        assert!(!mechanisms.contains(MechanismSet::SUBTRACTIVE));
    }
}
