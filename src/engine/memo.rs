//! Per-record construction memo.
//!
//! One `Memo` is created fresh for each grammar record and discarded once the
//! derivation is exported. It holds three things the passes share:
//!
//! - **Candidate sets**: number -> set of expression trees. `BTreeSet` keyed
//!   by structural equality keeps combinatorial expansion finite and makes
//!   iteration deterministic, so identical derivations collapse instead of
//!   accumulating.
//! - **Final table**: number -> the one finalized expression. A number is
//!   finalized at most once and never overwritten afterwards; exception
//!   overrides rely on this to beat any later derived construction.
//! - **Phrase set**: the numbers established as valid multiplicative units
//!   (the bases, then every number found divisible by its active base).
//!
//! Numbers outside the target domain own no state here: adding candidates or
//! finalizing them is a no-op, so cross products that reach past the domain
//! simply produce nothing.

use std::collections::{BTreeMap, BTreeSet};

use crate::grammar::Domain;
use crate::numeral_expr::NumeralExpr;

#[derive(Debug)]
pub(crate) struct Memo {
    domain: Domain,
    candidates: BTreeMap<i64, BTreeSet<NumeralExpr>>,
    finals: BTreeMap<i64, NumeralExpr>,
    phrases: BTreeSet<i64>,
}

impl Memo {
    pub fn new(domain: Domain) -> Self {
        Memo { domain, candidates: BTreeMap::new(), finals: BTreeMap::new(), phrases: BTreeSet::new() }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Record one more candidate construction for `n`.
    ///
    /// Returns true when the candidate is new; out-of-domain numbers and
    /// structural duplicates are dropped.
    pub fn add_candidate(&mut self, n: i64, expr: NumeralExpr) -> bool {
        if !self.domain.contains(n) {
            return false;
        }
        self.candidates.entry(n).or_default().insert(expr)
    }

    /// Fix `n`'s final expression. The first call wins; anything after is a
    /// no-op, as are numbers outside the domain.
    pub fn finalize(&mut self, n: i64, expr: NumeralExpr) -> bool {
        if !self.domain.contains(n) || self.finals.contains_key(&n) {
            return false;
        }
        let _ = self.finals.insert(n, expr);
        true
    }

    pub fn finalized(&self, n: i64) -> Option<&NumeralExpr> {
        self.finals.get(&n)
    }

    pub fn has_candidates(&self, n: i64) -> bool {
        self.candidates.get(&n).is_some_and(|set| !set.is_empty())
    }

    /// Snapshot of `n`'s candidate set, in structural order.
    pub fn candidate_exprs(&self, n: i64) -> Vec<NumeralExpr> {
        self.candidates.get(&n).map(|set| set.iter().cloned().collect()).unwrap_or_default()
    }

    pub fn mark_phrase(&mut self, n: i64) {
        let _ = self.phrases.insert(n);
    }

    /// Snapshot of the phrase set, ascending.
    pub fn phrase_list(&self) -> Vec<i64> {
        self.phrases.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten_plus_one() -> NumeralExpr {
        NumeralExpr::add(NumeralExpr::num(10), NumeralExpr::num(1))
    }

    #[test]
    fn candidates_dedup_structurally() {
        let mut memo = Memo::new(Domain::default());
        assert!(memo.add_candidate(11, ten_plus_one()));
        assert!(!memo.add_candidate(11, ten_plus_one()));
        assert_eq!(memo.candidate_exprs(11).len(), 1);
    }

    #[test]
    fn finalize_happens_at_most_once() {
        let mut memo = Memo::new(Domain::default());
        assert!(memo.finalize(10, NumeralExpr::lit("ten")));
        assert!(!memo.finalize(10, NumeralExpr::num(10)));
        assert_eq!(memo.finalized(10), Some(&NumeralExpr::lit("ten")));
    }

    #[test]
    fn out_of_domain_numbers_hold_no_state() {
        let mut memo = Memo::new(Domain::default());
        assert!(!memo.add_candidate(100, NumeralExpr::num(100)));
        assert!(!memo.finalize(0, NumeralExpr::num(0)));
        assert!(!memo.has_candidates(100));
        assert!(memo.candidate_exprs(100).is_empty());
    }

    #[test]
    fn phrase_list_is_sorted() {
        let mut memo = Memo::new(Domain::default());
        memo.mark_phrase(20);
        memo.mark_phrase(10);
        memo.mark_phrase(20);
        assert_eq!(memo.phrase_list(), vec![10, 20]);
    }
}
