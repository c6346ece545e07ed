//! Combinatorial generation (second pass).
//!
//! The second ascending walk over the domain composes numbers out of phrases
//! plus (or minus) smaller already-known numbers. Combinatorial blow-up here
//! is intentional: a number reachable through several phrases keeps every
//! derivation as a candidate until canonicalization; the memo's structural
//! dedup is the only cap applied.
//!
//! Two details carry the reference semantics:
//!
//! - The phrase step is re-run per number before composing. Some quotients
//!   only become constructible during this pass (a sum like `(5 + 1)` can
//!   establish a number that is also a multiplicative unit), and the retry
//!   is what lets a later multiple pick that up. The engine still runs
//!   exactly two passes, never a fixpoint: a dependency chain that needs a
//!   third pass stays unconstructable, and that boundary is test-covered
//!   below.
//! - A number carrying an exception entry is not composed at all. When the
//!   exception's range covers the whole domain its literal is finalized
//!   first; either way composition stops for that number, so a narrowly
//!   scoped exception leaves its number with whatever the phrase pass
//!   recorded.

use super::memo::Memo;
use super::phrases;
use super::resolver::Resolver;
use crate::grammar::Grammar;
use crate::numeral_expr::NumeralExpr;

/// Second pass: additive and subtractive composition over the phrase set.
pub(crate) fn pass(grammar: &Grammar, resolver: &Resolver<'_>, memo: &mut Memo) -> usize {
    let domain = memo.domain();
    let mut produced = 0;

    for n in domain.iter() {
        // Lexicalized numbers are never composed.
        if grammar.monomorphemic.contains(&n) {
            continue;
        }
        let Some(base) = resolver.active_base(n) else {
            continue;
        };
        let max_addend = resolver.max_addend(n);
        let max_subtrahend = resolver.max_subtrahend(n);

        if let Some(exception) = resolver.exception_for(n) {
            if exception.range.covers(&domain) {
                let _ = memo.finalize(n, NumeralExpr::lit(exception.literal.as_str()));
            }
            continue;
        }

        produced += phrases::try_phrase(n, base, grammar, resolver, memo);

        for phrase in memo.phrase_list() {
            if phrase % base != 0 {
                continue;
            }

            // Addition: phrase + number.
            if let Some(max_addend) = max_addend {
                let addend = n - phrase;
                if 0 < addend && addend < max_addend {
                    produced += cross(n, phrase, addend, NumeralExpr::add, resolver, memo);
                }
            }

            // Subtraction: phrase - number.
            if let Some(max_subtrahend) = max_subtrahend {
                let subtrahend = phrase - n;
                if max_subtrahend > 0 && 0 < subtrahend && subtrahend < max_subtrahend {
                    produced += cross(n, phrase, subtrahend, NumeralExpr::sub, resolver, memo);
                }
            }
        }
    }
    produced
}

/// Cross product of the phrase's and the operand's expression sets, each
/// replaced by its exception literal when one is scoped to `n`.
fn cross(
    n: i64,
    phrase: i64,
    operand: i64,
    combine: fn(NumeralExpr, NumeralExpr) -> NumeralExpr,
    resolver: &Resolver<'_>,
    memo: &mut Memo,
) -> usize {
    let phrase_exprs = phrases::operand_exprs(phrase, n, resolver, memo);
    let operand_exprs = phrases::operand_exprs(operand, n, resolver, memo);
    let mut produced = 0;
    for phrase_expr in &phrase_exprs {
        for operand_expr in &operand_exprs {
            if memo.add_candidate(n, combine(phrase_expr.clone(), operand_expr.clone())) {
                produced += 1;
            }
        }
    }
    produced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Domain, Exception, RangeRule, RangeSpec};

    fn run(grammar: &Grammar) -> Memo {
        let resolver = Resolver::new(grammar);
        let mut memo = Memo::new(Domain::default());
        let _ = phrases::seed(grammar, &resolver, &mut memo);
        let _ = phrases::pass(grammar, &resolver, &mut memo);
        let _ = pass(grammar, &resolver, &mut memo);
        memo
    }

    fn rule(start: i64, stop: i64, value: i64) -> RangeRule {
        RangeRule { range: RangeSpec::Span { start, stop }, value }
    }

    fn renders(memo: &Memo, n: i64) -> Vec<String> {
        memo.candidate_exprs(n).iter().map(NumeralExpr::render).collect()
    }

    /// Digits 1..4, bases 5 and 10, addition below the next five. The teens
    /// of this system read like "(5 + 1)" and sixty like "((5 + 1) * 10)".
    fn quinary_decimal() -> Grammar {
        let mut grammar = Grammar::decimal();
        grammar.language = "quinary-decimal".to_string();
        grammar.digits = (1..=4).collect();
        grammar.bases = vec![5, 10];
        grammar.base_rules = vec![rule(5, 10, 5), rule(10, 100, 10)];
        grammar.addition_bounds = vec![rule(5, 100, 5)];
        grammar
    }

    #[test]
    fn decimal_composition() {
        let memo = run(&Grammar::decimal());
        assert_eq!(renders(&memo, 11), vec!["(10 + 1)"]);
        assert_eq!(renders(&memo, 15), vec!["(10 + 5)"]);
        // 20 - 10 = 10 is not strictly below the bound, so the only
        // derivation is multiplicative.
        assert_eq!(renders(&memo, 20), vec!["(2 * 10)"]);
        assert_eq!(renders(&memo, 99), vec!["((9 * 10) + 9)"]);
    }

    #[test]
    fn quotient_established_by_addition_feeds_a_later_multiple() {
        let memo = run(&quinary_decimal());
        assert_eq!(renders(&memo, 6), vec!["(5 + 1)"]);
        assert_eq!(renders(&memo, 60), vec!["((5 + 1) * 10)"]);
    }

    #[test]
    fn subtractive_composition() {
        let mut grammar = Grammar::decimal();
        grammar.bases = vec![10, 100];
        grammar.addition_bounds = vec![rule(10, 100, 8)];
        grammar.subtraction_bounds = vec![rule(10, 100, 3)];
        let memo = run(&grammar);
        assert_eq!(renders(&memo, 17), vec!["(10 + 7)"]);
        assert_eq!(renders(&memo, 18), vec!["((2 * 10) - 2)"]);
        assert_eq!(renders(&memo, 19), vec!["((2 * 10) - 1)"]);
    }

    #[test]
    fn subtractive_dependency_on_later_phrase_stays_unresolved() {
        // 54 would be (60 - 6), but 60's construction only appears once the
        // second pass reaches 60, after 54's turn. Two passes leave it empty.
        let mut grammar = quinary_decimal();
        grammar.addition_bounds = vec![rule(5, 50, 5)];
        grammar.subtraction_bounds = vec![rule(50, 60, 7)];
        let memo = run(&grammar);
        assert_eq!(renders(&memo, 6), vec!["(5 + 1)"]);
        assert_eq!(renders(&memo, 60), vec!["((5 + 1) * 10)"]);
        assert!(renders(&memo, 54).is_empty());
    }

    #[test]
    fn domain_covering_exception_finalizes_and_suppresses_composition() {
        let mut grammar = Grammar::decimal();
        grammar.exceptions = vec![Exception {
            number: 11,
            range: RangeSpec::Span { start: 1, stop: 100 },
            literal: "elf".to_string(),
        }];
        let memo = run(&grammar);
        assert_eq!(memo.finalized(11), Some(&NumeralExpr::lit("elf")));
        assert!(renders(&memo, 11).is_empty());
    }

    #[test]
    fn narrow_exception_still_suppresses_composition() {
        // The exception never applies (its range misses 13), but its mere
        // presence stops the combinatorial pass for 13.
        let mut grammar = Grammar::decimal();
        grammar.exceptions = vec![Exception {
            number: 13,
            range: RangeSpec::Span { start: 50, stop: 60 },
            literal: "unlucky".to_string(),
        }];
        let memo = run(&grammar);
        assert_eq!(memo.finalized(13), None);
        assert!(renders(&memo, 13).is_empty());
    }

    #[test]
    fn several_phrases_can_reach_the_same_number() {
        // Wide addition bound: 30 is both (3 * 10) and ((2 * 10) + 10).
        let mut grammar = Grammar::decimal();
        grammar.addition_bounds = vec![rule(10, 100, 11)];
        let memo = run(&grammar);
        let forms = renders(&memo, 30);
        assert!(forms.contains(&"(3 * 10)".to_string()));
        assert!(forms.contains(&"((2 * 10) + 10)".to_string()));
        assert_eq!(forms.len(), 2);
    }
}
