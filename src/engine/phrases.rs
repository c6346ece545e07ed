//! Phrase building (seeding + first pass).
//!
//! Multiplicative structure is the backbone of base-like numeral systems:
//! most composed numbers are `quotient * base` for the base in force. This
//! module seeds the atomic vocabulary and then walks the domain ascending,
//! so bases and small multiples exist before anything larger needs them.
//!
//! Pass structure for one record:
//!
//! ```text
//! (0) seed       -> digits, bases, monomorphemics name themselves;
//!                   listed exceptions finalize immediately
//! (1) this pass  -> mark phrases, build (q * base) cross products
//! (2) combine.rs -> additive/subtractive composition, phrase retry
//! (3) canonical.rs
//! ```
//!
//! The phrase step is deliberately idempotent: the combinatorial pass runs it
//! again per number because some quotients only become constructible there
//! (a sum like `(5 + 1)` can establish a number that is also a multiplicative
//! unit, which this pass cannot yet see).

use super::memo::Memo;
use super::resolver::Resolver;
use crate::grammar::Grammar;
use crate::numeral_expr::NumeralExpr;

/// Give every digit, base, and monomorphemic number its trivial candidate
/// (the numeral naming itself), and finalize listed exceptions.
///
/// Seed-time exceptions apply by listing alone; their range only scopes
/// operand overrides and phrase-time finalization later on.
pub(crate) fn seed(grammar: &Grammar, resolver: &Resolver<'_>, memo: &mut Memo) -> usize {
    let mut produced = 0;
    let atoms = grammar.digits.iter().chain(grammar.bases.iter()).chain(grammar.monomorphemic.iter());
    for &n in atoms {
        if memo.add_candidate(n, NumeralExpr::num(n)) {
            produced += 1;
        }
        if let Some(exception) = resolver.exception_for(n) {
            let _ = memo.finalize(n, NumeralExpr::lit(exception.literal.as_str()));
        }
    }
    produced
}

/// First pass: ascending over the domain, mark phrases and build their
/// multiplicative constructions.
pub(crate) fn pass(grammar: &Grammar, resolver: &Resolver<'_>, memo: &mut Memo) -> usize {
    for &base in &grammar.bases {
        memo.mark_phrase(base);
    }

    let mut produced = 0;
    for n in memo.domain().iter() {
        let Some(base) = resolver.active_base(n) else {
            continue;
        };
        produced += try_phrase(n, base, grammar, resolver, memo);
    }
    produced
}

/// The phrase step for one number: when `n` divides by its active base, mark
/// it a phrase, finalize a range-matching exception, and (unless `n` is
/// lexicalized) cross-multiply the quotient's candidates with the base's.
///
/// Returns the number of new candidates recorded.
pub(crate) fn try_phrase(n: i64, base: i64, grammar: &Grammar, resolver: &Resolver<'_>, memo: &mut Memo) -> usize {
    if n % base != 0 {
        return 0;
    }
    memo.mark_phrase(n);

    if let Some(exception) = resolver.exception_for(n) {
        if exception.range.contains(n) {
            let _ = memo.finalize(n, NumeralExpr::lit(exception.literal.as_str()));
        }
    }
    if grammar.monomorphemic.contains(&n) {
        return 0;
    }

    let quotient = n / base;
    if quotient <= 1 || !memo.has_candidates(quotient) {
        return 0;
    }

    let quotient_exprs = operand_exprs(quotient, n, resolver, memo);
    let base_exprs = operand_exprs(base, n, resolver, memo);
    let mut produced = 0;
    for quotient_expr in &quotient_exprs {
        for base_expr in &base_exprs {
            if memo.add_candidate(n, NumeralExpr::mul(quotient_expr.clone(), base_expr.clone())) {
                produced += 1;
            }
        }
    }
    produced
}

/// The expression set an operand contributes while `target` is being
/// constructed: its exception literal (as a singleton) when one is scoped to
/// the target, otherwise a snapshot of its candidate set.
pub(crate) fn operand_exprs(operand: i64, target: i64, resolver: &Resolver<'_>, memo: &Memo) -> Vec<NumeralExpr> {
    if let Some(literal) = resolver.operand_override(operand, target) {
        return vec![NumeralExpr::lit(literal)];
    }
    memo.candidate_exprs(operand)
}
