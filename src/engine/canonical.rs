//! Canonicalization.
//!
//! After both passes every number owns a (possibly empty, possibly
//! multi-valued) candidate set plus, for exception-covered numbers, a
//! finalized expression. This step collapses that state into exactly one
//! outcome per number and keeps the three-way distinction intact:
//!
//! - **Unique**: a finalized expression, or a candidate set with one surface
//!   form. Regular numbers of a grammar.
//! - **Ambiguous**: several distinct surface forms survived. A genuine
//!   property of the grammar, reported as a warning and surfaced as an
//!   explicit outcome, never silently resolved here.
//! - **Unconstructable**: no derivation exists. Also a real finding ("this
//!   numeral system cannot express this number"), not an error.
//!
//! How an ambiguous outcome prints is the caller's choice of
//! [`AmbiguityPolicy`]; the default keeps an explicit marker in the output.

use super::memo::Memo;
use crate::numeral_expr::NumeralExpr;

/// Output sentinel for numbers the grammar cannot express.
pub const UNCONSTRUCTABLE: &str = "ERR";

/// Output marker for numbers with several surviving constructions, under the
/// default policy.
pub const AMBIGUOUS_MARKER: &str = "AMBIGUOUS";

/// Deterministic handling of numbers whose candidate set keeps more than one
/// surface form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AmbiguityPolicy {
    /// Emit [`AMBIGUOUS_MARKER`]; the full candidate list stays available on
    /// the [`Resolution`].
    #[default]
    MarkUnresolved,
    /// Emit the lexicographically smallest rendered candidate.
    LexicalMin,
}

/// The canonical outcome for one number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Unique(String),
    /// Sorted, distinct surface forms.
    Ambiguous(Vec<String>),
    Unconstructable,
}

impl Resolution {
    /// The construction string for an output row.
    pub fn surface(&self, policy: AmbiguityPolicy) -> String {
        match self {
            Resolution::Unique(form) => form.clone(),
            Resolution::Ambiguous(forms) => match policy {
                AmbiguityPolicy::MarkUnresolved => AMBIGUOUS_MARKER.to_string(),
                AmbiguityPolicy::LexicalMin => forms[0].clone(),
            },
            Resolution::Unconstructable => UNCONSTRUCTABLE.to_string(),
        }
    }

    pub fn is_unique(&self) -> bool {
        matches!(self, Resolution::Unique(_))
    }
}

/// One number of a derived language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumeralForm {
    pub number: i64,
    pub resolution: Resolution,
}

/// Collapse the memo into per-number outcomes, ascending over the domain.
pub(crate) fn finish(language: &str, memo: &Memo) -> Vec<NumeralForm> {
    memo.domain()
        .iter()
        .map(|n| {
            let resolution = resolve(language, memo, n);
            NumeralForm { number: n, resolution }
        })
        .collect()
}

fn resolve(language: &str, memo: &Memo, n: i64) -> Resolution {
    if let Some(expr) = memo.finalized(n) {
        return Resolution::Unique(expr.render());
    }

    let mut forms: Vec<String> = memo.candidate_exprs(n).iter().map(NumeralExpr::render).collect();
    // Distinct trees can render to the same surface string (an exception
    // literal spelled like a derived form); the output distinction is about
    // surface forms, so collapse those here.
    forms.sort();
    forms.dedup();

    match forms.len() {
        0 => Resolution::Unconstructable,
        1 => Resolution::Unique(forms.remove(0)),
        _ => {
            tracing::warn!(language, number = n, candidates = ?forms, "ambiguous construction");
            Resolution::Ambiguous(forms)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Domain;

    fn memo_for(first: i64, last: i64) -> Memo {
        Memo::new(Domain::new(first, last).unwrap())
    }

    #[test]
    fn unique_ambiguous_and_empty_are_kept_distinct() {
        let mut memo = memo_for(1, 3);
        let _ = memo.add_candidate(1, NumeralExpr::num(1));
        let _ = memo.add_candidate(2, NumeralExpr::num(2));
        let _ = memo.add_candidate(2, NumeralExpr::add(NumeralExpr::num(1), NumeralExpr::num(1)));

        let forms = finish("t", &memo);
        assert_eq!(forms[0].resolution, Resolution::Unique("1".to_string()));
        assert_eq!(
            forms[1].resolution,
            Resolution::Ambiguous(vec!["(1 + 1)".to_string(), "2".to_string()])
        );
        assert_eq!(forms[2].resolution, Resolution::Unconstructable);
    }

    #[test]
    fn finalized_expression_beats_candidates() {
        let mut memo = memo_for(1, 1);
        let _ = memo.add_candidate(1, NumeralExpr::num(1));
        let _ = memo.finalize(1, NumeralExpr::lit("one"));
        let forms = finish("t", &memo);
        assert_eq!(forms[0].resolution, Resolution::Unique("one".to_string()));
    }

    #[test]
    fn identical_surface_forms_collapse() {
        let mut memo = memo_for(11, 11);
        let _ = memo.add_candidate(11, NumeralExpr::add(NumeralExpr::num(10), NumeralExpr::num(1)));
        let _ = memo.add_candidate(11, NumeralExpr::lit("(10 + 1)"));
        let forms = finish("t", &memo);
        assert_eq!(forms[0].resolution, Resolution::Unique("(10 + 1)".to_string()));
    }

    #[test]
    fn surface_follows_the_ambiguity_policy() {
        let ambiguous = Resolution::Ambiguous(vec!["(1 + 1)".to_string(), "2".to_string()]);
        assert_eq!(ambiguous.surface(AmbiguityPolicy::MarkUnresolved), AMBIGUOUS_MARKER);
        assert_eq!(ambiguous.surface(AmbiguityPolicy::LexicalMin), "(1 + 1)");
        assert_eq!(Resolution::Unconstructable.surface(AmbiguityPolicy::default()), UNCONSTRUCTABLE);
        assert_eq!(Resolution::Unique("7".to_string()).surface(AmbiguityPolicy::default()), "7");
    }
}
