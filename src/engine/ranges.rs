//! Range membership.
//!
//! Every rule table in a grammar scopes its entries with a `RangeSpec`, and
//! the composition passes call membership thousands of times per record, so
//! this stays a plain recursive predicate with no allocation.
//!
//! Contract (see `grammar.rs` for the wire shapes):
//!
//! - `Span { start, stop }` matches `start <= n < stop`.
//! - `Periodic { start, stop, period }` additionally matches any `n >= start`
//!   whose offset from `start` lands in the first `stop - start` slots of a
//!   period, e.g. `[1, 10, 10]` matches 1..9, 11..19, 21..29, ...
//! - `Union` matches when any sub-range matches.
//! - `Empty` never matches.
//!
//! Malformed shapes cannot reach this point; they are rejected when the
//! record is deserialized or validated.

use crate::grammar::{Domain, RangeSpec};

impl RangeSpec {
    /// Is `n` inside this range?
    pub fn contains(&self, n: i64) -> bool {
        match self {
            RangeSpec::Span { start, stop } => *start <= n && n < *stop,
            RangeSpec::Periodic { start, stop, period } => {
                if n < *start {
                    return false;
                }
                (n - start) % period < stop - start
            }
            RangeSpec::Union(subs) => subs.iter().any(|sub| sub.contains(n)),
            RangeSpec::Empty => false,
        }
    }

    /// Does this range apply to the entire target domain?
    ///
    /// Exceptions scoped this way ("always applies") are finalized during
    /// the combinatorial pass. Only a single interval qualifies; a union
    /// assembled to cover the domain piecewise does not.
    pub fn covers(&self, domain: &Domain) -> bool {
        match self {
            RangeSpec::Span { start, stop } | RangeSpec::Periodic { start, stop, .. } => {
                *start <= domain.first && domain.last < *stop
            }
            _ => false,
        }
    }
}
