//! Numeral construction engine.
//!
//! This module is the internal core of the crate: given one validated
//! [`crate::Grammar`] and a target domain, it derives every number's
//! candidate constructions and collapses them into canonical outcomes.
//!
//! ## How the parts work together
//!
//! Deriving one record is a fixed pipeline:
//!
//! ```text
//! grammar ── Resolver::new            (resolver.rs)
//!               │   last-wins rule lookups + exception index
//!               v
//!          phrases::seed              (phrases.rs)
//!            - digits/bases/monomorphemics name themselves
//!            - listed exceptions finalize
//!               │
//!               v
//!          phrases::pass              pass 1, ascending
//!            - mark phrases (n divisible by active base)
//!            - (quotient * base) cross products
//!               │
//!               v
//!          combine::pass              pass 2, ascending
//!            - re-run the phrase step per number
//!            - (phrase + addend) / (phrase - subtrahend)
//!               │
//!               v
//!          canonical::finish          (canonical.rs)
//!            - unique / ambiguous / unconstructable per number
//! ```
//!
//! Both passes share the per-record [`memo::Memo`]; `ranges.rs` supplies the
//! leaf membership predicate every rule lookup goes through. The two-pass
//! shape is semantics, not an optimization: ascending order guarantees
//! smaller numbers are known before anything composes over them, and the
//! pass count is exactly two — dependency chains that would need a third
//! pass stay unconstructable, matching the dataset this engine reproduces.
//!
//! ## Responsibilities by module
//!
//! - `ranges.rs`: range membership (span, periodic recurrence, union).
//! - `resolver.rs`: active base / max addend / max subtrahend lookups,
//!   exception index, the per-grammar `MechanismSet` scan.
//! - `memo.rs`: candidate sets, finalize-once table, phrase set.
//! - `phrases.rs`: seeding + multiplicative pass.
//! - `combine.rs`: additive/subtractive pass.
//! - `canonical.rs`: outcome collapse, ambiguity policy, output sentinels.
//! - `metrics.rs`: opt-in per-pass timing/production counts.
//!
//! The public derivation API wrapping this pipeline lives in `src/api.rs`.

mod canonical;
mod combine;
mod memo;
mod metrics;
mod phrases;
mod ranges;
mod resolver;

pub use canonical::{AMBIGUOUS_MARKER, AmbiguityPolicy, NumeralForm, Resolution, UNCONSTRUCTABLE};
pub use metrics::{DeriveMetrics, PassMetrics};
pub use resolver::MechanismSet;

pub(crate) use canonical::finish;
pub(crate) use combine::pass as combine_pass;
pub(crate) use memo::Memo;
pub(crate) use phrases::{pass as phrase_pass, seed};
pub(crate) use resolver::Resolver;
