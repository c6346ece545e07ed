//! Derivation metrics.
//!
//! Small opt-in structs describing what each stage of a derivation did.
//! `api::derive_with` ignores them; `api::derive_verbose_with` surfaces them
//! for the CLI report and for profiling regressions across grammar batches.

use std::time::Duration;

/// Timing and production counts for one full derivation.
#[derive(Debug, Default, Clone)]
pub struct DeriveMetrics {
    /// Total elapsed time for the derivation.
    pub total: Duration,
    /// Atomic seeding (digits, bases, monomorphemics).
    pub seed: PassMetrics,
    /// First pass: phrase marking + multiplicative composition.
    pub phrase_pass: PassMetrics,
    /// Second pass: additive/subtractive composition + phrase retry.
    pub combine_pass: PassMetrics,
    /// Collapsing candidate sets into per-number outcomes.
    pub canonicalize: Duration,
}

/// Timing and candidate production for a single pass.
#[derive(Debug, Default, Clone)]
pub struct PassMetrics {
    /// Elapsed time for the pass.
    pub duration: Duration,
    /// Number of new candidate constructions recorded during the pass.
    pub produced: usize,
}
