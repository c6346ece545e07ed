//! Rule-based numeral construction.
//!
//! Feed a declarative grammar record (digits, bases, range-scoped
//! multiplicative/additive/subtractive rules, listed exceptions) to
//! [`derive`] and get back the surface expression for every number in a
//! bounded domain — `"(10 + 1)"` for eleven under a regular base-ten
//! grammar, `"ERR"` where the grammar cannot express a number at all.
//! [`run_batch`] fans the same derivation out across many records.

#[macro_use]
mod macros;
mod api;
mod batch;
mod engine;
mod grammar;
mod numeral_expr;

pub use api::{
    Derivation, DerivationVerbose, DeriveDetails, Options, derive, derive_verbose_with, derive_with,
};
pub use batch::{
    BatchReport, ConstructionRow, RecordFailure, load_grammars, read_grammars, run_batch,
    write_constructions_csv,
};
pub use engine::{
    AMBIGUOUS_MARKER, AmbiguityPolicy, DeriveMetrics, MechanismSet, NumeralForm, PassMetrics, Resolution,
    UNCONSTRUCTABLE,
};
pub use grammar::{Domain, Exception, Grammar, GrammarError, RangeRule, RangeSpec};
pub use numeral_expr::{NumeralExpr, symbol_count};
