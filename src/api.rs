use std::time::Instant;

use crate::engine::{
    self, AmbiguityPolicy, DeriveMetrics, MechanismSet, NumeralForm, PassMetrics, Resolution,
};
use crate::grammar::{Domain, Grammar, GrammarError};

/// Options that affect derivation and output behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// What an ambiguous number prints as (see [`AmbiguityPolicy`]).
    pub ambiguity: AmbiguityPolicy,
}

/// A derived language: one canonical outcome per number of the target
/// domain, in ascending order.
#[derive(Debug, Clone)]
pub struct Derivation {
    pub language: String,
    pub domain: Domain,
    pub options: Options,
    pub forms: Vec<NumeralForm>,
}

impl Derivation {
    /// `(number, construction)` pairs ready for an output record, with
    /// ambiguous and unconstructable numbers surfaced per the derivation's
    /// options.
    pub fn constructions(&self) -> impl Iterator<Item = (i64, String)> + '_ {
        self.forms.iter().map(|form| (form.number, form.resolution.surface(self.options.ambiguity)))
    }
}

/// Extra details returned by [`derive_verbose_with`].
///
/// Intentionally compact: enough for the CLI report and profiling without
/// dumping the whole memo.
#[derive(Debug, Clone)]
pub struct DeriveDetails {
    /// Per-pass timings and production counts.
    pub metrics: DeriveMetrics,
    /// Which composition mechanisms the grammar licenses at all.
    pub mechanisms: MechanismSet,
    /// Numbers with several surviving surface forms, with their candidates.
    pub ambiguous: Vec<(i64, Vec<String>)>,
    /// Numbers this grammar cannot express.
    pub unconstructable: Vec<i64>,
}

/// Result from [`derive_verbose_with`].
#[derive(Debug, Clone)]
pub struct DerivationVerbose {
    pub derivation: Derivation,
    pub details: DeriveDetails,
}

/// Derive `grammar` over the default 1–99 domain with default options.
///
/// # Example
/// ```
/// use hurford::{Grammar, derive};
///
/// let out = derive(&Grammar::decimal()).unwrap();
/// let eleven = out.constructions().find(|(n, _)| *n == 11).unwrap();
/// assert_eq!(eleven.1, "(10 + 1)");
/// ```
pub fn derive(grammar: &Grammar) -> Result<Derivation, GrammarError> {
    derive_with(grammar, &Domain::default(), &Options::default())
}

/// Derive `grammar` over `domain`.
///
/// Validates the record first; a structural violation is returned as the
/// record's [`GrammarError`] without touching the engine.
pub fn derive_with(grammar: &Grammar, domain: &Domain, options: &Options) -> Result<Derivation, GrammarError> {
    grammar.validate()?;
    let (forms, _) = run(grammar, domain);
    Ok(Derivation { language: grammar.language.clone(), domain: *domain, options: *options, forms })
}

/// Derive `grammar` over `domain` and return per-pass details.
pub fn derive_verbose_with(
    grammar: &Grammar,
    domain: &Domain,
    options: &Options,
) -> Result<DerivationVerbose, GrammarError> {
    grammar.validate()?;
    let (forms, metrics) = run(grammar, domain);

    let ambiguous: Vec<(i64, Vec<String>)> = forms
        .iter()
        .filter_map(|form| match &form.resolution {
            Resolution::Ambiguous(candidates) => Some((form.number, candidates.clone())),
            _ => None,
        })
        .collect();
    let unconstructable: Vec<i64> = forms
        .iter()
        .filter(|form| form.resolution == Resolution::Unconstructable)
        .map(|form| form.number)
        .collect();

    let details = DeriveDetails {
        metrics,
        mechanisms: MechanismSet::scan(grammar),
        ambiguous,
        unconstructable,
    };
    let derivation =
        Derivation { language: grammar.language.clone(), domain: *domain, options: *options, forms };
    Ok(DerivationVerbose { derivation, details })
}

/// The fixed pipeline: seed, phrase pass, combine pass, canonicalize.
fn run(grammar: &Grammar, domain: &Domain) -> (Vec<NumeralForm>, DeriveMetrics) {
    let total_start = Instant::now();
    let resolver = engine::Resolver::new(grammar);
    let mut memo = engine::Memo::new(*domain);
    let mut metrics = DeriveMetrics::default();

    let seed_start = Instant::now();
    let produced = engine::seed(grammar, &resolver, &mut memo);
    metrics.seed = PassMetrics { duration: seed_start.elapsed(), produced };

    let phrase_start = Instant::now();
    let produced = engine::phrase_pass(grammar, &resolver, &mut memo);
    metrics.phrase_pass = PassMetrics { duration: phrase_start.elapsed(), produced };

    let combine_start = Instant::now();
    let produced = engine::combine_pass(grammar, &resolver, &mut memo);
    metrics.combine_pass = PassMetrics { duration: combine_start.elapsed(), produced };

    tracing::debug!(
        language = grammar.language.as_str(),
        seeded = metrics.seed.produced,
        phrase = metrics.phrase_pass.produced,
        combine = metrics.combine_pass.produced,
        "passes complete"
    );

    let canonical_start = Instant::now();
    let forms = engine::finish(&grammar.language, &memo);
    metrics.canonicalize = canonical_start.elapsed();
    metrics.total = total_start.elapsed();
    (forms, metrics)
}
