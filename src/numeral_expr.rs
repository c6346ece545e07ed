/// A candidate construction for a number, kept as an immutable tagged tree.
///
/// Trees are what the engine composes and deduplicates; the parenthesized
/// infix string (`"(2 * 10)"`, `"((9 * 10) + 9)"`) is only produced at the
/// output boundary by [`NumeralExpr::render`]. Structural equality (`Eq`)
/// and ordering (`Ord`) drive candidate-set dedup and deterministic
/// iteration, so two different derivations of the same shape collapse into
/// one candidate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumeralExpr {
    /// An atomic numeral naming itself: a digit, base, or monomorphemic word.
    Num(i64),
    /// An opaque surface form injected by an exception rule, kept verbatim.
    Lit(String),
    /// Multiplicative construction, `quotient * base`.
    Mul(Box<NumeralExpr>, Box<NumeralExpr>),
    /// Additive construction, `phrase + addend`.
    Add(Box<NumeralExpr>, Box<NumeralExpr>),
    /// Subtractive construction, `phrase - subtrahend`.
    Sub(Box<NumeralExpr>, Box<NumeralExpr>),
}

impl NumeralExpr {
    pub fn num(n: i64) -> Self {
        NumeralExpr::Num(n)
    }

    pub fn lit(s: impl Into<String>) -> Self {
        NumeralExpr::Lit(s.into())
    }

    pub fn mul(lhs: NumeralExpr, rhs: NumeralExpr) -> Self {
        NumeralExpr::Mul(Box::new(lhs), Box::new(rhs))
    }

    pub fn add(lhs: NumeralExpr, rhs: NumeralExpr) -> Self {
        NumeralExpr::Add(Box::new(lhs), Box::new(rhs))
    }

    pub fn sub(lhs: NumeralExpr, rhs: NumeralExpr) -> Self {
        NumeralExpr::Sub(Box::new(lhs), Box::new(rhs))
    }

    /// Render the tree to the wire format consumed downstream.
    ///
    /// Every composed node becomes `"(lhs <op> rhs)"` with single spaces
    /// around the operator; atoms render bare. Exception literals pass
    /// through untouched, so a literal that is itself a parenthesized form
    /// (like `"(1 * 20)"`) nests exactly as the grammar author wrote it.
    pub fn render(&self) -> String {
        match self {
            NumeralExpr::Num(n) => n.to_string(),
            NumeralExpr::Lit(s) => s.clone(),
            NumeralExpr::Mul(lhs, rhs) => format!("({} * {})", lhs.render(), rhs.render()),
            NumeralExpr::Add(lhs, rhs) => format!("({} + {})", lhs.render(), rhs.render()),
            NumeralExpr::Sub(lhs, rhs) => format!("({} - {})", lhs.render(), rhs.render()),
        }
    }
}

/// Whitespace symbol count of a rendered construction.
///
/// This is the morphosyntactic-complexity proxy the scoring collaborator
/// tokenizes by: `"((9 * 10) + 9)"` counts 5 symbols, an atomic `"7"` counts 1.
pub fn symbol_count(construction: &str) -> usize {
    construction.split_whitespace().count()
}
