//! Grammar records: the declarative description of one numeral system.
//!
//! A record names its atomic vocabulary (digits, bases, monomorphemic words)
//! and three range-scoped rule tables (multiplicative base, max addend, max
//! subtrahend), plus listed exceptions that force a literal surface form.
//! Records arrive as JSON Lines using the historical column names
//! (`curr_bases`, `number_addition_max`, `number_subtraction_max`), so the
//! wire layer here tolerates the nested-array shapes those columns carry.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

/// Errors attributable to a single grammar record.
///
/// A failed record never aborts a batch; the batch driver collects these per
/// record and keeps going.
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("malformed range: {0}")]
    MalformedRange(String),
    #[error("exception entry for {number} is missing its literal form")]
    MissingExceptionLiteral { number: i64 },
    #[error("exception literal {literal:?} for {number} is not a plausible surface form")]
    BadExceptionLiteral { number: i64, literal: String },
    #[error("bases must be sorted and distinct, saw {current} after {previous}")]
    UnorderedBases { previous: i64, current: i64 },
    #[error("multiplicative rule base must be positive, got {0}")]
    NonPositiveBase(i64),
    #[error("subtractive rules require at least two bases")]
    SubtractionNeedsTwoBases,
    #[error("target domain {first}..={last} is empty or starts below 1")]
    BadDomain { first: i64, last: i64 },
    #[error("grammar record is not valid JSON: {0}")]
    Record(#[from] serde_json::Error),
}

/// A rule-applicability range.
///
/// Wire shapes: `[start, stop]` (half-open span), `[start, stop, period]`
/// (periodic recurrence), a list of such arrays (union), or `[]` (never
/// matches). Membership logic lives in `engine::ranges`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeSpec {
    /// `start <= n < stop`.
    Span { start: i64, stop: i64 },
    /// Matches `n >= start` whenever `(n - start) % period` falls in
    /// `[0, stop - start)`, e.g. `[1, 10, 10]` matches 1..9, 11..19, ...
    Periodic { start: i64, stop: i64, period: i64 },
    /// Matches when any sub-range matches.
    Union(Vec<RangeSpec>),
    /// Never matches.
    Empty,
}

impl RangeSpec {
    /// Parse the wire shape out of a JSON value.
    pub fn from_value(value: &Value) -> Result<Self, GrammarError> {
        let items = value
            .as_array()
            .ok_or_else(|| GrammarError::MalformedRange(format!("expected an array, got {value}")))?;
        if items.is_empty() {
            return Ok(RangeSpec::Empty);
        }
        if items[0].is_array() {
            let subs = items.iter().map(RangeSpec::from_value).collect::<Result<Vec<_>, _>>()?;
            return Ok(RangeSpec::Union(subs));
        }

        let ints = items
            .iter()
            .map(|v| v.as_i64().ok_or_else(|| GrammarError::MalformedRange(format!("non-integer bound in {value}"))))
            .collect::<Result<Vec<i64>, _>>()?;
        match ints[..] {
            [start, stop] => Ok(RangeSpec::Span { start, stop }),
            [start, stop, period] if period >= 1 => Ok(RangeSpec::Periodic { start, stop, period }),
            [_, _, period] => Err(GrammarError::MalformedRange(format!("period must be positive, got {period}"))),
            _ => Err(GrammarError::MalformedRange(format!("expected 2 or 3 bounds, got {} in {value}", ints.len()))),
        }
    }

    /// Reject shapes a hand-built `RangeSpec` could still get wrong.
    fn check(&self) -> Result<(), GrammarError> {
        match self {
            RangeSpec::Periodic { period, .. } if *period < 1 => {
                Err(GrammarError::MalformedRange(format!("period must be positive, got {period}")))
            }
            RangeSpec::Union(subs) => subs.iter().try_for_each(RangeSpec::check),
            _ => Ok(()),
        }
    }
}

impl<'de> Deserialize<'de> for RangeSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        RangeSpec::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// One `(range, value)` entry of a rule table. Later entries take priority
/// over earlier ones when ranges overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRule {
    pub range: RangeSpec,
    pub value: i64,
}

impl<'de> Deserialize<'de> for RangeRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let items = value
            .as_array()
            .filter(|items| items.len() == 2)
            .ok_or_else(|| serde::de::Error::custom(format!("expected a [range, value] pair, got {value}")))?;
        let range = RangeSpec::from_value(&items[0]).map_err(serde::de::Error::custom)?;
        let bound = items[1]
            .as_i64()
            .ok_or_else(|| serde::de::Error::custom(format!("rule value must be an integer, got {}", items[1])))?;
        Ok(RangeRule { range, value: bound })
    }
}

/// An override: when constructing `number` and the target number falls in
/// `range`, force `literal` instead of any derived construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exception {
    pub number: i64,
    pub range: RangeSpec,
    pub literal: String,
}

impl<'de> Deserialize<'de> for Exception {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let items = value
            .as_array()
            .ok_or_else(|| serde::de::Error::custom(format!("expected a [number, range, literal] triple, got {value}")))?;
        let number = items
            .first()
            .and_then(Value::as_i64)
            .ok_or_else(|| serde::de::Error::custom(format!("exception number must be an integer in {value}")))?;
        let range = items
            .get(1)
            .map(RangeSpec::from_value)
            .transpose()
            .map_err(serde::de::Error::custom)?
            .ok_or_else(|| serde::de::Error::custom(format!("exception entry for {number} is missing its range")))?;
        let literal = items
            .get(2)
            .and_then(Value::as_str)
            .ok_or_else(|| serde::de::Error::custom(GrammarError::MissingExceptionLiteral { number }.to_string()))?
            .to_string();
        Ok(Exception { number, range, literal })
    }
}

/// The closed target interval to derive constructions for, 1–99 by
/// convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Domain {
    pub first: i64,
    pub last: i64,
}

impl Default for Domain {
    fn default() -> Self {
        Domain { first: 1, last: 99 }
    }
}

impl Domain {
    pub fn new(first: i64, last: i64) -> Result<Self, GrammarError> {
        if first < 1 || last < first {
            return Err(GrammarError::BadDomain { first, last });
        }
        Ok(Domain { first, last })
    }

    pub fn contains(&self, n: i64) -> bool {
        self.first <= n && n <= self.last
    }

    pub fn iter(&self) -> std::ops::RangeInclusive<i64> {
        self.first..=self.last
    }

    pub fn len(&self) -> usize {
        (self.last - self.first + 1) as usize
    }
}

/// One numeral grammar, immutable input to the engine.
#[derive(Debug, Clone, Deserialize)]
pub struct Grammar {
    pub language: String,
    /// Atomic numerals naming themselves, e.g. 1..9.
    pub digits: BTreeSet<i64>,
    /// Multiplicative units, sorted and distinct.
    pub bases: Vec<i64>,
    /// Lexicalized numbers that are never decomposed.
    #[serde(rename = "monomorphemics", default)]
    pub monomorphemic: BTreeSet<i64>,
    /// `(range, base)` table: the active multiplicative base per number.
    #[serde(rename = "curr_bases")]
    pub base_rules: Vec<RangeRule>,
    /// `(range, max_addend)` table bounding `phrase + n`.
    #[serde(rename = "number_addition_max", default)]
    pub addition_bounds: Vec<RangeRule>,
    /// `(range, max_subtrahend)` table bounding `phrase - n`; empty means
    /// the grammar has no subtractive construction.
    #[serde(rename = "number_subtraction_max", default)]
    pub subtraction_bounds: Vec<RangeRule>,
    #[serde(default)]
    pub exceptions: Vec<Exception>,
}

static DECIMAL: Lazy<Grammar> = Lazy::new(|| Grammar {
    language: "decimal".to_string(),
    digits: (1..=9).collect(),
    bases: vec![10],
    monomorphemic: BTreeSet::new(),
    base_rules: vec![RangeRule { range: RangeSpec::Span { start: 10, stop: 100 }, value: 10 }],
    addition_bounds: vec![RangeRule { range: RangeSpec::Span { start: 10, stop: 100 }, value: 10 }],
    subtraction_bounds: Vec::new(),
    exceptions: Vec::new(),
});

impl Grammar {
    /// Parse one JSONL record and validate it.
    pub fn from_record(line: &str) -> Result<Self, GrammarError> {
        let grammar: Grammar = serde_json::from_str(line)?;
        grammar.validate()?;
        Ok(grammar)
    }

    /// The built-in regular base-ten grammar (digits 1..9, base 10,
    /// addition below the next ten). Used by the CLI demo mode and tests.
    pub fn decimal() -> Self {
        DECIMAL.clone()
    }

    /// Check the structural invariants the upstream generator promises.
    pub fn validate(&self) -> Result<(), GrammarError> {
        for pair in self.bases.windows(2) {
            if pair[1] <= pair[0] {
                return Err(GrammarError::UnorderedBases { previous: pair[0], current: pair[1] });
            }
        }
        for rule in self.base_rules.iter().chain(&self.addition_bounds).chain(&self.subtraction_bounds) {
            rule.range.check()?;
        }
        for rule in &self.base_rules {
            if rule.value < 1 {
                return Err(GrammarError::NonPositiveBase(rule.value));
            }
        }
        if !self.subtraction_bounds.is_empty() && self.bases.len() < 2 {
            return Err(GrammarError::SubtractionNeedsTwoBases);
        }
        for exception in &self.exceptions {
            exception.range.check()?;
            let literal = exception.literal.trim();
            if literal.is_empty() || !crate::regex!(r"^[0-9A-Za-z()+*\- ]+$").is_match(literal) {
                return Err(GrammarError::BadExceptionLiteral {
                    number: exception.number,
                    literal: exception.literal.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{
        "language": "quinary-decimal",
        "digits": [1, 2, 3, 4],
        "bases": [5, 10],
        "monomorphemics": [7],
        "curr_bases": [[[5, 10], 5], [[10, 100], 10]],
        "number_addition_max": [[[5, 100], 5]],
        "number_subtraction_max": [],
        "phrase_subtraction": 0,
        "exceptions": [[5, [5, 10], "(1 * 5)"]]
    }"#;

    #[test]
    fn parses_historical_record_layout() {
        let grammar = Grammar::from_record(RECORD).unwrap();
        assert_eq!(grammar.language, "quinary-decimal");
        assert_eq!(grammar.digits, (1..=4).collect());
        assert_eq!(grammar.bases, vec![5, 10]);
        assert!(grammar.monomorphemic.contains(&7));
        assert_eq!(grammar.base_rules.len(), 2);
        assert_eq!(grammar.base_rules[1].value, 10);
        assert_eq!(grammar.base_rules[1].range, RangeSpec::Span { start: 10, stop: 100 });
        assert_eq!(grammar.exceptions[0].number, 5);
        assert_eq!(grammar.exceptions[0].literal, "(1 * 5)");
    }

    #[test]
    fn range_wire_shapes() {
        let span = RangeSpec::from_value(&serde_json::json!([1, 10])).unwrap();
        assert_eq!(span, RangeSpec::Span { start: 1, stop: 10 });

        let periodic = RangeSpec::from_value(&serde_json::json!([1, 10, 10])).unwrap();
        assert_eq!(periodic, RangeSpec::Periodic { start: 1, stop: 10, period: 10 });

        let union = RangeSpec::from_value(&serde_json::json!([[1, 3], [10, 20]])).unwrap();
        assert_eq!(
            union,
            RangeSpec::Union(vec![RangeSpec::Span { start: 1, stop: 3 }, RangeSpec::Span { start: 10, stop: 20 }])
        );

        assert_eq!(RangeSpec::from_value(&serde_json::json!([])).unwrap(), RangeSpec::Empty);
    }

    #[test]
    fn malformed_ranges_are_rejected() {
        assert!(matches!(
            RangeSpec::from_value(&serde_json::json!(["a", 10])),
            Err(GrammarError::MalformedRange(_))
        ));
        assert!(matches!(RangeSpec::from_value(&serde_json::json!([1])), Err(GrammarError::MalformedRange(_))));
        assert!(matches!(
            RangeSpec::from_value(&serde_json::json!([1, 10, 0])),
            Err(GrammarError::MalformedRange(_))
        ));
        assert!(matches!(RangeSpec::from_value(&serde_json::json!(42)), Err(GrammarError::MalformedRange(_))));
    }

    #[test]
    fn truncated_exception_triple_is_a_record_error() {
        let line = r#"{
            "language": "broken",
            "digits": [1],
            "bases": [2],
            "curr_bases": [[[2, 100], 2]],
            "exceptions": [[2, [2, 100]]]
        }"#;
        let err = Grammar::from_record(line).unwrap_err();
        assert!(err.to_string().contains("missing its literal form"), "unexpected error: {err}");
    }

    #[test]
    fn validation_enforces_upstream_contract() {
        let mut grammar = Grammar::decimal();
        grammar.bases = vec![10, 10];
        assert!(matches!(grammar.validate(), Err(GrammarError::UnorderedBases { .. })));

        let mut grammar = Grammar::decimal();
        grammar.subtraction_bounds =
            vec![RangeRule { range: RangeSpec::Span { start: 10, stop: 100 }, value: 3 }];
        assert!(matches!(grammar.validate(), Err(GrammarError::SubtractionNeedsTwoBases)));

        let mut grammar = Grammar::decimal();
        grammar.base_rules[0].value = 0;
        assert!(matches!(grammar.validate(), Err(GrammarError::NonPositiveBase(0))));

        let mut grammar = Grammar::decimal();
        grammar.exceptions =
            vec![Exception { number: 10, range: RangeSpec::Span { start: 10, stop: 100 }, literal: "  ".into() }];
        assert!(matches!(grammar.validate(), Err(GrammarError::BadExceptionLiteral { number: 10, .. })));
    }

    #[test]
    fn domain_bounds() {
        let domain = Domain::default();
        assert_eq!((domain.first, domain.last), (1, 99));
        assert_eq!(domain.len(), 99);
        assert!(domain.contains(1) && domain.contains(99) && !domain.contains(100));
        assert!(Domain::new(0, 5).is_err());
        assert!(Domain::new(5, 4).is_err());
    }
}
