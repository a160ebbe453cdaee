use std::fmt;
use std::str::FromStr;

use num::Float;

use crate::error::FuzzyError;

/// Operator joining the two clauses of a rule premise.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    /// `min(u, v)`
    And,
    /// `max(u, v)`
    Or,
    /// `min(u, 1 - v)`
    AndNot,
    /// `max(u, 1 - v)`
    OrNot,
}

impl Operator {
    /// Firing strength of a premise whose clauses hold to degrees `u` and `v`.
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::And => F::min(u, v),
            Self::Or => F::max(u, v),
            Self::AndNot => F::min(u, F::one() - v),
            Self::OrNot => F::max(u, F::one() - v),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::AndNot => "and_not",
            Self::OrNot => "or_not",
        }
    }
}

impl FromStr for Operator {
    type Err = FuzzyError;

    /// Exact, lowercase match only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::And, Self::Or, Self::AndNot, Self::OrNot]
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| FuzzyError::InvalidOperator(s.to_owned()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[test]
fn test_operators() {
    assert_eq!(Operator::And.call(0.3, 0.8), 0.3);
    assert_eq!(Operator::Or.call(0.3, 0.8), 0.8);
    assert_eq!(Operator::AndNot.call(0.5, 0.75), 0.25);
    assert_eq!(Operator::OrNot.call(0.5, 0.75), 0.5);
    assert_eq!(Operator::OrNot.call(0.1f32, 0.25), 0.75);
}

#[test]
fn test_parse_operator() {
    assert_eq!("and".parse::<Operator>().unwrap(), Operator::And);
    assert_eq!("or".parse::<Operator>().unwrap(), Operator::Or);
    assert_eq!("and_not".parse::<Operator>().unwrap(), Operator::AndNot);
    assert_eq!("or_not".parse::<Operator>().unwrap(), Operator::OrNot);
    assert!(matches!("xor".parse::<Operator>(), Err(FuzzyError::InvalidOperator(op)) if op == "xor"));
    assert!("and not".parse::<Operator>().is_err());

    for op in ["AND", "Or", "And_Not", "OR_NOT"] {
        assert!(matches!(op.parse::<Operator>(), Err(FuzzyError::InvalidOperator(found)) if found == op));
    }
}
