use std::fmt;
use std::str::FromStr;

use crate::error::{FuzzyError, Result};
use crate::ops::Operator;

/// One parsed rule. The operator is kept as written and only checked when the rule is
/// evaluated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rule {
    pub(crate) in_variables: (String, String),
    pub(crate) in_sets: (String, String),
    pub(crate) operator: String,
    pub(crate) out_variable: String,
    pub(crate) out_set: String,
}

impl Rule {
    /// `IN_var IN_set operator IN_var IN_set => OUT_var OUT_set`
    ///
    /// Splits on whitespace and assigns the 8 tokens by position. Token 5 (the arrow) is
    /// not checked.
    pub fn parse(text: &str) -> Result<Self> {
        let words: Vec<&str> = text.split_whitespace().collect();

        let &[var1, set1, operator, var2, set2, _arrow, out_var, out_set] = &words[..] else {
            return Err(FuzzyError::MalformedRule {
                rule: text.to_owned(),
                tokens: words.len(),
            });
        };

        Ok(Self {
            in_variables: (var1.to_owned(), var2.to_owned()),
            in_sets: (set1.to_owned(), set2.to_owned()),
            operator: operator.to_owned(),
            out_variable: out_var.to_owned(),
            out_set: out_set.to_owned(),
        })
    }

    pub fn in_variables(&self) -> (&str, &str) {
        (&self.in_variables.0, &self.in_variables.1)
    }

    pub fn in_sets(&self) -> (&str, &str) {
        (&self.in_sets.0, &self.in_sets.1)
    }

    /// The operator token exactly as written.
    pub fn operator_str(&self) -> &str {
        &self.operator
    }

    pub fn operator(&self) -> Result<Operator> {
        self.operator.parse()
    }

    pub fn out_variable(&self) -> &str {
        &self.out_variable
    }

    pub fn out_set(&self) -> &str {
        &self.out_set
    }
}

impl FromStr for Rule {
    type Err = FuzzyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} => {} {}",
            self.in_variables.0,
            self.in_sets.0,
            self.operator,
            self.in_variables.1,
            self.in_sets.1,
            self.out_variable,
            self.out_set
        )
    }
}

/// Strips `#` comments and surrounding whitespace from a rule text block, dropping
/// lines left empty.
pub fn rule_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(|line| line.split_once('#').map_or(line, |(rule, _comment)| rule).trim())
        .filter(|line| !line.is_empty())
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rules(pub(crate) Vec<Rule>);

impl Rules {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    pub fn add(&mut self, rule: Rule) {
        self.0.push(rule);
    }

    /// Parses every line, failing on the first malformed one.
    pub fn parse_all<S: AsRef<str>>(lines: impl IntoIterator<Item = S>) -> Result<Self> {
        lines
            .into_iter()
            .map(|line| Rule::parse(line.as_ref()))
            .collect::<Result<Vec<_>>>()
            .map(Rules)
    }

    /// Parses a whole rule text block, comments and blank lines included.
    pub fn parse_block(text: &str) -> Result<Self> {
        Self::parse_all(rule_lines(text))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.0.iter()
    }
}

impl<'r> IntoIterator for &'r Rules {
    type Item = &'r Rule;
    type IntoIter = std::slice::Iter<'r, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Rule> for Rules {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Rules(iter.into_iter().collect())
    }
}

#[test]
fn test_parse_rule() {
    let rule = Rule::parse("A s1 and B s2 => C s3").unwrap();

    assert_eq!(rule.in_variables(), ("A", "B"));
    assert_eq!(rule.in_sets(), ("s1", "s2"));
    assert_eq!(rule.operator_str(), "and");
    assert_eq!(rule.operator().unwrap(), Operator::And);
    assert_eq!(rule.out_variable(), "C");
    assert_eq!(rule.out_set(), "s3");
    assert_eq!(rule.to_string(), "A s1 and B s2 => C s3");
    assert_eq!(rule.to_string().parse::<Rule>().unwrap(), rule);
}

#[test]
fn test_parse_rule_whitespace_and_arrow() {
    // Any whitespace separates tokens and the arrow is positional only
    let rule = Rule::parse("  A\ts1   xor B s2 -> C s3 ").unwrap();

    assert_eq!(rule.operator_str(), "xor");
    assert!(matches!(rule.operator(), Err(FuzzyError::InvalidOperator(_))));
}

#[test]
fn test_malformed_rule() {
    assert!(matches!(
        Rule::parse("A s1 and"),
        Err(FuzzyError::MalformedRule { tokens: 3, .. })
    ));
    assert!(matches!(
        Rule::parse("A s1 and B s2 => C s3 extra"),
        Err(FuzzyError::MalformedRule { tokens: 9, .. })
    ));
    assert!(matches!(Rule::parse(""), Err(FuzzyError::MalformedRule { tokens: 0, .. })));
}

#[test]
fn test_rule_block() {
    let text = "# Enter the rules in this format:\n\
                # IN_variable set operator IN_variable set => OUT_variable set\n\
                \n\
                Temp Cold and Temp Cold => Fan Low # quiet\n   \n\
                Temp Hot or Temp Hot => Fan High\n";

    assert_eq!(
        rule_lines(text).collect::<Vec<_>>(),
        ["Temp Cold and Temp Cold => Fan Low", "Temp Hot or Temp Hot => Fan High"]
    );

    let rules = Rules::parse_block(text).unwrap();

    assert_eq!(rules.len(), 2);
    assert_eq!(rules.iter().nth(1).unwrap().operator_str(), "or");
    assert!(Rules::parse_block("A s1 and B s2 => C s3\nA s1 and").is_err());
}
