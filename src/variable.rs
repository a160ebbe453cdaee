use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{FuzzyError, Result};
use crate::terms::FuzzySet;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Role {
    #[serde(rename = "IN")]
    Input,
    #[serde(rename = "OUT")]
    Output,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("IN"),
            Self::Output => f.write_str("OUT"),
        }
    }
}

/// A linguistic variable: a named universe `min..=max` covered by fuzzy sets.
///
/// Set order is significant; it is the order of rows in every membership matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    name: String,
    role: Role,
    min_u: f64,
    max_u: f64,
    sets: Vec<FuzzySet>,
}

impl Variable {
    pub fn new(name: impl Into<String>, role: Role, universe_range: RangeInclusive<f64>) -> Result<Self> {
        let name = name.into();
        let min_u = *universe_range.start();
        let max_u = *universe_range.end();

        if !(min_u < max_u) {
            return Err(FuzzyError::PreconditionViolation(format!(
                "Variable {name} limits must satisfy min < max, got ({min_u}, {max_u})"
            )));
        }

        Ok(Self {
            name,
            role,
            min_u,
            max_u,
            sets: Vec::new(),
        })
    }

    pub fn input(name: impl Into<String>, universe_range: RangeInclusive<f64>) -> Result<Self> {
        Self::new(name, Role::Input, universe_range)
    }

    pub fn output(name: impl Into<String>, universe_range: RangeInclusive<f64>) -> Result<Self> {
        Self::new(name, Role::Output, universe_range)
    }

    /// Builder form of [`Variable::add_set`].
    pub fn with_set(mut self, set: FuzzySet) -> Self {
        self.add_set(set);
        self
    }

    pub fn add_set(&mut self, set: FuzzySet) {
        self.sets.push(set);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn limits(&self) -> (f64, f64) {
        (self.min_u, self.max_u)
    }

    pub fn contains(&self, x: f64) -> bool {
        (self.min_u..=self.max_u).contains(&x)
    }

    pub fn sets(&self) -> &[FuzzySet] {
        &self.sets
    }

    /// Index of the first set called `name`.
    pub fn set_index(&self, name: &str) -> Result<usize> {
        self.sets.iter().position(|s| s.name() == name).ok_or_else(|| FuzzyError::UnknownFuzzySet {
            variable: self.name.clone(),
            set: name.to_owned(),
        })
    }
}

/// An ordered view over variables of one role with a name -> index table.
///
/// Duplicate names resolve to the first occurrence.
#[derive(Debug)]
pub struct Variables<'v> {
    vars: Vec<&'v Variable>,
    index: HashMap<&'v str, usize>,
}

impl<'v> Variables<'v> {
    pub fn new(vars: impl IntoIterator<Item = &'v Variable>) -> Self {
        let vars: Vec<_> = vars.into_iter().collect();
        let mut index = HashMap::with_capacity(vars.len());

        for (i, &var) in vars.iter().enumerate() {
            index.entry(var.name()).or_insert(i);
        }

        Self { vars, index }
    }

    /// Splits `vars` into inputs and outputs, keeping relative order.
    pub fn partition(vars: &'v [Variable]) -> (Self, Self) {
        let inputs = Self::new(vars.iter().filter(|v| v.role() == Role::Input));
        let outputs = Self::new(vars.iter().filter(|v| v.role() == Role::Output));

        (inputs, outputs)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'v Variable> + '_ {
        self.vars.iter().copied()
    }

    pub fn get(&self, i: usize) -> Option<&'v Variable> {
        self.vars.get(i).copied()
    }

    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| FuzzyError::UnknownVariable(name.to_owned()))
    }

    /// Resolves a `(variable, set)` reference to `(variable index, set index)`.
    pub fn resolve(&self, var: &str, set: &str) -> Result<(usize, usize)> {
        let var_idx = self.index_of(var)?;
        let set_idx = self.vars[var_idx].set_index(set)?;

        Ok((var_idx, set_idx))
    }
}

#[cfg(test)]
pub(crate) fn temp_and_fan() -> Vec<Variable> {
    vec![
        Variable::input("Temp", 0. ..=100.)
            .unwrap()
            .with_set(FuzzySet::triangular("Cold", [0., 0., 50.]).unwrap())
            .with_set(FuzzySet::triangular("Hot", [50., 100., 100.]).unwrap()),
        Variable::output("Fan", 0. ..=100.)
            .unwrap()
            .with_set(FuzzySet::triangular("Low", [0., 0., 50.]).unwrap())
            .with_set(FuzzySet::triangular("High", [50., 100., 100.]).unwrap()),
    ]
}

#[test]
fn test_partition_keeps_order() {
    let vars = vec![
        Variable::output("A", 0. ..=1.).unwrap(),
        Variable::input("B", 0. ..=1.).unwrap(),
        Variable::output("C", 0. ..=1.).unwrap(),
        Variable::input("D", 0. ..=1.).unwrap(),
    ];
    let (inputs, outputs) = Variables::partition(&vars);

    assert_eq!(inputs.iter().map(Variable::name).collect::<Vec<_>>(), ["B", "D"]);
    assert_eq!(outputs.iter().map(Variable::name).collect::<Vec<_>>(), ["A", "C"]);
    assert_eq!(outputs.index_of("C").unwrap(), 1);
    assert!(matches!(inputs.index_of("A"), Err(FuzzyError::UnknownVariable(name)) if name == "A"));
}

#[test]
fn test_resolve_first_match() {
    let mut vars = temp_and_fan();

    vars.push(
        Variable::input("Temp", 0. ..=10.)
            .unwrap()
            .with_set(FuzzySet::triangular("Mild", [0., 5., 10.]).unwrap()),
    );
    vars[0].add_set(FuzzySet::triangular("Cold", [0., 10., 20.]).unwrap());

    let (inputs, _) = Variables::partition(&vars);

    assert_eq!(inputs.resolve("Temp", "Hot").unwrap(), (0, 1));
    assert_eq!(inputs.resolve("Temp", "Cold").unwrap(), (0, 0));
    assert!(matches!(
        inputs.resolve("Temp", "Mild"),
        Err(FuzzyError::UnknownFuzzySet { variable, set }) if variable == "Temp" && set == "Mild"
    ));
}

#[test]
fn test_limits() {
    assert!(Variable::input("x", 1. ..=1.).is_err());
    assert!(Variable::input("x", 2. ..=1.).is_err());

    let var = Variable::input("x", -5. ..=5.).unwrap();

    assert_eq!(var.limits(), (-5., 5.));
    assert!(var.contains(5.));
    assert!(!var.contains(5.5));
}
