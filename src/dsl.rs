use crate::ops::Operator;
use crate::rules::Rule;

/// A `variable is set` proposition, the building block for rules written in code.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Clause {
    variable: String,
    set: String,
}

/// Two clauses joined by an operator, waiting for a consequence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Premise {
    lhs: Clause,
    op: Operator,
    rhs: Clause,
}

impl Clause {
    pub fn new(variable: impl Into<String>, set: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            set: set.into(),
        }
    }

    pub fn and(self, rhs: Clause) -> Premise {
        self.join(Operator::And, rhs)
    }

    pub fn or(self, rhs: Clause) -> Premise {
        self.join(Operator::Or, rhs)
    }

    pub fn and_not(self, rhs: Clause) -> Premise {
        self.join(Operator::AndNot, rhs)
    }

    pub fn or_not(self, rhs: Clause) -> Premise {
        self.join(Operator::OrNot, rhs)
    }

    pub fn join(self, op: Operator, rhs: Clause) -> Premise {
        Premise { lhs: self, op, rhs }
    }
}

impl Premise {
    pub fn then(self, variable: impl Into<String>, set: impl Into<String>) -> Rule {
        Rule {
            in_variables: (self.lhs.variable, self.rhs.variable),
            in_sets: (self.lhs.set, self.rhs.set),
            operator: self.op.as_str().to_owned(),
            out_variable: variable.into(),
            out_set: set.into(),
        }
    }
}

#[test]
fn test_builder_matches_text() {
    let built = Clause::new("Temp", "Hot")
        .and_not(Clause::new("Humidity", "Dry"))
        .then("Fan", "High");

    assert_eq!(built, Rule::parse("Temp Hot and_not Humidity Dry => Fan High").unwrap());
    assert_eq!(built.operator().unwrap(), Operator::AndNot);
    assert_eq!(
        Clause::new("a", "b").or(Clause::new("c", "d")).then("e", "f").to_string(),
        "a b or c d => e f"
    );
}
