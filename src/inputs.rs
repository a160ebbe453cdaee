use crate::error::{FuzzyError, Result};
use crate::variable::Variables;

/// Crisp input values, one per input variable and in the same order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inputs(pub(crate) Vec<f64>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(Vec::new())
    }

    pub fn add(&mut self, val: f64) {
        self.0.push(val);
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub(crate) fn validate_count(&self, vars: &Variables<'_>) -> Result<()> {
        if self.0.len() != vars.len() {
            return Err(FuzzyError::PreconditionViolation(format!(
                "Expected {} crisp inputs, got {}",
                vars.len(),
                self.0.len()
            )));
        }

        Ok(())
    }

    /// Checks the count and that every value lies within its variable's limits.
    pub fn validate_domain(&self, vars: &Variables<'_>) -> Result<()> {
        self.validate_count(vars)?;

        for (var, &val) in vars.iter().zip(&self.0) {
            if !var.contains(val) {
                let (min, max) = var.limits();

                return Err(FuzzyError::PreconditionViolation(format!(
                    "Input {} must be between {min} and {max}",
                    var.name()
                )));
            }
        }

        Ok(())
    }
}

impl From<Vec<f64>> for Inputs {
    fn from(values: Vec<f64>) -> Self {
        Inputs(values)
    }
}

impl From<&[f64]> for Inputs {
    fn from(values: &[f64]) -> Self {
        Inputs(values.to_vec())
    }
}

#[test]
fn test_validate_domain() {
    let vars = crate::variable::temp_and_fan();
    let (inputs, _) = Variables::partition(&vars);

    assert!(Inputs::from(vec![100.]).validate_domain(&inputs).is_ok());
    assert!(Inputs::from(vec![0.]).validate_domain(&inputs).is_ok());

    let err = Inputs::from(vec![101.]).validate_domain(&inputs).unwrap_err();

    assert_eq!(err.to_string(), "Input Temp must be between 0 and 100");

    let mut two = Inputs::new();

    two.add(1.);
    two.add(2.);

    assert!(matches!(two.validate_domain(&inputs), Err(FuzzyError::PreconditionViolation(_))));
}
