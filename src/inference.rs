#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::error::{FuzzyError, Result};
use crate::inputs::Inputs;
use crate::outputs::{Output, Outputs};
use crate::rules::{Rule, Rules};
use crate::variable::{Variable, Variables};

/// `variable index -> set index -> degree`. Rows are sized to each variable's set count.
pub type MembershipMatrix = Vec<Vec<f64>>;

/// Degree of every set of every input variable for the given crisp values.
pub fn fuzzify(vars: &Variables<'_>, inputs: &[f64]) -> Result<MembershipMatrix> {
    if inputs.len() != vars.len() {
        return Err(FuzzyError::PreconditionViolation(format!(
            "Expected {} crisp inputs, got {}",
            vars.len(),
            inputs.len()
        )));
    }

    Ok(vars
        .iter()
        .zip(inputs)
        .map(|(var, &x)| var.sets().iter().map(|set| set.membership_degree(x)).collect())
        .collect())
}

fn zeros(vars: &Variables<'_>) -> MembershipMatrix {
    vars.iter().map(|var| vec![0.; var.sets().len()]).collect()
}

/// Resolves a rule against the variables and computes its firing strength.
/// Returns `(output variable index, output set index, strength)`.
fn fire(
    rule: &Rule,
    fuzzy_inputs: &MembershipMatrix,
    in_vars: &Variables<'_>,
    out_vars: &Variables<'_>,
) -> Result<(usize, usize, f64)> {
    let (var1, var2) = rule.in_variables();
    let (set1, set2) = rule.in_sets();

    let (in_idx1, in_set1) = in_vars.resolve(var1, set1)?;
    let (in_idx2, in_set2) = in_vars.resolve(var2, set2)?;
    let (out_idx, out_set) = out_vars.resolve(rule.out_variable(), rule.out_set())?;

    let degree = |var: usize, set: usize| {
        fuzzy_inputs
            .get(var)
            .and_then(|row| row.get(set))
            .copied()
            .ok_or_else(|| {
                FuzzyError::PreconditionViolation(format!(
                    "Membership matrix has no entry for input {var}, set {set}"
                ))
            })
    };

    let strength = rule.operator()?.call(degree(in_idx1, in_set1)?, degree(in_idx2, in_set2)?);

    log::trace!("{rule}: firing strength {strength}");

    Ok((out_idx, out_set, strength))
}

fn aggregate(mut matrix: MembershipMatrix, (var, set, strength): (usize, usize, f64)) -> MembershipMatrix {
    let cell = &mut matrix[var][set];

    *cell = f64::max(*cell, strength);
    matrix
}

/// Evaluates every rule and max-aggregates the firing strengths into the output
/// membership matrix. Rule order does not change the result.
#[cfg(not(feature = "rayon"))]
pub fn infer(
    rules: &Rules,
    fuzzy_inputs: &MembershipMatrix,
    in_vars: &Variables<'_>,
    out_vars: &Variables<'_>,
) -> Result<MembershipMatrix> {
    rules.iter().try_fold(zeros(out_vars), |matrix, rule| -> Result<MembershipMatrix> {
        Ok(aggregate(matrix, fire(rule, fuzzy_inputs, in_vars, out_vars)?))
    })
}

/// Evaluates every rule and max-aggregates the firing strengths into the output
/// membership matrix. Rules are fired in parallel and the partial matrices merged
/// elementwise with max.
#[cfg(feature = "rayon")]
pub fn infer(
    rules: &Rules,
    fuzzy_inputs: &MembershipMatrix,
    in_vars: &Variables<'_>,
    out_vars: &Variables<'_>,
) -> Result<MembershipMatrix> {
    let empty = zeros(out_vars);

    rules
        .0
        .par_iter()
        .try_fold(
            || empty.clone(),
            |matrix, rule| -> Result<MembershipMatrix> {
                Ok(aggregate(matrix, fire(rule, fuzzy_inputs, in_vars, out_vars)?))
            },
        )
        .try_reduce(
            || empty.clone(),
            |mut lhs, rhs| {
                for (l_row, r_row) in lhs.iter_mut().zip(rhs) {
                    for (l, r) in l_row.iter_mut().zip(r_row) {
                        *l = f64::max(*l, r);
                    }
                }

                Ok(lhs)
            },
        )
}

/// Center of gravity over set centroids, weighted by aggregated membership, plus the
/// label of the strongest set (first one on ties).
pub fn defuzzify(out_vars: &Variables<'_>, fuzzy_outputs: &MembershipMatrix) -> Result<Outputs> {
    if fuzzy_outputs.len() != out_vars.len() {
        return Err(FuzzyError::PreconditionViolation(format!(
            "Expected {} membership rows, got {}",
            out_vars.len(),
            fuzzy_outputs.len()
        )));
    }

    let mut outputs = Vec::with_capacity(out_vars.len());

    for (var, memberships) in out_vars.iter().zip(fuzzy_outputs) {
        if memberships.len() != var.sets().len() {
            return Err(FuzzyError::PreconditionViolation(format!(
                "Variable {} has {} fuzzy sets but {} membership degrees",
                var.name(),
                var.sets().len(),
                memberships.len()
            )));
        }

        let den = memberships.iter().sum::<f64>();

        if den == 0. {
            return Err(FuzzyError::NoActivation(var.name().to_owned()));
        }

        let num = var
            .sets()
            .iter()
            .zip(memberships)
            .map(|(set, degree)| set.centroid() * degree)
            .sum::<f64>();

        let mut dominant = 0;

        for (j, &degree) in memberships.iter().enumerate() {
            if degree > memberships[dominant] {
                dominant = j;
            }
        }

        let label = var
            .sets()
            .get(dominant)
            .map(|set| set.name().to_owned())
            .ok_or_else(|| FuzzyError::PreconditionViolation(format!("Variable {} has no fuzzy sets", var.name())))?;

        outputs.push(Output {
            variable: var.name().to_owned(),
            value: num / den,
            label,
        });
    }

    Ok(Outputs::new(outputs))
}

/// A Mamdani system over a fixed set of variables. Holds read-only borrows, so the
/// variables cannot change while an evaluation is running.
pub struct MamdaniInference<'v> {
    in_vars: Variables<'v>,
    out_vars: Variables<'v>,
}

impl<'v> MamdaniInference<'v> {
    /// Fails if there are no variables or a variable has no fuzzy sets.
    pub fn new(vars: &'v [Variable]) -> Result<Self> {
        if vars.is_empty() {
            return Err(FuzzyError::PreconditionViolation(
                "Can't run simulation, please define variables".into(),
            ));
        }

        if let Some(var) = vars.iter().find(|v| v.sets().is_empty()) {
            return Err(FuzzyError::PreconditionViolation(format!(
                "Can't run simulation, please define fuzzy sets for variable {}",
                var.name()
            )));
        }

        let (in_vars, out_vars) = Variables::partition(vars);

        log::debug!("{} input and {} output variables", in_vars.len(), out_vars.len());

        Ok(Self { in_vars, out_vars })
    }

    pub fn inputs(&self) -> &Variables<'v> {
        &self.in_vars
    }

    pub fn outputs(&self) -> &Variables<'v> {
        &self.out_vars
    }

    pub fn eval(&self, rules: &Rules, inputs: &Inputs) -> Result<Outputs> {
        inputs.validate_count(&self.in_vars)?;

        let fuzzy_inputs = fuzzify(&self.in_vars, inputs.as_slice())?;
        let fuzzy_outputs = infer(rules, &fuzzy_inputs, &self.in_vars, &self.out_vars)?;

        defuzzify(&self.out_vars, &fuzzy_outputs)
    }
}

/// Parses `rules`, then runs fuzzification, rule inference and defuzzification.
/// Returns one `(value, label)` per output variable, in declaration order.
pub fn simulate<S: AsRef<str>>(
    vars: &[Variable],
    inputs: &[f64],
    rules: impl IntoIterator<Item = S>,
) -> Result<Outputs> {
    let model = MamdaniInference::new(vars)?;
    let rules = Rules::parse_all(rules)?;

    log::debug!("Parsed {} rules", rules.len());

    model.eval(&rules, &Inputs::from(inputs))
}

#[cfg(test)]
fn temp_rules() -> [&'static str; 2] {
    ["Temp Cold and Temp Cold => Fan Low", "Temp Hot and Temp Hot => Fan High"]
}

#[test]
fn test_fuzzify() {
    let vars = crate::variable::temp_and_fan();
    let (in_vars, _) = Variables::partition(&vars);

    assert_eq!(fuzzify(&in_vars, &[75.]).unwrap(), vec![vec![0., 0.5]]);
    assert_eq!(fuzzify(&in_vars, &[25.]).unwrap(), vec![vec![0.5, 0.]]);
    assert!(matches!(fuzzify(&in_vars, &[]), Err(FuzzyError::PreconditionViolation(_))));
}

#[test]
fn test_max_aggregation() {
    let vars = crate::variable::temp_and_fan();
    let (in_vars, out_vars) = Variables::partition(&vars);
    let rules = Rules::parse_all([
        "Temp Cold or Temp Cold => Fan High",
        "Temp Hot or Temp Hot => Fan High",
    ])
    .unwrap();
    let fuzzy_inputs = vec![vec![0.3, 0.7]];

    assert_eq!(infer(&rules, &fuzzy_inputs, &in_vars, &out_vars).unwrap(), vec![vec![0., 0.7]]);
}

#[test]
fn test_operators_in_rules() {
    let vars = crate::variable::temp_and_fan();
    let (in_vars, out_vars) = Variables::partition(&vars);
    let fuzzy_inputs = vec![vec![0.25, 0.5]];
    let run = |rule: &str| {
        let rules = Rules::parse_all([rule]).unwrap();
        infer(&rules, &fuzzy_inputs, &in_vars, &out_vars)
    };

    assert_eq!(run("Temp Cold and Temp Hot => Fan Low").unwrap()[0], [0.25, 0.]);
    assert_eq!(run("Temp Cold or Temp Hot => Fan Low").unwrap()[0], [0.5, 0.]);
    assert_eq!(run("Temp Cold and_not Temp Hot => Fan Low").unwrap()[0], [0.25, 0.]);
    assert_eq!(run("Temp Cold or_not Temp Hot => Fan High").unwrap()[0], [0., 0.5]);
    assert!(matches!(
        run("Temp Cold nand Temp Hot => Fan Low"),
        Err(FuzzyError::InvalidOperator(op)) if op == "nand"
    ));
    assert!(matches!(
        run("Pressure Cold and Temp Hot => Fan Low"),
        Err(FuzzyError::UnknownVariable(name)) if name == "Pressure"
    ));
    // Output variables are not valid antecedents
    assert!(matches!(
        run("Fan Low and Temp Hot => Fan Low"),
        Err(FuzzyError::UnknownVariable(name)) if name == "Fan"
    ));
    assert!(matches!(
        run("Temp Cold and Temp Hot => Fan Medium"),
        Err(FuzzyError::UnknownFuzzySet { set, .. }) if set == "Medium"
    ));
}

#[test]
fn test_defuzzify() {
    let vars = crate::variable::temp_and_fan();
    let (_, out_vars) = Variables::partition(&vars);

    let outputs = defuzzify(&out_vars, &vec![vec![0., 0.5]]).unwrap();
    let fan = outputs.get("Fan").unwrap();

    approx::assert_relative_eq!(fan.value, 250. / 3.);
    assert_eq!(fan.label, "High");

    // Ties go to the first set
    let outputs = defuzzify(&out_vars, &vec![vec![0.4, 0.4]]).unwrap();

    assert_eq!(outputs.get("Fan").unwrap().label, "Low");
    approx::assert_relative_eq!(
        outputs.get("Fan").unwrap().value,
        (50. / 3. + 250. / 3.) / 2.,
        epsilon = 1e-9
    );

    assert!(matches!(
        defuzzify(&out_vars, &vec![vec![0., 0.]]),
        Err(FuzzyError::NoActivation(name)) if name == "Fan"
    ));
}

#[test]
fn test_defuzzify_rejects_misshapen_matrix() {
    let mut vars = crate::variable::temp_and_fan();

    vars.push(
        Variable::output("Pump", 0. ..=10.)
            .unwrap()
            .with_set(crate::terms::FuzzySet::triangular("Low", [0., 0., 5.]).unwrap()),
    );

    let (_, out_vars) = Variables::partition(&vars);

    // One row for two output variables
    assert!(matches!(
        defuzzify(&out_vars, &vec![vec![0., 0.5]]),
        Err(FuzzyError::PreconditionViolation(_))
    ));
    // Fan row is one degree short
    assert!(matches!(
        defuzzify(&out_vars, &vec![vec![0.5], vec![1.]]),
        Err(FuzzyError::PreconditionViolation(_))
    ));
    assert_eq!(defuzzify(&out_vars, &vec![vec![0., 0.5], vec![1.]]).unwrap().len(), 2);
}

#[test]
fn test_simulate() {
    let vars = crate::variable::temp_and_fan();
    let outputs = simulate(&vars, &[75.], temp_rules()).unwrap();
    let pairs = outputs.to_pairs();

    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].1, "High");
    assert!(pairs[0].0 > 50. && pairs[0].0 < 100.);

    assert!(matches!(
        simulate(&vars, &[75.], ["Temp Cold and"]),
        Err(FuzzyError::MalformedRule { .. })
    ));
    assert!(matches!(simulate(&vars, &[75., 1.], temp_rules()), Err(FuzzyError::PreconditionViolation(_))));
    assert!(matches!(simulate(&[], &[], temp_rules()), Err(FuzzyError::PreconditionViolation(_))));

    // At 50 neither set holds
    assert!(matches!(
        simulate(&vars, &[50.], temp_rules()),
        Err(FuzzyError::NoActivation(name)) if name == "Fan"
    ));
}

#[test]
fn test_model_reuse() {
    let vars = crate::variable::temp_and_fan();
    let model = MamdaniInference::new(&vars).unwrap();
    let rules = Rules::parse_all(temp_rules()).unwrap();

    let cold = model.eval(&rules, &Inputs::from(vec![10.])).unwrap();
    let hot = model.eval(&rules, &Inputs::from(vec![90.])).unwrap();

    assert_eq!(cold.get("Fan").unwrap().label, "Low");
    assert_eq!(hot.get("Fan").unwrap().label, "High");
    assert!(cold.get_inferred_value("Fan") < hot.get_inferred_value("Fan"));
}
