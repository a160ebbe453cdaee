//! The project document: variables, rule text and the last inputs/outputs, stored as JSON.
//!
//! ```json
//! {
//!   "title": "Fan",
//!   "description": "",
//!   "variables": [
//!     {"name": "Temp", "limits": [0, 100], "type": "IN",
//!      "fuzzySets": [{"name": "Cold", "type": "TRI", "values": [0, 0, 50]}]}
//!   ],
//!   "rules": "Temp Cold and Temp Cold => Fan Low\n",
//!   "inputs": ["75"],
//!   "outputs": ["83.33 (High)"]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FuzzyError, Result};
use crate::inference::simulate;
use crate::inputs::Inputs;
use crate::outputs::Outputs;
use crate::rules::rule_lines;
use crate::terms::{FuzzySet, Shape};
use crate::variable::{Role, Variable, Variables};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Project {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub variables: Vec<VariableDoc>,
    /// Raw rule text, one rule per line, `#` starts a comment
    #[serde(default)]
    pub rules: String,
    #[serde(default)]
    pub inputs: Vec<CrispInput>,
    #[serde(default)]
    pub outputs: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct VariableDoc {
    pub name: String,
    pub limits: (f64, f64),
    #[serde(rename = "type")]
    pub role: Role,
    #[serde(rename = "fuzzySets", default)]
    pub fuzzy_sets: Vec<FuzzySetDoc>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct FuzzySetDoc {
    pub name: String,
    #[serde(rename = "type")]
    pub shape: Shape,
    pub values: Vec<f64>,
}

/// Inputs are stored as the text typed into the editor, but plain numbers are accepted too.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CrispInput {
    Number(f64),
    Text(String),
}

impl CrispInput {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Number(x) => Some(*x),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<&Variable> for VariableDoc {
    fn from(var: &Variable) -> Self {
        Self {
            name: var.name().to_owned(),
            limits: var.limits(),
            role: var.role(),
            fuzzy_sets: var
                .sets()
                .iter()
                .map(|set| FuzzySetDoc {
                    name: set.name().to_owned(),
                    shape: set.shape(),
                    values: set.points().to_vec(),
                })
                .collect(),
        }
    }
}

impl VariableDoc {
    pub fn to_variable(&self) -> Result<Variable> {
        let (min, max) = self.limits;
        let mut var = Variable::new(&*self.name, self.role, min..=max)?;

        for set in &self.fuzzy_sets {
            var.add_set(FuzzySet::new(&*set.name, set.shape, set.values.clone())?);
        }

        Ok(var)
    }
}

impl Project {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let project = Self::from_json(&fs::read_to_string(path)?)?;

        log::debug!("Loaded project {:?} from {}", project.title, path.display());

        Ok(project)
    }

    /// Writes the project, adding a `.json` extension when missing. Returns the path written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let mut path = path.as_ref().to_path_buf();

        if path.extension().map_or(true, |ext| ext != "json") {
            let mut name = path.into_os_string();

            name.push(".json");
            path = PathBuf::from(name);
        }

        fs::write(&path, self.to_json()?)?;

        log::debug!("Saved project {:?} to {}", self.title, path.display());

        Ok(path)
    }

    pub fn set_variables(&mut self, vars: &[Variable]) {
        self.variables = vars.iter().map(VariableDoc::from).collect();
    }

    /// Decodes and validates the variable definitions.
    pub fn variables(&self) -> Result<Vec<Variable>> {
        self.variables.iter().map(VariableDoc::to_variable).collect()
    }

    /// Rule lines with comments and blank lines removed.
    pub fn rule_lines(&self) -> Vec<&str> {
        rule_lines(&self.rules).collect()
    }

    pub fn crisp_inputs(&self) -> Result<Vec<f64>> {
        self.inputs
            .iter()
            .map(|input| {
                input
                    .value()
                    .ok_or_else(|| FuzzyError::PreconditionViolation("All inputs must be numbers".into()))
            })
            .collect()
    }

    /// Runs the pre-flight checks the editor performs, then the inference.
    pub fn simulate(&self) -> Result<Outputs> {
        let rules = self.rule_lines();

        if rules.is_empty() {
            return Err(FuzzyError::PreconditionViolation(
                "Can't run simulation without rules".into(),
            ));
        }

        let vars = self.variables()?;

        if vars.is_empty() {
            return Err(FuzzyError::PreconditionViolation(
                "Can't run simulation, please define variables".into(),
            ));
        }

        if vars.iter().any(|v| v.sets().is_empty()) {
            return Err(FuzzyError::PreconditionViolation(
                "Can't run simulation, please define fuzzy sets for all variables".into(),
            ));
        }

        let inputs = self.crisp_inputs()?;
        let (in_vars, _) = Variables::partition(&vars);

        Inputs::from(inputs.as_slice()).validate_domain(&in_vars)?;

        simulate(&vars, &inputs, rules)
    }

    /// Stores each result as `"<value rounded to 2 places> (<label>)"`.
    pub fn record_outputs(&mut self, outputs: &Outputs) {
        self.outputs = outputs
            .iter()
            .map(|o| format!("{} ({})", (o.value * 100.).round() / 100., o.label))
            .collect();
    }
}

#[test]
fn test_decode_editor_document() {
    let json = r##"{
        "title": "Fan",
        "description": "Cooling\n",
        "variables": [
            {"name": "Temp", "limits": [0, 100], "type": "IN", "fuzzySets": [
                {"name": "Cold", "type": "TRI", "values": [0, 0, 50]},
                {"name": "Mild", "type": "TRAP", "values": [20, 40, 60, 80]}
            ]},
            {"name": "Fan", "limits": [0, 100], "type": "OUT", "fuzzySets": []}
        ],
        "rules": "# comment\nTemp Cold and Temp Mild => Fan Low\n\n",
        "inputs": ["75", 12.5, "abc"],
        "outputs": [""]
    }"##;
    let project = Project::from_json(json).unwrap();
    let vars = project.variables().unwrap();

    assert_eq!(vars.len(), 2);
    assert_eq!(vars[0].sets()[1].shape(), Shape::Trapezoidal);
    assert_eq!(vars[1].role(), Role::Output);
    assert_eq!(project.rule_lines(), ["Temp Cold and Temp Mild => Fan Low"]);
    assert_eq!(project.inputs[0].value(), Some(75.));
    assert_eq!(project.inputs[1].value(), Some(12.5));
    assert!(project.crisp_inputs().is_err());

    // Variable without sets is caught before inference
    let err = project.simulate().unwrap_err();

    assert_eq!(err.to_string(), "Can't run simulation, please define fuzzy sets for all variables");
}

#[test]
fn test_rejects_bad_documents() {
    let bad_type = r#"{"variables": [{"name": "x", "limits": [0, 1], "type": "INPUT"}]}"#;

    assert!(matches!(Project::from_json(bad_type), Err(FuzzyError::Json(_))));

    let bad_points = r#"{"variables": [{"name": "x", "limits": [0, 1], "type": "IN",
        "fuzzySets": [{"name": "a", "type": "TRI", "values": [0, 1, 0.5]}]}]}"#;

    assert!(matches!(
        Project::from_json(bad_points).unwrap().variables(),
        Err(FuzzyError::PreconditionViolation(_))
    ));
}

#[test]
fn test_preflight_checks() {
    let mut project = Project::new("Fan");

    assert_eq!(project.simulate().unwrap_err().to_string(), "Can't run simulation without rules");

    project.rules = "Temp Hot and Temp Hot => Fan High".into();

    assert_eq!(
        project.simulate().unwrap_err().to_string(),
        "Can't run simulation, please define variables"
    );

    project.set_variables(&crate::variable::temp_and_fan());
    project.inputs = vec![CrispInput::Text("hot".into())];

    assert_eq!(project.simulate().unwrap_err().to_string(), "All inputs must be numbers");

    project.inputs = vec![CrispInput::Text("120".into())];

    assert_eq!(project.simulate().unwrap_err().to_string(), "Input Temp must be between 0 and 100");

    project.inputs = vec![CrispInput::Text("75".into())];

    let outputs = project.simulate().unwrap();

    project.record_outputs(&outputs);

    assert_eq!(project.outputs, ["83.33 (High)"]);
}
