//! Mamdani fuzzy inference over triangular and trapezoidal fuzzy sets.
//!
//! ```
//! use fuzzy_toolbox::{simulate, FuzzySet, Variable};
//!
//! let vars = vec![
//!     Variable::input("Temp", 0. ..=100.)?
//!         .with_set(FuzzySet::triangular("Cold", [0., 0., 50.])?)
//!         .with_set(FuzzySet::triangular("Hot", [50., 100., 100.])?),
//!     Variable::output("Fan", 0. ..=100.)?
//!         .with_set(FuzzySet::triangular("Low", [0., 0., 50.])?)
//!         .with_set(FuzzySet::triangular("High", [50., 100., 100.])?),
//! ];
//! let rules = ["Temp Cold and Temp Cold => Fan Low", "Temp Hot and Temp Hot => Fan High"];
//! let outputs = simulate(&vars, &[75.], rules)?;
//!
//! assert_eq!(outputs.get("Fan").unwrap().label, "High");
//! # Ok::<(), fuzzy_toolbox::FuzzyError>(())
//! ```
//!
//! Every call works on borrowed, read-only variables and rules. Editors owning the
//! definitions must not mutate them while an evaluation is in flight; the borrow checker
//! enforces this for callers in the same thread, and separate threads should pass their
//! own snapshots (e.g. a clone or a [`Project`] document).

mod dsl;
mod error;
mod inference;
mod inputs;
mod math;
mod ops;
mod outputs;
mod project;
mod rules;
mod terms;
mod variable;

pub use dsl::{Clause, Premise};
pub use error::{FuzzyError, Result};
pub use inference::{defuzzify, fuzzify, infer, simulate, MamdaniInference, MembershipMatrix};
pub use inputs::Inputs;
pub use ops::Operator;
pub use outputs::{Output, Outputs};
pub use project::{CrispInput, FuzzySetDoc, Project, VariableDoc};
pub use rules::{rule_lines, Rule, Rules};
pub use terms::{FuzzySet, Shape};
pub use variable::{Role, Variable, Variables};
