use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FuzzyError, Result};
use crate::math::{interp, open_chain_centroid};

/// Shape of a membership function.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Shape {
    #[serde(rename = "TRI")]
    Triangular,
    #[serde(rename = "TRAP")]
    Trapezoidal,
}

impl Shape {
    /// Membership degrees paired with the set's points, in order.
    pub fn degrees(self) -> &'static [f64] {
        match self {
            Self::Triangular => &[0., 1., 0.],
            Self::Trapezoidal => &[0., 1., 1., 0.],
        }
    }

    pub fn n_points(self) -> usize {
        self.degrees().len()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Triangular => f.write_str("TRI"),
            Self::Trapezoidal => f.write_str("TRAP"),
        }
    }
}

/// A named linguistic term: a triangular or trapezoidal membership function.
///
/// Points are kept sorted ascending; triangles have exactly 3 and trapezoids exactly 4.
#[derive(Clone, Debug, PartialEq)]
pub struct FuzzySet {
    name: String,
    shape: Shape,
    points: Vec<f64>,
}

impl FuzzySet {
    pub fn new(name: impl Into<String>, shape: Shape, points: impl Into<Vec<f64>>) -> Result<Self> {
        let name = name.into();
        let points = points.into();

        if points.len() != shape.n_points() {
            return Err(FuzzyError::PreconditionViolation(format!(
                "Fuzzy set {name} ({shape}) needs {} points, got {}",
                shape.n_points(),
                points.len()
            )));
        }

        if points
            .windows(2)
            .any(|w| !matches!(w[0].partial_cmp(&w[1]), Some(Ordering::Less | Ordering::Equal)))
        {
            return Err(FuzzyError::PreconditionViolation(format!(
                "Fuzzy set {name} points must be sorted ascending: {points:?}"
            )));
        }

        Ok(Self { name, shape, points })
    }

    pub fn triangular(name: impl Into<String>, points: [f64; 3]) -> Result<Self> {
        Self::new(name, Shape::Triangular, points)
    }

    pub fn trapezoidal(name: impl Into<String>, points: [f64; 4]) -> Result<Self> {
        Self::new(name, Shape::Trapezoidal, points)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    fn coords(&self) -> Vec<(f64, f64)> {
        self.points.iter().copied().zip(self.shape.degrees().iter().copied()).collect()
    }

    /// Degree in [0, 1] to which `x` belongs to this set.
    pub fn membership_degree(&self, x: f64) -> f64 {
        interp(x, &self.coords())
    }

    /// Triangles: mean of the three points. Trapezoids: polygon centroid over the three
    /// edges of the open chain (0, 1, 1, 0). The closing edge lies on y = 0 and so never
    /// contributes to the sums.
    pub fn centroid(&self) -> f64 {
        match self.shape {
            Shape::Triangular => self.points.iter().sum::<f64>() / 3.,
            Shape::Trapezoidal => {
                // Zero area only happens when all four points coincide
                open_chain_centroid(&self.coords()).unwrap_or(self.points[0])
            },
        }
    }
}

#[test]
fn test_triangle_membership() {
    let set = FuzzySet::triangular("Mid", [0., 50., 100.]).unwrap();

    assert_eq!(set.membership_degree(0.), 0.);
    assert_eq!(set.membership_degree(25.), 0.5);
    assert_eq!(set.membership_degree(50.), 1.);
    assert_eq!(set.membership_degree(75.), 0.5);
    assert_eq!(set.membership_degree(100.), 0.);
    assert_eq!(set.membership_degree(-10.), 0.);
    assert_eq!(set.membership_degree(150.), 0.);
    assert_eq!(set.centroid(), 50.);
}

#[test]
fn test_shoulder_triangles() {
    // Degenerate left shoulder: at the first point the first degree wins
    let cold = FuzzySet::triangular("Cold", [0., 0., 50.]).unwrap();
    let hot = FuzzySet::triangular("Hot", [50., 100., 100.]).unwrap();

    assert_eq!(cold.membership_degree(0.), 0.);
    assert_eq!(cold.membership_degree(25.), 0.5);
    assert_eq!(cold.membership_degree(75.), 0.);
    assert_eq!(hot.membership_degree(75.), 0.5);
    assert_eq!(hot.membership_degree(100.), 0.);
    approx::assert_relative_eq!(hot.centroid(), 250. / 3.);
}

#[test]
fn test_trapezoid() {
    let set = FuzzySet::trapezoidal("Warm", [10., 20., 30., 60.]).unwrap();

    for x in [20., 22.5, 25., 30.] {
        assert_eq!(set.membership_degree(x), 1.);
    }

    assert_eq!(set.membership_degree(15.), 0.5);
    assert_eq!(set.membership_degree(45.), 0.5);
    assert_eq!(set.membership_degree(5.), 0.);
    assert_eq!(set.membership_degree(70.), 0.);
    // a = 0.5 * (10 - 10 - 60) = -30, moment sum = 300 - 500 - 5400
    approx::assert_relative_eq!(set.centroid(), -5600. / (6. * -30.));

    let point = FuzzySet::trapezoidal("Point", [5., 5., 5., 5.]).unwrap();

    assert_eq!(point.centroid(), 5.);
}

#[test]
fn test_rejects_bad_points() {
    assert!(FuzzySet::new("a", Shape::Triangular, vec![0., 1.]).is_err());
    assert!(FuzzySet::new("a", Shape::Trapezoidal, vec![0., 1., 2.]).is_err());
    assert!(FuzzySet::triangular("a", [0., 2., 1.]).is_err());
    assert!(FuzzySet::triangular("a", [0., f64::NAN, 1.]).is_err());
}
