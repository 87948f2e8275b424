use rulinalg::matrix::{BaseMatrix, Matrix};
use rulinalg::vector::Vector;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    Eq,
    Le,
    Ge,
}

impl ConstraintType {
    /// Relation obtained after multiplying both sides by -1.
    pub fn complement(self) -> ConstraintType {
        match self {
            ConstraintType::Eq => ConstraintType::Eq,
            ConstraintType::Le => ConstraintType::Ge,
            ConstraintType::Ge => ConstraintType::Le,
        }
    }
}

/// One dense row `coefficients . x (<=|=|>=) rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub coefficients: Vec<f64>,
    pub rhs: f64,
    pub kind: ConstraintType,
}

impl LinearConstraint {
    /// An all-zero `= 0` row over `num_vars` variables, to be filled with
    /// `add` and closed with `value`.
    pub fn new(num_vars: usize) -> LinearConstraint {
        LinearConstraint {
            coefficients: vec![0.0; num_vars],
            rhs: 0.0,
            kind: ConstraintType::Eq,
        }
    }

    pub fn from_dense(coefficients: Vec<f64>, kind: ConstraintType, rhs: f64) -> LinearConstraint {
        LinearConstraint {
            coefficients,
            rhs,
            kind,
        }
    }

    pub fn add(mut self, var_index: usize, coeff: f64) -> LinearConstraint {
        self.coefficients[var_index] += coeff;
        self
    }

    pub fn value(mut self, kind: ConstraintType, rhs: f64) -> LinearConstraint {
        self.kind = kind;
        self.rhs = rhs;
        self
    }

    pub fn num_vars(&self) -> usize {
        self.coefficients.len()
    }

    pub fn lhs(&self, x: &[f64]) -> f64 {
        self.coefficients.iter().zip(x).map(|(a, v)| a * v).sum()
    }

    pub fn is_satisfied(&self, x: &[f64], tol: f64) -> bool {
        let lhs = self.lhs(x);
        match self.kind {
            ConstraintType::Eq => (lhs - self.rhs).abs() <= tol,
            ConstraintType::Le => lhs <= self.rhs + tol,
            ConstraintType::Ge => lhs >= self.rhs - tol,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundType {
    /// `-inf < x < inf`
    Free,
    /// `0 <= x <= ub`
    UpperOnly,
    /// `lb <= x`
    LowerOnly,
    /// `lb <= x <= ub`
    Boxed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableBound {
    pub lower: f64,
    pub upper: f64,
    pub kind: BoundType,
}

impl VariableBound {
    pub fn free() -> VariableBound {
        VariableBound {
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
            kind: BoundType::Free,
        }
    }

    pub fn nonnegative() -> VariableBound {
        VariableBound::lower(0.0)
    }

    pub fn lower(lb: f64) -> VariableBound {
        VariableBound {
            lower: lb,
            upper: f64::INFINITY,
            kind: BoundType::LowerOnly,
        }
    }

    pub fn upper(ub: f64) -> VariableBound {
        VariableBound {
            lower: 0.0,
            upper: ub,
            kind: BoundType::UpperOnly,
        }
    }

    pub fn boxed(lb: f64, ub: f64) -> VariableBound {
        VariableBound {
            lower: lb,
            upper: ub,
            kind: BoundType::Boxed,
        }
    }

    /// Derives the bound kind from which limits are finite. A finite upper
    /// limit without a finite lower one has no standard-form rule and yields
    /// `None`.
    pub fn from_limits(lb: f64, ub: f64) -> Option<VariableBound> {
        match (lb.is_finite(), ub.is_finite()) {
            (false, false) => Some(VariableBound::free()),
            (true, false) => Some(VariableBound::lower(lb)),
            (true, true) => Some(VariableBound::boxed(lb, ub)),
            (false, true) => None,
        }
    }

    pub fn contains(&self, x: f64, tol: f64) -> bool {
        match self.kind {
            BoundType::Free => true,
            BoundType::LowerOnly => x >= self.lower - tol,
            BoundType::UpperOnly => x >= -tol && x <= self.upper + tol,
            BoundType::Boxed => x >= self.lower - tol && x <= self.upper + tol,
        }
    }
}

/// A general LP: minimize `objective . x` subject to `constraints` and the
/// optional per-variable `bounds`. Without bounds every variable is `>= 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name: Option<String>,
    pub objective: Vec<f64>,
    pub constraints: Vec<LinearConstraint>,
    pub bounds: Option<Vec<VariableBound>>,
    pub row_names: Vec<String>,
    pub column_names: Vec<String>,
}

impl Model {
    pub fn new(
        objective: Vec<f64>,
        constraints: Vec<LinearConstraint>,
        bounds: Option<Vec<VariableBound>>,
    ) -> Model {
        Model {
            name: None,
            objective,
            constraints,
            bounds,
            row_names: Vec::new(),
            column_names: Vec::new(),
        }
    }

    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Checks `x` against every constraint and bound of the model.
    pub fn is_feasible(&self, x: &[f64], tol: f64) -> bool {
        if x.len() != self.num_vars() {
            return false;
        }
        let rows_ok = self.constraints.iter().all(|c| c.is_satisfied(x, tol));
        let bounds_ok = match self.bounds {
            Some(ref bounds) => bounds.iter().zip(x).all(|(b, &v)| b.contains(v, tol)),
            None => x.iter().all(|&v| v >= -tol),
        };
        rows_ok && bounds_ok
    }

    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.objective.iter().zip(x).map(|(c, v)| c * v).sum()
    }
}

#[derive(Debug, Clone)]
pub struct StandardForm {
    // Standard form linear program:
    // Minimize c^Tx
    // subject to Ax (<=|=|>=) b, one relation per row
    // and x >= 0
    pub a: Matrix<f64>,
    pub b: Vector<f64>,
    pub c: Vector<f64>,
    pub kinds: Vec<ConstraintType>,
}

impl StandardForm {
    pub fn rows(&self) -> usize {
        self.kinds.len()
    }

    pub fn cols(&self) -> usize {
        self.c.size()
    }

    /// Checks that `a`, `b`, `c` and `kinds` describe the same problem.
    pub fn validate(&self) -> Result<(), Error> {
        let m = self.rows();
        let checks = [
            ("standard form: rows of a", m, self.a.rows()),
            ("standard form: length of b", m, self.b.size()),
            ("standard form: columns of a", self.cols(), self.a.cols()),
        ];
        for &(context, expected, found) in checks.iter() {
            if expected != found {
                return Err(Error::DimensionMismatch {
                    context,
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }
}

/// Primal optimum of a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub x: Vec<f64>,
    pub value: f64,
    /// Pivot rounds spent over both phases.
    pub iterations: usize,
}
