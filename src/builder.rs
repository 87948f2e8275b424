use rulinalg::matrix::Matrix;
use rulinalg::vector::Vector;

use crate::error::Error;
use crate::problem::*;

// Mapping from specified problem to standard form problem
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariableMapping {
    Direct(usize),
    /// `x = y - y'`
    Difference(usize, usize),
    /// `x = y + lb`
    Shifted(usize, f64),
}

/// Everything needed to map a standard-form solution back onto the
/// caller's variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Recovery {
    mappings: Vec<VariableMapping>,
    obj_diff: f64,
    num_std_vars: usize,
}

impl Recovery {
    pub fn identity(num_vars: usize) -> Recovery {
        Recovery {
            mappings: (0..num_vars).map(VariableMapping::Direct).collect(),
            obj_diff: 0.0,
            num_std_vars: num_vars,
        }
    }

    pub fn mappings(&self) -> &[VariableMapping] {
        &self.mappings
    }

    /// Constant such that `value = value2 + obj_diff`.
    pub fn obj_diff(&self) -> f64 {
        self.obj_diff
    }

    pub fn recover(&self, x2: &[f64], value2: f64) -> (Vec<f64>, f64) {
        let x = self
            .mappings
            .iter()
            .map(|mapping| match *mapping {
                VariableMapping::Direct(k) => x2[k],
                VariableMapping::Difference(pos, neg) => x2[pos] - x2[neg],
                VariableMapping::Shifted(k, lb) => x2[k] + lb,
            })
            .collect();
        (x, value2 + self.obj_diff)
    }

    /// Image of an original-space point in the standard space. A free
    /// variable is split into its positive and negative parts.
    pub fn forward(&self, x: &[f64]) -> Vec<f64> {
        let mut y = vec![0.0; self.num_std_vars];
        for (mapping, &v) in self.mappings.iter().zip(x) {
            match *mapping {
                VariableMapping::Direct(k) => y[k] = v,
                VariableMapping::Difference(pos, neg) => {
                    y[pos] = v.max(0.0);
                    y[neg] = (-v).max(0.0);
                },
                VariableMapping::Shifted(k, lb) => y[k] = v - lb,
            }
        }
        y
    }
}

fn zeroed(len: usize) -> Result<Vec<f64>, Error> {
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| Error::MemoryAlloc)?;
    data.resize(len, 0.0);
    Ok(data)
}

fn check_rows(num_vars: usize, constraints: &[LinearConstraint]) -> Result<(), Error> {
    for constraint in constraints {
        if constraint.num_vars() != num_vars {
            return Err(Error::DimensionMismatch {
                context: "constraint coefficients",
                expected: num_vars,
                found: constraint.num_vars(),
            });
        }
    }
    Ok(())
}

impl StandardForm {
    /// Copies rows that already live in standard form (every variable
    /// `>= 0`).
    pub fn from_constraints(
        objective: &[f64],
        constraints: &[LinearConstraint],
    ) -> Result<StandardForm, Error> {
        let n = objective.len();
        check_rows(n, constraints)?;

        let mut a_data = zeroed(constraints.len() * n)?;
        for (row, constraint) in a_data.chunks_mut(n.max(1)).zip(constraints) {
            row.copy_from_slice(&constraint.coefficients);
        }
        Ok(StandardForm {
            a: Matrix::new(constraints.len(), n, a_data),
            b: Vector::new(constraints.iter().map(|c| c.rhs).collect::<Vec<_>>()),
            c: Vector::new(objective.to_vec()),
            kinds: constraints.iter().map(|c| c.kind).collect(),
        })
    }
}

/// Rewrites a general bounded LP into standard form.
///
/// Variables are scanned in index order. An upper limit adds a `<=` row
/// after the original rows, a free variable takes two columns, and a finite
/// lower limit is shifted out of the variable into every right-hand side
/// and into the objective constant.
pub fn standard_form(
    objective: &[f64],
    constraints: &[LinearConstraint],
    bounds: Option<&[VariableBound]>,
) -> Result<(StandardForm, Recovery), Error> {
    let n = objective.len();
    let bounds = match bounds {
        None => {
            let standard = StandardForm::from_constraints(objective, constraints)?;
            return Ok((standard, Recovery::identity(n)));
        },
        Some(bounds) => bounds,
    };
    check_rows(n, constraints)?;
    if bounds.len() != n {
        return Err(Error::DimensionMismatch {
            context: "variable bounds",
            expected: n,
            found: bounds.len(),
        });
    }

    let m = constraints.len();
    let mut std_rows = m;
    let mut std_cols = n;
    for bound in bounds {
        match bound.kind {
            BoundType::Free => std_cols += 1,
            BoundType::UpperOnly | BoundType::Boxed => std_rows += 1,
            BoundType::LowerOnly => {},
        }
    }

    let size = std_rows.checked_mul(std_cols).ok_or(Error::MemoryAlloc)?;
    let mut a_data = zeroed(size)?;
    let mut b_data: Vec<f64> = constraints.iter().map(|c| c.rhs).collect();
    b_data.resize(std_rows, 0.0);
    let mut c_data = zeroed(std_cols)?;
    let mut kinds: Vec<ConstraintType> = constraints.iter().map(|c| c.kind).collect();
    kinds.resize(std_rows, ConstraintType::Le);

    let mut mappings = Vec::with_capacity(n);
    let mut obj_diff = 0.0;
    let mut var_count = 0;
    let mut bound_rows = m;

    for (j, bound) in bounds.iter().enumerate() {
        let col = var_count;
        var_count += 1;
        c_data[col] = objective[j];
        for (i, constraint) in constraints.iter().enumerate() {
            a_data[i * std_cols + col] = constraint.coefficients[j];
        }

        let upper_row = match bound.kind {
            BoundType::UpperOnly | BoundType::Boxed => {
                let row = bound_rows;
                bound_rows += 1;
                a_data[row * std_cols + col] = 1.0;
                b_data[row] = bound.upper;
                Some(row)
            },
            _ => None,
        };

        let mapping = match bound.kind {
            BoundType::Free => {
                let neg = var_count;
                var_count += 1;
                c_data[neg] = -objective[j];
                for (i, constraint) in constraints.iter().enumerate() {
                    a_data[i * std_cols + neg] = -constraint.coefficients[j];
                }
                VariableMapping::Difference(col, neg)
            },
            BoundType::LowerOnly | BoundType::Boxed => {
                let lb = bound.lower;
                obj_diff += objective[j] * lb;
                for (i, constraint) in constraints.iter().enumerate() {
                    b_data[i] -= constraint.coefficients[j] * lb;
                }
                if let Some(row) = upper_row {
                    b_data[row] -= lb;
                }
                VariableMapping::Shifted(col, lb)
            },
            BoundType::UpperOnly => VariableMapping::Direct(col),
        };
        mappings.push(mapping);
    }

    let standard = StandardForm {
        a: Matrix::new(std_rows, std_cols, a_data),
        b: Vector::new(b_data),
        c: Vector::new(c_data),
        kinds,
    };
    let recovery = Recovery {
        mappings,
        obj_diff,
        num_std_vars: std_cols,
    };
    Ok((standard, recovery))
}

impl Model {
    pub fn standard_form(&self) -> Result<(StandardForm, Recovery), Error> {
        standard_form(&self.objective, &self.constraints, self.bounds.as_deref())
    }
}
