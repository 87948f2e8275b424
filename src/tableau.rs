use std::ops::Range;

use log::debug;
use rulinalg::matrix::{BaseMatrix, Matrix};

use crate::error::Error;
use crate::linalg::{axpy_row, scale_row};
use crate::problem::{ConstraintType, StandardForm};

/// Column counts of a tableau built from a standard-form problem, after
/// right-hand sides have been made nonnegative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableauShape {
    pub rows: usize,
    pub structural: usize,
    pub slack: usize,
    pub artificial: usize,
}

impl TableauShape {
    pub fn of(problem: &StandardForm) -> TableauShape {
        let mut shape = TableauShape {
            rows: problem.rows(),
            structural: problem.cols(),
            slack: 0,
            artificial: 0,
        };
        for kind in normalized_types(problem) {
            match kind {
                ConstraintType::Le => shape.slack += 1,
                ConstraintType::Ge => {
                    shape.slack += 1;
                    shape.artificial += 1;
                },
                ConstraintType::Eq => shape.artificial += 1,
            }
        }
        shape
    }

    pub fn nvar(&self) -> usize {
        self.structural + self.slack + self.artificial
    }

    /// Row stride of the buffer: every phase-1 column plus the rhs.
    pub fn stride(&self) -> usize {
        self.nvar() + 1
    }

    pub fn check(&self) -> Result<(), Error> {
        if self.rows > self.nvar() {
            return Err(Error::OverDetermination {
                rows: self.rows,
                vars: self.nvar(),
            });
        }
        Ok(())
    }
}

fn normalized_types(problem: &StandardForm) -> Vec<ConstraintType> {
    problem
        .kinds
        .iter()
        .enumerate()
        .map(|(i, &kind)| if problem.b[i] >= 0.0 { kind } else { kind.complement() })
        .collect()
}

fn retain_rows<T: Copy>(values: &[T], removed: &[usize]) -> Vec<T> {
    values
        .iter()
        .enumerate()
        .filter(|(i, _)| !removed.contains(i))
        .map(|(_, &v)| v)
        .collect()
}

fn allocate(rows: usize, stride: usize) -> Result<Matrix<f64>, Error> {
    let len = rows.checked_mul(stride).ok_or(Error::MemoryAlloc)?;
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| Error::MemoryAlloc)?;
    data.resize(len, 0.0);
    Ok(Matrix::new(rows, stride, data))
}

/// Dense simplex tableau.
///
/// Row 0 holds the reduced costs and, in its last active column, the
/// current objective value. Rows `1..=m` are the constraint rows. Columns
/// are laid out `[structural | slack | artificial | rhs]`; the buffer keeps
/// its phase-1 stride after the artificial columns are dropped.
///
/// For every constraint row `i`, column `basis[i]` restricted to the
/// constraint rows is the `i`-th unit vector.
#[derive(Debug, Clone)]
pub struct Tableau {
    table: Matrix<f64>,
    width: usize,
    basis: Vec<usize>,
    constypes: Vec<ConstraintType>,
    num_structural: usize,
    num_slack: usize,
    num_artificial: usize,
    scratch: Vec<f64>,
}

impl Tableau {
    /// Builds the phase-1 tableau: rows with a negative rhs are negated,
    /// slack and artificial columns are appended, and row 0 is the sum of
    /// every row that owns an artificial variable.
    pub fn phase_one(problem: &StandardForm) -> Result<Tableau, Error> {
        problem.validate()?;
        let shape = TableauShape::of(problem);
        shape.check()?;

        let m = shape.rows;
        let n = shape.structural;
        let stride = shape.stride();
        let mut tableau = Tableau {
            table: allocate(m + 1, stride)?,
            width: stride,
            basis: Vec::with_capacity(m),
            constypes: normalized_types(problem),
            num_structural: n,
            num_slack: shape.slack,
            num_artificial: shape.artificial,
            scratch: vec![0.0; stride],
        };

        for (i, coefs) in problem.a.row_iter().enumerate() {
            let sign = if problem.b[i] >= 0.0 { 1.0 } else { -1.0 };
            let row = tableau.row_mut(i + 1);
            for (dst, &src) in row.iter_mut().zip(coefs.raw_slice()) {
                *dst = sign * src;
            }
            row[stride - 1] = sign * problem.b[i];
        }

        let mut next_slack = n;
        let mut next_artificial = n + shape.slack;
        for i in 0..m {
            let kind = tableau.constypes[i];
            match kind {
                ConstraintType::Le => {
                    tableau.row_mut(i + 1)[next_slack] = 1.0;
                    tableau.basis.push(next_slack);
                    next_slack += 1;
                },
                ConstraintType::Ge | ConstraintType::Eq => {
                    if kind == ConstraintType::Ge {
                        tableau.row_mut(i + 1)[next_slack] = -1.0;
                        next_slack += 1;
                    }
                    tableau.row_mut(i + 1)[next_artificial] = 1.0;
                    tableau.row_mut(0)[next_artificial] = -1.0;
                    tableau.basis.push(next_artificial);
                    next_artificial += 1;
                },
            }
        }

        for i in 0..m {
            if tableau.constypes[i] != ConstraintType::Le {
                tableau.add_row_to_cost(i, 1.0);
            }
        }

        debug!(
            "phase 1 tableau: rows: {}, structural: {}, slack: {}, artificial: {}",
            m, n, shape.slack, shape.artificial
        );
        Ok(tableau)
    }

    fn row_range(&self, r: usize) -> Range<usize> {
        let start = r * self.table.cols();
        start..start + self.width
    }

    fn row(&self, r: usize) -> &[f64] {
        let range = self.row_range(r);
        &self.table.data()[range]
    }

    fn row_mut(&mut self, r: usize) -> &mut [f64] {
        let range = self.row_range(r);
        &mut self.table.mut_data()[range]
    }

    // Copies row `r` into the scratch row.
    fn load_scratch(&mut self, r: usize) {
        let range = self.row_range(r);
        let width = self.width;
        self.scratch[..width].copy_from_slice(&self.table.data()[range]);
    }

    // row_r += factor * scratch
    fn add_scratch(&mut self, r: usize, factor: f64) {
        let range = self.row_range(r);
        let width = self.width;
        axpy_row(&mut self.table.mut_data()[range], &self.scratch[..width], factor);
    }

    // row_0 += factor * row_{i+1}
    fn add_row_to_cost(&mut self, i: usize, factor: f64) {
        self.load_scratch(i + 1);
        self.add_scratch(0, factor);
    }

    /// Number of constraint rows.
    pub fn rows(&self) -> usize {
        self.basis.len()
    }

    /// Number of active variable columns (the rhs excluded).
    pub fn nvar(&self) -> usize {
        self.width - 1
    }

    pub fn num_structural(&self) -> usize {
        self.num_structural
    }

    /// Structural plus slack columns.
    pub fn num_real(&self) -> usize {
        self.num_structural + self.num_slack
    }

    pub fn num_artificial(&self) -> usize {
        self.num_artificial
    }

    pub fn stride(&self) -> usize {
        self.table.cols()
    }

    pub fn basis(&self) -> &[usize] {
        &self.basis
    }

    pub fn constypes(&self) -> &[ConstraintType] {
        &self.constypes
    }

    pub fn is_basic(&self, j: usize) -> bool {
        self.basis.contains(&j)
    }

    pub fn is_artificial(&self, j: usize) -> bool {
        j >= self.num_real() && j < self.nvar()
    }

    /// Reduced costs of the active columns.
    pub fn reduced_costs(&self) -> &[f64] {
        &self.row(0)[..self.nvar()]
    }

    /// Objective value of the current basic solution (phase 1: sum of the
    /// artificial variables).
    pub fn objective_value(&self) -> f64 {
        self.row(0)[self.nvar()]
    }

    /// Coefficient of column `j` in constraint row `i`.
    pub fn entry(&self, i: usize, j: usize) -> f64 {
        assert!(j < self.width, "column {} out of range", j);
        self.row(i + 1)[j]
    }

    pub fn rhs(&self, i: usize) -> f64 {
        self.row(i + 1)[self.nvar()]
    }

    /// Brings column `q` into the basis at constraint row `p`. Row 0 is
    /// eliminated too unless `update_cost` is false.
    pub fn pivot(&mut self, p: usize, q: usize, update_cost: bool) {
        let y_pq = self.entry(p, q);
        scale_row(self.row_mut(p + 1), 1.0 / y_pq);

        self.load_scratch(p + 1);
        let start = if update_cost { 0 } else { 1 };
        for r in (start..=self.rows()).filter(|&r| r != p + 1) {
            let y_rq = self.row(r)[q];
            if y_rq != 0.0 {
                self.add_scratch(r, -y_rq);
            }
        }
        self.basis[p] = q;
    }

    /// Removes constraint rows (indices into `0..rows()`), together with
    /// their basis and constraint-type entries.
    pub fn remove_rows(&mut self, rows: &[usize]) {
        if rows.is_empty() {
            return;
        }
        let keep: Vec<usize> = (0..=self.rows())
            .filter(|&r| r == 0 || !rows.contains(&(r - 1)))
            .collect();
        self.table = self.table.select_rows(keep.iter());
        self.basis = retain_rows(&self.basis, rows);
        self.constypes = retain_rows(&self.constypes, rows);
    }

    /// Shrinks the active width to the real columns, moving the rhs column
    /// next to the last slack column.
    pub fn drop_artificial_columns(&mut self) {
        let rhs = self.nvar();
        let target = self.num_real();
        if rhs != target {
            let m = self.basis.len();
            let stride = self.table.cols();
            let data = self.table.mut_data();
            for r in 0..=m {
                data[r * stride + target] = data[r * stride + rhs];
            }
        }
        self.width = target + 1;
        self.num_artificial = 0;
    }

    /// Replaces row 0 with the reduced costs of `objective` (structural
    /// columns only; slack columns cost nothing) under the current basis.
    pub fn install_objective(&mut self, objective: &[f64]) {
        assert_eq!(objective.len(), self.num_structural);
        let n = self.num_structural;
        {
            let cost = self.row_mut(0);
            for v in cost.iter_mut() {
                *v = 0.0;
            }
            for (dst, &c) in cost.iter_mut().zip(objective) {
                *dst = -c;
            }
        }
        for i in 0..self.rows() {
            let j = self.basis[i];
            if j < n && objective[j] != 0.0 {
                self.add_row_to_cost(i, objective[j]);
            }
        }
    }

    /// Values of the structural variables in the current basic solution.
    pub fn basic_solution(&self) -> Vec<f64> {
        let mut x = vec![0.0; self.num_structural];
        for (i, &j) in self.basis.iter().enumerate() {
            if j < self.num_structural {
                x[j] = self.rhs(i);
            }
        }
        x
    }
}
