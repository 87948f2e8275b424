use std::fmt;
use std::str::FromStr;

use log::{debug, trace, warn};

use crate::builder::standard_form;
use crate::error::Error;
use crate::problem::*;
use crate::tableau::Tableau;

/// Rule used to pick the entering column of a pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EnteringRule {
    /// Largest positive reduced cost.
    Dantzig,
    /// Lowest-indexed column with a positive reduced cost. Never cycles.
    Bland,
}

impl FromStr for EnteringRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<EnteringRule, Error> {
        match s {
            "dantzig" => Ok(EnteringRule::Dantzig),
            "bland" => Ok(EnteringRule::Bland),
            _ => Err(Error::InvalidOptions("entering rule must be \"dantzig\" or \"bland\"")),
        }
    }
}

impl fmt::Display for EnteringRule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            EnteringRule::Dantzig => write!(f, "dantzig"),
            EnteringRule::Bland => write!(f, "bland"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Tolerances {
    /// Reduced costs at or below this are treated as non-positive.
    pub optimal: f64,
    /// Largest phase-1 optimum still accepted as feasible.
    pub feasible: f64,
    /// Smallest objective decrease that does not count as a stall.
    pub degenerate: f64,
    /// Smallest column entry accepted by the ratio test.
    pub pivot: f64,
    pub bland_start: f64,
    pub bland_floor: f64,
    /// Entries below this cannot replace a basic artificial variable.
    pub zero: f64,
    /// Phase-1 optima below `-phase_one_negative` are numerical garbage.
    pub phase_one_negative: f64,
}

impl Default for Tolerances {
    fn default() -> Tolerances {
        Tolerances {
            optimal: 1e-9,
            feasible: 1e-5,
            degenerate: 1e-12,
            pivot: 1e-15,
            bland_start: 1e-6,
            bland_floor: 1e-9,
            zero: 1e-9,
            phase_one_negative: 1e-9,
        }
    }
}

impl Tolerances {
    fn all(&self) -> [(&'static str, f64); 8] {
        [
            ("optimal", self.optimal),
            ("feasible", self.feasible),
            ("degenerate", self.degenerate),
            ("pivot", self.pivot),
            ("bland_start", self.bland_start),
            ("bland_floor", self.bland_floor),
            ("zero", self.zero),
            ("phase_one_negative", self.phase_one_negative),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimplexOptions {
    pub rule: EnteringRule,
    /// Pivot rounds allowed over both phases.
    pub max_iterations: usize,
    /// Consecutive non-improving rounds tolerated before giving up.
    pub stall_limit: usize,
    pub tolerances: Tolerances,
}

impl Default for SimplexOptions {
    fn default() -> SimplexOptions {
        SimplexOptions {
            rule: EnteringRule::Bland,
            max_iterations: 1000,
            stall_limit: 50,
            tolerances: Tolerances::default(),
        }
    }
}

impl SimplexOptions {
    pub fn rule(mut self, rule: EnteringRule) -> SimplexOptions {
        self.rule = rule;
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> SimplexOptions {
        self.max_iterations = max_iterations;
        self
    }

    pub fn stall_limit(mut self, stall_limit: usize) -> SimplexOptions {
        self.stall_limit = stall_limit;
        self
    }

    pub fn tolerances(mut self, tolerances: Tolerances) -> SimplexOptions {
        self.tolerances = tolerances;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.max_iterations == 0 {
            return Err(Error::InvalidOptions("max_iterations must be positive"));
        }
        for (name, value) in self.tolerances.all().iter() {
            if value.is_nan() || *value < 0.0 {
                warn!("rejecting tolerance {} = {}", name, value);
                return Err(Error::InvalidOptions("tolerances must be nonnegative numbers"));
            }
        }
        if self.tolerances.bland_start < self.tolerances.bland_floor {
            return Err(Error::InvalidOptions("bland_start must not be below bland_floor"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    Phase1Running,
    Phase1Optimal,
    Phase2Running,
    Phase2Optimal,
}

impl SolverState {
    fn is_phase_one(self) -> bool {
        match self {
            SolverState::Phase1Running | SolverState::Phase1Optimal => true,
            SolverState::Phase2Running | SolverState::Phase2Optimal => false,
        }
    }
}

enum Round {
    Optimal,
    Pivoted,
}

struct Solver<'a> {
    tableau: Tableau,
    options: &'a SimplexOptions,
    state: SolverState,
    epoch: usize,
}

impl<'a> Solver<'a> {
    fn new(problem: &StandardForm, options: &'a SimplexOptions) -> Result<Solver<'a>, Error> {
        Ok(Solver {
            tableau: Tableau::phase_one(problem)?,
            options,
            state: SolverState::Phase1Running,
            epoch: 0,
        })
    }

    fn advance(&mut self, state: SolverState) {
        debug!(
            "{:?} -> {:?} after {} rounds, objective {}",
            self.state,
            state,
            self.epoch,
            self.tableau.objective_value()
        );
        self.state = state;
    }

    fn is_optimal(&self) -> bool {
        let tol = self.options.tolerances.optimal;
        self.tableau.reduced_costs().iter().all(|&r| r <= tol)
    }

    fn entering(&self) -> Option<usize> {
        match self.options.rule {
            EnteringRule::Dantzig => entering_dantzig(&self.tableau, self.options.tolerances.optimal),
            EnteringRule::Bland => entering_bland(&self.tableau, &self.options.tolerances),
        }
    }

    fn pivot_round(&mut self) -> Result<Round, Error> {
        if self.is_optimal() {
            return Ok(Round::Optimal);
        }
        let q = self.entering().ok_or(Error::PrecisionError)?;
        let p = match leaving_row(&self.tableau, q, self.options.tolerances.pivot) {
            Some(p) => p,
            // The phase-1 objective is bounded below by zero.
            None if self.state.is_phase_one() => return Err(Error::PrecisionError),
            None => return Err(Error::Unbounded),
        };
        trace!(
            "round {}: column {} enters, column {} leaves at row {}",
            self.epoch,
            q,
            self.tableau.basis()[p],
            p
        );
        self.tableau.pivot(p, q, true);
        Ok(Round::Pivoted)
    }

    // Pivots until the current phase is optimal. The iteration budget is
    // shared by both phases.
    fn run_phase(&mut self) -> Result<(), Error> {
        let mut old_value = f64::INFINITY;
        let mut stalled = 0;
        while self.epoch < self.options.max_iterations {
            self.epoch += 1;
            if let Round::Optimal = self.pivot_round()? {
                return Ok(());
            }
            let value = self.tableau.objective_value();
            if old_value <= value + self.options.tolerances.degenerate && !self.is_optimal() {
                stalled += 1;
                if stalled > self.options.stall_limit {
                    debug!("objective stalled at {} for {} rounds", value, stalled);
                    return Err(Error::Degeneracy);
                }
            } else {
                stalled = 0;
            }
            old_value = value;
        }
        Err(Error::IterationLimit {
            limit: self.options.max_iterations,
        })
    }

    fn phase_one(&mut self) -> Result<(), Error> {
        self.run_phase()?;
        self.advance(SolverState::Phase1Optimal);

        let tol = &self.options.tolerances;
        let value = self.tableau.objective_value();
        if value < -tol.phase_one_negative {
            return Err(Error::PrecisionError);
        }
        if value > tol.feasible {
            return Err(Error::Infeasible);
        }
        self.drive_out_artificials();
        self.tableau.drop_artificial_columns();
        Ok(())
    }

    // Replaces every artificial variable left in the basis by the real
    // column with the largest entry in its row. Rows without such a column
    // are linear combinations of other rows and are removed.
    fn drive_out_artificials(&mut self) {
        let zero = self.options.tolerances.zero;
        let mut redundant = Vec::new();
        for i in 0..self.tableau.rows() {
            if !self.tableau.is_artificial(self.tableau.basis()[i]) {
                continue;
            }
            let mut best: Option<(usize, f64)> = None;
            for j in (0..self.tableau.num_real()).filter(|&j| !self.tableau.is_basic(j)) {
                let magnitude = self.tableau.entry(i, j).abs();
                match best {
                    Some((_, m)) if magnitude <= m => {},
                    _ => best = Some((j, magnitude)),
                }
            }
            match best {
                Some((q, m)) if m > zero => self.tableau.pivot(i, q, false),
                _ => redundant.push(i),
            }
        }
        if !redundant.is_empty() {
            warn!("removing {} redundant constraint rows: {:?}", redundant.len(), redundant);
            self.tableau.remove_rows(&redundant);
        }
    }

    fn phase_two(&mut self, objective: &[f64]) -> Result<(), Error> {
        self.tableau.install_objective(objective);
        self.advance(SolverState::Phase2Running);
        self.run_phase()?;
        self.advance(SolverState::Phase2Optimal);
        Ok(())
    }

    fn solution(&self) -> Solution {
        Solution {
            x: self.tableau.basic_solution(),
            value: self.tableau.objective_value(),
            iterations: self.epoch,
        }
    }
}

fn entering_dantzig(tableau: &Tableau, tol: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (j, &r) in tableau.reduced_costs().iter().enumerate() {
        if r <= tol || tableau.is_basic(j) {
            continue;
        }
        match best {
            Some((_, b)) if r <= b => {},
            _ => best = Some((j, r)),
        }
    }
    best.map(|(j, _)| j)
}

// The threshold starts loose and tightens until some column qualifies.
fn entering_bland(tableau: &Tableau, tol: &Tolerances) -> Option<usize> {
    let reduced_costs = tableau.reduced_costs();
    let mut eps = tol.bland_start;
    while eps >= tol.bland_floor {
        let found = reduced_costs
            .iter()
            .enumerate()
            .position(|(j, &r)| r > eps && !tableau.is_basic(j));
        if found.is_some() {
            return found;
        }
        eps /= 10.0;
    }
    None
}

// Minimum ratio test over rows with a positive entry in column `q`. Ties
// go to the lowest row.
fn leaving_row(tableau: &Tableau, q: usize, tol: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for i in 0..tableau.rows() {
        let y_iq = tableau.entry(i, q);
        if y_iq <= tol {
            continue;
        }
        let ratio = tableau.rhs(i) / y_iq;
        match best {
            Some((_, r)) if ratio >= r => {},
            _ => best = Some((i, ratio)),
        }
    }
    best.map(|(i, _)| i)
}

fn optimize<'a>(problem: &StandardForm, options: &'a SimplexOptions) -> Result<Solver<'a>, Error> {
    debug!(
        "simplex: {} rows, {} columns, rule {}, at most {} rounds",
        problem.rows(),
        problem.cols(),
        options.rule,
        options.max_iterations
    );
    let mut solver = Solver::new(problem, options)?;
    solver.phase_one()?;
    solver.phase_two(problem.c.data())?;
    Ok(solver)
}

/// Solves a problem already in standard form (every variable `>= 0`).
pub fn solve_form(problem: &StandardForm, options: &SimplexOptions) -> Result<Solution, Error> {
    options.validate()?;
    optimize(problem, options).map(|solver| solver.solution())
}

/// Minimizes `objective . x` subject to `constraints`, with every variable
/// `>= 0`.
pub fn solve_standard(
    objective: &[f64],
    constraints: &[LinearConstraint],
    options: &SimplexOptions,
) -> Result<Solution, Error> {
    let problem = StandardForm::from_constraints(objective, constraints)?;
    solve_form(&problem, options)
}

/// Minimizes `objective . x` subject to `constraints` and `bounds`. Without
/// bounds every variable is `>= 0`.
pub fn solve(
    objective: &[f64],
    constraints: &[LinearConstraint],
    bounds: Option<&[VariableBound]>,
    options: &SimplexOptions,
) -> Result<Solution, Error> {
    options.validate()?;
    let (problem, recovery) = standard_form(objective, constraints, bounds)?;
    let solution = optimize(&problem, options)?.solution();
    let (x, value) = recovery.recover(&solution.x, solution.value);
    Ok(Solution {
        x,
        value,
        iterations: solution.iterations,
    })
}

impl Model {
    pub fn solve(&self, options: &SimplexOptions) -> Result<Solution, Error> {
        solve(
            &self.objective,
            &self.constraints,
            self.bounds.as_deref(),
            options,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulinalg::matrix::Matrix;
    use rulinalg::vector::Vector;

    use crate::problem::ConstraintType::*;

    fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < tol, "{:?} != {:?}", actual, expected);
        }
    }

    fn row(coefficients: &[f64], kind: ConstraintType, rhs: f64) -> LinearConstraint {
        LinearConstraint::from_dense(coefficients.to_vec(), kind, rhs)
    }

    fn equality_problem() -> StandardForm {
        StandardForm {
            a: Matrix::new(2, 5, vec![
                3.0, 2.0, 1.0, 1.0, 0.0,
                2.0, 5.0, 3.0, 0.0, 1.0,
            ]),
            b: Vector::new(vec![10.0, 15.0]),
            c: Vector::new(vec![-2.0, -3.0, -4.0, 0.0, 0.0]),
            kinds: vec![Eq, Eq],
        }
    }

    // min -x0 + 4 x1, x0 free, x1 >= -3
    fn free_and_shifted() -> Model {
        Model::new(
            vec![-1.0, 4.0],
            vec![
                row(&[-3.0, 1.0], Le, 6.0),
                row(&[-1.0, -2.0], Ge, -4.0),
            ],
            Some(vec![VariableBound::free(), VariableBound::lower(-3.0)]),
        )
    }

    // min -x - y / 3, x and y free
    fn hexagon() -> Model {
        Model::new(
            vec![-1.0, -1.0 / 3.0],
            vec![
                row(&[1.0, 1.0], Le, 2.0),
                row(&[1.0, 0.25], Le, 1.0),
                row(&[1.0, -1.0], Le, 2.0),
                row(&[-0.25, -1.0], Le, 1.0),
                row(&[-1.0, -1.0], Le, -1.0),
                row(&[-1.0, 1.0], Le, 2.0),
            ],
            Some(vec![VariableBound::free(), VariableBound::free()]),
        )
    }

    fn beale() -> (Vec<f64>, Vec<LinearConstraint>) {
        (
            vec![-0.75, 20.0, -0.5, 6.0],
            vec![
                row(&[0.25, -8.0, -1.0, 9.0], Le, 0.0),
                row(&[0.5, -12.0, -0.5, 3.0], Le, 0.0),
                row(&[0.0, 0.0, 1.0, 0.0], Le, 1.0),
            ],
        )
    }

    // netlib AFIRO, 27 rows and 32 columns, as (row, column, value)
    fn afiro() -> (Vec<f64>, Vec<LinearConstraint>) {
        let mut objective = vec![0.0; 32];
        for &(j, c) in [(1, -0.4), (12, -0.32), (16, -0.6), (28, -0.48), (31, 10.0)].iter() {
            objective[j] = c;
        }
        let rows: [(ConstraintType, f64, &[(usize, f64)]); 27] = [
            (Eq, 0.0, &[(0, -1.0), (1, 1.0), (2, 1.0)]),
            (Eq, 0.0, &[(0, -1.06), (3, 1.0)]),
            (Le, 80.0, &[(0, 1.0)]),
            (Le, 0.0, &[(1, -1.0), (12, 1.4)]),
            (Eq, 0.0, &[(4, -1.0), (5, -1.0), (6, -1.0), (7, -1.0), (12, 1.0), (13, 1.0)]),
            (Eq, 0.0, &[(4, -1.06), (5, -1.06), (6, -0.96), (7, -0.86), (14, 1.0)]),
            (Le, 80.0, &[(4, 1.0), (8, -1.0)]),
            (Le, 0.0, &[(5, 1.0), (9, -1.0)]),
            (Le, 0.0, &[(6, 1.0), (10, -1.0)]),
            (Le, 0.0, &[(7, 1.0), (11, -1.0)]),
            (Eq, 0.0, &[(15, -1.0), (16, 1.0), (17, 1.0), (18, 1.0)]),
            (Eq, 0.0, &[(15, -0.43), (19, 1.0)]),
            (Le, 500.0, &[(15, 1.0)]),
            (Le, 0.0, &[(16, -1.0), (28, 1.4)]),
            (Eq, 0.0, &[(20, -0.43), (21, -0.43), (22, -0.39), (23, -0.37), (30, 1.0)]),
            (Eq, 0.0, &[(20, 1.0), (21, 1.0), (22, 1.0), (23, 1.0), (28, -1.0), (29, 1.0), (31, 1.0)]),
            (Le, 44.0, &[(20, 1.0), (24, -1.0)]),
            (Le, 500.0, &[(21, 1.0), (25, -1.0)]),
            (Le, 0.0, &[(22, 1.0), (26, -1.0)]),
            (Le, 0.0, &[(23, 1.0), (27, -1.0)]),
            (Le, 0.0, &[
                (8, 2.364), (9, 2.386), (10, 2.408), (11, 2.429), (18, -1.0),
                (24, 2.191), (25, 2.219), (26, 2.249), (27, 2.279),
            ]),
            (Le, 0.0, &[(2, -1.0), (15, 0.109)]),
            (Le, 0.0, &[(13, -1.0), (20, 0.109), (21, 0.108), (22, 0.108), (23, 0.107)]),
            (Le, 0.0, &[(0, 0.301), (17, -1.0)]),
            (Le, 0.0, &[(4, 0.301), (5, 0.313), (6, 0.313), (7, 0.326), (29, -1.0)]),
            (Le, 310.0, &[(3, 1.0), (19, 1.0)]),
            (Le, 300.0, &[(14, 1.0), (30, 1.0)]),
        ];
        let constraints = rows
            .iter()
            .map(|&(kind, rhs, entries)| {
                entries
                    .iter()
                    .fold(LinearConstraint::new(32), |c, &(j, v)| c.add(j, v))
                    .value(kind, rhs)
            })
            .collect();
        (objective, constraints)
    }

    #[test]
    fn solves_equality_form() {
        let solution = solve_form(&equality_problem(), &SimplexOptions::default())
            .expect("Solve should not fail");
        assert_close(&solution.x, &[0.0, 0.0, 5.0, 5.0, 0.0], 1e-9);
        assert!((solution.value + 20.0).abs() < 1e-9);
        assert!(solution.iterations >= 2);
    }

    #[test]
    fn infeasible_equalities() {
        let problem = StandardForm {
            a: Matrix::new(3, 3, vec![
                1.0, 1.0, 0.0,
                0.0, -1.0, 1.0,
                1.0, 0.0, 1.0,
            ]),
            b: Vector::new(vec![5.0, 10.0, 12.0]),
            c: Vector::new(vec![-1.0, -1.0, -1.0]),
            kinds: vec![Eq, Eq, Eq],
        };
        match solve_form(&problem, &SimplexOptions::default()) {
            Err(Error::Infeasible) => {},
            other => panic!("expected infeasible, got {:?}", other),
        }
    }

    #[test]
    fn unbounded_ray() {
        let constraints = vec![row(&[1.0, -2.0], Eq, 5.0)];
        match solve_standard(&[-1.0, -1.0], &constraints, &SimplexOptions::default()) {
            Err(Error::Unbounded) => {},
            other => panic!("expected unbounded, got {:?}", other),
        }
    }

    #[test]
    fn free_and_lower_bounded_variables() {
        let solution = free_and_shifted()
            .solve(&SimplexOptions::default())
            .expect("Solve should not fail");
        assert_close(&solution.x, &[10.0, -3.0], 1e-9);
        assert!((solution.value + 22.0).abs() < 1e-9);
    }

    #[test]
    fn free_variables_on_six_rows() {
        let model = hexagon();
        for &rule in [EnteringRule::Bland, EnteringRule::Dantzig].iter() {
            let solution = model
                .solve(&SimplexOptions::default().rule(rule))
                .expect("Solve should not fail");
            assert_close(&solution.x, &[2.0 / 3.0, 4.0 / 3.0], 1e-9);
            assert!((solution.value + 10.0 / 9.0).abs() < 1e-9);
            assert!(model.is_feasible(&solution.x, 1e-9));
        }
    }

    #[test]
    fn beale_does_not_loop() {
        let (objective, constraints) = beale();
        let options = SimplexOptions::default().max_iterations(1000);
        match solve_standard(&objective, &constraints, &options) {
            Ok(solution) => {
                assert!((solution.value + 1.25).abs() < 1e-9);
                assert!(solution.iterations < 1000);
            },
            Err(Error::Degeneracy) => {},
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    #[test]
    fn degenerate_pivots_exhaust_stall_limit() {
        let (objective, constraints) = beale();
        let options = SimplexOptions::default().stall_limit(0);
        match solve_standard(&objective, &constraints, &options) {
            Err(Error::Degeneracy) => {},
            other => panic!("expected degeneracy, got {:?}", other),
        }
    }

    #[test]
    fn netlib_afiro() {
        let (objective, constraints) = afiro();
        let solution = solve_standard(&objective, &constraints, &SimplexOptions::default())
            .expect("AFIRO solves under Bland's rule");
        assert!((solution.value + 464.7531428571).abs() < 1e-6, "{}", solution.value);
        let model = Model::new(objective, constraints, None);
        assert!(model.is_feasible(&solution.x, 1e-6));
        assert!((model.objective_value(&solution.x) - solution.value).abs() < 1e-6);
    }

    #[test]
    fn iteration_budget_covers_both_phases() {
        // Phase 1 is optimal at once and spends the only round.
        let options = SimplexOptions::default().max_iterations(1);
        match free_and_shifted().solve(&options) {
            Err(Error::IterationLimit { limit: 1 }) => {},
            other => panic!("expected iteration limit, got {:?}", other),
        }
    }

    #[test]
    fn final_tableau_is_optimal() {
        let options = SimplexOptions::default().rule(EnteringRule::Dantzig);
        let problem = equality_problem();
        let solver = optimize(&problem, &options).expect("Solve should not fail");
        assert_eq!(solver.state, SolverState::Phase2Optimal);
        assert!(solver.is_optimal());
        assert_eq!(solver.tableau.num_artificial(), 0);
        assert!(solver.tableau.basis().iter().all(|&j| j < solver.tableau.nvar()));
    }

    #[test]
    fn redundant_rows_are_removed() {
        // The second row is twice the first.
        let constraints = vec![
            row(&[1.0, 1.0], Eq, 2.0),
            row(&[2.0, 2.0], Eq, 4.0),
            row(&[1.0, 0.0], Le, 1.5),
        ];
        let problem = StandardForm::from_constraints(&[-1.0, 0.0], &constraints)
            .expect("dimensions agree");
        let options = SimplexOptions::default();
        let solver = optimize(&problem, &options).expect("Solve should not fail");
        assert_eq!(solver.tableau.rows(), 2);
        let solution = solver.solution();
        assert_close(&solution.x, &[1.5, 0.5], 1e-9);
        assert!((solution.value + 1.5).abs() < 1e-9);
    }

    #[test]
    fn solving_twice_is_deterministic() {
        let (objective, constraints) = afiro();
        let options = SimplexOptions::default().rule(EnteringRule::Dantzig);
        let first = solve_standard(&objective, &constraints, &options);
        let second = solve_standard(&objective, &constraints, &options);
        match (first, second) {
            (Ok(a), Ok(b)) => assert_eq!(a, b),
            (Err(a), Err(b)) => assert_eq!(a.to_string(), b.to_string()),
            (a, b) => panic!("results differ: {:?} vs {:?}", a, b),
        }
    }

    #[test]
    fn rules_parse_and_print() {
        assert_eq!("dantzig".parse::<EnteringRule>().ok(), Some(EnteringRule::Dantzig));
        assert_eq!("bland".parse::<EnteringRule>().ok(), Some(EnteringRule::Bland));
        assert!("pan97".parse::<EnteringRule>().is_err());
        assert_eq!(EnteringRule::Bland.to_string(), "bland");
    }

    #[test]
    fn invalid_options_are_rejected() {
        let zero_budget = SimplexOptions::default().max_iterations(0);
        assert!(zero_budget.validate().is_err());

        let mut tolerances = Tolerances::default();
        tolerances.pivot = -1.0;
        let negative = SimplexOptions::default().tolerances(tolerances);
        match solve(&[1.0], &[], None, &negative) {
            Err(Error::InvalidOptions(_)) => {},
            other => panic!("expected invalid options, got {:?}", other),
        }

        tolerances.pivot = f64::NAN;
        assert!(SimplexOptions::default().tolerances(tolerances).validate().is_err());
        assert!(SimplexOptions::default().validate().is_ok());
    }

    #[test]
    fn mismatched_standard_form_is_rejected() {
        // a has a column the objective does not cover
        let wide = StandardForm {
            a: Matrix::new(1, 3, vec![1.0, 1.0, 1.0]),
            b: Vector::new(vec![4.0]),
            c: Vector::new(vec![-1.0, 0.0]),
            kinds: vec![Le],
        };
        match solve_form(&wide, &SimplexOptions::default()) {
            Err(Error::DimensionMismatch { expected: 2, found: 3, .. }) => {},
            other => panic!("expected dimension mismatch, got {:?}", other),
        }

        let short_rhs = StandardForm {
            a: Matrix::new(2, 2, vec![1.0, 1.0, 1.0, -1.0]),
            b: Vector::new(vec![4.0]),
            c: Vector::new(vec![-1.0, 0.0]),
            kinds: vec![Le, Ge],
        };
        match solve_form(&short_rhs, &SimplexOptions::default()) {
            Err(Error::DimensionMismatch { expected: 2, found: 1, .. }) => {},
            other => panic!("expected dimension mismatch, got {:?}", other),
        }
    }

    #[test]
    fn no_entering_column_above_threshold() {
        // The only positive reduced cost (1e-4) is above the optimality
        // tolerance but below every Bland threshold.
        let mut tolerances = Tolerances::default();
        tolerances.bland_start = 1e-3;
        tolerances.bland_floor = 1e-3;
        let options = SimplexOptions::default().tolerances(tolerances);
        let constraints = vec![row(&[1.0], Le, 1.0)];
        match solve_standard(&[-1e-4], &constraints, &options) {
            Err(Error::PrecisionError) => {},
            other => panic!("expected precision error, got {:?}", other),
        }

        let solution = solve_standard(&[-1e-4], &constraints, &SimplexOptions::default())
            .expect("default thresholds reach 1e-4");
        assert_close(&solution.x, &[1.0], 1e-12);
    }

    #[test]
    fn ratio_test_failure_depends_on_phase() {
        // No entry clears a pivot tolerance of 10.
        let mut tolerances = Tolerances::default();
        tolerances.pivot = 10.0;
        let options = SimplexOptions::default().tolerances(tolerances);

        // The artificial of the equality row cannot leave in phase 1.
        let equality = vec![row(&[1.0], Eq, 1.0)];
        match solve_standard(&[1.0], &equality, &options) {
            Err(Error::PrecisionError) => {},
            other => panic!("expected precision error, got {:?}", other),
        }

        // Phase 1 is trivially optimal, x0 cannot enter in phase 2.
        let upper = vec![row(&[1.0], Le, 1.0)];
        match solve_standard(&[-1.0], &upper, &options) {
            Err(Error::Unbounded) => {},
            other => panic!("expected unbounded, got {:?}", other),
        }
    }

    #[test]
    fn dimension_mismatch_is_reported() {
        let constraints = vec![row(&[1.0, 1.0, 1.0], Le, 1.0)];
        match solve_standard(&[1.0, 1.0], &constraints, &SimplexOptions::default()) {
            Err(Error::DimensionMismatch { .. }) => {},
            other => panic!("expected dimension mismatch, got {:?}", other),
        }
    }
}
