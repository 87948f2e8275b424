#![cfg(test)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::problem::*;

// Generate a random dense LP with the specified size and seed.
// The problem is feasible by construction: the rows are built around a
// random positive point, and every variable is capped at 10 so the
// objective is bounded.
pub fn dense_seeded(rows: usize, cols: usize, seed: u64) -> Model {
    let mut rng = StdRng::seed_from_u64(seed);
    let x: Vec<f64> = (0..cols).map(|_| rng.gen_range(0.01..5.0)).collect();

    let mut constraints = Vec::with_capacity(rows);
    for i in 0..rows {
        let coefficients: Vec<f64> = (0..cols).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let lhs: f64 = coefficients.iter().zip(&x).map(|(a, v)| a * v).sum();
        let slack = rng.gen_range(0.0..1.0);
        let (kind, rhs) = match i % 3 {
            0 => (ConstraintType::Le, lhs + slack),
            1 => (ConstraintType::Ge, lhs - slack),
            _ => (ConstraintType::Eq, lhs),
        };
        constraints.push(LinearConstraint::from_dense(coefficients, kind, rhs));
    }

    let objective = (0..cols).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let bounds = (0..cols).map(|_| VariableBound::upper(10.0)).collect();
    Model::new(objective, constraints, Some(bounds))
}

#[test]
fn seeded_problems_are_reproducible() {
    let first = dense_seeded(4, 6, 7);
    assert_eq!(first, dense_seeded(4, 6, 7));
    assert_ne!(first, dense_seeded(4, 6, 8));
    assert_eq!(first.num_constraints(), 4);
    assert_eq!(first.num_vars(), 6);
}
