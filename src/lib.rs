//! Dense two-phase primal simplex solver for linear programs.
//!
//! A general problem (free, lower-, upper- and box-bounded variables) is
//! rewritten into standard form by [`builder`], solved on a dense tableau
//! by [`simplex`], and mapped back onto the caller's variables. Models can
//! also be read from MPS files with [`mps`].

pub mod error;
pub mod linalg;
pub mod problem;
pub mod builder;
pub mod tableau;
pub mod simplex;
pub mod mps;

mod bench_util;


pub use crate::error::Error;
pub use crate::problem::{
    BoundType, ConstraintType, LinearConstraint, Model, Solution, StandardForm, VariableBound,
};
pub use crate::simplex::{solve, solve_standard, EnteringRule, SimplexOptions, Tolerances};
