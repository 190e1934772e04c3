//! Linear programming by the primal interior path method.
//!
//! Models are reduced to equality form with slack variables, wrapped in a
//! self-dual auxiliary model with a known strictly feasible starting
//! point, and driven to optimality by a path-following iteration.

#[macro_use]
extern crate log;
extern crate rand;
extern crate rulinalg;

pub mod error;
pub mod problem;
pub mod embed;
pub mod interior;
pub mod builder;

mod random_tests;
