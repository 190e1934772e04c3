#![cfg(test)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rulinalg::matrix::Matrix;
use rulinalg::vector::Vector;

use embed;
use interior;
use problem::StandardForm;

// Random dense model with entries of both signs, for the algebraic
// identities that hold for arbitrary data.
fn arbitrary_model(rows: usize, cols: usize, seed: u64) -> StandardForm {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut a_data = Vec::with_capacity(rows * cols);
    for _ in 0..rows * cols {
        a_data.push(rng.gen_range(-2.0..2.0));
    }
    let mut b_data = Vec::with_capacity(rows);
    for _ in 0..rows {
        b_data.push(rng.gen_range(-5.0..5.0));
    }
    let mut c_data = Vec::with_capacity(cols);
    for _ in 0..cols {
        c_data.push(rng.gen_range(-3.0..3.0));
    }
    StandardForm {
        a: Matrix::new(rows, cols, a_data),
        b: Vector::new(b_data),
        c: Vector::new(c_data),
    }
}

// Random inequality model generated to be feasible and bounded: the
// constraint matrix is strictly positive, the right-hand side leaves
// slack at a known interior point, and every cost is negative.
fn solvable_inequality_model(rows: usize, cols: usize, seed: u64) -> StandardForm {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut a_data = Vec::with_capacity(rows * cols);
    for _ in 0..rows * cols {
        a_data.push(rng.gen_range(0.2..1.0));
    }
    let a = Matrix::new(rows, cols, a_data);

    let mut x_hat = Vec::with_capacity(cols);
    for _ in 0..cols {
        x_hat.push(rng.gen_range(0.5..1.5));
    }
    let loads = &a * Vector::new(x_hat);
    let mut b_data = Vec::with_capacity(rows);
    for i in 0..rows {
        b_data.push(loads[i] + rng.gen_range(0.1..0.5));
    }

    let mut c_data = Vec::with_capacity(cols);
    for _ in 0..cols {
        c_data.push(rng.gen_range(-1.0..-0.1));
    }

    StandardForm {
        a: a,
        b: Vector::new(b_data),
        c: Vector::new(c_data),
    }
}

#[test]
fn embedded_start_feasible_for_random_models() {
    for seed in 0..8 {
        let model = arbitrary_model(3, 5, seed);
        for &alpha in [0.7, 2.5, 10.0].iter() {
            let embedding = embed::embed(&model, alpha)
                .expect("Embedding should not fail");
            assert_eq!(embedding.mu0, alpha * alpha);
            for &v in embedding.x0.iter() {
                assert!(v > 0.0);
            }
            let residual = &embedding.model.a * &embedding.x0 - &embedding.model.b;
            for &r in residual.iter() {
                assert!(
                    r.abs() < 1e-8,
                    "seed {} alpha {}: residual {}",
                    seed, alpha, r
                );
            }
        }
    }
}

#[test]
fn slack_completion_holds_for_random_models() {
    for seed in 100..108 {
        let mut rng = StdRng::seed_from_u64(seed);
        let base = arbitrary_model(4, 3, seed);

        let mut x_data = Vec::with_capacity(3);
        for _ in 0..3 {
            x_data.push(rng.gen_range(0.0..2.0));
        }
        let x = Vector::new(x_data);

        // Give the point slack room on top of its constraint loads so
        // it is feasible by construction.
        let loads = &base.a * &x;
        let mut b_data = Vec::with_capacity(4);
        for i in 0..4 {
            b_data.push(loads[i] + rng.gen_range(0.0..1.0));
        }
        let model = StandardForm {
            a: base.a,
            b: Vector::new(b_data),
            c: base.c,
        };

        let reduced = embed::reduce_inequality(&model)
            .expect("Reduction should not fail");
        let slack = &model.b - &model.a * &x;
        let mut full = x.data().clone();
        full.extend(slack.data().iter());

        let residual = &reduced.a * Vector::new(full) - &model.b;
        for &r in residual.iter() {
            assert!(r.abs() < 1e-12, "seed {}: residual {}", seed, r);
        }
    }
}

#[test]
fn random_inequality_models_solve_to_small_gap() {
    for seed in 0..3 {
        let model = solvable_inequality_model(3, 4, seed);
        let solution = interior::solve_inequality(&model, 30.0)
            .expect("Interior path should not fail on a generated model");

        // The generator puts a strictly feasible point with negative
        // cost inside the region, so the optimum is negative.
        assert!(solution.objective < 0.0);

        // Terminal iterate stays interior and near feasible for the
        // original inequalities.
        for &v in solution.x.iter() {
            assert!(v > 0.0);
        }
        let structural = Vector::new(solution.x.data()[..4].to_vec());
        let loads = &model.a * &structural;
        for i in 0..3 {
            assert!(
                loads[i] <= model.b[i] + 1e-4,
                "seed {}: row {} violated by {}",
                seed, i,
                loads[i] - model.b[i]
            );
        }

        let gap = model.b.dot(&solution.y) - solution.objective;
        assert!(gap.abs() < 1e-2, "seed {}: gap {}", seed, gap);
    }
}
