// Primal path-following method, following the interior path algorithm
// in chapter 6 of Sierksma & Zwols, "Linear and Integer Optimization".

use rulinalg::matrix::{BaseMatrix, BaseMatrixMut};
#[cfg(test)]
use rulinalg::matrix::Matrix;
use rulinalg::vector::Vector;

use embed;
use error::{Degeneracy, Error};
use problem::{Solution, StandardForm};

/// Precision parameter used by the convenience entry points. The target
/// path parameter is e^(-t)/n, small enough for an objective error
/// below 10^(-t).
pub const DEFAULT_PRECISION: u32 = 10;

#[derive(Debug, Clone)]
struct PathState {
    x: Vector<f64>,
    mu: f64,
}

impl PathState {
    // One path-following update: shrink mu, then take the projected
    // scaled step x <- x + X * P_AX * (e - Xc/mu), where P_AX projects
    // onto the null space of AX.
    fn advance(&mut self, model: &StandardForm, theta: f64) -> Result<(), Error> {
        let n = self.x.size();
        self.mu = (1.0 - theta) * self.mu;

        // AX scales column j of A by x_j.
        let mut ax = model.a.clone();
        for (j, mut col) in ax.col_iter_mut().enumerate() {
            *col *= self.x[j];
        }

        let mut v_data = Vec::with_capacity(n);
        for j in 0..n {
            v_data.push(1.0 - self.x[j] * model.c[j] / self.mu);
        }
        let v = Vector::new(v_data);

        // With u solving (AX * AX^T) u = AX v, the projection of v is
        // v - AX^T u. The solve stands in for the explicit inverse of
        // the Gram matrix, which is both faster and better conditioned.
        let axt = ax.transpose();
        let gram = &ax * &axt;
        let u = gram.solve(&ax * &v)?;
        let p = v - axt * u;

        let mut next = Vec::with_capacity(n);
        for j in 0..n {
            let value = self.x[j] * (1.0 + p[j]);
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::NumericalDegeneracy(
                    Degeneracy::NonPositiveCoordinate { index: j, value: value },
                ));
            }
            next.push(value);
        }
        self.x = Vector::new(next);
        Ok(())
    }
}

// w satisfies Xw = mu*e componentwise; y solves the normal equations
// (A A^T) y = A (c - w).
fn recover_dual(
    model: &StandardForm,
    x: &Vector<f64>,
    mu: f64,
) -> Result<(Vector<f64>, Vector<f64>), Error> {
    let w = Vector::new(x.iter().map(|&v| mu / v).collect::<Vec<f64>>());
    let gram = &model.a * model.a.transpose();
    let y = gram.solve(&model.a * &(&model.c - &w))?;
    Ok((y, w))
}

/// Solves "min c'x, Ax = b, x >= 0" from the strictly feasible point x0
/// with starting path parameter mu0 > 0, iterating until the path
/// parameter falls to e^(-t)/n.
///
/// x0 must satisfy Ax0 = b; feasibility is not verified here, only
/// strict positivity. The returned solution carries the terminal
/// interior point, the dual vector recovered from the terminal scaling,
/// and the iteration count.
pub fn solve(
    model: &StandardForm,
    x0: Vector<f64>,
    mu0: f64,
    t: u32,
) -> Result<Solution, Error> {
    let (_m, n) = model.check_dims()?;
    if x0.size() != n {
        return Err(Error::ShapeMismatch {
            expected: n,
            found: x0.size(),
            vector: "x0",
        });
    }
    for (j, &value) in x0.iter().enumerate() {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::NumericalDegeneracy(
                Degeneracy::NonPositiveCoordinate { index: j, value: value },
            ));
        }
    }
    if !mu0.is_finite() || mu0 <= 0.0 {
        return Err(Error::NumericalDegeneracy(
            Degeneracy::NonPositiveParameter { value: mu0 },
        ));
    }

    // The step fraction keeps every iterate strictly feasible and close
    // enough to the central path for the local analysis to apply.
    let theta = 1.0 / (6.0 * (n as f64).sqrt());
    let mu_final = (-(t as f64)).exp() / n as f64;

    // mu shrinks geometrically, so the iteration count is known up
    // front. The margin covers the closed form rounding differently
    // than the running product; anything past it is a failure.
    let planned = ((mu0 / mu_final).ln() / -(1.0 - theta).ln()).ceil().max(0.0) as usize;
    let bound = planned + 8;

    let mut state = PathState { x: x0, mu: mu0 };
    let mut iterations = 0;
    while state.mu > mu_final {
        if iterations == bound {
            return Err(Error::NonConvergence { iterations: iterations });
        }
        state.advance(model, theta)?;
        iterations += 1;
        debug!(
            "iteration {}: mu = {:e}, objective = {}",
            iterations,
            state.mu,
            model.c.dot(&state.x)
        );
    }

    let (y, w) = recover_dual(model, &state.x, state.mu)?;
    let objective = model.c.dot(&state.x);
    info!(
        "interior path terminated after {} iterations, objective = {}, duality gap = {:e}",
        iterations,
        objective,
        model.b.dot(&y) - objective
    );

    Ok(Solution {
        objective: objective,
        x: state.x,
        y: y,
        w: w,
        iterations: iterations,
    })
}

/// Solves "min c'x, Ax = b, x >= 0" without a starting point, by
/// embedding the model (see `embed::embed`) and path following from the
/// embedding's analytic starting point. The solution is restricted back
/// to the original variable space.
pub fn solve_equality(model: &StandardForm, alpha: f64) -> Result<Solution, Error> {
    let (m, n) = model.check_dims()?;
    let embedding = embed::embed(model, alpha)?;
    let full = solve(
        &embedding.model,
        embedding.x0,
        embedding.mu0,
        DEFAULT_PRECISION,
    )?;

    let x = Vector::new(full.x.data()[..n].to_vec());
    let y = Vector::new(full.y.data()[..m].to_vec());
    let w = Vector::new(full.w.data()[..n].to_vec());
    let objective = model.c.dot(&x);
    Ok(Solution {
        objective: objective,
        x: x,
        y: y,
        w: w,
        iterations: full.iterations,
    })
}

/// Solves "min c'x, Ax <= b, x >= 0" by appending slacks and calling
/// `solve_equality`. The returned primal covers the reduced model's
/// variables, slacks included; the dual has one entry per row of A.
pub fn solve_inequality(model: &StandardForm, alpha: f64) -> Result<Solution, Error> {
    let reduced = embed::reduce_inequality(model)?;
    solve_equality(&reduced, alpha)
}

#[test]
fn test_solve_from_central_start() {
    let model = StandardForm {
        a: Matrix::new(2, 4, vec![
            1.0, 0.0, 1.0, 0.0,
            0.0, 1.0, 0.0, 1.0,
        ]),
        b: Vector::new(vec![1.0, 1.0]),
        c: Vector::new(vec![-1.0, -2.0, 0.0, 0.0]),
    };

    // The central point of this model at mu = 100, coordinatewise from
    // the first order conditions of the barrier problem.
    let mu: f64 = 100.0;
    let x1 = 0.5 * (-2.0 * mu + 1.0 + (1.0 + 4.0 * mu * mu).sqrt());
    let x2 = 0.5 * (-mu + 1.0 + (1.0 + mu * mu).sqrt());
    let x0 = Vector::new(vec![x1, x2, 1.0 - x1, 1.0 - x2]);

    let solution = solve(&model, x0, mu, 10).expect("Solve should not fail");

    assert!((solution.objective + 3.0).abs() < 1e-3);
    let expected = [1.0, 1.0, 0.0, 0.0];
    for (j, &v) in solution.x.iter().enumerate() {
        assert!((v - expected[j]).abs() < 1e-3, "x{} = {}", j, v);
        assert!(v > 0.0);
    }
    assert!(solution.duality_gap(&model).abs() < 1e-3);
}

#[test]
fn test_iteration_count_matches_schedule() {
    let model = StandardForm {
        a: Matrix::new(2, 4, vec![
            1.0, 0.0, 1.0, 0.0,
            0.0, 1.0, 0.0, 1.0,
        ]),
        b: Vector::new(vec![1.0, 1.0]),
        c: Vector::new(vec![-1.0, -2.0, 0.0, 0.0]),
    };
    let x0 = Vector::new(vec![0.5, 0.5, 0.5, 0.5]);
    let mu0 = 100.0;
    let t = 10;

    let solution = solve(&model, x0, mu0, t).expect("Solve should not fail");

    // mu decays by a fixed factor, so the iteration count depends only
    // on n, t and mu0.
    let theta = 1.0 / (6.0 * 4.0f64.sqrt());
    let mu_final = (-(t as f64)).exp() / 4.0;
    let planned = ((mu0 / mu_final).ln() / -(1.0 - theta).ln()).ceil() as i64;
    assert!((solution.iterations as i64 - planned).abs() <= 1);
}

#[test]
fn test_gap_shrinks_with_precision() {
    let model = StandardForm {
        a: Matrix::new(2, 4, vec![
            1.0, 0.0, 1.0, 0.0,
            0.0, 1.0, 0.0, 1.0,
        ]),
        b: Vector::new(vec![1.0, 1.0]),
        c: Vector::new(vec![-1.0, -2.0, 0.0, 0.0]),
    };
    let x0 = Vector::new(vec![0.5, 0.5, 0.5, 0.5]);

    let coarse = solve(&model, x0.clone(), 100.0, 6).expect("Solve should not fail");
    let fine = solve(&model, x0, 100.0, 12).expect("Solve should not fail");

    assert!(coarse.duality_gap(&model).abs() < 1e-1);
    assert!(fine.duality_gap(&model).abs() < coarse.duality_gap(&model).abs());
}

#[test]
fn test_solve_inequality_production_model() {
    let model = StandardForm {
        a: Matrix::new(4, 2, vec![
            1.0, 1.0,
            3.0, 1.0,
            1.0, 0.0,
            0.0, 1.0,
        ]),
        b: Vector::new(vec![9.0, 18.0, 7.0, 6.0]),
        c: Vector::new(vec![-3.0, -2.0]),
    };

    let solution = solve_inequality(&model, 2.5).expect("Solve should not fail");

    assert!((solution.objective + 22.5).abs() < 1e-2);
    // Primal covers the two structural variables and four slacks.
    assert_eq!(solution.x.size(), 6);
    assert!((solution.x[0] - 4.5).abs() < 1e-2);
    assert!((solution.x[1] - 4.5).abs() < 1e-2);
    assert!((solution.x[4] - 2.5).abs() < 1e-2);
    assert!((solution.x[5] - 1.5).abs() < 1e-2);

    assert_eq!(solution.y.size(), 4);
    assert!((solution.y[0] + 1.5).abs() < 1e-2);
    assert!((solution.y[1] + 0.5).abs() < 1e-2);

    let gap = model.b.dot(&solution.y) - solution.objective;
    assert!(gap.abs() < 1e-2);
}

#[test]
fn test_solve_inequality_dual_certificate() {
    let model = StandardForm {
        a: Matrix::new(4, 2, vec![
            1.0, 1.0,
            3.0, 1.0,
            1.0, 0.0,
            0.0, 1.0,
        ]),
        b: Vector::new(vec![9.0, 18.0, 7.0, 6.0]),
        c: Vector::new(vec![-3.0, -2.0]),
    };

    let primal = solve_inequality(&model, 2.5).expect("Solve should not fail");
    let dual = solve_inequality(&model.dual(), 8.0).expect("Solve should not fail");

    // Strong duality: the two optimal values negate each other.
    assert!((dual.objective - 22.5).abs() < 5e-2);
    assert!((primal.objective + dual.objective).abs() < 5e-2);
}

#[test]
fn test_solve_equality_restricts_to_original_variables() {
    let model = StandardForm {
        a: Matrix::new(1, 2, vec![1.0, 1.0]),
        b: Vector::new(vec![1.0]),
        c: Vector::new(vec![-1.0, 0.0]),
    };

    let solution = solve_equality(&model, 5.0).expect("Solve should not fail");

    assert_eq!(solution.x.size(), 2);
    assert_eq!(solution.y.size(), 1);
    assert_eq!(solution.w.size(), 2);
    assert!((solution.objective + 1.0).abs() < 1e-3);
    assert!((solution.x[0] - 1.0).abs() < 1e-3);
    assert!(solution.x[1].abs() < 1e-3);
}

#[test]
fn test_solve_rejects_bad_start() {
    let model = StandardForm {
        a: Matrix::new(1, 2, vec![1.0, 1.0]),
        b: Vector::new(vec![1.0]),
        c: Vector::new(vec![-1.0, 0.0]),
    };

    match solve(&model, Vector::new(vec![0.5]), 1.0, 10) {
        Err(Error::ShapeMismatch { vector: "x0", .. }) => {}
        other => panic!("Expected ShapeMismatch on x0, got {:?}", other),
    }

    match solve(&model, Vector::new(vec![0.5, 0.0]), 1.0, 10) {
        Err(Error::NumericalDegeneracy(Degeneracy::NonPositiveCoordinate {
            index,
            ..
        })) => assert_eq!(index, 1),
        other => panic!("Expected NumericalDegeneracy, got {:?}", other),
    }

    match solve(&model, Vector::new(vec![0.5, 0.5]), 0.0, 10) {
        Err(Error::NumericalDegeneracy(Degeneracy::NonPositiveParameter { .. })) => {}
        other => panic!("Expected NumericalDegeneracy, got {:?}", other),
    }
}

#[test]
fn test_solve_reports_degenerate_gram() {
    // Duplicate rows make AX * AX^T singular on the first iteration.
    let model = StandardForm {
        a: Matrix::new(2, 2, vec![1.0, 1.0, 1.0, 1.0]),
        b: Vector::new(vec![1.0, 1.0]),
        c: Vector::new(vec![0.0, 0.0]),
    };

    match solve(&model, Vector::new(vec![0.5, 0.5]), 1.0, 1) {
        Err(Error::NumericalDegeneracy(_)) => {}
        other => panic!("Expected NumericalDegeneracy, got {:?}", other),
    }
}
