// Slack-variable reduction and the self-dual embedding described in
// chapter 6 of Sierksma & Zwols, "Linear and Integer Optimization".

use rulinalg::matrix::{BaseMatrix, Matrix};
use rulinalg::vector::Vector;

use error::{Degeneracy, Error};
use problem::StandardForm;

/// Rewrites "min c'x, Ax <= b, x >= 0" as the equivalent equality model
/// with one slack variable per constraint row: A gains an identity
/// block, c gains matching zero entries, b is unchanged.
pub fn reduce_inequality(model: &StandardForm) -> Result<StandardForm, Error> {
    let (m, n) = model.check_dims()?;

    let a = model.a.hcat(&Matrix::identity(m));
    let mut c_data = model.c.data().clone();
    c_data.resize(n + m, 0.0);

    Ok(StandardForm {
        a: a,
        b: model.b.clone(),
        c: Vector::new(c_data),
    })
}

/// Auxiliary model produced by the self-dual embedding, together with the
/// strictly feasible starting point and path parameter it is built
/// around.
#[derive(Debug, Clone)]
pub struct Embedding {
    pub model: StandardForm,
    pub x0: Vector<f64>,
    pub mu0: f64,
}

/// Wraps an equality model in an auxiliary model of size (m+1)x(n+2)
/// whose starting point [alpha*e; 1; alpha] is strictly feasible by
/// construction.
///
/// The extra column holds b - alpha*A*e, the constraint residual of the
/// uniform point alpha*e. It is priced at M_P = alpha^2 in the objective
/// so that it vanishes at optimality, at which point the first n
/// coordinates solve the original model. The extra row, balanced by the
/// right-hand side M_D = alpha^2*(n+1) - alpha*sum(c), keeps the
/// auxiliary feasible region bounded. alpha must be large enough that
/// this bound does not cut off the original optimum; choosing it is the
/// caller's responsibility.
pub fn embed(model: &StandardForm, alpha: f64) -> Result<Embedding, Error> {
    let (m, n) = model.check_dims()?;
    if !alpha.is_finite() || alpha <= 0.0 {
        return Err(Error::NumericalDegeneracy(
            Degeneracy::NonPositiveParameter { value: alpha },
        ));
    }

    let m_p = alpha * alpha;
    let m_d = alpha * alpha * (n as f64 + 1.0) - alpha * model.c.sum();

    // Row sums A*e feed the correction column.
    let row_sums = &model.a * Vector::ones(n);

    let mut a_data = Vec::with_capacity((m + 1) * (n + 2));
    for i in 0..m {
        for j in 0..n {
            a_data.push(model.a[[i, j]]);
        }
        a_data.push(model.b[i] - alpha * row_sums[i]);
        a_data.push(0.0);
    }
    for j in 0..n {
        a_data.push(alpha - model.c[j]);
    }
    a_data.push(0.0);
    a_data.push(alpha);

    let mut b_data = model.b.data().clone();
    b_data.push(m_d);

    let mut c_data = model.c.data().clone();
    c_data.push(m_p);
    c_data.push(0.0);

    let mut x0_data = vec![alpha; n];
    x0_data.push(1.0);
    x0_data.push(alpha);

    Ok(Embedding {
        model: StandardForm {
            a: Matrix::new(m + 1, n + 2, a_data),
            b: Vector::new(b_data),
            c: Vector::new(c_data),
        },
        x0: Vector::new(x0_data),
        mu0: alpha * alpha,
    })
}

#[test]
fn test_reduce_inequality_appends_identity_block() {
    let model = StandardForm {
        a: Matrix::new(2, 2, vec![1.0, 1.0, 3.0, 1.0]),
        b: Vector::new(vec![9.0, 18.0]),
        c: Vector::new(vec![-3.0, -2.0]),
    };
    let reduced = reduce_inequality(&model).unwrap();
    assert_eq!(reduced.a.rows(), 2);
    assert_eq!(reduced.a.cols(), 4);
    assert_eq!(
        reduced.a.data(),
        &vec![1.0, 1.0, 1.0, 0.0, 3.0, 1.0, 0.0, 1.0]
    );
    assert_eq!(reduced.b.data(), model.b.data());
    assert_eq!(reduced.c.data(), &vec![-3.0, -2.0, 0.0, 0.0]);
}

#[test]
fn test_reduce_inequality_slack_completion() {
    // For feasible x, [x; b - Ax] satisfies the reduced equalities
    // exactly.
    let model = StandardForm {
        a: Matrix::new(2, 2, vec![1.0, 1.0, 3.0, 1.0]),
        b: Vector::new(vec![9.0, 18.0]),
        c: Vector::new(vec![-3.0, -2.0]),
    };
    let reduced = reduce_inequality(&model).unwrap();

    let x = Vector::new(vec![2.0, 3.0]);
    let slack = &model.b - &model.a * &x;
    let mut full = x.data().clone();
    full.extend(slack.data().iter());
    for &v in full.iter() {
        assert!(v >= 0.0);
    }

    let lhs = &reduced.a * Vector::new(full);
    for (i, &v) in lhs.iter().enumerate() {
        assert_eq!(v, model.b[i]);
    }
}

#[test]
fn test_reduce_inequality_checks_dims() {
    let model = StandardForm {
        a: Matrix::new(2, 2, vec![1.0, 1.0, 3.0, 1.0]),
        b: Vector::new(vec![9.0]),
        c: Vector::new(vec![-3.0, -2.0]),
    };
    match reduce_inequality(&model) {
        Err(Error::ShapeMismatch { vector: "b", .. }) => {}
        other => panic!("Expected ShapeMismatch on b, got {:?}", other),
    }
}

#[test]
fn test_embed_dimensions() {
    let model = StandardForm {
        a: Matrix::new(2, 3, vec![1.0, -2.0, 0.5, 0.0, 1.0, -1.0]),
        b: Vector::new(vec![4.0, -1.0]),
        c: Vector::new(vec![-1.0, 2.0, 0.0]),
    };
    let embedding = embed(&model, 2.0).unwrap();
    assert_eq!(embedding.model.a.rows(), 3);
    assert_eq!(embedding.model.a.cols(), 5);
    assert_eq!(embedding.model.b.size(), 3);
    assert_eq!(embedding.model.c.size(), 5);
    assert_eq!(embedding.x0.size(), 5);
    // The appended objective entries are M_P and zero.
    assert_eq!(embedding.model.c[3], 4.0);
    assert_eq!(embedding.model.c[4], 0.0);
    assert_eq!(embedding.mu0, 4.0);
}

#[test]
fn test_embed_start_is_feasible() {
    let model = StandardForm {
        a: Matrix::new(2, 3, vec![1.0, -2.0, 0.5, 0.0, 1.0, -1.0]),
        b: Vector::new(vec![4.0, -1.0]),
        c: Vector::new(vec![-1.0, 2.0, 0.0]),
    };
    for &alpha in [0.5, 1.0, 2.5, 10.0].iter() {
        let embedding = embed(&model, alpha).unwrap();
        for &v in embedding.x0.iter() {
            assert!(v > 0.0);
        }
        let residual = &embedding.model.a * &embedding.x0 - &embedding.model.b;
        for &r in residual.iter() {
            assert!(r.abs() < 1e-9, "residual {} at alpha {}", r, alpha);
        }
    }
}

#[test]
fn test_embed_rejects_nonpositive_alpha() {
    let model = StandardForm {
        a: Matrix::new(1, 1, vec![1.0]),
        b: Vector::new(vec![1.0]),
        c: Vector::new(vec![1.0]),
    };
    for &alpha in [0.0, -2.5].iter() {
        match embed(&model, alpha) {
            Err(Error::NumericalDegeneracy(Degeneracy::NonPositiveParameter { value })) => {
                assert_eq!(value, alpha);
            }
            other => panic!("Expected NumericalDegeneracy, got {:?}", other),
        }
    }
}

#[test]
fn test_transformations_are_pure() {
    let model = StandardForm {
        a: Matrix::new(2, 2, vec![1.0, 1.0, 3.0, 1.0]),
        b: Vector::new(vec![9.0, 18.0]),
        c: Vector::new(vec![-3.0, -2.0]),
    };
    let first = reduce_inequality(&model).unwrap();
    let second = reduce_inequality(&model).unwrap();
    assert_eq!(first.a.data(), second.a.data());
    assert_eq!(first.b.data(), second.b.data());
    assert_eq!(first.c.data(), second.c.data());

    let e1 = embed(&model, 2.5).unwrap();
    let e2 = embed(&model, 2.5).unwrap();
    assert_eq!(e1.model.a.data(), e2.model.a.data());
    assert_eq!(e1.model.b.data(), e2.model.b.data());
    assert_eq!(e1.model.c.data(), e2.model.c.data());
    assert_eq!(e1.x0.data(), e2.x0.data());
    assert_eq!(e1.mu0, e2.mu0);
}
