use rulinalg::matrix::{BaseMatrix, Matrix};
use rulinalg::vector::Vector;

use error::Error;

#[derive(Debug, Clone)]
pub struct StandardForm {
    // Standard form linear program:
    // Minimize c^Tx
    // subject to Ax = b (or Ax <= b)
    // and x >= 0
    pub a: Matrix<f64>,
    pub b: Vector<f64>,
    pub c: Vector<f64>,
}

impl StandardForm {
    /// Checks that b and c agree with the shape of A and returns (m, n).
    /// Every public solver entry point runs this before any numeric
    /// work.
    pub fn check_dims(&self) -> Result<(usize, usize), Error> {
        let (m, n) = (self.a.rows(), self.a.cols());
        if self.b.size() != m {
            return Err(Error::ShapeMismatch {
                expected: m,
                found: self.b.size(),
                vector: "b",
            });
        }
        if self.c.size() != n {
            return Err(Error::ShapeMismatch {
                expected: n,
                found: self.c.size(),
                vector: "c",
            });
        }
        Ok((m, n))
    }

    /// The dual of the model read in inequality form:
    ///
    /// Minimize b^Tu
    /// subject to -A^Tu <= c
    /// and u >= 0
    ///
    /// Its optimal objective value is the negation of the primal's, which
    /// makes a solved dual a certificate for a solved primal.
    pub fn dual(&self) -> StandardForm {
        StandardForm {
            a: -self.a.transpose(),
            b: self.c.clone(),
            c: self.b.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Solution {
    /// Objective value c^Tx at termination.
    pub objective: f64,
    /// Primal solution, one entry per variable of the solved model.
    pub x: Vector<f64>,
    /// Dual solution, one entry per constraint row.
    pub y: Vector<f64>,
    /// Dual slack vector recovered from the terminal scaling.
    pub w: Vector<f64>,
    /// Number of path-following iterations performed.
    pub iterations: usize,
}

impl Solution {
    /// b^Ty - c^Tx for the model this solution was produced from.
    /// Shrinks toward zero as the precision parameter grows.
    pub fn duality_gap(&self, model: &StandardForm) -> f64 {
        model.b.dot(&self.y) - model.c.dot(&self.x)
    }
}

#[test]
fn test_check_dims() {
    let model = StandardForm {
        a: Matrix::new(2, 3, vec![1.0, 1.0, 0.0, 0.0, 1.0, 1.0]),
        b: Vector::new(vec![4.0, 6.0]),
        c: Vector::new(vec![-1.0, -2.0, -1.0]),
    };
    assert_eq!(model.check_dims().unwrap(), (2, 3));
}

#[test]
fn test_check_dims_rejects_short_b() {
    let model = StandardForm {
        a: Matrix::new(2, 3, vec![1.0, 1.0, 0.0, 0.0, 1.0, 1.0]),
        b: Vector::new(vec![4.0]),
        c: Vector::new(vec![-1.0, -2.0, -1.0]),
    };
    match model.check_dims() {
        Err(Error::ShapeMismatch {
            expected, found, vector,
        }) => {
            assert_eq!(expected, 2);
            assert_eq!(found, 1);
            assert_eq!(vector, "b");
        }
        other => panic!("Expected ShapeMismatch, got {:?}", other),
    }
}

#[test]
fn test_check_dims_rejects_long_c() {
    let model = StandardForm {
        a: Matrix::new(2, 3, vec![1.0, 1.0, 0.0, 0.0, 1.0, 1.0]),
        b: Vector::new(vec![4.0, 6.0]),
        c: Vector::new(vec![-1.0, -2.0, -1.0, 0.0]),
    };
    match model.check_dims() {
        Err(Error::ShapeMismatch { expected, found, vector }) => {
            assert_eq!(expected, 3);
            assert_eq!(found, 4);
            assert_eq!(vector, "c");
        }
        other => panic!("Expected ShapeMismatch, got {:?}", other),
    }
}

#[test]
fn test_dual_shape_and_involution() {
    let model = StandardForm {
        a: Matrix::new(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
        b: Vector::new(vec![7.0, 8.0]),
        c: Vector::new(vec![-1.0, -2.0, -3.0]),
    };
    let dual = model.dual();
    assert_eq!(dual.a.rows(), 3);
    assert_eq!(dual.a.cols(), 2);
    assert_eq!(dual.b.data(), model.c.data());
    assert_eq!(dual.c.data(), model.b.data());

    // Dualizing twice restores the original model exactly.
    let bidual = dual.dual();
    assert_eq!(bidual.a.data(), model.a.data());
    assert_eq!(bidual.b.data(), model.b.data());
    assert_eq!(bidual.c.data(), model.c.data());
}
