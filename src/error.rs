use rulinalg;

#[derive(Debug)]
pub enum Error {
    /// A vector's length does not match the matrix dimension it must
    /// pair with.
    ShapeMismatch {
        expected: usize,
        found: usize,
        vector: &'static str,
    },
    /// The solve cannot continue at working precision.
    NumericalDegeneracy(Degeneracy),
    /// The defensive iteration bound was exceeded.
    NonConvergence { iterations: usize },
}

#[derive(Debug)]
pub enum Degeneracy {
    /// A Gram system was singular to working precision.
    SingularSystem(rulinalg::error::Error),
    /// An iterate, or a supplied starting point, left the strict
    /// interior.
    NonPositiveCoordinate { index: usize, value: f64 },
    /// A parameter that must be strictly positive is not.
    NonPositiveParameter { value: f64 },
}

impl From<rulinalg::error::Error> for Error {
    fn from(e: rulinalg::error::Error) -> Error {
        Error::NumericalDegeneracy(Degeneracy::SingularSystem(e))
    }
}
