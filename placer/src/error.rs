use thiserror::Error;

/// Failure modes of the quadratic solve. There is no partial-success case:
/// either both axes solve or the pipeline aborts without writing output.
#[derive(Error, Debug)]
pub enum SolveError {
    #[error("solver-failed: right-hand side contains a non-finite value")]
    NonFiniteRhs,

    #[error("solver-failed: conjugate gradient did not converge within {iterations} iterations (residual {residual:.3e})")]
    CgDidNotConverge { iterations: usize, residual: f64 },
}
