use sprs::CsMat;
use sprs_ldl::{Ldl, LdlNumeric};

/// Attempts a sparse Cholesky-style (LDLT) factorization with
/// approximate-minimum-degree reordering, as provided by `sprs_ldl`. Returns
/// `None` when the matrix is not positive definite (a non-positive pivot
/// turns up), signalling the caller to fall back to conjugate gradient.
pub fn try_factorize(a: &CsMat<f64>) -> Option<LdlNumeric<f64, usize>> {
    Ldl::new().numeric(a.view()).ok()
}

pub fn solve(factorization: &LdlNumeric<f64, usize>, b: &[f64]) -> Vec<f64> {
    factorization.solve(b)
}
