pub mod cg;
pub mod cholesky;
pub mod preconditioner;

use crate::error::SolveError;
use crate::system::LinearSystem;

/// Solves `A x = bx` and `A y = by`. The two axes are independent and are
/// dispatched on a fork-join call; `A` is read-only to both sides so there is
/// no shared mutable state.
pub fn solve(system: &LinearSystem, cg_tolerance: f64, cg_iteration_multiplier: usize) -> Result<(Vec<f64>, Vec<f64>), SolveError> {
    let max_iterations = system.dim.max(1) * cg_iteration_multiplier;

    let (x_result, y_result) = rayon::join(
        || solve_axis(system, &system.bx, cg_tolerance, max_iterations),
        || solve_axis(system, &system.by, cg_tolerance, max_iterations),
    );

    Ok((x_result?, y_result?))
}

fn solve_axis(
    system: &LinearSystem,
    b: &[f64],
    cg_tolerance: f64,
    max_iterations: usize,
) -> Result<Vec<f64>, SolveError> {
    if b.iter().any(|v| !v.is_finite()) {
        return Err(SolveError::NonFiniteRhs);
    }

    if let Some(factorization) = cholesky::try_factorize(&system.a) {
        let solution = cholesky::solve(&factorization, b);
        if solution.iter().all(|v| v.is_finite()) {
            return Ok(solution);
        }
        log::warn!("cholesky factorization produced a non-finite solution; falling back to CG");
    } else {
        log::warn!("cholesky factorization hit a non-positive pivot; falling back to CG");
    }

    cg::solve(&system.a, b, cg_tolerance, max_iterations)
}
