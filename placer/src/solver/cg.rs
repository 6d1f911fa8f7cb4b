use crate::error::SolveError;
use crate::solver::preconditioner::JacobiPreconditioner;
use sprs::CsMat;

/// Conjugate gradient with a Jacobi preconditioner, the fallback path when
/// Cholesky reports a non-positive pivot (a movable component with no fixed
/// anchor leaves `A` only positive semidefinite). Iterates until the relative
/// residual drops to `tolerance` or `max_iterations` is exhausted.
pub fn solve(
    a: &CsMat<f64>,
    b: &[f64],
    tolerance: f64,
    max_iterations: usize,
) -> Result<Vec<f64>, SolveError> {
    let n = b.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    if b.iter().any(|v| !v.is_finite()) {
        return Err(SolveError::NonFiniteRhs);
    }

    // A zero RHS is not short-circuited to the trivial zero solution: for an
    // orphan movable component (no path to any fixed pin) it is ambiguous
    // rather than solved, and should surface as non-convergence below rather
    // than silently returning an arbitrary placement.
    let b_norm = norm(b);

    let preconditioner = JacobiPreconditioner {
        inv_diag: jacobi_diag(a, n),
    };

    let mut x = vec![0.0; n];
    let mut r = b.to_vec();
    let mut z = r.clone();
    preconditioner.apply(&mut z);
    let mut p = z.clone();
    let mut rs_old = dot(&r, &z);

    let mut residual_ratio = norm(&r) / b_norm;

    for iter in 0..max_iterations {
        if residual_ratio <= tolerance {
            return Ok(x);
        }

        let ap = matvec(a, &p);
        let pap = dot(&p, &ap);
        if pap.abs() < 1e-30 {
            return Err(SolveError::CgDidNotConverge {
                iterations: iter,
                residual: residual_ratio,
            });
        }
        let alpha = rs_old / pap;

        for i in 0..n {
            x[i] += alpha * p[i];
            r[i] -= alpha * ap[i];
        }

        residual_ratio = norm(&r) / b_norm;
        if residual_ratio <= tolerance {
            return Ok(x);
        }

        z = r.clone();
        preconditioner.apply(&mut z);
        let rs_new = dot(&r, &z);
        let beta = rs_new / rs_old;

        for i in 0..n {
            p[i] = z[i] + beta * p[i];
        }
        rs_old = rs_new;
    }

    Err(SolveError::CgDidNotConverge {
        iterations: max_iterations,
        residual: residual_ratio,
    })
}

fn jacobi_diag(a: &CsMat<f64>, n: usize) -> Vec<f64> {
    let mut diag = vec![0.0; n];
    for (row, vec) in a.outer_iterator().enumerate() {
        for (col, &val) in vec.iter() {
            if col == row && val.abs() > 1e-300 {
                diag[row] = 1.0 / val;
            }
        }
    }
    diag
}

fn matvec(a: &CsMat<f64>, x: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; x.len()];
    for (row, vec) in a.outer_iterator().enumerate() {
        let mut acc = 0.0;
        for (col, &val) in vec.iter() {
            acc += val * x[col];
        }
        out[row] = acc;
    }
    out
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}
