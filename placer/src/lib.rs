pub mod clip;
pub mod error;
pub mod solver;
pub mod system;

use error::SolveError;
use qplace_common::db::core::Design;

/// Runs the Quadratic System Builder, Sparse Solver, and Boundary Clipper in
/// sequence, writing the result back into `design`'s node positions.
pub fn place(design: &mut Design, cg_tolerance: f64, cg_iteration_multiplier: usize) -> Result<(), SolveError> {
    let system = system::build(design);
    let (x, y) = solver::solve(&system, cg_tolerance, cg_iteration_multiplier)?;

    for (row, &cell) in design.movable_index.iter().enumerate() {
        let node = &mut design.nodes[cell.index()];
        node.x = x[row];
        node.y = y[row];
    }

    clip::clip(design);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qplace_common::db::core::PinDirection;
    use qplace_common::geom::point::Point;
    use qplace_common::geom::rect::Rect;

    /// Two movable cells connected only to each other, with no fixed anchor
    /// anywhere in the design: the system is singular and the pipeline must
    /// report `solver-failed` rather than writing any output.
    #[test]
    fn orphan_component_fails_to_solve() {
        let mut design = Design::new();
        let a = design.add_node("a".into(), 1.0, 1.0, false);
        let b = design.add_node("b".into(), 1.0, 1.0, false);
        design.core = Rect::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        design.reindex_movable();

        let net = design.add_net("n0".into());
        design.add_pin(a, net, PinDirection::Input, Point::new(0.0, 0.0));
        design.add_pin(b, net, PinDirection::Output, Point::new(0.0, 0.0));

        let result = place(&mut design, 1e-6, 2);
        assert!(result.is_err());
    }
}
