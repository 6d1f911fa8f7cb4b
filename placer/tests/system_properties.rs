use proptest::prelude::*;
use qplace_common::db::core::{Design, PinDirection};
use qplace_common::geom::point::Point;
use qplace_solver::system::build;

/// Builds a `Design` with `num_movable` movable cells and one fixed anchor at
/// the origin, wiring `net_members` as a list of nets (each a list of
/// movable-cell indices, deduplicated and clamped to range, every net also
/// including the fixed anchor so the resulting system stays anchored).
fn build_design(num_movable: usize, net_members: &[Vec<usize>]) -> Design {
    let mut design = Design::new();
    let movable: Vec<_> = (0..num_movable)
        .map(|i| design.add_node(format!("m{i}"), 1.0, 1.0, false))
        .collect();
    let fixed = design.add_node("t".into(), 1.0, 1.0, true);
    design.reindex_movable();

    for (net_idx, members) in net_members.iter().enumerate() {
        let mut unique: Vec<usize> = members.iter().map(|&i| i % num_movable.max(1)).collect();
        unique.sort_unstable();
        unique.dedup();
        if unique.is_empty() {
            continue;
        }

        let net = design.add_net(format!("n{net_idx}"));
        design.add_pin(fixed, net, PinDirection::Output, Point::new(0.0, 0.0));
        for &m in &unique {
            design.add_pin(movable[m], net, PinDirection::Input, Point::new(0.0, 0.0));
        }
    }

    design
}

fn dense(system: &qplace_solver::system::LinearSystem) -> Vec<Vec<f64>> {
    let mut out = vec![vec![0.0; system.dim]; system.dim];
    for (row, vec) in system.a.outer_iterator().enumerate() {
        for (col, &val) in vec.iter() {
            out[row][col] = val;
        }
    }
    out
}

proptest! {
    #[test]
    fn count_consistency(num_movable in 1usize..8, net_members in prop::collection::vec(prop::collection::vec(0usize..8, 1..4), 1..6)) {
        let design = build_design(num_movable, &net_members);

        let net_pin_total: usize = design.nets.iter().map(|n| n.pins.len()).sum();
        prop_assert_eq!(net_pin_total, design.pin_to_cell.len());
        prop_assert_eq!(design.movable_index.len() + design.fixed_index.len(), design.nodes.len());
        prop_assert_eq!(design.movable_index.len(), num_movable);
    }

    #[test]
    fn matrix_symmetry(num_movable in 1usize..8, net_members in prop::collection::vec(prop::collection::vec(0usize..8, 1..4), 1..6)) {
        let design = build_design(num_movable, &net_members);
        let system = build(&design);
        let d = dense(&system);

        for i in 0..system.dim {
            for j in 0..system.dim {
                prop_assert!((d[i][j] - d[j][i]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn diagonal_dominance(num_movable in 1usize..8, net_members in prop::collection::vec(prop::collection::vec(0usize..8, 1..4), 1..6)) {
        let design = build_design(num_movable, &net_members);
        let system = build(&design);
        let d = dense(&system);

        for i in 0..system.dim {
            let off_diag_sum: f64 = (0..system.dim).filter(|&j| j != i).map(|j| d[i][j].abs()).sum();
            prop_assert!(d[i][i] >= off_diag_sum - 1e-9);
        }
    }
}
