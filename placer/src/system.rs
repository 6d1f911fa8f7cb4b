use qplace_common::db::core::Design;
use sprs::{CsMat, TriMat};

/// The two independent SPD linear systems for a quadratic placement: `A x =
/// bx`, `A y = by`. Both axes share the same coefficient matrix because the
/// clique weight of a net edge does not depend on direction.
pub struct LinearSystem {
    pub dim: usize,
    pub a: CsMat<f64>,
    pub bx: Vec<f64>,
    pub by: Vec<f64>,
}

/// Converts the net hypergraph into `A`, `bx`, `by` using the clique (Bound2Bound)
/// model: a net of degree `d` and weight `w` contributes `d` choose 2 pairwise
/// edges, each of weight `w / (d - 1)`. Nets of degree <= 1 contribute nothing.
///
/// Matrix row/column `i` is the position of a movable node in
/// `design.movable_index`, matching the reader's declaration order so results
/// are reproducible across runs.
pub fn build(design: &Design) -> LinearSystem {
    let dim = design.num_movable();

    // CellId -> matrix row, for movable nodes only.
    let mut row_of = vec![None; design.nodes.len()];
    for (row, &cell) in design.movable_index.iter().enumerate() {
        row_of[cell.index()] = Some(row);
    }

    let mut triplets = TriMat::new((dim, dim));
    let mut bx = vec![0.0; dim];
    let mut by = vec![0.0; dim];

    for net in &design.nets {
        let degree = net.degree();
        if degree <= 1 {
            continue;
        }
        let edge_weight = net.weight / (degree as f64 - 1.0);

        for a in 0..net.pins.len() {
            for b in (a + 1)..net.pins.len() {
                let cell_a = design.pin_to_cell[net.pins[a].index()];
                let cell_b = design.pin_to_cell[net.pins[b].index()];
                if cell_a == cell_b {
                    continue;
                }

                let row_a = row_of[cell_a.index()];
                let row_b = row_of[cell_b.index()];
                let node_a = &design.nodes[cell_a.index()];
                let node_b = &design.nodes[cell_b.index()];

                match (row_a, row_b) {
                    (Some(i), Some(j)) => {
                        triplets.add_triplet(i, i, edge_weight);
                        triplets.add_triplet(j, j, edge_weight);
                        triplets.add_triplet(i, j, -edge_weight);
                        triplets.add_triplet(j, i, -edge_weight);
                    }
                    (Some(i), None) => {
                        triplets.add_triplet(i, i, edge_weight);
                        bx[i] += edge_weight * node_b.x;
                        by[i] += edge_weight * node_b.y;
                    }
                    (None, Some(j)) => {
                        triplets.add_triplet(j, j, edge_weight);
                        bx[j] += edge_weight * node_a.x;
                        by[j] += edge_weight * node_a.y;
                    }
                    (None, None) => {}
                }
            }
        }
    }

    let a: CsMat<f64> = triplets.to_csr();

    LinearSystem { dim, a, bx, by }
}
