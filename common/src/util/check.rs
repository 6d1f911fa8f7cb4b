use crate::db::core::Design;
use crate::geom::point::Point;
use crate::geom::rect::Rect;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

const CHECK_TOLERANCE: f64 = 1e-6;

/// Confirms every movable node's post-legalization bbox lies within the core
/// rectangle. Run after clipping, not after the raw solve. Fixed terminals
/// are not checked: they legitimately sit outside the core (see
/// `stats::collect`'s `fixed_area_in_core`, a strict subset of `fixed_area`).
/// A movable cell wider or taller than the core itself is also not a
/// failure here — per the Boundary Clipper (§4.5) that is a `cell-exceeds-core`
/// warning, already logged during clipping, with the cell pinned to the
/// boundary and the pipeline continuing.
pub fn run_bounds_check(design: &Design) -> Result<(), String> {
    log::info!("starting placement verification");
    let valid = AtomicBool::new(true);
    let core = design.core;

    design.movable_index.par_iter().for_each(|&id| {
        let node = &design.nodes[id.index()];
        let rect = Rect::new(
            Point::new(node.x, node.y),
            Point::new(node.x + node.width, node.y + node.height),
        );

        let fits_x = node.width <= core.width() + CHECK_TOLERANCE;
        let fits_y = node.height <= core.height() + CHECK_TOLERANCE;

        if fits_x
            && (rect.min.x < core.min.x - CHECK_TOLERANCE || rect.max.x > core.max.x + CHECK_TOLERANCE)
        {
            log::error!("FAIL: node '{}' out of core bounds on x", node.name);
            valid.store(false, Ordering::Relaxed);
        }
        if fits_y
            && (rect.min.y < core.min.y - CHECK_TOLERANCE || rect.max.y > core.max.y + CHECK_TOLERANCE)
        {
            log::error!("FAIL: node '{}' out of core bounds on y", node.name);
            valid.store(false, Ordering::Relaxed);
        }
    });

    if valid.load(Ordering::Relaxed) {
        log::info!("PASS: all movable nodes within core bounds");
        Ok(())
    } else {
        Err("placement verification failed: nodes out of bounds".to_string())
    }
}

/// Verifies count-consistency between pin bookkeeping arrays, the stated
/// degree of every net, and the pin lists of every node. A cheap sanity
/// check that catches a malformed reader or quadratic-system builder before
/// either wastes time on an inconsistent `Design`.
pub fn run_consistency_check(design: &Design) -> Result<(), String> {
    let num_pins = design.pin_to_cell.len();
    if design.pin_to_net.len() != num_pins
        || design.pin_direction.len() != num_pins
        || design.pin_offset.len() != num_pins
    {
        return Err("pin bookkeeping arrays disagree on length".to_string());
    }

    let net_pin_total: usize = design.nets.iter().map(|n| n.pins.len()).sum();
    let node_pin_total: usize = design.nodes.iter().map(|n| n.pins.len()).sum();
    if net_pin_total != num_pins || node_pin_total != num_pins {
        return Err(format!(
            "pin count mismatch: {num_pins} pins recorded but nets sum to {net_pin_total} and nodes sum to {node_pin_total}"
        ));
    }

    if design.movable_index.len() + design.fixed_index.len() != design.nodes.len() {
        return Err("movable/fixed partition does not cover all nodes".to_string());
    }

    log::info!("PASS: design bookkeeping is internally consistent");
    Ok(())
}
