use crate::db::core::Design;

#[derive(Clone, Copy, Debug, Default)]
pub struct DegreeHistogram {
    pub two: usize,
    pub small: usize,
    pub medium: usize,
    pub large: usize,
}

#[derive(Clone, Copy, Debug)]
pub struct Statistics {
    pub core_area: f64,
    pub cell_area: f64,
    pub movable_area: f64,
    pub fixed_area: f64,
    pub fixed_area_in_core: f64,
    pub placement_util: Option<f64>,
    pub core_density: f64,
    pub max_net_degree: usize,
    pub degree_histogram: DegreeHistogram,
}

/// Derives aggregate metrics from a frozen `Design`. Pure function: never
/// mutates, never hard-codes a number a caller could instead compute here.
pub fn collect(design: &Design) -> Statistics {
    let core = design.core;
    let core_area = (core.width() + 1.0) * (core.height() + 1.0);

    let movable_area: f64 = design
        .movable_index
        .iter()
        .map(|&id| design.nodes[id.index()].area())
        .sum();

    let fixed_area: f64 = design
        .fixed_index
        .iter()
        .map(|&id| design.nodes[id.index()].area())
        .sum();

    let fixed_area_in_core: f64 = design
        .fixed_index
        .iter()
        .map(|&id| &design.nodes[id.index()])
        .filter(|n| core.contains(crate::geom::point::Point::new(n.x, n.y)))
        .map(|n| n.area())
        .sum();

    let util_denom = core_area - fixed_area_in_core;
    let placement_util = if util_denom > 0.0 {
        Some(movable_area / util_denom)
    } else {
        None
    };

    let core_density = if core_area > 0.0 {
        (movable_area + fixed_area_in_core) / core_area
    } else {
        0.0
    };

    let mut max_net_degree = 0;
    let mut histogram = DegreeHistogram::default();
    for net in &design.nets {
        let d = net.degree();
        max_net_degree = max_net_degree.max(d);
        match d {
            2 => histogram.two += 1,
            3..=10 => histogram.small += 1,
            11..=100 => histogram.medium += 1,
            _ if d > 100 => histogram.large += 1,
            _ => {}
        }
    }

    Statistics {
        core_area,
        cell_area: movable_area,
        movable_area,
        fixed_area,
        fixed_area_in_core,
        placement_util,
        core_density,
        max_net_degree,
        degree_histogram: histogram,
    }
}

impl Statistics {
    /// A human-readable report in the units the reference tools use:
    /// percentages to two decimals, areas as integers plus a five-significant-
    /// digit scientific rendering.
    pub fn format_report(&self) -> String {
        let sci = |v: f64| format!("{v:.4e}");
        let util_str = match self.placement_util {
            Some(u) => format!("{:.2}%", u * 100.0),
            None => "undefined".to_string(),
        };

        format!(
            "core_area       = {:>12.0}  ({})\n\
             cell_area       = {:>12.0}  ({})\n\
             fixed_area      = {:>12.0}  ({})\n\
             fixed_in_core   = {:>12.0}  ({})\n\
             placement_util  = {}\n\
             core_density    = {:.2}%\n\
             max_net_degree  = {}\n\
             degree_hist     = d=2: {}, 3..=10: {}, 11..=100: {}, >100: {}",
            self.core_area,
            sci(self.core_area),
            self.cell_area,
            sci(self.cell_area),
            self.fixed_area,
            sci(self.fixed_area),
            self.fixed_area_in_core,
            sci(self.fixed_area_in_core),
            util_str,
            self.core_density * 100.0,
            self.max_net_degree,
            self.degree_histogram.two,
            self.degree_histogram.small,
            self.degree_histogram.medium,
            self.degree_histogram.large,
        )
    }
}
