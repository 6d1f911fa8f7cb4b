use rand::Rng;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Emits a synthetic Bookshelf design directory for exercising the pipeline
/// without a real benchmark on hand. Test tooling only; has no bearing on
/// placement semantics.
pub fn generate_random_design(
    dir: &str,
    basename: &str,
    num_cells: usize,
    num_nets: usize,
    target_utilization: f64,
) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    let util = target_utilization.clamp(0.05, 0.95);

    let cell_w: u32 = 10;
    let cell_h: u32 = 20;
    let num_terminals = 2usize;

    let total_cell_area = (num_cells as f64) * (cell_w as f64) * (cell_h as f64);
    let core_area = total_cell_area / util;
    let core_side = core_area.sqrt().max((cell_w * 4) as f64) as u32;

    let site_width: u32 = 1;
    let row_height = cell_h;
    let num_sites = core_side / site_width;
    let num_rows = (core_side / row_height).max(1);

    log::info!(
        "generating benchmark '{}': {} cells, {} nets, core {}x{} (target util {:.0}%)",
        basename,
        num_cells,
        num_nets,
        core_side,
        num_rows * row_height,
        util * 100.0
    );

    write_aux(dir, basename)?;
    write_nodes(dir, basename, num_cells, num_terminals, cell_w, cell_h)?;
    write_pl(
        dir,
        basename,
        num_cells,
        num_terminals,
        core_side,
        row_height,
        cell_w,
        cell_h,
    )?;
    write_scl(dir, basename, num_rows, row_height, num_sites, site_width)?;
    write_nets(dir, basename, num_cells, num_nets)?;

    Ok(())
}

fn path_for(dir: &str, basename: &str, ext: &str) -> std::path::PathBuf {
    Path::new(dir).join(format!("{basename}.{ext}"))
}

fn write_aux(dir: &str, basename: &str) -> std::io::Result<()> {
    let mut f = fs::File::create(path_for(dir, basename, "aux"))?;
    writeln!(
        f,
        "RowBasedPlacement : {b}.nodes {b}.nets {b}.wts {b}.pl {b}.scl",
        b = basename
    )
}

fn write_nodes(
    dir: &str,
    basename: &str,
    num_cells: usize,
    num_terminals: usize,
    cell_w: u32,
    cell_h: u32,
) -> std::io::Result<()> {
    let mut f = fs::File::create(path_for(dir, basename, "nodes"))?;
    writeln!(f, "UCLA nodes 1.0")?;
    writeln!(f, "NumNodes : {}", num_cells + num_terminals)?;
    writeln!(f, "NumTerminals : {}", num_terminals)?;
    for i in 0..num_cells {
        writeln!(f, "o{i} {cell_w} {cell_h}")?;
    }
    for i in 0..num_terminals {
        writeln!(f, "p{i} 1 1 terminal")?;
    }
    Ok(())
}

fn write_pl(
    dir: &str,
    basename: &str,
    num_cells: usize,
    num_terminals: usize,
    core_side: u32,
    row_height: u32,
    cell_w: u32,
    cell_h: u32,
) -> std::io::Result<()> {
    let mut f = fs::File::create(path_for(dir, basename, "pl"))?;
    writeln!(f, "UCLA pl 1.0")?;
    let mut rng = rand::thread_rng();
    for i in 0..num_cells {
        let max_x = core_side.saturating_sub(cell_w).max(1);
        let max_y = core_side.saturating_sub(cell_h).max(1);
        let x = rng.gen_range(0..max_x);
        let y = (rng.gen_range(0..max_y) / row_height) * row_height;
        writeln!(f, "o{i} {x} {y} : N")?;
    }
    for i in 0..num_terminals {
        let x = if i == 0 { 0 } else { core_side };
        let y = core_side / 2;
        writeln!(f, "p{i} {x} {y} : N /FIXED")?;
    }
    Ok(())
}

fn write_scl(
    dir: &str,
    basename: &str,
    num_rows: u32,
    row_height: u32,
    num_sites: u32,
    site_width: u32,
) -> std::io::Result<()> {
    let mut f = fs::File::create(path_for(dir, basename, "scl"))?;
    writeln!(f, "UCLA scl 1.0")?;
    writeln!(f, "NumRows : {num_rows}")?;
    for r in 0..num_rows {
        writeln!(f, "CoreRow Horizontal")?;
        writeln!(f, "  Coordinate : {}", r * row_height)?;
        writeln!(f, "  Height : {row_height}")?;
        writeln!(f, "  Sitewidth : {site_width}")?;
        writeln!(f, "  Sitespacing : {site_width}")?;
        writeln!(f, "  Siteorient : 1")?;
        writeln!(f, "  Sitesymmetry : 1")?;
        writeln!(f, "  SubrowOrigin : 0  NumSites : {num_sites}")?;
        writeln!(f, "End")?;
    }
    Ok(())
}

fn write_nets(dir: &str, basename: &str, num_cells: usize, num_nets: usize) -> std::io::Result<()> {
    let mut f = fs::File::create(path_for(dir, basename, "nets"))?;
    let mut rng = rand::thread_rng();
    let mut total_pins = 0usize;
    let mut body = String::new();

    for i in 0..num_nets {
        let degree = rng.gen_range(2..=4).min(num_cells.max(2));
        total_pins += degree;
        body.push_str(&format!("NetDegree : {degree} n{i}\n"));
        body.push_str("\tp0 O\n");
        for _ in 1..degree {
            let c = rng.gen_range(0..num_cells.max(1));
            body.push_str(&format!("\to{c} I\n"));
        }
    }

    writeln!(f, "UCLA nets 1.0")?;
    writeln!(f, "NumNets : {num_nets}")?;
    writeln!(f, "NumPins : {total_pins}")?;
    write!(f, "{body}")
}
