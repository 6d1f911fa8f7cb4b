use crate::db::core::{Design, Orientation, PinDirection, Row};
use crate::error::ReadError;
use crate::geom::point::Point;
use crate::geom::rect::Rect;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Strict mode promotes a header-count mismatch to a fatal error instead of
/// the default warn-and-continue; both modes treat dangling pins and
/// malformed records as fatal, since those corrupt the model rather than
/// merely mis-describing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseMode {
    Strict,
    Lenient,
}

/// Entry point: reads the five Bookshelf files rooted at `aux_path` into a
/// fully validated `Design`. Files are consumed in a fixed order because
/// later stages (`.pl`, which needs the `.nodes` name table) depend on
/// earlier ones.
pub fn read(aux_path: &str, mode: ParseMode) -> Result<Design, ReadError> {
    let aux_path = Path::new(aux_path);
    let parent_dir = aux_path.parent().unwrap_or(Path::new("."));

    log::info!("reading aux file: {}", aux_path.display());
    let (nodes_file, nets_file, wts_file, pl_file, scl_file) = parse_aux(aux_path)?;

    let basename = aux_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("design");
    let resolve = |declared: &str, ext: &str| -> PathBuf {
        if declared.is_empty() {
            parent_dir.join(format!("{basename}.{ext}"))
        } else {
            parent_dir.join(declared)
        }
    };

    let mut design = Design::new();
    parse_nodes(&mut design, &resolve(&nodes_file, "nodes"), mode)?;
    parse_pl(&mut design, &resolve(&pl_file, "pl"))?;
    parse_scl(&mut design, &resolve(&scl_file, "scl"))?;
    parse_nets(&mut design, &resolve(&nets_file, "nets"), mode)?;

    let wts_path = resolve(&wts_file, "wts");
    if wts_path.exists() {
        parse_wts(&mut design, &wts_path)?;
    }

    design.reindex_movable();
    Ok(design)
}

fn open(path: &Path) -> Result<BufReader<File>, ReadError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|_| ReadError::MissingInput(path.display().to_string()))
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}

fn parse_aux(path: &Path) -> Result<(String, String, String, String, String), ReadError> {
    let reader = open(path)?;

    let mut nodes_file = String::new();
    let mut nets_file = String::new();
    let mut wts_file = String::new();
    let mut pl_file = String::new();
    let mut scl_file = String::new();

    for line in reader.lines() {
        let line = line.map_err(ReadError::Io)?;
        let line = strip_comment(&line).trim();
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() || parts[0] != "RowBasedPlacement" {
            continue;
        }
        let files: Vec<&str> = parts.iter().skip_while(|&&p| p != ":").skip(1).copied().collect();
        for part in files {
            if part.ends_with(".nodes") {
                nodes_file = part.to_string();
            } else if part.ends_with(".nets") {
                nets_file = part.to_string();
            } else if part.ends_with(".wts") {
                wts_file = part.to_string();
            } else if part.ends_with(".pl") {
                pl_file = part.to_string();
            } else if part.ends_with(".scl") {
                scl_file = part.to_string();
            }
        }
        break;
    }

    Ok((nodes_file, nets_file, wts_file, pl_file, scl_file))
}

fn is_skippable(line: &str) -> bool {
    line.is_empty() || line.starts_with("UCLA") || line.starts_with("Num")
}

fn parse_nodes(design: &mut Design, path: &Path, mode: ParseMode) -> Result<(), ReadError> {
    log::info!("parsing nodes: {}", path.display());
    let reader = open(path)?;
    let file_name = path.display().to_string();

    let mut declared_num_nodes: Option<usize> = None;
    let mut declared_num_terminals: Option<usize> = None;
    // (name, width, height, explicit "terminal" tag) in declaration order.
    let mut records: Vec<(String, f64, f64, bool)> = Vec::new();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.map_err(ReadError::Io)?;
        let raw = strip_comment(&line).trim();
        if raw.is_empty() {
            continue;
        }
        if let Some(rest) = raw.strip_prefix("NumNodes") {
            declared_num_nodes = parse_header_int(rest);
            continue;
        }
        if let Some(rest) = raw.strip_prefix("NumTerminals") {
            declared_num_terminals = parse_header_int(rest);
            continue;
        }
        if raw.starts_with("UCLA") {
            continue;
        }

        let parts: Vec<&str> = raw.split_whitespace().collect();
        if parts.len() < 3 {
            return Err(ReadError::MalformedRecord {
                file: file_name.clone(),
                line: lineno + 1,
                detail: format!("expected '<name> <w> <h>[ terminal]', got '{raw}'"),
            });
        }

        let name = parts[0].to_string();
        let width = parse_f64(parts[1], &file_name, lineno + 1)?;
        let height = parse_f64(parts[2], &file_name, lineno + 1)?;
        let declared_terminal = parts.get(3).is_some_and(|&t| t == "terminal");

        records.push((name, width, height, declared_terminal));
    }

    let num_nodes = records.len();
    // Terminals are the final `NumTerminals` declarations by position; the
    // explicit `terminal` token is advisory and only checked for agreement.
    let num_terminals = declared_num_terminals.unwrap_or_else(|| {
        records.iter().filter(|r| r.3).count()
    });
    let movable_cutoff = num_nodes.saturating_sub(num_terminals);

    for (i, (name, width, height, declared_terminal)) in records.into_iter().enumerate() {
        let is_fixed = i >= movable_cutoff;
        if declared_terminal != is_fixed {
            log::warn!(
                "{file_name}: node '{name}' explicit terminal tag ({declared_terminal}) disagrees with its position in the declaration order (inferred fixed={is_fixed})"
            );
        }
        design.add_node(name, width, height, is_fixed);
    }

    if let Some(declared) = declared_num_nodes
        && declared != num_nodes
    {
        handle_header_mismatch(&file_name, "NumNodes", declared, num_nodes, mode)?;
    }
    let observed_terminals = design.nodes.iter().filter(|n| n.is_fixed).count();
    if let Some(declared) = declared_num_terminals
        && declared != observed_terminals
    {
        handle_header_mismatch(&file_name, "NumTerminals", declared, observed_terminals, mode)?;
    }

    Ok(())
}

fn handle_header_mismatch(
    file: &str,
    field: &str,
    declared: usize,
    observed: usize,
    mode: ParseMode,
) -> Result<(), ReadError> {
    match mode {
        ParseMode::Strict => Err(ReadError::HeaderMismatch {
            file: file.to_string(),
            declared,
            observed,
        }),
        ParseMode::Lenient => {
            log::warn!(
                "{file}: {field} declared {declared} but observed {observed}; continuing with observed count"
            );
            Ok(())
        }
    }
}

fn parse_header_int(rest: &str) -> Option<usize> {
    rest.trim_start_matches(':').trim().parse().ok()
}

fn parse_f64(tok: &str, file: &str, line: usize) -> Result<f64, ReadError> {
    tok.parse::<f64>().map_err(|_| ReadError::MalformedRecord {
        file: file.to_string(),
        line,
        detail: format!("'{tok}' is not a number"),
    })
}

fn parse_pl(design: &mut Design, path: &Path) -> Result<(), ReadError> {
    log::info!("parsing pl: {}", path.display());
    let reader = open(path)?;
    let file_name = path.display().to_string();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.map_err(ReadError::Io)?;
        let raw = strip_comment(&line).trim();
        if raw.is_empty() || raw.starts_with("UCLA") {
            continue;
        }

        let parts: Vec<&str> = raw.split_whitespace().collect();
        if parts.len() < 3 {
            return Err(ReadError::MalformedRecord {
                file: file_name.clone(),
                line: lineno + 1,
                detail: format!("expected '<name> <x> <y> : <orient>[ /FIXED]', got '{raw}'"),
            });
        }

        let name = parts[0];
        let x = parse_f64(parts[1], &file_name, lineno + 1)?;
        let y = parse_f64(parts[2], &file_name, lineno + 1)?;

        let mut orient_tag = "N";
        if parts.len() >= 5 && parts[3] == ":" {
            orient_tag = parts[4];
        }
        let is_fixed = raw.contains("/FIXED") || orient_tag == "F";

        let orientation = Orientation::parse(orient_tag).unwrap_or(Orientation::N);

        let Some(&id) = design.name_map.get(name) else {
            // The /FIXED pl entry may reference a node not in .nodes only in
            // malformed inputs; treat it the same as a dangling pin.
            return Err(ReadError::MalformedRecord {
                file: file_name.clone(),
                line: lineno + 1,
                detail: format!("'.pl' references undeclared node '{name}'"),
            });
        };

        let node = &mut design.nodes[id.index()];
        node.x = x;
        node.y = y;
        node.orientation = orientation;
        if is_fixed {
            node.is_fixed = true;
        }
    }

    Ok(())
}

fn parse_scl(design: &mut Design, path: &Path) -> Result<(), ReadError> {
    log::info!("parsing scl: {}", path.display());
    let reader = open(path)?;
    let file_name = path.display().to_string();

    let mut current_y = 0.0;
    let mut current_height = 1.0;
    let mut current_site_width = 1.0;

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.map_err(ReadError::Io)?;
        let raw = strip_comment(&line).trim();
        if raw.is_empty() || is_skippable(raw) || raw.starts_with("CoreRow") || raw == "End" {
            continue;
        }

        if let Some(rest) = raw.strip_prefix("Coordinate") {
            current_y = parse_f64(rest.trim_start_matches(':').trim(), &file_name, lineno + 1)?;
        } else if let Some(rest) = raw.strip_prefix("Height") {
            current_height = parse_f64(rest.trim_start_matches(':').trim(), &file_name, lineno + 1)?;
        } else if let Some(rest) = raw.strip_prefix("Sitewidth") {
            current_site_width =
                parse_f64(rest.trim_start_matches(':').trim(), &file_name, lineno + 1)?;
        } else if raw.starts_with("SubrowOrigin") {
            let parts: Vec<&str> = raw.split_whitespace().collect();
            let origin_idx = parts.iter().position(|&p| p == ":").map(|i| i + 1);
            let num_sites_idx = parts.iter().position(|&p| p == "NumSites").map(|i| i + 2);

            let origin = origin_idx
                .and_then(|i| parts.get(i))
                .ok_or_else(|| malformed(&file_name, lineno + 1, "missing SubrowOrigin value"))?;
            let origin = parse_f64(origin, &file_name, lineno + 1)?;

            let num_sites = num_sites_idx
                .and_then(|i| parts.get(i))
                .ok_or_else(|| malformed(&file_name, lineno + 1, "missing NumSites value"))?;
            let num_sites: u32 = num_sites
                .parse()
                .map_err(|_| malformed(&file_name, lineno + 1, "NumSites is not an integer"))?;

            design.rows.push(Row {
                y: current_y,
                height: current_height,
                x_origin: origin,
                num_sites,
                site_width: current_site_width,
            });
        }
    }

    if design.rows.is_empty() {
        design.core = Rect::default();
        return Ok(());
    }

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for row in &design.rows {
        let (x0, x1) = row.extent();
        min_x = min_x.min(x0);
        max_x = max_x.max(x1 - 1.0);
        min_y = min_y.min(row.y);
        max_y = max_y.max(row.y + row.height - 1.0);
    }

    design.core = Rect::new(Point::new(min_x, min_y), Point::new(max_x, max_y));
    log::info!("core region inferred from scl: {:?}", design.core);

    Ok(())
}

fn malformed(file: &str, line: usize, detail: &str) -> ReadError {
    ReadError::MalformedRecord {
        file: file.to_string(),
        line,
        detail: detail.to_string(),
    }
}

fn parse_nets(design: &mut Design, path: &Path, mode: ParseMode) -> Result<(), ReadError> {
    log::info!("parsing nets: {}", path.display());
    let reader = open(path)?;
    let file_name = path.display().to_string();

    let mut declared_num_nets: Option<usize> = None;
    let mut declared_num_pins: Option<usize> = None;
    let mut current_net = None;
    let mut remaining_in_net = 0usize;
    let mut observed_pins = 0usize;

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.map_err(ReadError::Io)?;
        let raw = strip_comment(&line).trim();
        if raw.is_empty() {
            continue;
        }
        if let Some(rest) = raw.strip_prefix("NumNets") {
            declared_num_nets = parse_header_int(rest);
            continue;
        }
        if let Some(rest) = raw.strip_prefix("NumPins") {
            declared_num_pins = parse_header_int(rest);
            continue;
        }
        if raw.starts_with("UCLA") {
            continue;
        }

        if let Some(rest) = raw.strip_prefix("NetDegree") {
            let rest = rest.trim_start_matches(':').trim();
            let parts: Vec<&str> = rest.split_whitespace().collect();
            let degree: usize = parts
                .first()
                .and_then(|d| d.parse().ok())
                .ok_or_else(|| malformed(&file_name, lineno + 1, "missing net degree"))?;
            let net_name = parts
                .get(1)
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("net{}", design.num_nets()));

            current_net = Some(design.add_net(net_name));
            remaining_in_net = degree;
            continue;
        }

        let Some(net_id) = current_net else {
            continue;
        };
        if remaining_in_net == 0 {
            continue;
        }

        let parts: Vec<&str> = raw.split_whitespace().collect();
        let node_name = parts
            .first()
            .ok_or_else(|| malformed(&file_name, lineno + 1, "missing pin node reference"))?;

        let Some(&cell_id) = design.name_map.get(*node_name) else {
            return Err(ReadError::DanglingPin {
                file: file_name.clone(),
                line: lineno + 1,
                net: design.nets[net_id.index()].name.clone(),
                node: node_name.to_string(),
            });
        };

        let direction = parts.get(1).map(|s| PinDirection::parse(s)).unwrap_or(PinDirection::Input);

        let offset = if parts.len() >= 5 && parts[2] == ":" {
            let dx = parse_f64(parts[3], &file_name, lineno + 1)?;
            let dy = parse_f64(parts[4], &file_name, lineno + 1)?;
            Point::new(dx, dy)
        } else {
            Point::new(0.0, 0.0)
        };

        design.add_pin(cell_id, net_id, direction, offset);
        remaining_in_net -= 1;
        observed_pins += 1;
    }

    let observed_nets = design.num_nets();
    if let Some(declared) = declared_num_nets
        && declared != observed_nets
    {
        handle_header_mismatch(&file_name, "NumNets", declared, observed_nets, mode)?;
    }
    if let Some(declared) = declared_num_pins
        && declared != observed_pins
    {
        handle_header_mismatch(&file_name, "NumPins", declared, observed_pins, mode)?;
    }

    Ok(())
}

/// `.wts` lines are `<netname> <weight>`; a name that matches neither a net
/// nor a node is ignored rather than treated as fatal, since `.wts` is an
/// optional, loosely-specified file.
fn parse_wts(design: &mut Design, path: &Path) -> Result<(), ReadError> {
    log::info!("parsing wts: {}", path.display());
    let reader = open(path)?;

    for line in reader.lines() {
        let line = line.map_err(ReadError::Io)?;
        let raw = strip_comment(&line).trim();
        if raw.is_empty() || is_skippable(raw) {
            continue;
        }
        let parts: Vec<&str> = raw.split_whitespace().collect();
        if parts.len() < 2 {
            continue;
        }
        if let (Some(&net_id), Ok(weight)) = (design.net_name_map.get(parts[0]), parts[1].parse::<f64>()) {
            design.nets[net_id.index()].weight = weight;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Writes a minimal Bookshelf design (1 movable cell, 1 terminal, 1 net)
    /// to a fresh scratch directory and returns its `.aux` path.
    fn write_fixture(dir: &Path) {
        std::fs::create_dir_all(dir).unwrap();

        std::fs::write(dir.join("t.aux"), "RowBasedPlacement : t.nodes t.nets t.wts t.pl t.scl\n").unwrap();

        let mut nodes = File::create(dir.join("t.nodes")).unwrap();
        writeln!(nodes, "UCLA nodes 1.0").unwrap();
        writeln!(nodes, "NumNodes : 2").unwrap();
        writeln!(nodes, "NumTerminals : 1").unwrap();
        writeln!(nodes, "a 1 1").unwrap();
        writeln!(nodes, "b 1 1 terminal").unwrap();

        let mut pl = File::create(dir.join("t.pl")).unwrap();
        writeln!(pl, "UCLA pl 1.0").unwrap();
        writeln!(pl, "a 0 0 : N").unwrap();
        writeln!(pl, "b 10 20 : N /FIXED").unwrap();

        let mut scl = File::create(dir.join("t.scl")).unwrap();
        writeln!(scl, "UCLA scl 1.0").unwrap();
        writeln!(scl, "NumRows : 1").unwrap();
        writeln!(scl, "CoreRow Horizontal").unwrap();
        writeln!(scl, "  Coordinate : 0").unwrap();
        writeln!(scl, "  Height : 100").unwrap();
        writeln!(scl, "  Sitewidth : 1").unwrap();
        writeln!(scl, "  SubrowOrigin : 0  NumSites : 100").unwrap();
        writeln!(scl, "End").unwrap();

        let mut nets = File::create(dir.join("t.nets")).unwrap();
        writeln!(nets, "UCLA nets 1.0").unwrap();
        writeln!(nets, "NumNets : 1").unwrap();
        writeln!(nets, "NumPins : 2").unwrap();
        writeln!(nets, "NetDegree : 2 n0").unwrap();
        writeln!(nets, "\ta I").unwrap();
        writeln!(nets, "\tb O").unwrap();
    }

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("qplace-bookshelf-test-{name}-{}", std::process::id()))
    }

    #[test]
    fn reads_minimal_design() {
        let dir = scratch_dir("minimal");
        write_fixture(&dir);

        let design = read(dir.join("t.aux").to_str().unwrap(), ParseMode::Lenient).unwrap();

        assert_eq!(design.num_nodes(), 2);
        assert_eq!(design.num_movable(), 1);
        assert_eq!(design.fixed_index.len(), 1);
        assert_eq!(design.num_nets(), 1);
        assert_eq!(design.nets[0].degree(), 2);

        let t_id = design.name_map["b"];
        assert_eq!(design.nodes[t_id.index()].x, 10.0);
        assert_eq!(design.nodes[t_id.index()].y, 20.0);
        assert!(design.nodes[t_id.index()].is_fixed);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn dangling_pin_is_fatal() {
        let dir = scratch_dir("dangling");
        write_fixture(&dir);
        std::fs::write(
            dir.join("t.nets"),
            "UCLA nets 1.0\nNumNets : 1\nNumPins : 1\nNetDegree : 1 n0\n\tghost I\n",
        )
        .unwrap();

        let result = read(dir.join("t.aux").to_str().unwrap(), ParseMode::Lenient);
        assert!(matches!(result, Err(ReadError::DanglingPin { .. })));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn strict_mode_rejects_header_mismatch() {
        let dir = scratch_dir("strict");
        write_fixture(&dir);
        std::fs::write(
            dir.join("t.nodes"),
            "UCLA nodes 1.0\nNumNodes : 5\nNumTerminals : 1\na 1 1\nb 1 1 terminal\n",
        )
        .unwrap();

        let result = read(dir.join("t.aux").to_str().unwrap(), ParseMode::Strict);
        assert!(matches!(result, Err(ReadError::HeaderMismatch { .. })));

        let lenient = read(dir.join("t.aux").to_str().unwrap(), ParseMode::Lenient);
        assert!(lenient.is_ok());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn strict_mode_rejects_nets_header_mismatch() {
        let dir = scratch_dir("strict-nets");
        write_fixture(&dir);
        std::fs::write(
            dir.join("t.nets"),
            "UCLA nets 1.0\nNumNets : 3\nNumPins : 2\nNetDegree : 2 n0\n\ta I\n\tb O\n",
        )
        .unwrap();

        let result = read(dir.join("t.aux").to_str().unwrap(), ParseMode::Strict);
        assert!(matches!(result, Err(ReadError::HeaderMismatch { .. })));

        let lenient = read(dir.join("t.aux").to_str().unwrap(), ParseMode::Lenient);
        assert!(lenient.is_ok());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn write_then_reparse_round_trips_positions() {
        let dir = scratch_dir("roundtrip");
        write_fixture(&dir);

        let mut design = read(dir.join("t.aux").to_str().unwrap(), ParseMode::Lenient).unwrap();
        let a_id = design.name_map["a"];
        design.nodes[a_id.index()].x = 42.125;
        design.nodes[a_id.index()].y = 7.5;

        let pl_path = dir.join("roundtrip.pl");
        crate::db::writer::write_pl(&design, pl_path.to_str().unwrap()).unwrap();

        let mut reparsed = Design::new();
        // Reuse the original node table so parse_pl can resolve names.
        for node in &design.nodes {
            reparsed.add_node(node.name.clone(), node.width, node.height, false);
        }
        parse_pl(&mut reparsed, &pl_path).unwrap();

        let a2 = reparsed.name_map["a"];
        assert!((reparsed.nodes[a2.index()].x - 42.125).abs() < 1e-6);
        assert!((reparsed.nodes[a2.index()].y - 7.5).abs() < 1e-6);

        let b2 = reparsed.name_map["b"];
        assert!(reparsed.nodes[b2.index()].is_fixed);
        assert!(!reparsed.nodes[a2.index()].is_fixed);

        std::fs::remove_dir_all(&dir).ok();
    }
}
