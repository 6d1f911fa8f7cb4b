use qplace_common::db::parser::bookshelf::{self, ParseMode};
use qplace_common::db::writer;
use std::fs::File;
use std::io::Write as _;
use std::path::PathBuf;

/// Writes a star-net fixture to disk: three movable cells wired to one fixed
/// anchor at (12, 0), all other pins carrying zero weight contribution on y.
/// The quadratic system this produces is the closed form exercised in
/// `qplace_solver::system`'s `star_net_three_movable_one_fixed` test, so the
/// golden placement below (every movable cell pulled to the anchor) is an
/// exact analytic solution, not a fitted approximation.
fn write_fixture(dir: &std::path::Path) {
    std::fs::create_dir_all(dir).unwrap();

    std::fs::write(
        dir.join("star.aux"),
        "RowBasedPlacement : star.nodes star.nets star.wts star.pl star.scl\n",
    )
    .unwrap();

    let mut nodes = File::create(dir.join("star.nodes")).unwrap();
    writeln!(nodes, "UCLA nodes 1.0").unwrap();
    writeln!(nodes, "NumNodes : 4").unwrap();
    writeln!(nodes, "NumTerminals : 1").unwrap();
    writeln!(nodes, "m0 1 1").unwrap();
    writeln!(nodes, "m1 1 1").unwrap();
    writeln!(nodes, "m2 1 1").unwrap();
    writeln!(nodes, "t 1 1 terminal").unwrap();

    let mut pl = File::create(dir.join("star.pl")).unwrap();
    writeln!(pl, "UCLA pl 1.0").unwrap();
    writeln!(pl, "m0 0 0 : N").unwrap();
    writeln!(pl, "m1 1 1 : N").unwrap();
    writeln!(pl, "m2 2 2 : N").unwrap();
    writeln!(pl, "t 12 0 : N /FIXED").unwrap();

    let mut scl = File::create(dir.join("star.scl")).unwrap();
    writeln!(scl, "UCLA scl 1.0").unwrap();
    writeln!(scl, "NumRows : 1").unwrap();
    writeln!(scl, "CoreRow Horizontal").unwrap();
    writeln!(scl, "  Coordinate : 0").unwrap();
    writeln!(scl, "  Height : 100").unwrap();
    writeln!(scl, "  Sitewidth : 1").unwrap();
    writeln!(scl, "  SubrowOrigin : 0  NumSites : 100").unwrap();
    writeln!(scl, "End").unwrap();

    let mut nets = File::create(dir.join("star.nets")).unwrap();
    writeln!(nets, "UCLA nets 1.0").unwrap();
    writeln!(nets, "NumNets : 1").unwrap();
    writeln!(nets, "NumPins : 4").unwrap();
    writeln!(nets, "NetDegree : 4 n0").unwrap();
    writeln!(nets, "\tt O").unwrap();
    writeln!(nets, "\tm0 I").unwrap();
    writeln!(nets, "\tm1 I").unwrap();
    writeln!(nets, "\tm2 I").unwrap();
}

fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("qplace-e2e-{name}-{}", std::process::id()))
}

/// read -> place -> write -> re-read, golden positions within 1e-4.
#[test]
fn smoke_end_to_end_matches_golden_positions() {
    let dir = scratch_dir("smoke");
    write_fixture(&dir);
    let aux_path = dir.join("star.aux");

    let mut design = bookshelf::read(aux_path.to_str().unwrap(), ParseMode::Lenient).unwrap();
    qplace_solver::place(&mut design, 1e-9, 4).unwrap();

    for name in ["m0", "m1", "m2"] {
        let id = design.name_map[name];
        let node = &design.nodes[id.index()];
        assert!((node.x - 12.0).abs() < 1e-4, "{name}.x = {}", node.x);
        assert!((node.y - 0.0).abs() < 1e-4, "{name}.y = {}", node.y);
    }

    writer::write_pl(&design, dir.join("star.pl").to_str().unwrap()).unwrap();

    let reread = bookshelf::read(aux_path.to_str().unwrap(), ParseMode::Lenient).unwrap();
    for name in ["m0", "m1", "m2"] {
        let before = &design.nodes[design.name_map[name].index()];
        let after = &reread.nodes[reread.name_map[name].index()];
        assert!((before.x - after.x).abs() < 1e-4);
        assert!((before.y - after.y).abs() < 1e-4);
    }

    std::fs::remove_dir_all(&dir).ok();
}
