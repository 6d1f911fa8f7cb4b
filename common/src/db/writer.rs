use crate::db::core::Design;
use std::fs::File;
use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

/// Serializes final positions back to a Bookshelf `.pl` file, in the
/// declaration order of `.nodes`. Fixed nodes retain their original
/// orientation and carry `/FIXED`; movable nodes are always written `N`.
pub fn write_pl(design: &Design, path: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "UCLA pl 1.0")?;
    writeln!(file, "# Generated by qplace")?;
    writeln!(file, "# Date: {}", unix_timestamp())?;
    writeln!(file)?;

    for node in &design.nodes {
        if node.is_fixed {
            writeln!(
                file,
                "{}\t{:.6}\t{:.6}\t: {} /FIXED",
                node.name,
                node.x,
                node.y,
                node.orientation.as_str()
            )?;
        } else {
            writeln!(file, "{}\t{:.6}\t{:.6}\t: N", node.name, node.x, node.y)?;
        }
    }

    Ok(())
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
