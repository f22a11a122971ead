//! CSV output of per-zone totals.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use tract_sched::ZoneTotal;

/// Header row.
pub const HEADER: [&str; 2] = ["ZIPCode", "P1_001N"];

fn field(value: &str) -> std::borrow::Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\"")).into()
    } else {
        value.into()
    }
}

/// Write totals as CSV rows in the given order.
pub fn write_rows(mut writer: impl Write, totals: &[ZoneTotal]) -> io::Result<()> {
    writeln!(writer, "{}", HEADER.join(","))?;
    for total in totals {
        writeln!(writer, "{},{}", field(&total.id), total.sum)?;
    }
    writer.flush()
}

/// Write totals to `path`, creating parent directories.
pub fn write_csv(path: &Path, totals: &[ZoneTotal]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    write_rows(BufWriter::new(File::create(path)?), totals)
}
