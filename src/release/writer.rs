use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::ReleaseTable;

/// Write a release table as tab-separated text
///
/// Format:
/// - no header line
/// - one line per particle, columns in layout order
/// - timestamps as `YYYY-MM-DDTHH:MM:SS`
pub fn write_table<W: Write>(writer: &mut W, table: &ReleaseTable) -> Result<()> {
    let columns = table.columns();

    for (index, row) in table.rows().iter().enumerate() {
        let mut first = true;
        for &column in columns {
            let cell = row
                .get(column)
                .with_context(|| format!("row {} has no {} value", index, column.name()))?;
            if !first {
                writer.write_all(b"\t")?;
            }
            write!(writer, "{}", cell)?;
            first = false;
        }
        writer.write_all(b"\n")?;
    }

    Ok(())
}

/// Write a release table to a file, replacing any existing content
pub fn write_table_to_path(path: &Path, table: &ReleaseTable) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create release file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    write_table(&mut writer, table)?;
    writer.flush()?;

    Ok(())
}
