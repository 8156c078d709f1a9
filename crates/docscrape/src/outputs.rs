use std::cmp;
use std::fs;
use std::path::Path;

use anyhow::Result;
use chrono::Local;

use crate::constants::{DATETIME_FORMAT, RESULTS_DIR};

/// Report sink selected with the `--output` flag.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputKind {
    /// Bordered console table
    Pretty,
    /// Timestamped csv file in the results directory
    File,
}

/// Renders report rows to the selected sink; the first row is the header.
/// Without a selection, rows are printed space separated.
pub fn control_output(rows: &[Vec<String>], mode: &str, output: Option<OutputKind>) -> Result<()> {
    match output {
        Some(OutputKind::Pretty) => print!("{}", pretty_table(rows)),
        Some(OutputKind::File) => file_output(rows, mode, Path::new(RESULTS_DIR))?,
        None => {
            for row in rows {
                println!("{}", row.join(" "));
            }
        }
    }
    Ok(())
}

pub fn file_output(rows: &[Vec<String>], mode: &str, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let now = Local::now().format(DATETIME_FORMAT);
    let path = dir.join(format!("{mode}_{now}.csv"));

    let mut wtr = csv::Writer::from_path(&path)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    log::info!("Results saved to {}", path.display());
    Ok(())
}

pub fn pretty_table(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = cmp::max(widths[i], cell.chars().count());
        }
    }

    let border = widths
        .iter()
        .map(|w| format!("+{}", "-".repeat(w + 2)))
        .collect::<String>()
        + "+\n";

    let mut out = border.clone();
    for (i, row) in rows.iter().enumerate() {
        for (j, &width) in widths.iter().enumerate() {
            let cell = row.get(j).map(String::as_str).unwrap_or("");
            out.push_str(&format!("| {cell:<width$} "));
        }
        out.push_str("|\n");
        // Separate the header from the body
        if i == 0 {
            out.push_str(&border);
        }
    }
    out.push_str(&border);
    out
}
