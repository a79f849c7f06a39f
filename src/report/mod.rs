//! Text rendering of simulation results for the CLI frontend.

use std::fmt::{self, Write};

use crate::circuit::{NodeId, NodeKind, BRANCH_SUFFIX};
use crate::solver::{solution_value, DcResult, SimulationResult, TransientResult};

/// Width of one table column.
const COLUMN_WIDTH: usize = 14;

/// Output layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for reading in a terminal.
    #[default]
    Table,
    /// Comma-separated values with a header row.
    Csv,
}

/// Render one variant's result.
pub fn render(variant: usize, result: &SimulationResult, format: OutputFormat) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_result(&mut out, variant, result, format);
    out
}

/// Write one variant's result.
pub fn write_result<W: Write>(
    out: &mut W,
    variant: usize,
    result: &SimulationResult,
    format: OutputFormat,
) -> fmt::Result {
    if format == OutputFormat::Table {
        writeln!(out, "== variant {variant} ==")?;
    }

    match result {
        SimulationResult::OperatingPoint(dc) => write_dc(out, dc, format),
        SimulationResult::Transient(tran) => write_transient(out, tran, format),
    }
}

/// Display label of a node: `V(name)` or `I(element)`.
fn node_label(name: &str) -> String {
    match NodeKind::of(name) {
        NodeKind::Voltage => format!("V({name})"),
        NodeKind::BranchCurrent => {
            format!("I({})", name.strip_suffix(BRANCH_SUFFIX).unwrap_or(name))
        }
    }
}

fn write_dc<W: Write>(out: &mut W, dc: &DcResult, format: OutputFormat) -> fmt::Result {
    let rows = dc
        .node_names
        .iter()
        .map(|name| (node_label(name), dc.value(name).unwrap_or(0.0)));

    match format {
        OutputFormat::Table => {
            for (label, value) in rows {
                writeln!(out, "{label:<COLUMN_WIDTH$} {value:>COLUMN_WIDTH$.6e}")?;
            }
        }
        OutputFormat::Csv => {
            writeln!(out, "quantity,value")?;
            for (label, value) in rows {
                writeln!(out, "{label},{value:e}")?;
            }
        }
    }
    Ok(())
}

fn write_transient<W: Write>(out: &mut W, tran: &TransientResult, format: OutputFormat) -> fmt::Result {
    // Without probes, show every non-ground node
    let columns: Vec<(String, NodeId)> = if tran.probes.is_empty() {
        tran.node_names
            .iter()
            .enumerate()
            .map(|(idx, name)| (node_label(name), NodeId(idx + 1)))
            .collect()
    } else {
        tran.probes
            .iter()
            .map(|probe| (probe.label.clone(), probe.node))
            .collect()
    };

    match format {
        OutputFormat::Table => {
            write!(out, "{:>COLUMN_WIDTH$}", "time")?;
            for (label, _) in &columns {
                write!(out, " {label:>COLUMN_WIDTH$}")?;
            }
            writeln!(out)?;

            for (time, row) in tran.time.iter().zip(&tran.solutions) {
                write!(out, "{time:>COLUMN_WIDTH$.6e}")?;
                for (_, node) in &columns {
                    write!(out, " {:>COLUMN_WIDTH$.6e}", solution_value(row, *node))?;
                }
                writeln!(out)?;
            }
        }
        OutputFormat::Csv => {
            write!(out, "time")?;
            for (label, _) in &columns {
                write!(out, ",{label}")?;
            }
            writeln!(out)?;

            for (time, row) in tran.time.iter().zip(&tran.solutions) {
                write!(out, "{time:e}")?;
                for (_, node) in &columns {
                    write!(out, ",{:e}", solution_value(row, *node))?;
                }
                writeln!(out)?;
            }
        }
    }
    Ok(())
}
