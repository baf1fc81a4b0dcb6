use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use spred_cli::cli::OutputFormat;
use spred_cli::common::load_circuit;
use spred_cli::config::SpredConfig;
use spred_core::{ElementReport, SolveReport};
use tabwriter::TabWriter;
use tracing::info;

#[derive(Serialize)]
struct SolveOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    summary: &'a SolveReport,
    elements: &'a [ElementReport],
}

pub fn handle(netlist: &Path, format: OutputFormat, config: &SpredConfig) -> Result<()> {
    let (definition, mut circuit) = load_circuit(netlist, config)?;
    info!(
        "Solving {} ({} elements)",
        netlist.display(),
        circuit.element_count()
    );
    let report = circuit
        .solve()
        .with_context(|| format!("solving {}", netlist.display()))?;
    let elements = circuit.element_report();

    let output = SolveOutput {
        title: definition.title.as_deref(),
        summary: &report,
        elements: &elements,
    };
    match format {
        OutputFormat::Table => print_table(&output),
        OutputFormat::Json => print_json(&output),
    }
}

fn print_table(output: &SolveOutput) -> Result<()> {
    let summary = output.summary;
    if let Some(title) = output.title {
        println!("{title}");
    }
    println!(
        "Equivalent: {:.6} V across {:.6} ohm, source current {:.6} A",
        summary.equivalent_emf, summary.equivalent_resistance, summary.source_current
    );
    println!(
        "Merges: {}, wires contracted: {}",
        summary.merges, summary.contracted_wires
    );

    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "ELEMENT\tKIND\tNEGATIVE\tPOSITIVE\tRESISTANCE\tVOLTAGE\tCURRENT")?;
    for row in output.elements {
        let current = row
            .current
            .map(|i| format!("{i:.6}"))
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{:.6}\t{:.6}\t{}",
            row.name,
            row.kind.as_str(),
            row.negative,
            row.positive,
            row.resistance,
            row.voltage,
            current,
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn print_json(output: &SolveOutput) -> Result<()> {
    serde_json::to_writer_pretty(io::stdout(), output)
        .map_err(|err| anyhow::anyhow!("serializing solution to JSON: {err}"))?;
    println!();
    Ok(())
}
