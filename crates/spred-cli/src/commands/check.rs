use std::path::Path;

use anyhow::{Context, Result};
use spred_cli::common::load_circuit;
use spred_cli::config::SpredConfig;

pub fn handle(netlist: &Path, config: &SpredConfig) -> Result<()> {
    let (_, circuit) = load_circuit(netlist, config)?;
    circuit
        .validate()
        .with_context(|| format!("validating {}", netlist.display()))?;
    println!(
        "{} is valid: {} element(s), {} node(s)",
        netlist.display(),
        circuit.element_count(),
        circuit.node_count()
    );
    Ok(())
}
