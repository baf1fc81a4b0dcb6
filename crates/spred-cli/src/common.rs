//! Netlist loading shared across commands.

use anyhow::{Context, Result};
use spred_core::{Circuit, Netlist};
use std::path::Path;
use tracing::debug;

use crate::config::SpredConfig;

/// Read and parse a TOML netlist.
pub fn load_netlist(path: &Path) -> Result<Netlist> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading netlist {}", path.display()))?;
    let netlist: Netlist = toml::from_str(&contents)
        .with_context(|| format!("parsing netlist {}", path.display()))?;
    debug!(
        path = %path.display(),
        elements = netlist.elements.len(),
        "loaded netlist"
    );
    Ok(netlist)
}

/// Load a netlist and declare it into a circuit.
///
/// Tolerances come from the netlist when it has a `[tolerances]` table,
/// otherwise from the `[solver]` table of the config.
pub fn load_circuit(path: &Path, config: &SpredConfig) -> Result<(Netlist, Circuit)> {
    let netlist = load_netlist(path)?;
    let circuit = netlist
        .build_with(config.solver)
        .with_context(|| format!("declaring circuit from {}", path.display()))?;
    Ok((netlist, circuit))
}
