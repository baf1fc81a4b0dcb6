use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use spred_cli::common::load_circuit;
use spred_cli::config::SpredConfig;
use spred_core::graph_utils;

pub fn handle(netlist: &Path, out: Option<&PathBuf>, config: &SpredConfig) -> Result<()> {
    let (_, circuit) = load_circuit(netlist, config)?;
    let dot = graph_utils::export_dot(&circuit);
    if let Some(path) = out {
        fs::write(path, &dot).with_context(|| format!("writing {}", path.display()))?;
        println!("Graph exported to {}", path.display());
    } else {
        println!("{dot}");
    }
    Ok(())
}
