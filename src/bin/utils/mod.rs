use std::fs;
use std::path::Path;

use tracing_subscriber::EnvFilter;
use wasmvm::{parse_program, Instruction};

/// Installs a stderr subscriber. `RUST_LOG` wins; otherwise `info`, or `debug` when tracing.
pub fn init_logging(trace: bool) {
    let default = if trace { "wasmvm=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads and decodes a JSON program file.
pub fn load_program(path: &Path) -> Result<Vec<Instruction>, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read program file {}: {}", path.display(), e))?;
    let program = parse_program(&text)
        .map_err(|e| format!("Failed to decode program: {}", e))?;
    Ok(program)
}
