//! Headless host for the boidbox simulation.

pub mod run;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use boidbox_shared::SettingsFile;

pub use boidbox_shared::FlockHost;
pub use run::{run, RunOptions, RunSummary};

/// Reads a JSON settings file. Missing fields fall back to the defaults.
pub fn load_settings(path: &Path) -> Result<SettingsFile> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    SettingsFile::from_json(&json)
        .with_context(|| format!("Failed to parse settings in {}", path.display()))
}

/// Opens the frames sink: `-` is stdout, anything else a file path.
pub fn open_frames(target: Option<&str>) -> Result<Option<Box<dyn Write>>> {
    Ok(match target {
        Some("-") => Some(Box::new(BufWriter::new(io::stdout().lock()))),
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create frames file {}", path))?;
            Some(Box::new(BufWriter::new(file)))
        }
        None => None,
    })
}
