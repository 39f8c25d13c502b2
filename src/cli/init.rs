//! Init command implementation.
//!
//! Generates a `tokvar.yaml` manifest with default settings.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::config::{Manifest, MANIFEST_FILENAME};
use crate::error::{Result, TokvarError};
use crate::output::{display_path, Printer};

/// Initialize a tokvar project by generating a tokvar.yaml manifest
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project directory (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing tokvar.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let manifest_path = args.path.join(MANIFEST_FILENAME);

    if manifest_path.exists() && !args.force {
        return Err(TokvarError::Io {
            path: manifest_path,
            message: format!("{} already exists", MANIFEST_FILENAME),
        });
    }

    let yaml = Manifest::default().to_yaml()?;
    fs::write(&manifest_path, &yaml).map_err(|e| TokvarError::Io {
        path: manifest_path.clone(),
        message: format!("Failed to write manifest: {}", e),
    })?;

    printer.status("Created", &display_path(&manifest_path));

    Ok(())
}
