//! Import command implementation.
//!
//! Reads token documents and writes each one into the store as a new
//! collection.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use walkdir::WalkDir;

use crate::error::{Result, TokvarError};
use crate::import::{collection_name_for, import_document};
use crate::output::{display_path, plural, Printer};
use crate::store::MemoryStore;

use super::Project;

/// Import token documents as variable collections
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Token files, or directories to search for `*.json`
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

pub async fn run(args: ImportArgs, project: &Project, printer: &Printer) -> Result<()> {
    let files = collect_files(&args.paths)?;
    let store = MemoryStore::load(&project.store_path)?;

    let mut created = 0;
    for file in &files {
        let source = fs::read_to_string(file).map_err(|e| TokvarError::Io {
            path: file.clone(),
            message: format!("Failed to read file: {}", e),
        })?;
        let file_name = file.file_name().and_then(|n| n.to_str()).unwrap_or("");
        let name = collection_name_for(file_name);

        printer.status("Importing", &display_path(file));
        let report = import_document(&store, name, &source).await?;
        for diagnostic in report.diagnostics.iter() {
            printer.diagnostic(diagnostic);
        }
        printer.info(
            "Created",
            &format!("{} ({})", report.collection_name, plural(report.created, "variable", "variables")),
        );
        created += report.created;
    }

    store.save(&project.store_path).await?;
    printer.status(
        "Finished",
        &format!(
            "{} from {} into {}",
            plural(created, "variable", "variables"),
            plural(files.len(), "file", "files"),
            display_path(&project.store_path)
        ),
    );

    Ok(())
}

/// Expand directories into their `*.json` files, sorted by path.
pub fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file() && is_json(entry.path()))
                .map(|entry| entry.into_path())
                .collect();
            found.sort();
            files.extend(found);
        } else if path.exists() {
            files.push(path.clone());
        } else {
            return Err(TokvarError::Io {
                path: path.clone(),
                message: "No such file or directory".to_string(),
            });
        }
    }

    Ok(files)
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}
