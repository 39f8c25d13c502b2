//! Collections command implementation.
//!
//! Prints each collection with its modes.

use clap::Args;

use crate::error::{Result, TokvarError};
use crate::export::collections_info;
use crate::output::{plural, Printer};
use crate::store::MemoryStore;

use super::Project;

/// Show collections and their modes
#[derive(Args, Debug)]
pub struct CollectionsArgs {
    /// Print the collection info as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: CollectionsArgs, project: &Project, printer: &Printer) -> Result<()> {
    let store = MemoryStore::load(&project.store_path)?;
    let info = collections_info(&store).await?;

    if args.json {
        let text = serde_json::to_string_pretty(&info).map_err(|e| TokvarError::Export {
            message: format!("Failed to serialize collections: {}", e),
            help: None,
        })?;
        println!("{}", text);
        return Ok(());
    }

    if info.is_empty() {
        printer.warning("Empty", "no collections in store");
        return Ok(());
    }

    for (name, collection) in &info {
        let modes: Vec<String> = collection
            .modes
            .iter()
            .map(|m| format!("{} {}", m.name, printer.dim(&format!("({})", m.mode_id))))
            .collect();
        let kind = if collection.is_primitive { "primitive" } else { "themed" };
        printer.info(
            kind,
            &format!("{}: {}", printer.bold(name), modes.join(", ")),
        );
    }
    printer.status("Found", &plural(info.len(), "collection", "collections"));

    Ok(())
}
