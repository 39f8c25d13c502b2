//! Serve command implementation.
//!
//! Answers newline-delimited JSON requests on stdin with one response line
//! each on stdout, then saves the store.

use clap::Args;
use tokio::io::BufReader;

use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::protocol::{serve_lines, MessageHandler};
use crate::store::MemoryStore;

use super::Project;

/// Answer newline-delimited JSON requests on stdin
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Do not write the store back on exit
    #[arg(long)]
    pub no_save: bool,
}

pub async fn run(args: ServeArgs, project: &Project, printer: &Printer) -> Result<()> {
    let store = MemoryStore::load(&project.store_path)?;
    let mut handler = MessageHandler::new(store);

    printer.info("Serving", &display_path(&project.store_path));
    let handled = serve_lines(&mut handler, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;

    if !args.no_save {
        handler.store().save(&project.store_path).await?;
    }
    printer.status("Finished", &plural(handled, "request", "requests"));

    Ok(())
}
