pub mod collections;
pub mod completions;
pub mod export;
pub mod import;
pub mod init;
pub mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Manifest, MANIFEST_FILENAME};
use crate::error::Result;

/// tokvar - Design token <-> variable collection translator
#[derive(Parser, Debug)]
#[command(name = "tokvar")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Variable store snapshot (overrides the manifest)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Project manifest
    #[arg(long, global = true, default_value = MANIFEST_FILENAME)]
    pub manifest: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import token documents as variable collections
    Import(import::ImportArgs),

    /// Export variable collections as token files
    Export(export::ExportArgs),

    /// Show collections and their modes
    Collections(collections::CollectionsArgs),

    /// Answer newline-delimited JSON requests on stdin
    Serve(serve::ServeArgs),

    /// Initialize a tokvar project (generates tokvar.yaml)
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Manifest and store location shared by the store-backed commands.
#[derive(Debug, Clone)]
pub struct Project {
    pub manifest: Manifest,
    pub store_path: PathBuf,
}

impl Project {
    /// Load the manifest (defaults when absent) and apply `--store`.
    pub fn load(cli_store: Option<PathBuf>, manifest_path: &std::path::Path) -> Result<Self> {
        let manifest = Manifest::load_or_default(manifest_path)?;
        let store_path = cli_store.unwrap_or_else(|| manifest.store.clone());
        Ok(Self { manifest, store_path })
    }
}
