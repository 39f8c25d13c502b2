//! Export command implementation.
//!
//! Writes every collection in the store as a TypeScript module, a JSON body
//! or per-mode legacy token documents.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::{ColorMode, ExportOptions, OutputFormat, PrimitiveMode};
use crate::error::{Result, TokvarError};
use crate::export::{export_all, export_legacy, ExportFile};
use crate::format::to_camel_case;
use crate::output::{display_path, plural, Printer};
use crate::store::{MemoryStore, VariableStore};
use crate::types::OpacityFormat;

use super::Project;

/// Export variable collections as token files
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Output flavour
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Primitive collection modes: all, first, or a mode id
    #[arg(long)]
    pub primitive_mode: Option<PrimitiveMode>,

    /// Themed collection modes
    #[arg(long, value_enum)]
    pub color_mode: Option<ColorMode>,

    /// Leave string variables out
    #[arg(long)]
    pub exclude_string: bool,

    /// How translucent colours are written
    #[arg(long, value_enum)]
    pub opacity_format: Option<OpacityFormat>,

    /// Name used for a collection in references (NAME=ALIAS, repeatable)
    #[arg(long = "alias", value_parser = parse_alias)]
    pub aliases: Vec<(String, String)>,

    /// Output directory
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl ExportArgs {
    /// Manifest export options with command-line overrides applied.
    pub fn options(&self, base: &ExportOptions) -> ExportOptions {
        let mut options = base.clone();
        if let Some(mode) = &self.primitive_mode {
            options.primitive_mode = mode.clone();
        }
        if let Some(mode) = self.color_mode {
            options.color_mode = mode;
        }
        if self.exclude_string {
            options.exclude_string = true;
        }
        if let Some(format) = self.opacity_format {
            options.opacity_format = format;
        }
        for (name, alias) in &self.aliases {
            options.collection_aliases.insert(name.clone(), alias.clone());
        }
        options
    }
}

fn parse_alias(text: &str) -> std::result::Result<(String, String), String> {
    match text.split_once('=') {
        Some((name, alias)) if !name.is_empty() && !alias.is_empty() => {
            Ok((name.to_string(), alias.to_string()))
        }
        _ => Err(format!("expected NAME=ALIAS, got {:?}", text)),
    }
}

pub async fn run(args: ExportArgs, project: &Project, printer: &Printer) -> Result<()> {
    let options = args.options(&project.manifest.export);
    let format = args.format.unwrap_or(project.manifest.format);
    let output = args.output.clone().unwrap_or_else(|| project.manifest.output.clone());

    let store = MemoryStore::load(&project.store_path)?;
    let files = build_files(&store, &options, format).await?;

    fs::create_dir_all(&output).map_err(|e| TokvarError::Io {
        path: output.clone(),
        message: format!("Failed to create output directory: {}", e),
    })?;

    for file in &files {
        let (name, contents) = render(file, format)?;
        let path = output.join(&name);
        write_file(&path, &contents)?;
        printer.status("Writing", &display_path(&path));
    }

    printer.status(
        "Finished",
        &format!("{} to {}", plural(files.len(), "file", "files"), display_path(&output)),
    );

    Ok(())
}

/// Export files for `format`, in store order.
pub async fn build_files<S>(store: &S, options: &ExportOptions, format: OutputFormat) -> Result<Vec<ExportFile>>
where
    S: VariableStore + ?Sized,
{
    match format {
        OutputFormat::Ts | OutputFormat::Json => Ok(export_all(store, options).await?.files),
        OutputFormat::Legacy => {
            let mut files = Vec::new();
            for collection in store.local_collections().await? {
                files.extend(export_legacy(store, &collection).await?);
            }
            Ok(files)
        }
    }
}

/// File name and contents of one export file.
pub fn render(file: &ExportFile, format: OutputFormat) -> Result<(String, String)> {
    match format {
        OutputFormat::Ts => Ok((file.file_name.clone(), file.to_typescript())),
        OutputFormat::Json => Ok((
            format!("{}.json", to_camel_case(&file.collection_name)),
            pretty(&file.body)?,
        )),
        OutputFormat::Legacy => Ok((file.file_name.clone(), pretty(&file.body)?)),
    }
}

fn pretty(body: &serde_json::Value) -> Result<String> {
    let mut text = serde_json::to_string_pretty(body).map_err(|e| TokvarError::Export {
        message: format!("Failed to serialize export: {}", e),
        help: None,
    })?;
    text.push('\n');
    Ok(text)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| TokvarError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write file: {}", e),
    })
}
