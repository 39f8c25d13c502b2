use clap::Parser;
use miette::Result;
use tokvar::cli::{Cli, Commands, Project};
use tokvar::output::Printer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let printer = Printer::new();
    let project = || Project::load(cli.store.clone(), &cli.manifest);

    match cli.command {
        Commands::Import(args) => tokvar::cli::import::run(args, &project()?, &printer).await?,
        Commands::Export(args) => tokvar::cli::export::run(args, &project()?, &printer).await?,
        Commands::Collections(args) => tokvar::cli::collections::run(args, &project()?, &printer).await?,
        Commands::Serve(args) => tokvar::cli::serve::run(args, &project()?, &printer).await?,
        Commands::Init(args) => tokvar::cli::init::run(args, &printer)?,
        Commands::Completions(args) => tokvar::cli::completions::run(args)?,
    }

    Ok(())
}
