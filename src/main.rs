use clap::Parser;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use cml2tf::convert::{convert, default_project_dir, ConvertOptions};
use cml2tf::loader::load_topology;

/// Convert a lab topology exported from CML2 into a Terraform project
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None,
    arg_required_else_help = true,
    after_help = "Usage example: cml2tf -i topology.yaml"
)]
struct Args {
    /// File with input lab topology in YAML exported from CML2
    #[arg(short, long, help_heading = "Input options")]
    input: PathBuf,

    /// Output directory name where Terraform files will be created
    /// (by default input topology filename)
    #[arg(short = 'o', long, help_heading = "Output options")]
    outdir: Option<PathBuf>,

    /// Store configurations in separate files
    #[arg(short, long, help_heading = "Output options")]
    configs: bool,

    /// Overwrite files if destination folder exists
    #[arg(short, long, help_heading = "Output options")]
    force: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Input topology: {:?}", args.input);

    let document = load_topology(&args.input)?;

    let project_dir = args.outdir.clone().unwrap_or_else(|| default_project_dir(&args.input));
    info!("Terraform project directory: {:?}", project_dir);

    let options = ConvertOptions {
        configs: args.configs,
        force: args.force,
    };
    let summary = convert(&document, &project_dir, &options)?;
    info!("Wrote {} files to {:?}", summary.written.len(), summary.project_dir);

    println!("Converted");
    Ok(())
}
