use clap::Parser;
use log::error;
use music_test_tools::{
    generator::{Generator, generate},
    logging,
};
use std::{path::PathBuf, process::ExitCode};

/// Generate files for testing USB filesystem
#[derive(Parser)]
#[command(name = "generate_files", version, about, long_about = None)]
struct Cli {
    /// Output directory for file generation
    out_dir: PathBuf,

    /// Scenario for generating files: 2k, 20k, dir128, mixed
    scenario: String,

    /// Modify MP3 metadata for each file (slower but more realistic), not implemented yet
    #[arg(long)]
    tags: bool,

    /// Track copied into every generated file
    #[arg(long, default_value = "template.mp3")]
    template: PathBuf,
}

fn main() -> anyhow::Result<ExitCode> {
    logging::init();

    let cli = Cli::parse();

    if !cli.out_dir.is_dir() {
        error!("Not a directory: {}", cli.out_dir.display());
        return Ok(ExitCode::FAILURE);
    }

    let generator = Generator::new(cli.template, cli.out_dir).with_tags(cli.tags);
    generate(&generator, &cli.scenario)?;

    Ok(ExitCode::SUCCESS)
}
