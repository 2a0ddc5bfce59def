// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prints the configuration tree assembled from YAML files and the environment.

use cfgtree::adapters::EnvVarSource;
use cfgtree::domain::{ConfigValue, RawValue};
use cfgtree::service::{Assembler, SourceDescriptor};
use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Merge configuration files and print the result
#[derive(Parser, Debug)]
#[command(name = "cfgtree")]
#[command(about = "Merge YAML configuration files and print the resulting tree", long_about = None)]
struct Args {
    /// Also read environment variables with this prefix, after the files
    #[arg(long, value_name = "PREFIX")]
    env_prefix: Option<String>,

    /// Print only the value at this dotted path
    #[arg(long, value_name = "PATH")]
    get: Option<String>,

    /// YAML files to merge; later files override earlier ones
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

/// Returns `Ok(false)` when `--get` names a missing path.
fn run(args: &Args) -> Result<bool, Box<dyn std::error::Error>> {
    let mut builder = Assembler::builder();
    for file in &args.files {
        builder = builder.with_descriptor(SourceDescriptor::new(
            "yaml",
            RawValue::from(file.display().to_string()),
        ));
    }
    if let Some(prefix) = &args.env_prefix {
        builder = builder.with_source(EnvVarSource::with_prefix(prefix.as_str()));
    }

    let config = builder.read_only(true).build()?.assemble()?;

    match &args.get {
        None => print!("{}", serde_yaml::to_string(&config)?),
        Some(path) => match config.lookup(path) {
            None => {
                eprintln!("No value at '{}'", path);
                return Ok(false);
            }
            Some(ConfigValue::Node(node)) => print!("{}", serde_yaml::to_string(node)?),
            Some(value) => println!("{}", value),
        },
    }
    Ok(true)
}
