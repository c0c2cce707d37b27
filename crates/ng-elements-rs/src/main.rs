//! ng-elements-rs: custom-element artifact generator for Angular components.

mod cli;
mod config;
mod orchestrator;

use clap::Parser;
use cli::Args;
use config::GeneratorConfig;
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match orchestrator::generate(&config, args.timings).await {
        Ok(summary) => {
            println!("{}", summary.format());
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Loads the config file when given and applies CLI overrides on top.
/// Without a config, the run falls back to discovery over the tsconfig
/// context.
fn build_config(args: &Args) -> Result<GeneratorConfig, orchestrator::GeneratorError> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    if args.out_dir.is_some() {
        config.out_dir = args.out_dir.clone();
    }
    if args.tsconfig.is_some() {
        config.tsconfig = args.tsconfig.clone();
    }
    Ok(config)
}
