//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::Parser;

/// Custom-element artifact generator for Angular components.
#[derive(Debug, Parser)]
#[command(name = "ng-elements-rs")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the generator config (JSON). Without it, components are
    /// discovered from the tsconfig context.
    #[arg(long, short = 'c')]
    pub config: Option<Utf8PathBuf>,

    /// Output directory for generated artifacts
    #[arg(long = "out-dir", short = 'o')]
    pub out_dir: Option<Utf8PathBuf>,

    /// Path to tsconfig.json used as the type-resolution context
    #[arg(long, short = 't')]
    pub tsconfig: Option<Utf8PathBuf>,

    /// Print timing breakdowns
    #[arg(long)]
    pub timings: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["ng-elements-rs"]);
        assert_eq!(args.config, None);
        assert_eq!(args.out_dir, None);
        assert_eq!(args.tsconfig, None);
        assert!(!args.timings);
    }

    #[test]
    fn test_config_and_overrides() {
        let args = Args::parse_from([
            "ng-elements-rs",
            "--config",
            "elements.config.json",
            "--out-dir",
            "dist/elements",
            "--tsconfig",
            "tsconfig.app.json",
        ]);
        assert_eq!(args.config.as_deref().map(|p| p.as_str()), Some("elements.config.json"));
        assert_eq!(args.out_dir.as_deref().map(|p| p.as_str()), Some("dist/elements"));
        assert_eq!(args.tsconfig.as_deref().map(|p| p.as_str()), Some("tsconfig.app.json"));
    }

    #[test]
    fn test_short_flags() {
        let args = Args::parse_from(["ng-elements-rs", "-c", "cfg.json", "-o", "out", "-t", "tsconfig.json"]);
        assert_eq!(args.config.as_deref().map(|p| p.as_str()), Some("cfg.json"));
        assert_eq!(args.out_dir.as_deref().map(|p| p.as_str()), Some("out"));
        assert_eq!(args.tsconfig.as_deref().map(|p| p.as_str()), Some("tsconfig.json"));
    }
}
