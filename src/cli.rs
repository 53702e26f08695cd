//! CLI argument parsing for method-profiler

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "method-profiler")]
#[command(version)]
#[command(about = "Count lines and words in text files while profiling every scanner call", long_about = None)]
pub struct Cli {
    /// Profiler config file (JSON, or TOML with a .toml extension)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Append the profiling report to this file (overrides the config)
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Number of worker threads scanning files concurrently
    #[arg(short = 'j', long = "threads", value_name = "N", default_value = "4")]
    pub threads: usize,

    /// Scan every file this many times
    #[arg(long = "repeat", value_name = "N", default_value = "1")]
    pub repeat: usize,

    /// Enable debug tracing on stderr
    #[arg(long = "debug")]
    pub debug: bool,

    /// Text files to scan
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_files() {
        let cli = Cli::parse_from(["method-profiler", "a.txt", "b.txt"]);
        assert_eq!(cli.files, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
        assert!(cli.config.is_none());
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["method-profiler", "a.txt"]);
        assert_eq!(cli.threads, 4);
        assert_eq!(cli.repeat, 1);
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_output_and_threads() {
        let cli = Cli::parse_from([
            "method-profiler",
            "-o",
            "profile.txt",
            "-j",
            "2",
            "--repeat",
            "3",
            "a.txt",
        ]);
        assert_eq!(cli.output, Some(PathBuf::from("profile.txt")));
        assert_eq!(cli.threads, 2);
        assert_eq!(cli.repeat, 3);
    }

    #[test]
    fn test_cli_config_flag() {
        let cli = Cli::parse_from(["method-profiler", "--config", "profiler.toml", "a.txt"]);
        assert_eq!(cli.config, Some(PathBuf::from("profiler.toml")));
    }

    #[test]
    fn test_cli_requires_files() {
        assert!(Cli::try_parse_from(["method-profiler"]).is_err());
    }
}
