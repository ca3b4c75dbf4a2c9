//! Command line argument parsing for the readmark CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Readmark - vocabulary-status annotation for English prose
#[derive(Parser, Debug, Clone)]
#[command(name = "readmark")]
#[command(about = "Annotate English prose with vocabulary learning status")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct ReadmarkArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl ReadmarkArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Render a text as status-annotated HTML
    Annotate(AnnotateArgs),

    /// Count the distinct words of a text by status
    Count(CountArgs),

    /// List the tracked words and phrases found in a text
    Known(KnownArgs),
}

/// Arguments for annotating a text
#[derive(Parser, Debug, Clone)]
pub struct AnnotateArgs {
    /// Text file to annotate, or `-` for stdin
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Vocabulary store file (JSON)
    #[arg(short, long, value_name = "STORE_FILE", env = "READMARK_STORE")]
    pub store: PathBuf,

    /// Annotator configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Skip the surface post-processor
    #[arg(long)]
    pub raw: bool,
}

/// Arguments for counting words
#[derive(Parser, Debug, Clone)]
pub struct CountArgs {
    /// Text file to count, or `-` for stdin
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Vocabulary store file (JSON)
    #[arg(short, long, value_name = "STORE_FILE", env = "READMARK_STORE")]
    pub store: PathBuf,
}

/// Arguments for listing known expressions
#[derive(Parser, Debug, Clone)]
pub struct KnownArgs {
    /// Text file to scan, or `-` for stdin
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Vocabulary store file (JSON)
    #[arg(short, long, value_name = "STORE_FILE", env = "READMARK_STORE")]
    pub store: PathBuf,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_annotate_command() {
        let args = ReadmarkArgs::try_parse_from([
            "readmark",
            "annotate",
            "chapter.txt",
            "--store",
            "vocab.json",
            "--config",
            "config.json",
            "--raw",
        ])
        .unwrap();

        if let Command::Annotate(annotate_args) = args.command {
            assert_eq!(annotate_args.input, PathBuf::from("chapter.txt"));
            assert_eq!(annotate_args.store, PathBuf::from("vocab.json"));
            assert_eq!(annotate_args.config, Some(PathBuf::from("config.json")));
            assert!(annotate_args.raw);
        } else {
            panic!("Expected Annotate command");
        }
    }

    #[test]
    fn test_count_command_reads_stdin() {
        let args =
            ReadmarkArgs::try_parse_from(["readmark", "count", "-", "-s", "vocab.json"]).unwrap();

        if let Command::Count(count_args) = args.command {
            assert_eq!(count_args.input, PathBuf::from("-"));
        } else {
            panic!("Expected Count command");
        }
    }

    #[test]
    fn test_verbosity_levels() {
        let args =
            ReadmarkArgs::try_parse_from(["readmark", "known", "a.txt", "-s", "v.json"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args = ReadmarkArgs::try_parse_from([
            "readmark", "-vvv", "known", "a.txt", "-s", "v.json",
        ])
        .unwrap();
        assert_eq!(args.verbosity(), 3);

        let args = ReadmarkArgs::try_parse_from([
            "readmark", "-q", "-vv", "known", "a.txt", "-s", "v.json",
        ])
        .unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_json_output_format() {
        let args = ReadmarkArgs::try_parse_from([
            "readmark", "--format", "json", "--pretty", "count", "a.txt", "-s", "v.json",
        ])
        .unwrap();

        assert_eq!(args.output_format, OutputFormat::Json);
        assert!(args.pretty);
    }
}
