//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};

#[derive(Parser)]
#[command(
    name = "cdm",
    version,
    about = "Clinical data model tables to machine-learning features",
    long_about = "Turn pipe-delimited clinical event, example, and feature tables\n\
                  into sparse feature vectors (SVMLight format) or disjoint,\n\
                  gap-filled treatment periods."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Log output format (compact for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "compact",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Assemble one sparse feature vector per example.
    Featurize(FeaturizeArgs),

    /// Segment each subject's events into disjoint, gap-filled periods.
    Segment(SegmentArgs),
}

#[derive(Parser)]
pub struct FeaturizeArgs {
    /// Pipe-delimited event table; rows sharing an id must be contiguous
    /// and ordered by start time.
    #[arg(long = "events", value_name = "FILE")]
    pub events: PathBuf,

    /// Pipe-delimited example table.
    #[arg(long = "examples", value_name = "FILE")]
    pub examples: PathBuf,

    /// Pipe-delimited feature-definition table.
    #[arg(long = "features", value_name = "FILE")]
    pub features: PathBuf,

    /// Output file for the SVMLight vectors (stdout when omitted).
    #[arg(long = "out", value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Example field used as each vector's label.
    #[arg(long = "label-field", value_enum, default_value = "class")]
    pub label_field: LabelFieldArg,

    /// Label written when the selected field is empty.
    #[arg(long = "default-label", value_name = "LABEL", default_value = "0")]
    pub default_label: String,

    /// Feature key (CAT/TYP) evaluated for every example even when the
    /// sequence never mentions it, e.g. example-attribute features.
    /// Repeatable.
    #[arg(long = "always-key", value_name = "CAT/TYP")]
    pub always_keys: Vec<String>,
}

#[derive(Parser)]
pub struct SegmentArgs {
    /// Pipe-delimited event table; rows sharing an id must be contiguous
    /// and ordered by start time.
    #[arg(long = "events", value_name = "FILE")]
    pub events: PathBuf,

    /// Output file for the period table (stdout when omitted).
    #[arg(long = "out", value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Inclusive lower bound of the output span.
    #[arg(long = "span-lo", value_name = "TIME")]
    pub span_lo: Option<f64>,

    /// Inclusive upper bound of the output span.
    #[arg(long = "span-hi", value_name = "TIME")]
    pub span_hi: Option<f64>,

    /// Minimum period length, applied per event before clipping.
    #[arg(long = "min-len", value_name = "LEN", default_value_t = 0.0)]
    pub min_len: f64,

    /// Gap width kept clear before each period start at transitions.
    #[arg(long = "backoff", value_name = "LEN", default_value_t = 0.0)]
    pub backoff: f64,

    /// Event value treated as "no signal" (repeatable; defaults to the
    /// output zero).
    #[arg(long = "zero-value", value_name = "VALUE")]
    pub zero_values: Vec<String>,

    /// Value written for gap-filler periods.
    #[arg(long = "output-zero", value_name = "VALUE", default_value = "0")]
    pub output_zero: String,
}

/// Which example field labels the output vectors.
#[derive(Clone, Copy, ValueEnum)]
pub enum LabelFieldArg {
    Label,
    Treatment,
    Class,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Compact,
    Json,
}
