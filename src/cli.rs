use clap::Parser;
use std::path::PathBuf;

/// Turn an issue request into files via the Gemini API.
#[derive(Debug, Parser)]
#[command(name = "issue-agent")]
#[command(version)]
#[command(about = "Ask Gemini to implement an issue and write the files it returns", long_about = None)]
pub struct Args {
    /// Model name (default: config/model or "gemini-2.5-flash")
    #[arg(short = 'm', long = "model")]
    pub model: Option<String>,

    /// Provider (default: config/provider or "google")
    #[arg(long = "provider")]
    pub provider: Option<String>,

    /// Give up on the model call after this many seconds
    #[arg(long = "timeout-secs", value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Directory generated files are written under (default: current directory)
    #[arg(short = 'C', long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Exit non-zero when the response cannot be parsed or written
    #[arg(long = "strict")]
    pub strict: bool,

    /// Request text (default: $ISSUE_BODY)
    #[arg(value_name = "REQUEST")]
    pub request: Vec<String>,
}
