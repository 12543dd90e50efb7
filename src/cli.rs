use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use docseek::config::{
    DEFAULT_HTTP_RESULT_LIMIT,
    DEFAULT_PORT,
    DEFAULT_RESULT_COUNT,
    FuzzyThreshold,
};

#[derive(Debug, Parser)]
#[command(
    name = "docseek",
    about = "Local TF-IDF search over a directory of documents"
)]
pub struct Cli {
    /// Override the XDG data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Read and write the index at this path instead of the data directory
    #[arg(long, global = true)]
    pub index_file: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Index every file below a directory, replacing the stored index
    Index(IndexArgs),
    /// Search the stored index
    Search(SearchArgs),
    /// Serve the stored index over HTTP
    Serve(ServeArgs),
    /// Show index location and statistics
    Status(StatusArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Index --

#[derive(Debug, Parser)]
pub struct IndexArgs {
    /// Directory to index
    pub root: PathBuf,
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// The search query; wrap words in `*` for fuzzy matching
    pub query: String,

    /// Number of results to return
    #[arg(short = 'n', long, default_value_t = DEFAULT_RESULT_COUNT)]
    pub count: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Return all results above the score threshold
    #[arg(long)]
    pub all: bool,

    /// Output only file paths (one per line)
    #[arg(long)]
    pub files: bool,

    /// Minimum score threshold
    #[arg(long, default_value = "0.0")]
    pub min_score: f64,

    /// Fuzzy acceptance rule: ratio:<r> or length:<p>
    #[arg(long, default_value_t = FuzzyThreshold::default(), value_parser = parse_threshold)]
    pub fuzzy_threshold: FuzzyThreshold,
}

// -- Serve --

#[derive(Debug, Parser)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Results returned per request
    #[arg(short = 'n', long, default_value_t = DEFAULT_HTTP_RESULT_LIMIT)]
    pub limit: usize,

    /// Fuzzy acceptance rule: ratio:<r> or length:<p>
    #[arg(long, default_value_t = FuzzyThreshold::default(), value_parser = parse_threshold)]
    pub fuzzy_threshold: FuzzyThreshold,
}

// -- Status --

#[derive(Debug, Parser)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "docseek",
            &mut std::io::stdout(),
        );
    }
}

fn parse_threshold(s: &str) -> Result<FuzzyThreshold, String> {
    s.parse().map_err(|e: docseek::Error| e.to_string())
}
