use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
    /// Show version information. Use -VV for more details.
    #[clap(short = 'V', long, action = ArgAction::Count)]
    pub version: u8,
    /// More log output on stderr. Repeat for more detail. RUST_LOG overrides this.
    #[clap(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Only print errors.
    #[clap(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Combine a tagged file and a lemma file into vertical format
    Convert(ConvertArgs),
    #[command(flatten)]
    Debug(DebugArgs),
}

#[derive(Subcommand, Debug)]
pub enum DebugArgs {
    /// Print the tokens and tags merged from each tagged line as JSON
    #[command(hide = true)]
    Merge(MergeArgs),
}

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    #[clap(index = 1)]
    /// Part-of-speech tagged file, affixes split out, one sentence per line.
    pub pos_file: PathBuf,

    #[clap(index = 2)]
    /// Lemma file, line-aligned with the tagged file.
    pub lemma_file: PathBuf,

    #[clap(short = 'o', long, env = "POS_VERTICAL_OUTPUT")]
    /// Path to write vertical output to. Defaults to stdout.
    pub vertical_file: Option<PathBuf>,

    #[clap(long, env = "POS_VERTICAL_DIAGNOSTICS")]
    /// Path to write reports of skipped sentences to. Defaults to stderr.
    pub diagnostics_file: Option<PathBuf>,

    #[clap(short, long, env = "POS_VERTICAL_TRUNCATE_TAGS")]
    /// Keep only the part of each tag before the first '-' (NOUN-MS becomes NOUN).
    pub truncate_tags: bool,

    #[clap(long, env = "POS_VERTICAL_PARALLEL")]
    /// Merge lines on a thread pool. Output order is unchanged.
    pub parallel: bool,

    #[clap(long, env = "POS_VERTICAL_STRICT")]
    /// Fail once the run is done if any sentence was skipped.
    pub strict: bool,

    #[clap(long)]
    /// Print the effective configuration as JSON and exit.
    pub dump_config: bool,
}

#[derive(Parser, Debug)]
pub struct MergeArgs {
    #[clap(index = 1)]
    /// Tagged file. Defaults to stdin.
    pub path: Option<PathBuf>,

    #[clap(short, long)]
    /// Keep only the part of each tag before the first '-'.
    pub truncate_tags: bool,

    #[clap(long)]
    /// Pretty-print each JSON object.
    pub pretty: bool,
}
