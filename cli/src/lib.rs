use clap::Parser;
use cli::{Args, Command, DebugArgs};
use command::{convert::convert, merge::merge};
use shell::{Shell, Verbosity};
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod command;
pub mod shell;

/// Log to stderr so stdout only ever carries converted output.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("pos_vertical={level},pos_vertical_cli={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run_cli() -> anyhow::Result<()> {
    let mut shell = Shell::new();

    let args = Args::parse();

    if args.version > 0 {
        pos_vertical::print_version(args.version > 1);
        std::process::exit(0);
    }

    init_tracing(args.verbose, args.quiet);
    if args.quiet {
        shell.set_verbosity(Verbosity::Quiet);
    }

    let Some(command) = args.command else {
        shell.error("No command specified")?;
        std::process::exit(1);
    };

    match command {
        Command::Convert(args) => {
            convert(&mut shell, args)?;
        }
        Command::Debug(args) => match args {
            DebugArgs::Merge(args) => merge(&mut shell, args)?,
        },
    }

    Ok(())
}
