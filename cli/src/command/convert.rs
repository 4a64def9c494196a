use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context as _;
use pos_vertical::{ConvertOptions, Driver, MergeOptions, RawLines, Summary};
use serde::Serialize;
use termcolor::Color;

use crate::{cli::ConvertArgs, shell::Shell};

/// Everything a convert run is configured with, as printed by `--dump-config`.
#[derive(Debug, Serialize)]
pub struct ConvertConfig<'a> {
    pub pos_file: &'a Path,
    pub lemma_file: &'a Path,
    pub vertical_file: Option<&'a Path>,
    pub diagnostics_file: Option<&'a Path>,
    pub strict: bool,
    pub options: ConvertOptions,
}

impl ConvertArgs {
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions {
            merge: MergeOptions {
                truncate_tags: self.truncate_tags,
            },
            parallel: self.parallel,
        }
    }

    pub fn config(&self) -> ConvertConfig<'_> {
        ConvertConfig {
            pos_file: &self.pos_file,
            lemma_file: &self.lemma_file,
            vertical_file: self.vertical_file.as_deref(),
            diagnostics_file: self.diagnostics_file.as_deref(),
            strict: self.strict,
            options: self.options(),
        }
    }
}

fn open_lines(path: &Path) -> anyhow::Result<RawLines<BufReader<File>>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(RawLines::new(BufReader::new(file)))
}

fn create(path: &Path) -> anyhow::Result<Box<dyn Write>> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}

pub fn convert(shell: &mut Shell, args: ConvertArgs) -> anyhow::Result<Summary> {
    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&args.config())?);
        return Ok(Summary::default());
    }

    tracing::debug!("Convert config: {:?}", args.config());

    let tagged = open_lines(&args.pos_file)?;
    let lemmas = open_lines(&args.lemma_file)?;

    if args.parallel {
        shell.status_with_color("Converting", "in parallel", Color::Cyan)?;
    }

    let mut out: Box<dyn Write> = match args.vertical_file.as_deref() {
        Some(path) => create(path)?,
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut diagnostics: Box<dyn Write> = match args.diagnostics_file.as_deref() {
        Some(path) => create(path)?,
        None => Box::new(io::stderr().lock()),
    };

    let summary = Driver::new(args.options())
        .convert(tagged, lemmas, &mut out, &mut diagnostics)
        .with_context(|| {
            format!(
                "Failed to convert {} and {}",
                args.pos_file.display(),
                args.lemma_file.display()
            )
        })?;

    drop(diagnostics);
    drop(out);

    if summary.mismatches > 0 {
        shell.warn(format!(
            "{} of {} sentences skipped: token count mismatch",
            summary.mismatches, summary.lines
        ))?;
    }
    if summary.unattached > 0 {
        shell.warn(format!(
            "{} of {} sentences skipped: affix without a stem",
            summary.unattached, summary.lines
        ))?;
    }

    match args.vertical_file.as_deref() {
        Some(path) => shell.status("Finished", format!("{summary} -> {}", path.display()))?,
        None => shell.status("Finished", summary)?,
    }

    if args.strict && summary.skipped() > 0 {
        anyhow::bail!(
            "{} of {} sentences were skipped",
            summary.skipped(),
            summary.lines
        );
    }

    Ok(summary)
}
