use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
};

use anyhow::Context as _;
use pos_vertical::{MergeOptions, RawLines};

use crate::{cli::MergeArgs, shell::Shell};

/// Write one JSON object per tagged line read from `input`. Returns the
/// number of lines merged.
pub fn merge_lines<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    options: MergeOptions,
    pretty: bool,
) -> anyhow::Result<usize> {
    let mut count = 0;

    for (n, line) in RawLines::new(input).enumerate() {
        let merged = pos_vertical::merge(&line?, options).map_err(|e| e.at_line(n))?;
        if pretty {
            serde_json::to_writer_pretty(&mut *out, &merged)?;
        } else {
            serde_json::to_writer(&mut *out, &merged)?;
        }
        writeln!(out)?;
        count += 1;
    }

    out.flush()?;
    Ok(count)
}

pub fn merge(shell: &mut Shell, args: MergeArgs) -> anyhow::Result<()> {
    let options = MergeOptions {
        truncate_tags: args.truncate_tags,
    };
    let mut stdout = io::stdout().lock();

    let count = match args.path.as_deref() {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            merge_lines(BufReader::new(file), &mut stdout, options, args.pretty)?
        }
        None => merge_lines(io::stdin().lock(), &mut stdout, options, args.pretty)?,
    };

    shell.status("Merged", format!("{count} lines"))?;
    Ok(())
}
