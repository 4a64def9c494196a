use std::fmt::Display;
use std::io::{self, BufRead, Write};

use rayon::iter::{IntoParallelRefIterator as _, ParallelIterator as _};
use serde::{Deserialize, Serialize};

use crate::align::{Alignment, align};
use crate::error::{Error, Result};
use crate::merge::MergeOptions;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertOptions {
    #[serde(flatten)]
    pub merge: MergeOptions,
    /// Merge and align lines on the rayon pool. Output order is unchanged.
    pub parallel: bool,
}

/// Counts for one conversion run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Line pairs read; stops at the end of the shorter stream.
    pub lines: usize,
    pub sentences: usize,
    pub tokens: usize,
    pub mismatches: usize,
    /// Sentences skipped for an affix without a stem.
    pub unattached: usize,
}

impl Summary {
    /// Sentences left out of the output.
    pub fn skipped(&self) -> usize {
        self.mismatches + self.unattached
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} lines, {} sentences, {} tokens, {} mismatched, {} unattached",
            self.lines, self.sentences, self.tokens, self.mismatches, self.unattached
        )
    }
}

/// Lines of a reader with their terminators kept, so diagnostics can quote
/// input verbatim.
pub struct RawLines<R> {
    reader: R,
}

impl<R: BufRead> RawLines<R> {
    pub fn new(reader: R) -> Self {
        RawLines { reader }
    }
}

impl<R: BufRead> Iterator for RawLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(Ok(line)),
            Err(e) => Some(Err(e)),
        }
    }
}

/// Walks a tagged stream and a lemma stream in lockstep, writing vertical
/// records to `out` and mismatch reports to `diagnostics`.
///
/// The run ends at the end of the shorter stream. Mismatches and unattached
/// affixes are counted and skipped; a unit without a `/` aborts the run with
/// its line number, leaving whatever was already written in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct Driver {
    options: ConvertOptions,
}

impl Driver {
    pub fn new(options: ConvertOptions) -> Self {
        Driver { options }
    }

    /// Run in the mode selected by [`ConvertOptions::parallel`].
    pub fn convert<T, L, O, D>(
        &self,
        tagged: T,
        lemmas: L,
        out: &mut O,
        diagnostics: &mut D,
    ) -> Result<Summary>
    where
        T: IntoIterator<Item = io::Result<String>>,
        L: IntoIterator<Item = io::Result<String>>,
        O: Write + ?Sized,
        D: Write + ?Sized,
    {
        if self.options.parallel {
            self.run_parallel(tagged, lemmas, out, diagnostics)
        } else {
            self.run(tagged, lemmas, out, diagnostics)
        }
    }

    pub fn run<T, L, O, D>(
        &self,
        tagged: T,
        lemmas: L,
        out: &mut O,
        diagnostics: &mut D,
    ) -> Result<Summary>
    where
        T: IntoIterator<Item = io::Result<String>>,
        L: IntoIterator<Item = io::Result<String>>,
        O: Write + ?Sized,
        D: Write + ?Sized,
    {
        let mut summary = Summary::default();

        for (n, (tagged, lemma)) in tagged.into_iter().zip(lemmas).enumerate() {
            let (tagged, lemma) = (tagged?, lemma?);
            let alignment =
                align(&tagged, &lemma, self.options.merge).map_err(|e| e.at_line(n))?;
            emit(n, &tagged, &lemma, alignment, &mut summary, out, diagnostics)?;
        }

        finish(summary, out, diagnostics)
    }

    /// Reads both streams up front, aligns every pair on the rayon pool and
    /// then writes results in input order.
    pub fn run_parallel<T, L, O, D>(
        &self,
        tagged: T,
        lemmas: L,
        out: &mut O,
        diagnostics: &mut D,
    ) -> Result<Summary>
    where
        T: IntoIterator<Item = io::Result<String>>,
        L: IntoIterator<Item = io::Result<String>>,
        O: Write + ?Sized,
        D: Write + ?Sized,
    {
        let pairs = tagged
            .into_iter()
            .zip(lemmas)
            .map(|(tagged, lemma)| -> io::Result<(String, String)> { Ok((tagged?, lemma?)) })
            .collect::<io::Result<Vec<_>>>()?;

        tracing::debug!("Aligning {} line pairs in parallel", pairs.len());

        let options = self.options.merge;
        let alignments = pairs
            .par_iter()
            .map(|(tagged, lemma)| align(tagged, lemma, options))
            .collect::<Vec<_>>();

        let mut summary = Summary::default();
        for (n, ((tagged, lemma), alignment)) in pairs.iter().zip(alignments).enumerate() {
            let alignment = alignment.map_err(|e| e.at_line(n))?;
            emit(n, tagged, lemma, alignment, &mut summary, out, diagnostics)?;
        }

        finish(summary, out, diagnostics)
    }
}

fn emit<O, D>(
    n: usize,
    tagged: &str,
    lemma: &str,
    alignment: Alignment,
    summary: &mut Summary,
    out: &mut O,
    diagnostics: &mut D,
) -> Result<(), Error>
where
    O: Write + ?Sized,
    D: Write + ?Sized,
{
    summary.lines += 1;

    if let Some(diagnostic) = alignment.diagnostic(n, tagged, lemma) {
        tracing::debug!("Line {n}: {}, skipping", diagnostic.reason);
        write!(diagnostics, "{diagnostic}")?;
    }

    match alignment {
        Alignment::Record(record) => {
            record.write_vertical(out)?;
            summary.sentences += 1;
            summary.tokens += record.len();
        }
        Alignment::Mismatch(_) => summary.mismatches += 1,
        Alignment::Unattached(_) => summary.unattached += 1,
    }

    Ok(())
}

fn finish<O, D>(summary: Summary, out: &mut O, diagnostics: &mut D) -> Result<Summary>
where
    O: Write + ?Sized,
    D: Write + ?Sized,
{
    out.flush()?;
    diagnostics.flush()?;
    tracing::debug!("Stopped after {summary}");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<io::Result<String>> {
        RawLines::new(text.as_bytes()).collect()
    }

    fn run(options: ConvertOptions, tagged: &str, lemma: &str) -> (Result<Summary>, String, String) {
        let mut out = Vec::new();
        let mut diagnostics = Vec::new();
        let result = Driver::new(options).convert(
            lines(tagged),
            lines(lemma),
            &mut out,
            &mut diagnostics,
        );
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(diagnostics).unwrap(),
        )
    }

    const TAGGED: &str = "S/S a/A b/B-X E/E \nS/S c/C d/D e/E E/E \nS/S و+/CONJ f/F E/E \n";
    const LEMMA: &str = "a b\nc d\nf\n";

    #[test]
    fn test_raw_lines_keep_terminators() {
        let lines = RawLines::new("one\ntwo\r\nthree".as_bytes())
            .collect::<io::Result<Vec<_>>>()
            .unwrap();
        assert_eq!(lines, vec!["one\n", "two\r\n", "three"]);
    }

    #[test]
    fn test_mismatch_is_skipped_and_reported() {
        let (result, out, diagnostics) = run(ConvertOptions::default(), TAGGED, LEMMA);
        let summary = result.unwrap();

        assert_eq!(out, "<s>\na\tA\ta\nb\tB-X\tb\n</s>\n<s>\nوf\tF\tf\n</s>\n");
        assert_eq!(
            diagnostics,
            "Line 1: Token count mismatch (3 tokens, 2 lemmas):\nc d\nS/S c/C d/D e/E E/E \n"
        );
        assert_eq!(
            summary,
            Summary {
                lines: 3,
                sentences: 2,
                tokens: 3,
                mismatches: 1,
                unattached: 0,
            }
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = run(ConvertOptions::default(), TAGGED, LEMMA);
        let parallel = run(
            ConvertOptions {
                parallel: true,
                ..Default::default()
            },
            TAGGED,
            LEMMA,
        );

        assert_eq!(sequential.0.unwrap(), parallel.0.unwrap());
        assert_eq!(sequential.1, parallel.1);
        assert_eq!(sequential.2, parallel.2);
    }

    #[test]
    fn test_truncation_applies_to_output() {
        let options = ConvertOptions {
            merge: MergeOptions {
                truncate_tags: true,
            },
            parallel: false,
        };
        let (_, out, _) = run(options, TAGGED, LEMMA);
        assert!(out.starts_with("<s>\na\tA\ta\nb\tB\tb\n</s>\n"));
    }

    #[test]
    fn test_stops_at_shorter_stream() {
        let (result, out, diagnostics) = run(ConvertOptions::default(), TAGGED, "a b\n");

        assert_eq!(result.unwrap().lines, 1);
        assert_eq!(out, "<s>\na\tA\ta\nb\tB-X\tb\n</s>\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_malformed_line_aborts_after_earlier_output() {
        for parallel in [false, true] {
            let tagged = "S/S a/A E/E \nS/S broken E/E \nS/S b/B E/E \n";
            let (result, out, _) = run(
                ConvertOptions {
                    parallel,
                    ..Default::default()
                },
                tagged,
                "a\nb\nb\n",
            );

            let err = result.unwrap_err();
            assert_eq!(err.line(), Some(1));
            assert_eq!(out, "<s>\na\tA\ta\n</s>\n");
        }
    }

    #[test]
    fn test_unattached_affix_skips_only_its_sentence() {
        let tagged = concat!(
            "S/S a/A E/E \n",
            "S/S b/B و+/CONJ E/E \n",
            "S/S c/C E/E \n",
            "S/S +ة/NSUFF d/D E/E \n",
            "S/S e/E E/E \n",
        );
        let lemma = "a\nb\nc\nd\ne\n";

        for parallel in [false, true] {
            let (result, out, diagnostics) = run(
                ConvertOptions {
                    parallel,
                    ..Default::default()
                },
                tagged,
                lemma,
            );
            let summary = result.unwrap();

            assert_eq!(
                out,
                "<s>\na\tA\ta\n</s>\n<s>\nc\tC\tc\n</s>\n<s>\ne\tE\te\n</s>\n"
            );
            assert_eq!(
                diagnostics,
                concat!(
                    "Line 1: Dangling prefix \"و+/CONJ\" at unit 2:\n",
                    "b\n",
                    "S/S b/B و+/CONJ E/E \n",
                    "Line 3: Orphan suffix \"+ة/NSUFF\" at unit 1:\n",
                    "d\n",
                    "S/S +ة/NSUFF d/D E/E \n",
                )
            );
            assert_eq!(summary.lines, 5);
            assert_eq!(summary.sentences, 3);
            assert_eq!(summary.unattached, 2);
            assert_eq!(summary.skipped(), 2);
        }
    }

    #[test]
    fn test_io_error_propagates() {
        let tagged = vec![Err(io::Error::other("read failed"))];
        let mut out = Vec::new();
        let result = Driver::default().run(tagged, lines("a\n"), &mut out, &mut io::sink());
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
