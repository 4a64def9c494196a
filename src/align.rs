//! Pairs a merged tagged line with its lemma line.

use std::fmt::Display;

use crate::error::Result;
use crate::merge::{self, MergeOptions, Merged, Unattached};
use crate::vertical::SentenceRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alignment {
    Record(SentenceRecord),
    Mismatch(Mismatch),
    /// The tagged line has an affix that never met its stem.
    Unattached(Unattached),
}

impl Alignment {
    /// Diagnostic entry for a skipped sentence, `None` for a record.
    pub fn diagnostic<'a>(
        &'a self,
        line: usize,
        tagged: &'a str,
        lemma: &'a str,
    ) -> Option<Diagnostic<'a>> {
        let reason = match self {
            Alignment::Record(_) => return None,
            Alignment::Mismatch(mismatch) => Reason::Mismatch(*mismatch),
            Alignment::Unattached(unattached) => Reason::Unattached(unattached),
        };
        Some(Diagnostic {
            line,
            reason,
            tagged,
            lemma,
        })
    }
}

/// Token counts of a sentence whose tagged and lemma lines disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    pub tokens: usize,
    pub lemmas: usize,
}

impl Mismatch {
    /// Diagnostic entry for this mismatch, quoting both raw input lines.
    pub fn diagnostic<'a>(&self, line: usize, tagged: &'a str, lemma: &'a str) -> Diagnostic<'a> {
        Diagnostic {
            line,
            reason: Reason::Mismatch(*self),
            tagged,
            lemma,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Reason<'a> {
    Mismatch(Mismatch),
    Unattached(&'a Unattached),
}

impl Display for Reason<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reason::Mismatch(mismatch) => write!(
                f,
                "Token count mismatch ({} tokens, {} lemmas)",
                mismatch.tokens, mismatch.lemmas
            ),
            Reason::Unattached(unattached) => write!(f, "{unattached}"),
        }
    }
}

/// Rendered as a header naming the line and the reason the sentence was
/// skipped, followed by the lemma line and the tagged line exactly as read.
#[derive(Debug, Clone, Copy)]
pub struct Diagnostic<'a> {
    pub line: usize,
    pub reason: Reason<'a>,
    pub tagged: &'a str,
    pub lemma: &'a str,
}

impl Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Line {}: {}:", self.line, self.reason)?;
        for raw in [self.lemma, self.tagged] {
            f.write_str(raw)?;
            if !raw.ends_with('\n') {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}

/// Split a lemma line on single spaces after trimming trailing whitespace.
/// A blank line has no lemmas.
pub fn split_lemmas(line: &str) -> Vec<&str> {
    let line = line.trim_end();
    if line.is_empty() {
        return Vec::new();
    }
    line.split(' ').collect()
}

/// Merge `tagged` and check it against `lemma`.
///
/// Only a unit without a `/` is returned as `Err`; a count mismatch or an
/// unattached affix is an ordinary [`Alignment`] that skips the sentence.
pub fn align(tagged: &str, lemma: &str, options: MergeOptions) -> Result<Alignment> {
    let merged = match merge::merge(tagged, options)? {
        Merged::Line(merged) => merged,
        Merged::Unattached(unattached) => return Ok(Alignment::Unattached(unattached)),
    };
    let lemmas = split_lemmas(lemma);

    let mismatch = Mismatch {
        tokens: merged.len(),
        lemmas: lemmas.len(),
    };
    let lemmas = lemmas.into_iter().map(str::to_string).collect();

    Ok(match SentenceRecord::new(merged, lemmas) {
        Some(record) => Alignment::Record(record),
        None => Alignment::Mismatch(mismatch),
    })
}
