use std::fmt::Display;
use std::io::{self, Write};

use serde::Serialize;

use crate::merge::MergedLine;

pub const SENTENCE_OPEN: &str = "<s>";
pub const SENTENCE_CLOSE: &str = "</s>";

/// One aligned sentence: surface tokens, tags and lemmas of equal length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentenceRecord {
    tokens: Vec<String>,
    tags: Vec<String>,
    lemmas: Vec<String>,
}

impl SentenceRecord {
    /// Pair a merged line with its lemmas. Returns `None` when the counts
    /// differ.
    pub fn new(merged: MergedLine, lemmas: Vec<String>) -> Option<Self> {
        let MergedLine { tokens, tags } = merged;
        if tokens.len() != lemmas.len() || tags.len() != lemmas.len() {
            return None;
        }

        Some(SentenceRecord {
            tokens,
            tags,
            lemmas,
        })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn lemmas(&self) -> &[String] {
        &self.lemmas
    }

    /// `(surface, tag, lemma)` rows in sentence order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.tokens
            .iter()
            .zip(&self.tags)
            .zip(&self.lemmas)
            .map(|((token, tag), lemma)| (token.as_str(), tag.as_str(), lemma.as_str()))
    }

    /// Write the sentence in vertical format, `<s>` and `</s>` on their own
    /// lines.
    pub fn write_vertical<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{SENTENCE_OPEN}")?;
        for (token, tag, lemma) in self.rows() {
            writeln!(out, "{token}\t{tag}\t{lemma}")?;
        }
        writeln!(out, "{SENTENCE_CLOSE}")
    }
}

impl Display for SentenceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{SENTENCE_OPEN}")?;
        for (token, tag, lemma) in self.rows() {
            writeln!(f, "{token}\t{tag}\t{lemma}")?;
        }
        writeln!(f, "{SENTENCE_CLOSE}")
    }
}
