use crate::error::{Error, Result};

/// Marks a bound morpheme: trailing on prefixes, leading on suffixes.
pub const AFFIX_MARKER: char = '+';

/// Separates a morpheme from its tag. Splits happen at the last occurrence.
pub const TAG_SEPARATOR: char = '/';

/// Separates the coarse part of a tag from its features, e.g. `NOUN-MS`.
pub const TAG_FEATURE_SEPARATOR: char = '-';

/// Units dropped from the start of every tagged line.
const LEADING_DELIMITERS: usize = 1;
/// Units dropped from the end of every tagged line.
const TRAILING_DELIMITERS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affix {
    /// `ال+`: opens (or extends) a token and waits for its stem.
    Prefix,
    /// `+ة`: attaches to the token before it.
    Suffix,
    /// A free morpheme. The only kind that carries a tag.
    Stem,
}

impl Affix {
    /// Classify a morpheme and return it with the marker stripped.
    pub fn classify(morpheme: &str) -> (Affix, &str) {
        if let Some(body) = morpheme.strip_suffix(AFFIX_MARKER) {
            (Affix::Prefix, body)
        } else if let Some(body) = morpheme.strip_prefix(AFFIX_MARKER) {
            (Affix::Suffix, body)
        } else {
            (Affix::Stem, morpheme)
        }
    }
}

/// One `morpheme/tag` pair from a tagged line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit<'a> {
    pub affix: Affix,
    /// Morpheme without its affix marker.
    pub morpheme: &'a str,
    pub tag: &'a str,
}

impl<'a> Unit<'a> {
    /// Parse a raw unit. `position` is its index within the line and is only
    /// used for error reporting.
    pub fn parse(raw: &'a str, position: usize) -> Result<Self> {
        let Some((morpheme, tag)) = raw.rsplit_once(TAG_SEPARATOR) else {
            return Err(Error::MalformedUnit {
                position,
                unit: raw.to_string(),
            });
        };

        let (affix, morpheme) = Affix::classify(morpheme);
        Ok(Unit {
            affix,
            morpheme,
            tag,
        })
    }
}

/// Keep the part of a tag before the first feature separator.
pub fn truncate_tag(tag: &str) -> &str {
    match tag.split_once(TAG_FEATURE_SEPARATOR) {
        Some((coarse, _)) => coarse,
        None => tag,
    }
}

/// Strip a single trailing `\n` or `\r\n`.
fn strip_line_terminator(line: &str) -> &str {
    match line.strip_suffix('\n') {
        Some(line) => line.strip_suffix('\r').unwrap_or(line),
        None => line,
    }
}

/// Raw units of a tagged line with the sentence delimiters removed, paired
/// with their index within the line.
///
/// Units are separated by single spaces, so a trailing space yields an empty
/// final unit which counts as one of the two end delimiters.
pub fn body_units(line: &str) -> impl Iterator<Item = (usize, &str)> {
    let raw = strip_line_terminator(line).split(' ').collect::<Vec<_>>();
    let end = raw.len().saturating_sub(TRAILING_DELIMITERS);

    raw.into_iter()
        .enumerate()
        .take(end)
        .skip(LEADING_DELIMITERS)
}
