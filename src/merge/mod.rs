//! Rebuilds surface tokens from an affix-split, tagged line.
//!
//! A tagged line looks like (note the space after the end delimiter)
//!
//! ```text
//! S/S ال+/DET حلق/NOUN-FS +ة/NSUFF E/E 
//! ```
//!
//! Prefixes (`ال+`) and suffixes (`+ة`) are fused onto their stem, giving the
//! single token `الحلقة` tagged `NOUN-FS`. Only stems carry tags into the
//! output, so every token has exactly one tag.

mod unit;

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use unit::{
    AFFIX_MARKER, Affix, TAG_FEATURE_SEPARATOR, TAG_SEPARATOR, Unit, body_units, truncate_tag,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOptions {
    /// Keep only the part of each stem tag before the first `-`.
    pub truncate_tags: bool,
}

/// Tokens and tags rebuilt from one tagged line. Both always have the same
/// length.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedLine {
    pub tokens: Vec<String>,
    pub tags: Vec<String>,
}

impl MergedLine {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tokens
            .iter()
            .map(String::as_str)
            .zip(self.tags.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnattachedKind {
    /// A suffix with no token before it.
    OrphanSuffix,
    /// A prefix still waiting for its stem when the line ends.
    DanglingPrefix,
}

/// An affix that never met a stem. The line cannot be rebuilt and is skipped
/// like a count mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unattached {
    pub kind: UnattachedKind,
    /// Index of the affix unit within the line.
    pub position: usize,
    pub unit: String,
}

impl Display for Unattached {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let what = match self.kind {
            UnattachedKind::OrphanSuffix => "Orphan suffix",
            UnattachedKind::DanglingPrefix => "Dangling prefix",
        };
        write!(f, "{what} {:?} at unit {}", self.unit, self.position)
    }
}

/// Outcome of merging one tagged line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Merged {
    Line(MergedLine),
    Unattached(Unattached),
}

impl Merged {
    pub fn line(self) -> Option<MergedLine> {
        match self {
            Merged::Line(line) => Some(line),
            Merged::Unattached(_) => None,
        }
    }
}

/// Whether the token currently open still waits for more material.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MergeState {
    #[default]
    Idle,
    /// A prefix opened the last token; further prefixes and the stem extend it.
    ExpectingContinuation,
}

impl MergeState {
    pub fn next(self, affix: Affix) -> MergeState {
        match affix {
            Affix::Prefix => MergeState::ExpectingContinuation,
            Affix::Suffix => self,
            Affix::Stem => MergeState::Idle,
        }
    }
}

/// Merge one tagged line into surface tokens and their tags.
///
/// The first unit and the last two units of the line are sentence delimiters
/// and are always dropped. Every unit is split before merging starts, so a
/// unit without a `/` fails the line wherever it sits. A suffix with nothing
/// to attach to, or a prefix that never meets its stem, gives
/// [`Merged::Unattached`].
pub fn merge(line: &str, options: MergeOptions) -> Result<Merged> {
    let units = body_units(line)
        .map(|(position, raw)| Unit::parse(raw, position).map(|unit| (position, raw, unit)))
        .collect::<Result<Vec<_>>>()?;

    let mut merged = MergedLine::default();
    let mut state = MergeState::Idle;
    let mut open_prefix = None;

    for (position, raw, unit) in units {
        match unit.affix {
            Affix::Prefix => match (state, merged.tokens.last_mut()) {
                (MergeState::ExpectingContinuation, Some(open)) => open.push_str(unit.morpheme),
                _ => {
                    merged.tokens.push(unit.morpheme.to_string());
                    open_prefix = Some((position, raw));
                }
            },
            Affix::Suffix => {
                let Some(last) = merged.tokens.last_mut() else {
                    tracing::trace!("Orphan suffix {raw:?} at unit {position}");
                    return Ok(Merged::Unattached(Unattached {
                        kind: UnattachedKind::OrphanSuffix,
                        position,
                        unit: raw.to_string(),
                    }));
                };
                last.push_str(unit.morpheme);
            }
            Affix::Stem => {
                let tag = if options.truncate_tags {
                    truncate_tag(unit.tag)
                } else {
                    unit.tag
                };
                merged.tags.push(tag.to_string());

                match (state, merged.tokens.last_mut()) {
                    (MergeState::ExpectingContinuation, Some(open)) => {
                        open.push_str(unit.morpheme)
                    }
                    _ => merged.tokens.push(unit.morpheme.to_string()),
                }
            }
        }

        state = state.next(unit.affix);
    }

    if state == MergeState::ExpectingContinuation {
        let (position, unit) = open_prefix.unwrap_or_default();
        tracing::trace!("Dangling prefix {unit:?} at unit {position}");
        return Ok(Merged::Unattached(Unattached {
            kind: UnattachedKind::DanglingPrefix,
            position,
            unit: unit.to_string(),
        }));
    }

    tracing::trace!("Merged {} tokens: {:?}", merged.len(), merged.tokens);
    Ok(Merged::Line(merged))
}
