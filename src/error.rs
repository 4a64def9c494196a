/// Fatal failures of a conversion run.
///
/// Token-count mismatches and affixes without a stem are not errors: they
/// are reported through [`crate::align::Alignment`] and the run carries on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed unit {position} {unit:?}: expected morpheme/tag")]
    MalformedUnit { position: usize, unit: String },

    #[error("Line {line}")]
    AtLine { line: usize, source: Box<Error> },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Annotate a merge error with the 0-based line it came from.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Error::Io(_) | Error::AtLine { .. } => self,
            other => Error::AtLine {
                line,
                source: Box::new(other),
            },
        }
    }

    /// Line number the error was raised on, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::AtLine { line, .. } => Some(*line),
            _ => None,
        }
    }
}
