//! Converts a tagged, affix-split corpus and its lemmatized twin into
//! vertical format: one `surface\ttag\tlemma` line per token, sentences
//! wrapped in `<s>`/`</s>`.

pub mod align;
pub mod driver;
pub mod error;
pub mod merge;
pub mod vertical;

pub use align::{Alignment, Diagnostic, Mismatch, Reason, align, split_lemmas};
pub use driver::{ConvertOptions, Driver, RawLines, Summary};
pub use error::{Error, Result};
pub use merge::{MergeOptions, Merged, MergedLine, Unattached, UnattachedKind, merge};
pub use vertical::SentenceRecord;

pub fn print_version(verbose: bool) {
    println!("pos-vertical v{}", env!("CARGO_PKG_VERSION"));
    if verbose {
        println!(
            "  platform: {}-{}",
            std::env::consts::OS,
            std::env::consts::ARCH
        );
    }
}
