//! Analysis errors.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while resolving and analyzing component sources.
///
/// Every variant is fatal to a generation run; the extractor itself never
/// errors on unrecognized property initializers (those are skipped).
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// A compound `path#Class` reference could not be split into both parts.
    #[error("component reference could not be parsed: {0}")]
    UnparsableReference(String),

    /// An explicitly referenced source file is missing or not parsable.
    #[error("component source file could not be loaded: {path}: {reason}")]
    SourceNotFound { path: Utf8PathBuf, reason: String },

    /// The named class is absent, or ambiguous when resolving by name alone.
    #[error("component symbol cannot be resolved to a class: {0}")]
    ClassNotResolved(String),

    /// Discovery found the registration marker on an anonymous class.
    #[error("registered component class has no name: {0}")]
    UnnamedComponent(Utf8PathBuf),

    /// Discovery could not determine a custom element tag for a marked class.
    #[error("no custom element tag resolved for component {class} in {path}")]
    MissingTag { class: String, path: Utf8PathBuf },

    /// Two discovered components resolve to the same tag.
    #[error("tag is duplicated: {0}")]
    DuplicateTag(String),

    /// The tsconfig project context could not be loaded or parsed.
    #[error("failed to load tsconfig {path}: {message}")]
    TsconfigUnparsable { path: Utf8PathBuf, message: String },
}
