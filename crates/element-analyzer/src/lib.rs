//! Component source analysis for custom-element generation.
//!
//! This crate owns the read side of the pipeline: loading TypeScript
//! component sources into an in-memory project, resolving component
//! references to classes, extracting reactive member metadata from signal
//! factory calls, and discovering registration-marked components across a
//! whole source tree.

mod ast;
mod discover;
mod error;
mod members;
mod metadata;
mod normalize;
mod project;
mod resolve;

pub use discover::{discover_elements, DiscoverOptions, NormalizedElementEntry, REGISTRATION_MARKER};
pub use error::AnalyzerError;
pub use members::{extract_signal_members, SignalKind, SignalMember};
pub use metadata::{extract_component_metadata, ComponentMetadata};
pub use normalize::normalize_component_source;
pub use project::{ClassHandle, SourceFileRecord, SourceProject};
pub use resolve::{parse_component_ref, resolve_component_class, ComponentRef, ResolvedClass};
