//! Per-component metadata assembly.

use camino::Utf8PathBuf;

use crate::discover::NormalizedElementEntry;
use crate::error::AnalyzerError;
use crate::members::{extract_signal_members, SignalMember};
use crate::project::SourceProject;
use crate::resolve::{parse_component_ref, resolve_component_class};

/// The resolved, fully analyzed view of one component. Produced once by the
/// extraction stage and read-only to every downstream emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentMetadata {
    pub tag: String,
    pub class_name: String,
    pub file_path: Utf8PathBuf,
    pub members: Vec<SignalMember>,
}

/// Resolves one configured entry to its class and extracts its reactive
/// members.
pub fn extract_component_metadata(
    project: &mut SourceProject,
    entry: &NormalizedElementEntry,
) -> Result<ComponentMetadata, AnalyzerError> {
    let component_ref = parse_component_ref(&entry.component)?;
    let resolved = resolve_component_class(project, &component_ref)?;
    let members = extract_signal_members(resolved.file, resolved.class);
    Ok(ComponentMetadata {
        tag: entry.tag.clone(),
        class_name: component_ref.class_name,
        file_path: resolved.file.path().to_owned(),
        members,
    })
}
