//! Artifact emitters for custom-element generation.
//!
//! Every emitter is a pure function over the analyzed component metadata;
//! the metadata is produced once upstream and never mutated here. Emitters
//! are independent of each other and of any file-system policy.

mod manifest;
mod registration;
mod typings;

pub use manifest::{
    emit_manifest, CustomElementsManifest, ManifestDeclaration, ManifestEvent, ManifestField,
    ManifestModule, TypeRef, MANIFEST_SCHEMA_VERSION,
};
pub use registration::{emit_registration, RegistrationMode, RegistrationOptions, READY_GLOBAL};
pub use typings::{emit_type_declarations, pascal_case};
