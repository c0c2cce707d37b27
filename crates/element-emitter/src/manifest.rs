//! Custom elements manifest emission.

use element_analyzer::{ComponentMetadata, SignalKind, SignalMember};
use serde::Serialize;

pub const MANIFEST_SCHEMA_VERSION: &str = "1.0.0";

/// The structured `custom-elements.json` document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomElementsManifest {
    pub schema_version: String,
    pub readme: String,
    pub modules: Vec<ManifestModule>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestModule {
    pub kind: String,
    pub path: String,
    pub declarations: Vec<ManifestDeclaration>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDeclaration {
    pub kind: String,
    pub name: String,
    pub tag_name: String,
    pub custom_element: bool,
    pub members: Vec<ManifestField>,
    pub events: Vec<ManifestEvent>,
    /// Mirrors `members`: the manifest schema keeps separate attribute and
    /// property views, and inputs appear in both.
    pub attributes: Vec<ManifestField>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestField {
    pub kind: String,
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestEvent {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeRef {
    pub text: String,
}

/// Builds the manifest for the analyzed component set. Pure; component and
/// member ordering follow the input.
pub fn emit_manifest(components: &[ComponentMetadata]) -> CustomElementsManifest {
    CustomElementsManifest {
        schema_version: MANIFEST_SCHEMA_VERSION.to_string(),
        readme: String::new(),
        modules: components
            .iter()
            .map(|component| {
                let fields = input_fields(&component.members);
                ManifestModule {
                    kind: "javascript-module".to_string(),
                    path: component.file_path.to_string(),
                    declarations: vec![ManifestDeclaration {
                        kind: "class".to_string(),
                        name: component.class_name.clone(),
                        tag_name: component.tag.clone(),
                        custom_element: true,
                        attributes: fields.clone(),
                        members: fields,
                        events: output_events(&component.members),
                    }],
                }
            })
            .collect(),
    }
}

fn input_fields(members: &[SignalMember]) -> Vec<ManifestField> {
    members
        .iter()
        .filter(|member| member.kind == SignalKind::Input)
        .map(|member| ManifestField {
            kind: "field".to_string(),
            name: member.effective_name().to_string(),
            type_ref: TypeRef {
                text: member.type_text.clone(),
            },
        })
        .collect()
}

fn output_events(members: &[SignalMember]) -> Vec<ManifestEvent> {
    members
        .iter()
        .filter(|member| member.kind == SignalKind::Output)
        .map(|member| ManifestEvent {
            name: member.effective_name().to_string(),
            type_ref: TypeRef {
                text: member.type_text.clone(),
            },
        })
        .collect()
}
