//! Ambient type declaration emission.

use std::fmt::Write as _;

use element_analyzer::{ComponentMetadata, SignalKind};

/// Builds the ambient declaration text for the component set: per component
/// an element interface, a props interface, and global registrations of the
/// tag in `HTMLElementTagNameMap` and `JSX.IntrinsicElements`. Pure;
/// declaration order follows the input.
pub fn emit_type_declarations(components: &[ComponentMetadata]) -> String {
    let mut out = String::new();
    out.push_str("export {};\n\n");

    for component in components {
        let pascal = pascal_case(&component.tag);
        let element_name = format!("{}Element", pascal);
        let props_name = format!("{}Props", pascal);

        let _ = writeln!(out, "export interface {} extends HTMLElement {{}}", element_name);
        let _ = writeln!(out, "export interface {} {{", props_name);

        for member in &component.members {
            if member.kind != SignalKind::Input {
                continue;
            }
            let optional_flag = if member.required { "" } else { "?" };
            let _ = writeln!(
                out,
                "  {}{}: {};",
                member.effective_name(),
                optional_flag,
                member.type_text
            );
        }

        for member in &component.members {
            if member.kind != SignalKind::Output {
                continue;
            }
            let _ = writeln!(
                out,
                "  on{}?: (e: CustomEvent<{}>) => void;",
                pascal_case(member.effective_name()),
                member.type_text
            );
        }

        out.push_str("}\n\n");
        out.push_str("declare global {\n");
        out.push_str("  interface HTMLElementTagNameMap {\n");
        let _ = writeln!(out, "    \"{}\": {};", component.tag, element_name);
        out.push_str("  }\n\n");
        out.push_str("  namespace JSX {\n");
        out.push_str("    interface IntrinsicElements {\n");
        let _ = writeln!(out, "      \"{}\": {};", component.tag, props_name);
        out.push_str("    }\n  }\n}\n\n");
    }

    out
}

/// Derives a PascalCase identifier: split on non-alphanumeric runs,
/// title-case each segment, concatenate. `"app-card"` becomes `"AppCard"`.
pub fn pascal_case(value: &str) -> String {
    value
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
