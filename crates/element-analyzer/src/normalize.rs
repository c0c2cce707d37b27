//! JIT-safe component source normalization.
//!
//! Ensures `@Component({ ... })` object literals carry defaults for the
//! array-valued options a JIT compiler reads unconditionally. Existing
//! properties are never touched; the rewrite is a span-anchored text splice,
//! so the rest of the source comes through byte-for-byte.

use camino::Utf8Path;
use swc_ecma_ast::{ObjectLit, Prop, PropOrSpread};

use crate::ast::{decorator_first_arg_object, find_decorator, prop_name_text};
use crate::error::AnalyzerError;
use crate::project::SourceProject;

const JIT_DEFAULTS: [&str; 4] = ["styles", "animations", "imports", "schemas"];
const COMPONENT_DECORATOR: &str = "Component";

/// Rewrites `source` so every `@Component` options object declares
/// `styles`, `animations`, `imports`, and `schemas` (each `[]`) unless the
/// author already did.
pub fn normalize_component_source(path: &Utf8Path, source: &str) -> Result<String, AnalyzerError> {
    let mut project = SourceProject::new();
    project.add_source(path, source)?;
    let Some(file) = project.file(path) else {
        return Ok(source.to_string());
    };

    // (byte offset just past '{', text to insert)
    let mut insertions: Vec<(usize, String)> = Vec::new();

    for handle in file.classes() {
        let Some(decorator) = find_decorator(handle.class, COMPONENT_DECORATOR) else {
            continue;
        };
        let Some(obj) = decorator_first_arg_object(decorator) else {
            continue;
        };

        let missing = missing_defaults(obj);
        if missing.is_empty() {
            continue;
        }
        let mut text = String::new();
        for name in &missing {
            text.push_str(&format!(" {}: [],", name));
        }
        insertions.push((file.offset_of(obj.span.lo) + 1, text));
    }

    let mut normalized = source.to_string();
    insertions.sort_by(|a, b| b.0.cmp(&a.0));
    for (offset, text) in insertions {
        normalized.insert_str(offset, &text);
    }
    Ok(normalized)
}

fn missing_defaults(obj: &ObjectLit) -> Vec<&'static str> {
    let existing: Vec<String> = obj
        .props
        .iter()
        .filter_map(|prop| {
            let PropOrSpread::Prop(prop) = prop else {
                return None;
            };
            match prop.as_ref() {
                Prop::Shorthand(ident) => Some(ident.sym.to_string()),
                Prop::KeyValue(kv) => prop_name_text(&kv.key),
                Prop::Getter(getter) => prop_name_text(&getter.key),
                Prop::Setter(setter) => prop_name_text(&setter.key),
                Prop::Method(method) => prop_name_text(&method.key),
                Prop::Assign(_) => None,
            }
        })
        .collect();

    JIT_DEFAULTS
        .iter()
        .filter(|name| !existing.iter().any(|e| e == *name))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(source: &str) -> String {
        normalize_component_source(Utf8Path::new("component.ts"), source).unwrap()
    }

    #[test]
    fn inserts_missing_defaults() {
        let normalized = normalize(
            r#"
            @Component({ selector: "app-sample", template: "<div></div>" })
            export class SampleComponent {}
            "#,
        );

        for name in ["styles", "animations", "imports", "schemas"] {
            assert!(
                normalized.contains(&format!("{}: []", name)),
                "missing default {} in {}",
                name,
                normalized
            );
        }
        assert!(normalized.contains(r#"selector: "app-sample""#));
    }

    #[test]
    fn leaves_existing_properties_alone() {
        let normalized = normalize(
            r#"
            @Component({ selector: "app-styled", styles: ["h1 { color: red }"] })
            export class StyledComponent {}
            "#,
        );

        assert!(normalized.contains(r#"styles: ["h1 { color: red }"]"#));
        assert_eq!(normalized.matches("styles").count(), 1);
        assert!(normalized.contains("animations: []"));
    }

    #[test]
    fn ignores_classes_without_component_decorator() {
        let source = r#"
            @RegisterWebComponent("app-plain")
            export class PlainComponent {}
        "#;
        assert_eq!(normalize(source), source);
    }

    #[test]
    fn ignores_decorator_without_object_argument() {
        let source = r#"
            @Component
            export class BareComponent {}
        "#;
        assert_eq!(normalize(source), source);
    }

    #[test]
    fn normalizes_every_component_in_the_file() {
        let normalized = normalize(
            r#"
            @Component({ selector: "app-one" })
            export class OneComponent {}

            @Component({ selector: "app-two" })
            export class TwoComponent {}
            "#,
        );
        assert_eq!(normalized.matches("schemas: []").count(), 2);
    }
}
