//! Source-wide component discovery.
//!
//! Scans every loaded file for classes carrying the registration marker
//! decorator and resolves each one's custom element tag, so callers do not
//! have to enumerate components explicitly.

use std::collections::HashSet;

use swc_ecma_ast::{Class, Decorator, Expr, Lit};

use crate::ast::{decorator_first_arg_object, find_decorator, object_string_prop, str_value};
use crate::error::AnalyzerError;
use crate::project::SourceProject;

/// The class decorator that marks a component for custom-element export.
/// Carries no runtime behavior; it exists for this scan.
pub const REGISTRATION_MARKER: &str = "RegisterWebComponent";

const COMPONENT_DECORATOR: &str = "Component";

/// Discovery behavior toggles.
#[derive(Debug, Clone)]
pub struct DiscoverOptions {
    /// When the marker carries no tag, fall back to the class's own
    /// `@Component({ selector })`.
    pub selector_fallback: bool,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            selector_fallback: true,
        }
    }
}

/// A discovered component, in the compound-reference form the explicit
/// configuration path already understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedElementEntry {
    pub tag: String,
    pub component: String,
}

/// Scans the whole project for registration-marked classes.
///
/// Fails on anonymous marked classes, unresolvable tags, and duplicate
/// tags; discovery fails the run rather than silently dropping an entry.
pub fn discover_elements(
    project: &SourceProject,
    options: &DiscoverOptions,
) -> Result<Vec<NormalizedElementEntry>, AnalyzerError> {
    let mut entries = Vec::new();
    let mut seen_tags = HashSet::new();

    for file in project.files() {
        for handle in file.classes() {
            let Some(marker) = find_decorator(handle.class, REGISTRATION_MARKER) else {
                continue;
            };
            let Some(class_name) = handle.name else {
                return Err(AnalyzerError::UnnamedComponent(file.path().to_owned()));
            };
            let Some(tag) = resolve_tag(handle.class, marker, options) else {
                return Err(AnalyzerError::MissingTag {
                    class: class_name.to_string(),
                    path: file.path().to_owned(),
                });
            };
            if !seen_tags.insert(tag.clone()) {
                return Err(AnalyzerError::DuplicateTag(tag));
            }
            entries.push(NormalizedElementEntry {
                component: format!("{}#{}", file.path(), class_name),
                tag,
            });
        }
    }

    Ok(entries)
}

/// Tag precedence: the marker's string-literal first argument, then a
/// `tag`/`selector` property of an object-literal first argument, then the
/// component's own template selector when the fallback is enabled.
fn resolve_tag(class: &Class, marker: &Decorator, options: &DiscoverOptions) -> Option<String> {
    if let Some(tag) = marker_tag(marker) {
        return Some(tag);
    }
    if options.selector_fallback {
        if let Some(component) = find_decorator(class, COMPONENT_DECORATOR) {
            if let Some(obj) = decorator_first_arg_object(component) {
                return object_string_prop(obj, "selector");
            }
        }
    }
    None
}

fn marker_tag(marker: &Decorator) -> Option<String> {
    let Expr::Call(call) = marker.expr.as_ref() else {
        return None;
    };
    let first = call.args.first()?;
    if first.spread.is_some() {
        return None;
    }
    match first.expr.as_ref() {
        Expr::Lit(Lit::Str(s)) => str_value(s).map(str::to_string),
        Expr::Object(obj) => {
            object_string_prop(obj, "tag").or_else(|| object_string_prop(obj, "selector"))
        }
        _ => None,
    }
}
