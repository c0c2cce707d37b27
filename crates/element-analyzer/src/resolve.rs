//! Component reference parsing and class resolution.

use camino::Utf8PathBuf;
use swc_ecma_ast::Class;

use crate::error::AnalyzerError;
use crate::project::{SourceFileRecord, SourceProject};

/// Identifies a component to analyze: an explicit `(filePath, className)`
/// pair, or a bare class name to resolve uniquely across the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRef {
    pub class_name: String,
    pub file_path: Option<Utf8PathBuf>,
}

/// A class handle resolved from a [`ComponentRef`].
#[derive(Debug, Clone, Copy)]
pub struct ResolvedClass<'a> {
    pub file: &'a SourceFileRecord,
    pub class: &'a Class,
}

/// Parses a `"<path>#<Class>"` or bare `"<Class>"` component reference.
/// A reference with an empty half (`"a.ts#"`, `"#A"`, `""`) is unparsable.
pub fn parse_component_ref(component: &str) -> Result<ComponentRef, AnalyzerError> {
    match component.split_once('#') {
        Some((file_path, class_name)) => {
            if file_path.is_empty() || class_name.is_empty() {
                return Err(AnalyzerError::UnparsableReference(component.to_string()));
            }
            Ok(ComponentRef {
                class_name: class_name.to_string(),
                file_path: Some(Utf8PathBuf::from(file_path)),
            })
        }
        None if component.is_empty() => {
            Err(AnalyzerError::UnparsableReference(component.to_string()))
        }
        None => Ok(ComponentRef {
            class_name: component.to_string(),
            file_path: None,
        }),
    }
}

/// Resolves a component reference to exactly one class.
///
/// With a file path, the file is loaded on demand and the class looked up in
/// its top-level declarations. With a bare name, every loaded file is
/// searched and the match must be unique; zero or multiple matches are an
/// error, never a guess.
pub fn resolve_component_class<'a>(
    project: &'a mut SourceProject,
    component_ref: &ComponentRef,
) -> Result<ResolvedClass<'a>, AnalyzerError> {
    if let Some(path) = &component_ref.file_path {
        project.add_file(path)?;
        let Some(file) = project.file(path) else {
            return Err(AnalyzerError::SourceNotFound {
                path: path.clone(),
                reason: "file did not load".to_string(),
            });
        };
        let Some(class) = file.find_class(&component_ref.class_name) else {
            return Err(AnalyzerError::ClassNotResolved(component_ref.class_name.clone()));
        };
        return Ok(ResolvedClass { file, class });
    }

    let mut matches = Vec::new();
    for file in project.files() {
        for handle in file.classes() {
            if handle.name == Some(component_ref.class_name.as_str()) {
                matches.push(ResolvedClass {
                    file,
                    class: handle.class,
                });
            }
        }
    }
    if matches.len() != 1 {
        return Err(AnalyzerError::ClassNotResolved(component_ref.class_name.clone()));
    }
    Ok(matches.remove(0))
}
