//! In-memory project of parsed component sources.
//!
//! A [`SourceProject`] holds every source file the current run may resolve
//! classes from. Files are parsed once, sequentially, each against its own
//! fresh source map; no state is shared across runs.

use std::fs;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use swc_common::{BytePos, FileName, SourceMap, Span};
use swc_ecma_ast::{Class, Decl, DefaultDecl, EsVersion, Module, ModuleDecl, ModuleItem, Stmt};
use swc_ecma_parser::{parse_file_as_module, Syntax, TsSyntax};
use walkdir::WalkDir;

use crate::error::AnalyzerError;

/// A single parsed source file, with enough context to map AST spans back
/// to the literal text they cover.
#[derive(Debug)]
pub struct SourceFileRecord {
    path: Utf8PathBuf,
    source: String,
    module: Module,
    file_start: BytePos,
}

/// A top-level class found in a source file. `name` is `None` only for an
/// anonymous `export default class`.
#[derive(Debug, Clone, Copy)]
pub struct ClassHandle<'a> {
    pub name: Option<&'a str>,
    pub class: &'a Class,
}

impl SourceFileRecord {
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the literal source text covered by `span`.
    ///
    /// Spans are rebased against the file's start position; an out-of-range
    /// span yields the empty string rather than panicking.
    pub fn span_text(&self, span: Span) -> &str {
        let lo = span.lo.0.saturating_sub(self.file_start.0) as usize;
        let hi = span.hi.0.saturating_sub(self.file_start.0) as usize;
        self.source.get(lo..hi).unwrap_or("")
    }

    /// Returns the byte offset of `pos` within this file's source text.
    pub(crate) fn offset_of(&self, pos: BytePos) -> usize {
        pos.0.saturating_sub(self.file_start.0) as usize
    }

    /// All top-level classes in declaration order: plain declarations,
    /// `export class`, and `export default class`.
    pub fn classes(&self) -> Vec<ClassHandle<'_>> {
        let mut classes = Vec::new();
        for item in &self.module.body {
            match item {
                ModuleItem::Stmt(Stmt::Decl(Decl::Class(decl))) => {
                    classes.push(ClassHandle {
                        name: Some(decl.ident.sym.as_str()),
                        class: &decl.class,
                    });
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                    if let Decl::Class(decl) = &export.decl {
                        classes.push(ClassHandle {
                            name: Some(decl.ident.sym.as_str()),
                            class: &decl.class,
                        });
                    }
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => {
                    if let DefaultDecl::Class(expr) = &export.decl {
                        classes.push(ClassHandle {
                            name: expr.ident.as_ref().map(|ident| ident.sym.as_str()),
                            class: &expr.class,
                        });
                    }
                }
                _ => {}
            }
        }
        classes
    }

    /// Finds a top-level class by name.
    pub fn find_class(&self, name: &str) -> Option<&Class> {
        self.classes()
            .into_iter()
            .find(|handle| handle.name == Some(name))
            .map(|handle| handle.class)
    }
}

/// The set of source files available to class resolution and discovery.
///
/// Constructed empty (explicitly populated) or from a tsconfig-equivalent
/// project context; there is no implicit project-wide inclusion.
#[derive(Debug, Default)]
pub struct SourceProject {
    files: Vec<SourceFileRecord>,
}

/// The subset of tsconfig.json the project loader honors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct TsProjectConfig {
    files: Vec<String>,
    include: Vec<String>,
    exclude: Vec<String>,
}

const DEFAULT_EXCLUDES: [&str; 2] = ["**/node_modules/**", "**/dist/**"];

impl SourceProject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a project context from a tsconfig.json file. Honors `files`,
    /// `include`, and `exclude`; tolerates JSON comments. Files named
    /// explicitly must load; files swept up by `include` are skipped with a
    /// warning when unreadable or unparsable.
    pub fn from_tsconfig(tsconfig_path: &Utf8Path) -> Result<Self, AnalyzerError> {
        let text =
            fs::read_to_string(tsconfig_path).map_err(|e| AnalyzerError::TsconfigUnparsable {
                path: tsconfig_path.to_owned(),
                message: e.to_string(),
            })?;
        let cleaned = remove_json_comments(&text);
        let config: TsProjectConfig =
            serde_json::from_str(&cleaned).map_err(|e| AnalyzerError::TsconfigUnparsable {
                path: tsconfig_path.to_owned(),
                message: e.to_string(),
            })?;

        // A bare "tsconfig.json" has an empty parent; scan the current dir.
        let root = match tsconfig_path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let mut project = Self::new();

        for file in &config.files {
            project.add_file(&root.join(file))?;
        }

        // tsconfig semantics: a `files` list with no `include` means exactly
        // those files.
        if !config.files.is_empty() && config.include.is_empty() {
            return Ok(project);
        }

        let include = build_globset(
            tsconfig_path,
            if config.include.is_empty() {
                vec!["**/*".to_string()]
            } else {
                config.include.iter().map(|p| normalize_include_pattern(p)).collect()
            },
        )?;
        let exclude = build_globset(
            tsconfig_path,
            config
                .exclude
                .iter()
                .map(|p| normalize_include_pattern(p))
                .chain(DEFAULT_EXCLUDES.iter().map(|p| p.to_string()))
                .collect(),
        )?;

        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(path) = Utf8PathBuf::try_from(entry.into_path()) else {
                continue;
            };
            let name = path.file_name().unwrap_or("");
            if !(name.ends_with(".ts") || name.ends_with(".tsx")) || name.ends_with(".d.ts") {
                continue;
            }
            let relative = path.strip_prefix(root).unwrap_or(&path);
            if !include.is_match(relative.as_str()) || exclude.is_match(relative.as_str()) {
                continue;
            }
            if let Err(e) = project.add_file(&path) {
                eprintln!("Warning: skipping {}: {}", path, e);
            }
        }

        Ok(project)
    }

    /// Reads and parses one source file into the project. Loading the same
    /// path twice is a no-op; a missing or unparsable file is fatal.
    pub fn add_file(&mut self, path: &Utf8Path) -> Result<(), AnalyzerError> {
        if self.file(path).is_some() {
            return Ok(());
        }
        let source = fs::read_to_string(path).map_err(|e| AnalyzerError::SourceNotFound {
            path: path.to_owned(),
            reason: e.to_string(),
        })?;
        self.add_source(path, &source)
    }

    /// Adds an in-memory source file to the project.
    pub fn add_source(&mut self, path: &Utf8Path, source: &str) -> Result<(), AnalyzerError> {
        if self.file(path).is_some() {
            return Ok(());
        }
        let (module, file_start) =
            parse_source(path, source).map_err(|message| AnalyzerError::SourceNotFound {
                path: path.to_owned(),
                reason: message,
            })?;
        self.files.push(SourceFileRecord {
            path: path.to_owned(),
            source: source.to_string(),
            module,
            file_start,
        });
        Ok(())
    }

    pub fn file(&self, path: &Utf8Path) -> Option<&SourceFileRecord> {
        self.files.iter().find(|file| file.path == path)
    }

    pub fn files(&self) -> impl Iterator<Item = &SourceFileRecord> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Parses one TypeScript source file against a fresh source map, returning
/// the module and the file's start position for span rebasing.
pub(crate) fn parse_source(path: &Utf8Path, source: &str) -> Result<(Module, BytePos), String> {
    let cm: Arc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Custom(path.to_string()).into(), source.to_string());
    let file_start = fm.start_pos;
    let syntax = Syntax::Typescript(TsSyntax {
        tsx: path.as_str().ends_with(".tsx"),
        decorators: true,
        ..Default::default()
    });
    let mut recovered = Vec::new();
    let module = parse_file_as_module(&fm, syntax, EsVersion::Es2022, None, &mut recovered)
        .map_err(|e| format!("parse error: {:?}", e))?;
    // The parser recovers from some syntax errors; a file it had to recover
    // is still not a trustworthy source of metadata.
    if let Some(error) = recovered.into_iter().next() {
        return Err(format!("parse error: {:?}", error));
    }
    Ok((module, file_start))
}

fn build_globset(tsconfig_path: &Utf8Path, patterns: Vec<String>) -> Result<GlobSet, AnalyzerError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in &patterns {
        let glob = Glob::new(pattern).map_err(|e| AnalyzerError::TsconfigUnparsable {
            path: tsconfig_path.to_owned(),
            message: format!("invalid glob pattern {:?}: {}", pattern, e),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| AnalyzerError::TsconfigUnparsable {
        path: tsconfig_path.to_owned(),
        message: e.to_string(),
    })
}

/// tsconfig allows bare directory names in include/exclude; treat those as
/// recursive matches.
fn normalize_include_pattern(pattern: &str) -> String {
    let trimmed = pattern.trim_end_matches('/');
    if trimmed.contains('*') || trimmed.contains('.') {
        trimmed.to_string()
    } else {
        format!("{}/**/*", trimmed)
    }
}

/// Removes single-line and multi-line comments from JSON.
fn remove_json_comments(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if c == '"' {
                in_string = false;
            } else if c == '\\' {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
        } else if c == '"' {
            result.push(c);
            in_string = true;
        } else if c == '/' {
            match chars.peek() {
                Some('/') => {
                    chars.next();
                    while let Some(&next) = chars.peek() {
                        if next == '\n' {
                            break;
                        }
                        chars.next();
                    }
                }
                Some('*') => {
                    chars.next();
                    while let Some(next) = chars.next() {
                        if next == '*' && chars.peek() == Some(&'/') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {
                    result.push(c);
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}
