//! Main orchestration logic.
//!
//! A linear pipeline with no branching back: normalize configuration,
//! resolve each component, extract metadata, write the manifest and type
//! declarations, then emit each requested registration artifact. A failure
//! at any stage aborts the remaining stages; no partial-artifact cleanup is
//! attempted.

use std::collections::HashSet;
use std::time::Instant;

use camino::{Utf8Path, Utf8PathBuf};
use element_analyzer::{
    discover_elements, extract_component_metadata, AnalyzerError, ComponentMetadata,
    DiscoverOptions, NormalizedElementEntry, SourceProject,
};
use element_emitter::{
    emit_manifest, emit_registration, emit_type_declarations, RegistrationMode, RegistrationOptions,
};
use ng_build_runner::{rename_main_bundle, BuildError, BuildRequest, BuildTarget, NgBuildRunner};
use thiserror::Error;

use crate::config::{ElementsConfig, GeneratorConfig};

pub const MANIFEST_FILENAME: &str = "custom-elements.json";
pub const TYPINGS_FILENAME: &str = "custom-elements.d.ts";
pub const STANDALONE_FILENAME: &str = "elements.ts";
pub const BROWSER_ENTRY_FILENAME: &str = "elements.browser.entry.ts";

/// Generation errors.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Two components in the same run resolve to the same tag.
    #[error("tag is duplicated: {0}")]
    DuplicateTag(String),

    /// A browser bundle was requested without a downstream build hookup.
    #[error("browser output requires a build target so the Angular build produces the bundle; add buildTarget (e.g. \"myApp:build\") to the generator config")]
    BrowserOutputRequiresBuildTarget,

    /// An output kind outside the recognized set was requested.
    #[error("unsupported output kind: {0}")]
    UnsupportedOutputKind(String),

    /// The configuration source could not be loaded or parsed.
    #[error("generator config could not be parsed: {path}: {message}")]
    ConfigUnparsable {
        path: Utf8PathBuf,
        message: String,
    },

    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),

    #[error(transparent)]
    Build(#[from] BuildError),

    /// An artifact write failed.
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The recognized output kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementOutput {
    /// The manifest surface; always produced, accepted as an explicit kind.
    Manifest,
    /// Importable registration module (`elements.ts`).
    Standalone,
    /// Self-registering bundle entry, fed to the downstream build.
    Browser,
}

impl ElementOutput {
    fn parse(value: &str) -> Result<Self, GeneratorError> {
        match value {
            "manifest" => Ok(Self::Manifest),
            "standalone" => Ok(Self::Standalone),
            "browser" => Ok(Self::Browser),
            _ => Err(GeneratorError::UnsupportedOutputKind(value.to_string())),
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct GenerateSummary {
    pub component_count: usize,
    pub artifacts: Vec<Utf8PathBuf>,
    pub out_dir: Utf8PathBuf,
}

impl GenerateSummary {
    pub fn format(&self) -> String {
        format!(
            "Generated {} artifact{} for {} component{} in {}",
            self.artifacts.len(),
            plural(self.artifacts.len()),
            self.component_count,
            plural(self.component_count),
            self.out_dir
        )
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Runs the whole generation pipeline for one validated configuration.
pub async fn generate(
    config: &GeneratorConfig,
    timings: bool,
) -> Result<GenerateSummary, GeneratorError> {
    let total_start = Instant::now();

    // Cross-cutting validation happens before any analysis or write.
    let outputs = requested_outputs(config)?;
    let build_target = config
        .build_target
        .as_deref()
        .map(BuildTarget::parse)
        .transpose()?;
    if outputs.contains(&ElementOutput::Browser) && build_target.is_none() {
        return Err(GeneratorError::BrowserOutputRequiresBuildTarget);
    }
    let explicit_entries = config
        .elements
        .as_ref()
        .map(normalize_elements)
        .transpose()?;

    let analyze_start = Instant::now();
    let mut project = match &config.tsconfig {
        Some(tsconfig) => SourceProject::from_tsconfig(tsconfig)?,
        None => SourceProject::new(),
    };

    let entries = match explicit_entries {
        Some(entries) => entries,
        None => {
            let options = DiscoverOptions {
                selector_fallback: config.selector_fallback.unwrap_or(true),
            };
            discover_elements(&project, &options)?
        }
    };

    // Sequential extraction: AST handles are never shared across analyses.
    let mut components: Vec<ComponentMetadata> = Vec::with_capacity(entries.len());
    for entry in &entries {
        components.push(extract_component_metadata(&mut project, entry)?);
    }
    let analyze_time = analyze_start.elapsed();

    let emit_start = Instant::now();
    let out_dir = config
        .out_dir
        .clone()
        .unwrap_or_else(|| Utf8PathBuf::from("dist"));
    create_dir(&out_dir).await?;

    let mut artifacts = Vec::new();

    let manifest = emit_manifest(&components);
    let manifest_path = out_dir.join(MANIFEST_FILENAME);
    let manifest_json = serde_json::to_string_pretty(&manifest).map_err(|e| {
        GeneratorError::WriteFailed {
            path: manifest_path.clone(),
            source: std::io::Error::other(e),
        }
    })?;
    write_artifact(&manifest_path, &manifest_json).await?;
    artifacts.push(manifest_path);

    let typings_path = out_dir.join(TYPINGS_FILENAME);
    write_artifact(&typings_path, &emit_type_declarations(&components)).await?;
    artifacts.push(typings_path);

    let mut build_time = None;
    for output in &outputs {
        match output {
            // The manifest surface is written unconditionally above.
            ElementOutput::Manifest => {}
            ElementOutput::Standalone => {
                let source = emit_registration(
                    &components,
                    &RegistrationOptions {
                        mode: RegistrationMode::Standalone,
                        out_dir: out_dir.clone(),
                        import_extension: config.import_extension.clone(),
                        inline_components: config.inline_components.unwrap_or(false),
                    },
                );
                let path = out_dir.join(STANDALONE_FILENAME);
                write_artifact(&path, &source).await?;
                artifacts.push(path);
            }
            ElementOutput::Browser => {
                let entry_dir = config
                    .browser_entry_dir
                    .clone()
                    .unwrap_or_else(|| out_dir.clone());
                create_dir(&entry_dir).await?;
                let source = emit_registration(
                    &components,
                    &RegistrationOptions {
                        mode: RegistrationMode::BrowserEntry,
                        out_dir: entry_dir.clone(),
                        import_extension: config.import_extension.clone(),
                        inline_components: config.inline_components.unwrap_or(false),
                    },
                );
                let entry_path = entry_dir.join(BROWSER_ENTRY_FILENAME);
                write_artifact(&entry_path, &source).await?;
                artifacts.push(entry_path.clone());

                if let Some(target) = &build_target {
                    let build_start = Instant::now();
                    run_delegated_build(config, target, &entry_path, &out_dir).await?;
                    build_time = Some(build_start.elapsed());
                }
            }
        }
    }
    let emit_time = emit_start.elapsed();

    if timings {
        eprintln!("=== ng-elements-rs timings ===");
        eprintln!(
            "analyze: {:?} ({} files, {} components)",
            analyze_time,
            project.len(),
            components.len()
        );
        eprintln!("emit: {:?} ({} artifacts)", emit_time, artifacts.len());
        if let Some(build_time) = build_time {
            eprintln!("build: {:?}", build_time);
        }
        eprintln!("total: {:?}", total_start.elapsed());
    }

    Ok(GenerateSummary {
        component_count: components.len(),
        artifacts,
        out_dir,
    })
}

/// The output kinds this run should produce, validated up front.
fn requested_outputs(config: &GeneratorConfig) -> Result<Vec<ElementOutput>, GeneratorError> {
    match &config.element_outputs {
        Some(kinds) => kinds
            .iter()
            .map(|kind| ElementOutput::parse(kind))
            .collect(),
        None => Ok(vec![ElementOutput::Standalone]),
    }
}

/// Normalizes the configured mapping or list into the shared entry shape.
/// Duplicate tags fail immediately, before any component is analyzed.
fn normalize_elements(
    elements: &ElementsConfig,
) -> Result<Vec<NormalizedElementEntry>, GeneratorError> {
    match elements {
        ElementsConfig::List(list) => {
            let mut seen = HashSet::new();
            list.iter()
                .map(|entry| {
                    if !seen.insert(entry.tag.clone()) {
                        return Err(GeneratorError::DuplicateTag(entry.tag.clone()));
                    }
                    Ok(NormalizedElementEntry {
                        tag: entry.tag.clone(),
                        component: entry.component.clone(),
                    })
                })
                .collect()
        }
        ElementsConfig::Map(map) => Ok(map
            .iter()
            .map(|(tag, component)| NormalizedElementEntry {
                tag: tag.clone(),
                component: component.clone(),
            })
            .collect()),
    }
}

/// Hands the browser entry to the configured build target, then performs
/// the optional bundle rename.
async fn run_delegated_build(
    config: &GeneratorConfig,
    target: &BuildTarget,
    entry_path: &Utf8Path,
    out_dir: &Utf8Path,
) -> Result<(), GeneratorError> {
    let runner = NgBuildRunner::locate(Utf8Path::new("."))?;
    let request = BuildRequest {
        target: target.clone(),
        entry: entry_path.to_owned(),
        output_path: out_dir.to_owned(),
        source_map: config.source_map.unwrap_or(false),
        output_hashing: config.output_hashing,
        overrides: override_args(config),
    };
    runner.run(&request).await?;

    if let Some(name) = &config.output_file_name {
        rename_main_bundle(out_dir, name).await?;
    } else {
        eprintln!(
            "Browser bundle emitted by the Angular build (main-*.js). Load with <script type=\"module\" src=\"main-*.js\">."
        );
    }
    Ok(())
}

fn override_args(config: &GeneratorConfig) -> Vec<(String, String)> {
    config
        .build_target_options
        .iter()
        .map(|(key, value)| {
            let rendered = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), rendered)
        })
        .collect()
}

async fn create_dir(path: &Utf8Path) -> Result<(), GeneratorError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| GeneratorError::WriteFailed {
            path: path.to_owned(),
            source,
        })
}

async fn write_artifact(path: &Utf8Path, contents: &str) -> Result<(), GeneratorError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| GeneratorError::WriteFailed {
            path: path.to_owned(),
            source,
        })
}
