//! Generator configuration loading.

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use ng_build_runner::OutputHashing;
use serde::Deserialize;

use crate::orchestrator::GeneratorError;

/// The tag → component mapping, in either accepted shape: an ordered map
/// `{ "tag": "path#Class" }` or an explicit list of `{ tag, component }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ElementsConfig {
    List(Vec<ElementEntry>),
    Map(IndexMap<String, String>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElementEntry {
    pub tag: String,
    pub component: String,
}

/// The aggregate generator input. Constructed from a JSON config file or
/// from CLI arguments; consumed once per run and never mutated after
/// validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    /// Components to generate for; discovered from the project when absent.
    pub elements: Option<ElementsConfig>,

    /// Type-resolution context; without it the analyzer starts from an
    /// empty, explicitly-populated file set.
    pub tsconfig: Option<Utf8PathBuf>,

    /// Output directory for generated artifacts (default `dist`).
    pub out_dir: Option<Utf8PathBuf>,

    /// Requested output kinds: `manifest`, `standalone`, `browser`
    /// (default `standalone`).
    pub element_outputs: Option<Vec<String>>,

    /// Downstream build target (`project:target[:configuration]`); required
    /// for the `browser` output kind.
    pub build_target: Option<String>,

    /// Source maps for the delegated build (default false).
    pub source_map: Option<bool>,

    /// Output filename hashing for the delegated build (inherited from the
    /// target config when not set).
    pub output_hashing: Option<OutputHashing>,

    /// Rename the main bundle to this filename after a successful build.
    pub output_file_name: Option<String>,

    /// Extension appended to emitted import specifiers (e.g. `"js"`).
    pub import_extension: Option<String>,

    /// Static imports in the registration source so the bundler emits a
    /// single file (default false: lazy dynamic imports).
    pub inline_components: Option<bool>,

    /// Directory the browser entry is written to (default the out dir);
    /// point this at the project source root so the build picks it up.
    pub browser_entry_dir: Option<Utf8PathBuf>,

    /// Opaque overrides handed to the delegated build, applied last.
    pub build_target_options: IndexMap<String, serde_json::Value>,

    /// Whether discovery may fall back to `@Component({ selector })` when
    /// the registration marker carries no tag (default true).
    pub selector_fallback: Option<bool>,
}

impl GeneratorConfig {
    /// Loads a JSON config file.
    pub fn load(path: &Utf8Path) -> Result<Self, GeneratorError> {
        let text = std::fs::read_to_string(path).map_err(|e| GeneratorError::ConfigUnparsable {
            path: path.to_owned(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| GeneratorError::ConfigUnparsable {
            path: path.to_owned(),
            message: e.to_string(),
        })
    }
}
