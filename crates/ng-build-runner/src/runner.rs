//! ng process runner.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use thiserror::Error;
use tokio::process::Command;

/// Error types for the build runner.
#[derive(Debug, Error)]
pub enum BuildError {
    /// No Angular CLI binary available.
    #[error("ng binary not found on PATH; install @angular/cli or configure an explicit binary")]
    BinaryNotFound,

    /// Failed to spawn the build process.
    #[error("failed to spawn ng: {0}")]
    SpawnFailed(#[from] std::io::Error),

    /// The build process exited with a failure status.
    #[error("ng run {target} exited with code {code}")]
    BuildFailed { target: String, code: i32 },

    /// A build target specifier could not be parsed.
    #[error("invalid build target {value:?}; expected \"project:target\" or \"project:target:configuration\"")]
    InvalidTarget { value: String },

    /// Renaming the produced bundle failed.
    #[error("failed to rename bundle in {out_dir}: {message}")]
    RenameFailed {
        out_dir: Utf8PathBuf,
        message: String,
    },
}

/// An Angular workspace build target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    pub project: String,
    pub target: String,
    pub configuration: Option<String>,
}

impl BuildTarget {
    /// Parses `"project:target"` or `"project:target:configuration"`.
    /// Configuration segments may themselves contain colons.
    pub fn parse(value: &str) -> Result<Self, BuildError> {
        let parts: Vec<&str> = value.split(':').collect();
        if parts.len() < 2 || parts[0].is_empty() || parts[1].is_empty() {
            return Err(BuildError::InvalidTarget {
                value: value.to_string(),
            });
        }
        Ok(Self {
            project: parts[0].to_string(),
            target: parts[1].to_string(),
            configuration: if parts.len() > 2 {
                Some(parts[2..].join(":"))
            } else {
                None
            },
        })
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.project, self.target)?;
        if let Some(configuration) = &self.configuration {
            write!(f, ":{}", configuration)?;
        }
        Ok(())
    }
}

/// Output filename hashing modes understood by the Angular build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputHashing {
    None,
    All,
    Media,
    Bundles,
}

impl OutputHashing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::All => "all",
            Self::Media => "media",
            Self::Bundles => "bundles",
        }
    }
}

/// One delegated build: which target to run and how to override it so the
/// bundle is produced from the generated entry file.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub target: BuildTarget,
    /// The generated browser entry file.
    pub entry: Utf8PathBuf,
    /// Where the bundle should land.
    pub output_path: Utf8PathBuf,
    pub source_map: bool,
    pub output_hashing: Option<OutputHashing>,
    /// Caller-supplied `--key=value` overrides, applied last.
    pub overrides: Vec<(String, String)>,
}

/// Runs Angular CLI builds as an external process. The exit status is the
/// delegation's verdict; output streams pass through to the user.
#[derive(Debug, Clone)]
pub struct NgBuildRunner {
    binary: Utf8PathBuf,
    workspace_root: Utf8PathBuf,
}

impl NgBuildRunner {
    /// Locates the `ng` binary on PATH.
    pub fn locate(workspace_root: &Utf8Path) -> Result<Self, BuildError> {
        let binary = which::which("ng").map_err(|_| BuildError::BinaryNotFound)?;
        let binary = Utf8PathBuf::try_from(binary).map_err(|_| BuildError::BinaryNotFound)?;
        Ok(Self::with_binary(binary, workspace_root))
    }

    /// Uses an explicit binary path instead of a PATH lookup.
    pub fn with_binary(binary: Utf8PathBuf, workspace_root: &Utf8Path) -> Self {
        Self {
            binary,
            workspace_root: workspace_root.to_owned(),
        }
    }

    pub fn binary(&self) -> &Utf8Path {
        &self.binary
    }

    /// Runs the delegated build and propagates its verdict verbatim.
    pub async fn run(&self, request: &BuildRequest) -> Result<(), BuildError> {
        let mut command = Command::new(self.binary.as_std_path());
        command.current_dir(self.workspace_root.as_std_path());
        command.arg("run").arg(request.target.to_string());
        command.arg(format!("--browser={}", request.entry));
        command.arg(format!("--output-path={}", request.output_path));
        command.arg(format!("--source-map={}", request.source_map));
        if let Some(hashing) = request.output_hashing {
            command.arg(format!("--output-hashing={}", hashing.as_str()));
        }
        // Other artifacts may already have been written next to the bundle.
        command.arg("--delete-output-path=false");
        for (key, value) in &request.overrides {
            command.arg(format!("--{}={}", key, value));
        }

        let status = command.status().await?;
        if !status.success() {
            return Err(BuildError::BuildFailed {
                target: request.target.to_string(),
                code: status.code().unwrap_or(-1),
            });
        }
        Ok(())
    }
}

/// Renames the main browser bundle (`main.js` or `main-*.js`) to the given
/// filename, along with its `.map` companion when present. A missing main
/// bundle is warned about, not an error. Returns the renamed bundle path.
pub async fn rename_main_bundle(
    out_dir: &Utf8Path,
    output_file_name: &str,
) -> Result<Option<Utf8PathBuf>, BuildError> {
    let rename_failed = |e: std::io::Error| BuildError::RenameFailed {
        out_dir: out_dir.to_owned(),
        message: e.to_string(),
    };

    let normalized = if output_file_name.to_lowercase().ends_with(".js") {
        output_file_name.to_string()
    } else {
        format!("{}.js", output_file_name)
    };

    let mut entries = tokio::fs::read_dir(out_dir).await.map_err(rename_failed)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(rename_failed)? {
        if let Ok(name) = entry.file_name().into_string() {
            files.push(name);
        }
    }

    let Some(main_js) = files
        .iter()
        .find(|name| name.starts_with("main") && name.ends_with(".js"))
    else {
        eprintln!(
            "Warning: no main bundle (main.js or main-*.js) found in {}; skipping rename.",
            out_dir
        );
        return Ok(None);
    };

    let destination = out_dir.join(&normalized);
    tokio::fs::rename(out_dir.join(main_js), &destination)
        .await
        .map_err(rename_failed)?;

    let map_name = format!("{}.map", main_js);
    if files.contains(&map_name) {
        tokio::fs::rename(
            out_dir.join(&map_name),
            out_dir.join(format!("{}.map", normalized)),
        )
        .await
        .map_err(rename_failed)?;
    }

    Ok(Some(destination))
}
