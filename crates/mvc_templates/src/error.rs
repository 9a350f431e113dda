//! Error types for template resolution and scaffolding.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while resolving or scaffolding a template.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template \"{id}\" not found. Available templates: {}", available.join(", "))]
    UnknownTemplate { id: String, available: Vec<String> },

    #[error("No matching template found for the selected configuration ({selections})")]
    NoMatchingTemplate {
        selections: String,
        combinations: Vec<String>,
    },

    #[error("Selections are incomplete, missing: {}", missing.join(", "))]
    IncompleteSelections { missing: Vec<String> },

    #[error("Template directory for '{template}' not found (checked: {})", display_paths(checked))]
    TemplateDirectoryNotFound {
        template: String,
        checked: Vec<PathBuf>,
    },

    #[error("Target directory {0:?} is not empty and no overwrite disposition was given")]
    OverwriteRequired(PathBuf),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Invalid package manifest {path:?}: {message}")]
    InvalidManifest { path: PathBuf, message: String },

    #[error("Filesystem error at {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TemplateError {
    /// Wrap an I/O error with the path that caused it.
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TemplateError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Attach a path to an `io::Result`.
pub(crate) trait IoResultExt<T> {
    fn at(self, path: &std::path::Path) -> TemplateResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn at(self, path: &std::path::Path) -> TemplateResult<T> {
        self.map_err(|e| TemplateError::fs(path, e))
    }
}
