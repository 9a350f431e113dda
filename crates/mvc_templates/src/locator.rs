//! Finding a template's source tree on disk.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::discovery::TEMPLATE_DIR_PREFIX;
use crate::error::{TemplateError, TemplateResult};

/// Where to look for `template-*` directories.
#[derive(Debug, Clone, Default)]
pub struct LocatorConfig {
    /// Explicit templates root, checked first
    pub templates_dir: Option<PathBuf>,
    /// Directory of the running executable
    pub exe_dir: Option<PathBuf>,
    /// Source checkout fallback for development builds
    pub workspace_dir: Option<PathBuf>,
}

impl LocatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_templates_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.templates_dir = dir;
        self
    }

    pub fn with_exe_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.exe_dir = dir;
        self
    }

    pub fn with_workspace_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.workspace_dir = dir;
        self
    }

    /// Use the directory of the current executable.
    pub fn from_current_exe(self) -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        self.with_exe_dir(exe_dir)
    }

    /// Candidate template roots, in lookup order.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(dir) = &self.templates_dir {
            candidates.push(dir.clone());
        }
        if let Some(exe) = &self.exe_dir {
            candidates.push(exe.join("templates"));
            candidates.push(exe.join("..").join("templates"));
            candidates.push(exe.join("..").join("share").join("create-mvc").join("templates"));
        }
        if let Some(ws) = &self.workspace_dir {
            candidates.push(ws.join("templates"));
        }
        candidates
    }
}

/// Resolves template ids to source directories.
#[derive(Debug, Clone)]
pub struct TemplateLocator {
    candidates: Vec<PathBuf>,
}

impl TemplateLocator {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    pub fn from_config(config: &LocatorConfig) -> Self {
        Self::new(config.candidates())
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First candidate root that exists, used for discovery.
    pub fn templates_root(&self) -> Option<&Path> {
        self.candidates
            .iter()
            .find(|c| c.is_dir())
            .map(PathBuf::as_path)
    }

    /// First existing `<candidate>/template-<id>`.
    pub fn locate(&self, template_id: &str) -> TemplateResult<PathBuf> {
        let dir_name = format!("{}{}", TEMPLATE_DIR_PREFIX, template_id);
        let mut checked = Vec::with_capacity(self.candidates.len());

        for root in &self.candidates {
            let path = root.join(&dir_name);
            if path.is_dir() {
                debug!("Template '{}' found at {:?}", template_id, path);
                return Ok(path);
            }
            checked.push(path);
        }

        Err(TemplateError::TemplateDirectoryNotFound {
            template: template_id.to_string(),
            checked,
        })
    }
}
