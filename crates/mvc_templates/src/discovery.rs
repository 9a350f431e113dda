//! Template discovery by scanning a templates directory.
//!
//! Each `template-<id>` directory has its requirements inferred from the
//! `-`-separated tokens of `<id>`. Directories whose tokens do not map cleanly
//! are still registered so validation flags them instead of dropping them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{IoResultExt, TemplateResult};
use crate::options::{default_axes, ChoiceColor, DATABASE, LANGUAGE, SERVER};
use crate::registry::{TemplateRegistry, TemplateSpec};

/// Directory name prefix for template source trees.
pub const TEMPLATE_DIR_PREFIX: &str = "template-";

/// Token -> (axis, value).
const TOKEN_TABLE: &[(&str, &str, &str)] = &[
    ("express", SERVER, "Express"),
    ("hono", SERVER, "Hono"),
    ("pg", DATABASE, "Postgres"),
    ("psql", DATABASE, "Postgres"),
    ("postgres", DATABASE, "Postgres"),
    ("mongo", DATABASE, "MongoDB"),
    ("mysql", DATABASE, "MySQL"),
    ("sqlite", DATABASE, "SQLite"),
    ("js", LANGUAGE, "JavaScript"),
    ("ts", LANGUAGE, "TypeScript"),
];

/// Applied for axes no token mentions. Database has no default.
const DEFAULTS: &[(&str, &str)] = &[(SERVER, "Express"), (LANGUAGE, "JavaScript")];

/// Look up a single id token.
pub fn lookup_token(token: &str) -> Option<(&'static str, &'static str)> {
    TOKEN_TABLE
        .iter()
        .find(|(t, _, _)| *t == token)
        .map(|(_, axis, value)| (*axis, *value))
}

/// Requirements inferred from a template id, plus anything that did not fit.
#[derive(Debug, Default)]
pub struct Inference {
    pub requirements: BTreeMap<String, String>,
    pub problems: Vec<String>,
}

/// Infer requirements from a template id such as `hono-pg-ts`.
pub fn infer_requirements(id: &str) -> Inference {
    let mut inference = Inference::default();

    for token in id.split('-').filter(|t| !t.is_empty()) {
        match lookup_token(token) {
            Some((axis, value)) => {
                if let Some(previous) = inference.requirements.get(axis) {
                    inference.problems.push(format!(
                        "token '{}' sets {} again (already {})",
                        token, axis, previous
                    ));
                    continue;
                }
                inference
                    .requirements
                    .insert(axis.to_string(), value.to_string());
            }
            None => inference
                .problems
                .push(format!("unrecognised token '{}'", token)),
        }
    }

    for (axis, value) in DEFAULTS {
        inference
            .requirements
            .entry(axis.to_string())
            .or_insert_with(|| value.to_string());
    }

    inference
}

fn color_for(requirements: &BTreeMap<String, String>) -> ChoiceColor {
    let axes = default_axes();
    requirements
        .get(DATABASE)
        .and_then(|db| {
            axes.iter()
                .find(|a| a.id == DATABASE)
                .and_then(|a| a.choices.iter().find(|c| &c.name == db))
                .map(|c| c.color)
        })
        .unwrap_or_default()
}

/// Scans a directory for `template-*` trees.
pub struct TemplateDiscovery {
    root: PathBuf,
}

impl TemplateDiscovery {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build a registry from the directories under the root, in lexical order.
    pub fn discover(&self) -> TemplateResult<TemplateRegistry> {
        if !self.root.exists() {
            warn!("Templates directory does not exist: {:?}", self.root);
            return Ok(TemplateRegistry::new(default_axes(), Vec::new()));
        }

        let mut templates = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(std::io::Error::from).at(&self.root)?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            let Some(id) = name.strip_prefix(TEMPLATE_DIR_PREFIX) else {
                debug!("Skipping non-template directory {:?}", entry.path());
                continue;
            };

            let inference = infer_requirements(id);
            if !inference.problems.is_empty() {
                warn!(
                    "Template directory {:?}: {}",
                    entry.path(),
                    inference.problems.join("; ")
                );
            }

            let color = color_for(&inference.requirements);
            let mut spec = TemplateSpec::new(id).color(color);
            spec.requirements = inference.requirements;
            if !inference.problems.is_empty() {
                // Keeps the template out of user-facing listings.
                spec.requirements.insert("unparsed".into(), id.to_string());
            }
            templates.push(spec);
        }

        info!("Discovered {} template(s) in {:?}", templates.len(), self.root);
        Ok(TemplateRegistry::new(default_axes(), templates))
    }
}
