//! Materializing a template into a target directory.
//!
//! The scaffolder:
//! - Refuses to touch an occupied target without an overwrite disposition
//! - Copies the template tree depth-first, renaming `_gitignore` style files
//! - Writes the patched `package.json` last

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{IoResultExt, TemplateError, TemplateResult};
use crate::locator::TemplateLocator;
use crate::naming::{project_name, to_valid_package_name};

/// Version-control metadata directory left alone by emptiness checks and wipes.
pub const VCS_DIR: &str = ".git";

/// Package manifest file patched after the copy.
pub const MANIFEST_FILE: &str = "package.json";

/// Source name -> destination name. Applied to every path component.
pub const RENAME_FILES: &[(&str, &str)] = &[("_gitignore", ".gitignore")];

/// Destination name for a template entry. Names not in the table pass through untouched.
pub fn rename_file(name: &OsStr) -> &OsStr {
    RENAME_FILES
        .iter()
        .find(|(from, _)| OsStr::new(from) == name)
        .map(|(_, to)| OsStr::new(*to))
        .unwrap_or(name)
}

/// State of the target directory before scaffolding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    Missing,
    /// Exists with no entries, or only `.git`
    Empty,
    Occupied,
}

impl TargetState {
    pub fn needs_disposition(self) -> bool {
        self == TargetState::Occupied
    }
}

/// What to do with an occupied target directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    Cancel,
    /// Remove everything except `.git`, then continue
    Wipe,
    /// Copy over the existing files
    Ignore,
}

/// Inspect the target directory.
pub fn inspect_target(path: &Path) -> TemplateResult<TargetState> {
    if !path.exists() {
        return Ok(TargetState::Missing);
    }

    let mut entries = fs::read_dir(path).at(path)?;
    let empty = match entries.next() {
        None => true,
        Some(first) => {
            let first = first.at(path)?;
            first.file_name() == VCS_DIR && entries.next().is_none()
        }
    };

    Ok(if empty {
        TargetState::Empty
    } else {
        TargetState::Occupied
    })
}

/// Remove every entry of `dir` except `.git`. Missing directories are ignored.
pub fn empty_dir(dir: &Path) -> TemplateResult<()> {
    if !dir.exists() {
        return Ok(());
    }

    for entry in fs::read_dir(dir).at(dir)? {
        let entry = entry.at(dir)?;
        if entry.file_name() == VCS_DIR {
            continue;
        }
        let path = entry.path();
        let file_type = entry.file_type().at(&path)?;
        if file_type.is_dir() {
            fs::remove_dir_all(&path).at(&path)?;
        } else {
            fs::remove_file(&path).at(&path)?;
        }
    }
    Ok(())
}

/// Input to [`Scaffolder::scaffold`].
#[derive(Debug, Clone)]
pub struct ScaffoldRequest {
    pub template_id: String,
    pub target_dir: PathBuf,
    /// Explicit package name; derived from the target directory when absent
    pub package_name: Option<String>,
    /// Required when the target is occupied
    pub overwrite: Option<Overwrite>,
}

impl ScaffoldRequest {
    pub fn new(template_id: impl Into<String>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_id: template_id.into(),
            target_dir: target_dir.into(),
            package_name: None,
            overwrite: None,
        }
    }

    pub fn package_name(mut self, name: Option<String>) -> Self {
        self.package_name = name;
        self
    }

    pub fn overwrite(mut self, overwrite: Option<Overwrite>) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Package name written to the manifest.
    pub fn effective_package_name(&self) -> String {
        match &self.package_name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => to_valid_package_name(&project_name(&self.target_dir)),
        }
    }
}

/// Result of a successful scaffold.
#[derive(Debug)]
pub struct ScaffoldReport {
    pub template_id: String,
    pub root: PathBuf,
    pub package_name: String,
    /// Files written, manifest last
    pub created_files: Vec<PathBuf>,
}

/// Copies template trees into target directories.
pub struct Scaffolder {
    locator: TemplateLocator,
}

impl Scaffolder {
    pub fn new(locator: TemplateLocator) -> Self {
        Self { locator }
    }

    pub fn locator(&self) -> &TemplateLocator {
        &self.locator
    }

    pub fn scaffold(&self, request: &ScaffoldRequest) -> TemplateResult<ScaffoldReport> {
        let template_dir = self.locator.locate(&request.template_id)?;
        let root = request.target_dir.clone();

        let state = inspect_target(&root)?;
        if state.needs_disposition() {
            match request.overwrite {
                None => return Err(TemplateError::OverwriteRequired(root)),
                Some(Overwrite::Cancel) => return Err(TemplateError::Cancelled),
                Some(Overwrite::Wipe) => {
                    info!("Removing existing files in {:?}", root);
                    empty_dir(&root)?;
                }
                Some(Overwrite::Ignore) => {
                    debug!("Writing over existing files in {:?}", root);
                }
            }
        } else {
            fs::create_dir_all(&root).at(&root)?;
        }

        info!(
            "Scaffolding template '{}' from {:?} into {:?}",
            request.template_id, template_dir, root
        );

        let mut created_files = copy_template(&template_dir, &root)?;

        let package_name = request.effective_package_name();
        let manifest = write_manifest(&template_dir, &root, &package_name)?;
        created_files.push(manifest);

        info!("Created {} files", created_files.len());
        Ok(ScaffoldReport {
            template_id: request.template_id.clone(),
            root,
            package_name,
            created_files,
        })
    }
}

/// Map a template-relative path to its destination-relative path.
fn destination_relative(relative: &Path) -> PathBuf {
    relative
        .components()
        .map(|c| rename_file(c.as_os_str()))
        .collect()
}

/// Depth-first copy of everything except the top-level manifest.
fn copy_template(template_dir: &Path, root: &Path) -> TemplateResult<Vec<PathBuf>> {
    let mut created = Vec::new();

    for entry in WalkDir::new(template_dir).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| template_dir.to_path_buf());
                return Err(TemplateError::fs(path, err.into()));
            }
        };

        let source = entry.path();
        let Ok(relative) = source.strip_prefix(template_dir) else {
            continue;
        };
        if entry.depth() == 1 && relative == Path::new(MANIFEST_FILE) {
            continue;
        }

        let target = root.join(destination_relative(relative));
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).at(&target)?;
        } else if file_type.is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).at(parent)?;
            }
            fs::copy(source, &target).at(&target)?;
            debug!("Created {:?}", target);
            created.push(target);
        } else {
            debug!("Skipping non-regular entry {:?}", source);
        }
    }

    Ok(created)
}

/// Read the template manifest, set `name`, and write it to the target.
fn write_manifest(template_dir: &Path, root: &Path, package_name: &str) -> TemplateResult<PathBuf> {
    let source = template_dir.join(MANIFEST_FILE);
    let content = fs::read_to_string(&source).at(&source)?;
    let patched = patch_manifest(&content, package_name).map_err(|message| {
        TemplateError::InvalidManifest {
            path: source.clone(),
            message,
        }
    })?;

    let target = root.join(MANIFEST_FILE);
    fs::write(&target, patched).at(&target)?;
    debug!("Created {:?}", target);
    Ok(target)
}

/// Overwrite the `name` field, keeping every other field and its order.
/// Output uses 2-space indentation and ends with a newline.
pub fn patch_manifest(content: &str, package_name: &str) -> Result<String, String> {
    let mut pkg: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    let object = pkg
        .as_object_mut()
        .ok_or_else(|| "manifest is not a JSON object".to_string())?;
    object.insert("name".to_string(), Value::String(package_name.to_string()));

    let mut rendered = serde_json::to_string_pretty(&pkg).map_err(|e| e.to_string())?;
    rendered.push('\n');
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_rename_file() {
        assert_eq!(rename_file(OsStr::new("_gitignore")), ".gitignore");
        assert_eq!(rename_file(OsStr::new("gitignore")), "gitignore");
        assert_eq!(rename_file(OsStr::new("_env")), "_env");
    }

    #[test]
    fn test_destination_relative_renames_nested() {
        let dest = destination_relative(Path::new("db/_gitignore"));
        assert_eq!(dest, PathBuf::from("db/.gitignore"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_are_copied_verbatim() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"caf\xe9.txt");
        assert_eq!(destination_relative(Path::new(raw)), PathBuf::from(raw));

        let templates = tempdir().unwrap();
        let source = templates.path().join("template-pg");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join(raw), "bytes").unwrap();
        fs::write(source.join("_gitignore"), "node_modules\n").unwrap();
        fs::write(source.join(MANIFEST_FILE), r#"{"name":"template-pg"}"#).unwrap();

        let out = tempdir().unwrap();
        let target = out.path().join("app");
        Scaffolder::new(TemplateLocator::new(vec![templates.path().to_path_buf()]))
            .scaffold(&ScaffoldRequest::new("pg", &target))
            .unwrap();

        assert_eq!(fs::read(target.join(raw)).unwrap(), b"bytes");
        assert!(target.join(".gitignore").exists());
        assert_eq!(fs::read_dir(&target).unwrap().count(), 3);
    }

    #[test]
    fn test_inspect_target() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("app");
        assert_eq!(inspect_target(&dir).unwrap(), TargetState::Missing);

        fs::create_dir(&dir).unwrap();
        assert_eq!(inspect_target(&dir).unwrap(), TargetState::Empty);

        fs::create_dir(dir.join(".git")).unwrap();
        assert_eq!(inspect_target(&dir).unwrap(), TargetState::Empty);

        fs::write(dir.join("README.md"), "hi").unwrap();
        assert_eq!(inspect_target(&dir).unwrap(), TargetState::Occupied);
    }

    #[test]
    fn test_empty_dir_keeps_git() {
        let temp = tempdir().unwrap();
        let dir = temp.path();
        fs::create_dir_all(dir.join(".git/objects")).unwrap();
        fs::create_dir_all(dir.join("src/nested")).unwrap();
        fs::write(dir.join("src/nested/a.js"), "x").unwrap();
        fs::write(dir.join("notes.txt"), "x").unwrap();

        empty_dir(dir).unwrap();

        let remaining: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(remaining, vec![std::ffi::OsString::from(".git")]);
        assert!(dir.join(".git/objects").exists());
    }

    #[test]
    fn test_patch_manifest_preserves_fields() {
        let content = r#"{"name":"template","version":"1.0.0","scripts":{"start":"node app.js"}}"#;
        let patched = patch_manifest(content, "my-app").unwrap();

        assert!(patched.ends_with("}\n"));
        assert!(patched.contains("\n  \"version\": \"1.0.0\""));
        assert!(patched.find("\"name\"").unwrap() < patched.find("\"version\"").unwrap());

        let value: Value = serde_json::from_str(&patched).unwrap();
        assert_eq!(value["name"], "my-app");
        assert_eq!(value["scripts"]["start"], "node app.js");
    }

    #[test]
    fn test_patch_manifest_rejects_non_object() {
        assert!(patch_manifest("[1, 2]", "x").is_err());
        assert!(patch_manifest("not json", "x").is_err());
    }

    #[test]
    fn test_effective_package_name() {
        let request = ScaffoldRequest::new("pg", "/tmp/My Project");
        assert_eq!(request.effective_package_name(), "my-project");

        let request = request.package_name(Some("custom".into()));
        assert_eq!(request.effective_package_name(), "custom");
    }
}
