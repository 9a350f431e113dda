//! Project and package name helpers.

use std::path::{Component, Path};
use std::sync::OnceLock;

use regex::Regex;

/// Fallback target directory when none is given.
pub const DEFAULT_TARGET_DIR: &str = "mvc-server";

fn package_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:@[a-z\d\-*~][a-z\d\-*._~]*/)?[a-z\d\-~][a-z\d\-._~]*$")
            .expect("package name pattern is valid")
    })
}

/// Trim whitespace and trailing slashes. Returns `None` for an empty result.
pub fn format_target_dir(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Whether `name` is usable as a package.json `name`.
pub fn is_valid_package_name(name: &str) -> bool {
    package_name_pattern().is_match(name)
}

/// Derive a valid package name: lowercase, whitespace and disallowed
/// characters become hyphens, one leading `.` or `_` is dropped.
pub fn to_valid_package_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut collapsed = String::with_capacity(lowered.len());
    let mut in_space = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_space {
                collapsed.push('-');
            }
            in_space = true;
        } else {
            collapsed.push(c);
            in_space = false;
        }
    }

    let stripped = collapsed
        .strip_prefix(['.', '_'])
        .unwrap_or(&collapsed);

    let mut result = String::with_capacity(stripped.len());
    let mut in_bad = false;
    for c in stripped.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '~' {
            result.push(c);
            in_bad = false;
        } else {
            if !in_bad {
                result.push('-');
            }
            in_bad = true;
        }
    }
    result
}

/// Base name of the target directory once resolved against the working directory.
/// `.` and `..` are resolved lexically, without touching the filesystem.
pub fn project_name(target: &Path) -> String {
    let resolved = if target.is_absolute() {
        target.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(target))
            .unwrap_or_else(|_| target.to_path_buf())
    };

    let mut names: Vec<&std::ffi::OsStr> = Vec::new();
    for component in resolved.components() {
        match component {
            Component::Normal(name) => names.push(name),
            Component::ParentDir => {
                names.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    names
        .last()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_TARGET_DIR.to_string())
}
