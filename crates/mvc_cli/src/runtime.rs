//! Node.js runtime check.
//!
//! Generated projects need Node. An old Node is an error; a missing one is
//! only a warning since scaffolding itself does not run it.

use std::process::Command;

use anyhow::Result;
use semver::Version;
use tracing::{debug, warn};

use crate::error::CliError;

pub const MIN_NODE_VERSION: &str = "14.0.0";

#[derive(Debug, PartialEq, Eq)]
pub enum NodeStatus {
    Supported(Version),
    TooOld(Version),
    Missing,
}

/// Parse `node --version` output such as `v20.11.1`.
pub fn parse_node_version(output: &str) -> Option<Version> {
    let trimmed = output.trim();
    Version::parse(trimmed.strip_prefix('v').unwrap_or(trimmed)).ok()
}

pub fn classify(version: Option<Version>, minimum: &Version) -> NodeStatus {
    match version {
        Some(v) if &v >= minimum => NodeStatus::Supported(v),
        Some(v) => NodeStatus::TooOld(v),
        None => NodeStatus::Missing,
    }
}

pub fn check_node() -> NodeStatus {
    let minimum = Version::new(14, 0, 0);
    let version = Command::new("node")
        .arg("--version")
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| parse_node_version(&String::from_utf8_lossy(&out.stdout)));
    classify(version, &minimum)
}

/// Fail when the installed Node is older than [`MIN_NODE_VERSION`].
pub fn ensure_node() -> Result<()> {
    match check_node() {
        NodeStatus::Supported(version) => {
            debug!("Node.js {} detected", version);
            Ok(())
        }
        NodeStatus::TooOld(version) => Err(CliError::RuntimeTooOld {
            found: version.to_string(),
            required: MIN_NODE_VERSION.to_string(),
        }
        .into()),
        NodeStatus::Missing => {
            warn!("Node.js not found; the generated project needs Node.js {}+", MIN_NODE_VERSION);
            Ok(())
        }
    }
}
