//! Package manager inference from the npm user-agent variable.

use std::env;

/// Environment variable set by npm, yarn, pnpm and bun when running a create script.
pub const USER_AGENT_VAR: &str = "npm_config_user_agent";

/// Package manager name and version parsed from a user agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManagerInfo {
    pub name: String,
    pub version: Option<String>,
}

impl PackageManagerInfo {
    /// Parse `"pnpm/8.6.0 npm/? node/v20.1.0 linux x64"`.
    pub fn from_user_agent(user_agent: &str) -> Option<Self> {
        let spec = user_agent.split(' ').next().filter(|s| !s.is_empty())?;
        let mut parts = spec.split('/');
        let name = parts.next().filter(|s| !s.is_empty())?;
        Some(Self {
            name: name.to_string(),
            version: parts.next().map(String::from),
        })
    }

    /// Read the user agent from the environment, defaulting to npm.
    pub fn detect() -> Self {
        env::var(USER_AGENT_VAR)
            .ok()
            .and_then(|ua| Self::from_user_agent(&ua))
            .unwrap_or_else(|| Self {
                name: "npm".to_string(),
                version: None,
            })
    }

    /// Command to suggest for installing dependencies.
    pub fn install_command(&self) -> String {
        match self.name.as_str() {
            "yarn" => "yarn".to_string(),
            other => format!("{} install", other),
        }
    }
}
