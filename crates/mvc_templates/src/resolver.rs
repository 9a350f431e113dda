//! Selection resolver: maps a template id or a set of axis choices to a template.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, warn};

use crate::error::{TemplateError, TemplateResult};
use crate::options::OptionAxis;
use crate::registry::{TemplateRegistry, TemplateSpec};

/// A user's chosen value per axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections(BTreeMap<String, String>);

impl Selections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, axis: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(axis, value);
        self
    }

    pub fn set(&mut self, axis: impl Into<String>, value: impl Into<String>) {
        self.0.insert(axis.into(), value.into());
    }

    pub fn get(&self, axis: &str) -> Option<&str> {
        self.0.get(axis).map(String::as_str)
    }

    /// Axes with no chosen value.
    pub fn missing(&self, axes: &[OptionAxis]) -> Vec<String> {
        axes.iter()
            .filter(|a| !self.0.contains_key(&a.id))
            .map(|a| a.id.clone())
            .collect()
    }
}

impl fmt::Display for Selections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        f.write_str(&parts.join(", "))
    }
}

/// What the caller wants resolved.
#[derive(Debug, Clone)]
pub enum TemplateRequest {
    /// A template id given outright (e.g. `--template pg-ts`)
    Id(String),
    /// One value per axis, usually collected interactively
    Selections(Selections),
}

/// Resolves requests against a registry.
pub struct TemplateResolver<'a> {
    registry: &'a TemplateRegistry,
}

impl<'a> TemplateResolver<'a> {
    pub fn new(registry: &'a TemplateRegistry) -> Self {
        Self { registry }
    }

    pub fn resolve(&self, request: &TemplateRequest) -> TemplateResult<&'a TemplateSpec> {
        match request {
            TemplateRequest::Id(id) => self.resolve_id(id),
            TemplateRequest::Selections(selections) => self.resolve_selections(selections),
        }
    }

    /// Exact match by id. Templates that failed validation still resolve here.
    pub fn resolve_id(&self, id: &str) -> TemplateResult<&'a TemplateSpec> {
        let template = self
            .registry
            .get(id)
            .ok_or_else(|| TemplateError::UnknownTemplate {
                id: id.to_string(),
                available: self.registry.ids(),
            })?;

        if !self.registry.is_valid(id) {
            warn!("Template '{}' failed validation but was requested by id", id);
        }
        Ok(template)
    }

    /// First valid template, in registry order, whose requirements equal the selections.
    pub fn resolve_selections(&self, selections: &Selections) -> TemplateResult<&'a TemplateSpec> {
        let axes = self.registry.axes();
        let missing = selections.missing(axes);
        if !missing.is_empty() {
            return Err(TemplateError::IncompleteSelections { missing });
        }

        let found = self.registry.list().into_iter().find(|t| {
            axes.iter()
                .all(|a| t.requirement(&a.id) == selections.get(&a.id))
        });

        match found {
            Some(template) => {
                debug!("Selections {} resolved to '{}'", selections, template.id);
                Ok(template)
            }
            None => Err(TemplateError::NoMatchingTemplate {
                selections: selections.to_string(),
                combinations: self.registry.combinations(),
            }),
        }
    }
}
