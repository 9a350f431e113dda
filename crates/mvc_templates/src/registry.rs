//! Template definitions and the registry that holds them.
//!
//! The compiled registry ([`TemplateRegistry::builtin`]) is the source of truth.
//! Directory scanning (see [`crate::discovery`]) builds a registry through the
//! same constructor so both paths share one validation pass.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::options::{default_axes, ChoiceColor, OptionAxis, DATABASE, LANGUAGE, SERVER};

/// A template id plus the axis values it implements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpec {
    /// Unique template identifier, also the `template-<id>` directory suffix
    pub id: String,
    /// Axis id -> required choice name
    pub requirements: BTreeMap<String, String>,
    pub color: ChoiceColor,
}

impl TemplateSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            requirements: BTreeMap::new(),
            color: ChoiceColor::default(),
        }
    }

    pub fn require(mut self, axis: impl Into<String>, value: impl Into<String>) -> Self {
        self.requirements.insert(axis.into(), value.into());
        self
    }

    pub fn color(mut self, color: ChoiceColor) -> Self {
        self.color = color;
        self
    }

    /// Required value for an axis, if any.
    pub fn requirement(&self, axis: &str) -> Option<&str> {
        self.requirements.get(axis).map(String::as_str)
    }
}

/// Outcome of validating one template against the declared axes.
#[derive(Debug)]
pub struct ValidationResult {
    pub template_id: String,
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn new(template_id: &str) -> Self {
        Self {
            template_id: template_id.to_string(),
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
        self.valid = false;
    }
}

/// Check that `template` names exactly one declared choice for every axis.
pub fn validate_template(axes: &[OptionAxis], template: &TemplateSpec) -> ValidationResult {
    let mut result = ValidationResult::new(&template.id);

    if template.id.trim().is_empty() {
        result.add_error("Template ID is required");
    }

    for axis in axes {
        match template.requirement(&axis.id) {
            None => result.add_error(format!("Missing requirements for {}", axis.id)),
            Some(value) if value.is_empty() => {
                result.add_error(format!("Empty requirement for {}", axis.id))
            }
            Some(value) if !axis.has_choice(value) => result.add_error(format!(
                "'{}' is not a valid {} (expected one of: {})",
                value,
                axis.id,
                axis.choice_names().join(", ")
            )),
            Some(_) => {}
        }
    }

    for key in template.requirements.keys() {
        if !axes.iter().any(|a| &a.id == key) {
            result.add_error(format!("Requirement for undeclared axis '{}'", key));
        }
    }

    result
}

/// Ordered registry of axes and templates.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    axes: Vec<OptionAxis>,
    templates: Vec<TemplateSpec>,
    invalid: Vec<String>,
}

impl TemplateRegistry {
    /// Build a registry, validating every template. Invalid templates are
    /// logged and kept, but left out of [`list`](Self::list).
    pub fn new(axes: Vec<OptionAxis>, templates: Vec<TemplateSpec>) -> Self {
        let mut invalid = Vec::new();
        for template in &templates {
            let result = validate_template(&axes, template);
            if result.valid {
                debug!("Registered template: {}", template.id);
            } else {
                warn!(
                    "Template {} has validation errors: {}",
                    result.template_id,
                    result.errors.join("; ")
                );
                invalid.push(template.id.clone());
            }
        }

        Self {
            axes,
            templates,
            invalid,
        }
    }

    /// The compiled template table.
    pub fn builtin() -> Self {
        let entry = |id: &str, server: &str, database: &str, language: &str, color| {
            TemplateSpec::new(id)
                .require(SERVER, server)
                .require(DATABASE, database)
                .require(LANGUAGE, language)
                .color(color)
        };

        Self::new(
            default_axes(),
            vec![
                entry("pg-ts", "Express", "Postgres", "TypeScript", ChoiceColor::Blue),
                entry("pg", "Express", "Postgres", "JavaScript", ChoiceColor::BrightBlue),
                entry("mongo-ts", "Express", "MongoDB", "TypeScript", ChoiceColor::Green),
                entry("mongo", "Express", "MongoDB", "JavaScript", ChoiceColor::BrightGreen),
                entry("mysql-ts", "Express", "MySQL", "TypeScript", ChoiceColor::Magenta),
                entry("mysql", "Express", "MySQL", "JavaScript", ChoiceColor::Magenta),
                entry("sqlite-ts", "Express", "SQLite", "TypeScript", ChoiceColor::Cyan),
                entry("sqlite", "Express", "SQLite", "JavaScript", ChoiceColor::Cyan),
                entry("hono-pg-ts", "Hono", "Postgres", "TypeScript", ChoiceColor::Yellow),
                entry("hono-pg", "Hono", "Postgres", "JavaScript", ChoiceColor::Yellow),
            ],
        )
    }

    pub fn axes(&self) -> &[OptionAxis] {
        &self.axes
    }

    pub fn axis(&self, id: &str) -> Option<&OptionAxis> {
        self.axes.iter().find(|a| a.id == id)
    }

    /// Get a template by ID, valid or not.
    pub fn get(&self, id: &str) -> Option<&TemplateSpec> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn is_valid(&self, id: &str) -> bool {
        self.exists(id) && !self.invalid.iter().any(|i| i == id)
    }

    /// Valid templates in registry order. This is what users get to see.
    pub fn list(&self) -> Vec<&TemplateSpec> {
        self.templates
            .iter()
            .filter(|t| !self.invalid.contains(&t.id))
            .collect()
    }

    /// Every registered template, including invalid ones.
    pub fn list_all(&self) -> &[TemplateSpec] {
        &self.templates
    }

    /// Ids of templates that failed validation.
    pub fn invalid(&self) -> &[String] {
        &self.invalid
    }

    /// Ids of valid templates, in order.
    pub fn ids(&self) -> Vec<String> {
        self.list().iter().map(|t| t.id.clone()).collect()
    }

    /// One printable row per valid template: id followed by its values in axis order.
    pub fn combinations(&self) -> Vec<String> {
        let width = self.list().iter().map(|t| t.id.len()).max().unwrap_or(0);
        self.list()
            .iter()
            .map(|t| {
                let values: Vec<&str> = self
                    .axes
                    .iter()
                    .map(|a| t.requirement(&a.id).unwrap_or("?"))
                    .collect();
                format!("{:<width$}  {}", t.id, values.join(" + "), width = width)
            })
            .collect()
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
