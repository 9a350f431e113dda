//! Configuration axes a user chooses along.
//!
//! An axis is one dimension of choice (server framework, database, language)
//! with an ordered set of named choices. Templates are tagged with one value
//! per axis.

use std::fmt;

pub const SERVER: &str = "server";
pub const DATABASE: &str = "database";
pub const LANGUAGE: &str = "language";

/// Presentation hint for a choice or template. Rendering is left to the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChoiceColor {
    #[default]
    Blue,
    BrightBlue,
    Green,
    BrightGreen,
    Yellow,
    Magenta,
    Cyan,
}

/// A single named choice on an axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub name: String,
    pub color: ChoiceColor,
}

impl Choice {
    pub fn new(name: impl Into<String>, color: ChoiceColor) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An axis of configuration with its ordered choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionAxis {
    /// Key used in template requirements and selections
    pub id: String,
    /// Human readable label
    pub display: String,
    pub choices: Vec<Choice>,
}

impl OptionAxis {
    pub fn new(id: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display: display.into(),
            choices: Vec::new(),
        }
    }

    pub fn choice(mut self, name: impl Into<String>, color: ChoiceColor) -> Self {
        self.choices.push(Choice::new(name, color));
        self
    }

    /// Check whether `name` is one of the declared choices.
    pub fn has_choice(&self, name: &str) -> bool {
        self.choices.iter().any(|c| c.name == name)
    }

    pub fn choice_names(&self) -> Vec<&str> {
        self.choices.iter().map(|c| c.name.as_str()).collect()
    }
}

/// The axes every create-mvc run prompts for, in prompt order.
pub fn default_axes() -> Vec<OptionAxis> {
    vec![
        OptionAxis::new(SERVER, "Server Framework")
            .choice("Express", ChoiceColor::Blue)
            .choice("Hono", ChoiceColor::Yellow),
        OptionAxis::new(DATABASE, "Database")
            .choice("Postgres", ChoiceColor::Blue)
            .choice("MongoDB", ChoiceColor::Green)
            .choice("MySQL", ChoiceColor::Magenta)
            .choice("SQLite", ChoiceColor::Cyan),
        OptionAxis::new(LANGUAGE, "Language")
            .choice("JavaScript", ChoiceColor::Yellow)
            .choice("TypeScript", ChoiceColor::Blue),
    ]
}
