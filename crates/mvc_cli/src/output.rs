//! Colored terminal output.

use console::Style;
use mvc_templates::{ChoiceColor, TemplateRegistry};

pub fn style(color: ChoiceColor) -> Style {
    match color {
        ChoiceColor::Blue => Style::new().blue(),
        ChoiceColor::BrightBlue => Style::new().blue().bright(),
        ChoiceColor::Green => Style::new().green(),
        ChoiceColor::BrightGreen => Style::new().green().bright(),
        ChoiceColor::Yellow => Style::new().yellow(),
        ChoiceColor::Magenta => Style::new().magenta(),
        ChoiceColor::Cyan => Style::new().cyan(),
    }
}

/// One colored line per valid template.
pub fn template_list(registry: &TemplateRegistry, indent: &str) -> String {
    registry
        .list()
        .iter()
        .map(|t| format!("{}{}", indent, style(t.color).apply_to(format!("{:<20}", t.id))))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn help_footer(registry: &TemplateRegistry) -> String {
    format!("Available templates:\n{}", template_list(registry, "  "))
}

pub fn success(msg: impl std::fmt::Display) -> String {
    format!("{} {}", Style::new().green().apply_to("✔"), msg)
}

pub fn failure(msg: impl std::fmt::Display) -> String {
    format!("{} {}", Style::new().red().apply_to("✖"), msg)
}
