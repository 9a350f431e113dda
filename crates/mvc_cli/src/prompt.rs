//! Interactive prompting front end.
//!
//! The create flow only talks to [`Prompter`]; `inquire` is one implementation.
//! A `None` answer means the user pressed Esc or Ctrl-C.

use anyhow::Result;
use inquire::error::{CustomUserError, InquireError};
use inquire::validator::Validation;
use inquire::{Select, Text};

/// Validation hook for text input. `Err` carries the message shown to the user.
pub type InputValidator = fn(&str) -> Result<(), String>;

#[cfg_attr(test, mockall::automock)]
pub trait Prompter {
    /// Pick one of `items`; returns its index.
    fn select(&self, message: &str, items: &[String], default: usize) -> Result<Option<usize>>;

    /// Free text with a default value.
    fn input(
        &self,
        message: &str,
        default: &str,
        validator: Option<InputValidator>,
    ) -> Result<Option<String>>;
}

/// Terminal prompts backed by `inquire`.
#[derive(Debug, Default)]
pub struct InquirePrompter;

fn cancelled_as_none<T>(result: Result<T, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Prompter for InquirePrompter {
    fn select(&self, message: &str, items: &[String], default: usize) -> Result<Option<usize>> {
        let answer = Select::new(message, items.to_vec())
            .with_starting_cursor(default.min(items.len().saturating_sub(1)))
            .raw_prompt();
        Ok(cancelled_as_none(answer)?.map(|option| option.index))
    }

    fn input(
        &self,
        message: &str,
        default: &str,
        validator: Option<InputValidator>,
    ) -> Result<Option<String>> {
        let mut text = Text::new(message).with_default(default);
        if let Some(check) = validator {
            text = text.with_validator(move |input: &str| -> Result<Validation, CustomUserError> {
                Ok(match check(input) {
                    Ok(()) => Validation::Valid,
                    Err(message) => Validation::Invalid(message.into()),
                })
            });
        }
        cancelled_as_none(text.prompt())
    }
}
