//! Terminal implementation of the `Prompter` port.

use anyhow::Result;
use dialoguer::Input;

use crate::application::ports::Prompter;

/// Reads answers from the terminal with `dialoguer`.
pub struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?)
    }
}
