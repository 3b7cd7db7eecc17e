//! Interactive prompts built on dialoguer

use crate::types::MenuItem;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Select};

pub struct Selector {
    theme: ColorfulTheme,
}

impl Default for Selector {
    fn default() -> Self {
        Self::new()
    }
}

impl Selector {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    /// Select an item from the menu. None when cancelled with Esc/q.
    pub fn select<T: Clone>(&self, items: &[MenuItem<T>], prompt: &str) -> Option<T> {
        if items.is_empty() {
            return None;
        }

        let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();

        let selection = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&labels)
            .default(0)
            .interact_opt()
            .ok()
            .flatten()?;

        items.get(selection).map(|item| item.value.clone())
    }

    /// Pick any number of labels, returns the chosen indices
    pub fn multi_select(&self, labels: &[&str], checked: &[bool], prompt: &str) -> Option<Vec<usize>> {
        MultiSelect::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(labels)
            .defaults(checked)
            .interact_opt()
            .ok()
            .flatten()
    }

    /// Free text input, may be empty
    pub fn input(&self, prompt: &str, initial: &str) -> Option<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()
            .ok()
    }

    /// Yes/no question, cancelling counts as no
    pub fn confirm(&self, prompt: &str) -> bool {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact_opt()
            .ok()
            .flatten()
            .unwrap_or(false)
    }
}
