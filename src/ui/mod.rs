//! Terminal UI: prompts, labels, notifications

pub mod progress;
pub mod render;
pub mod selector;
pub mod toast;
