//! Terminal notification sink

use crate::core::notify::{Level, Notification, Notifier};
use colored::Colorize;
use tracing::{error, info};

/// Prints notifications to stderr, one line each
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl TerminalNotifier {
    pub fn new() -> Self {
        Self
    }
}

pub fn format_notification(n: &Notification) -> String {
    let time = n.at.format("%H:%M:%S").to_string();
    let line = match n.level {
        Level::Success => format!("{} {}", "✓".green(), n.message.green()),
        Level::Info => format!("{} {}", "•".cyan(), n.message),
        Level::Error => format!("{} {}", "✗".red(), n.message.red()),
    };
    format!("{} {}", time.dimmed(), line)
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Error => error!(message = %notification.message, "notification"),
            _ => info!(message = %notification.message, "notification"),
        }
        eprintln!("{}", format_notification(&notification));
    }
}
