//! Console notification sink
//!
//! Prints library notifications as toast-style lines and mirrors them to
//! the log.

use mine_safety_core::{Notification, NotificationLevel, Notifier};

#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    /// Log only, print nothing
    quiet: bool,
    shown: usize,
}

impl ConsoleNotifier {
    pub fn new(quiet: bool) -> Self {
        Self { quiet, shown: 0 }
    }

    /// Number of notifications received so far
    pub fn shown(&self) -> usize {
        self.shown
    }
}

/// Toast-style single line for a notification
pub fn format_notification(notification: &Notification) -> String {
    let marker = match notification.level {
        NotificationLevel::Info => "ℹ",
        NotificationLevel::Success => "✓",
        NotificationLevel::Error => "🚨",
    };
    format!("{} {}", marker, notification.message)
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notification: Notification) {
        self.shown += 1;

        match notification.level {
            NotificationLevel::Error => log::warn!("{}", notification.message),
            _ => log::info!("{}", notification.message),
        }

        if !self.quiet {
            println!("{}", format_notification(&notification));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_notification() {
        assert_eq!(
            format_notification(&Notification::success("Attendance marked for today")),
            "✓ Attendance marked for today"
        );
        assert!(format_notification(&Notification::error("SOS")).starts_with("🚨"));
    }

    #[test]
    fn test_counts_notifications() {
        let mut notifier = ConsoleNotifier::new(true);
        notifier.notify(Notification::info("a"));
        notifier.notify(Notification::error("b"));
        assert_eq!(notifier.shown(), 2);
    }
}
