pub mod notifier;
pub mod templates;

pub use notifier::{Level, LogNotifier, Notice, Notifier, RecordingNotifier};
pub use templates::NotificationTemplates;
