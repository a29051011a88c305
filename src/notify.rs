use serde_json::json;
use std::io::Write;

/// Notification permission as reported by the presentation layer.
/// Mirrors the platform notification API states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Not yet determined; the user has not been prompted.
    Default,
    Granted,
    Denied,
}

impl Permission {
    pub fn parse(value: &str) -> Option<Permission> {
        match value {
            "default" => Some(Permission::Default),
            "granted" => Some(Permission::Granted),
            "denied" => Some(Permission::Denied),
            _ => None,
        }
    }
}

/// Outbound notification boundary. The daemon never displays anything
/// itself; it hands one-shot messages to whoever owns the screen.
pub trait Notifier {
    /// Ask the presentation layer to prompt the user for notification
    /// permission. The receiving side no-ops when permission is already
    /// determined.
    fn request_permission(&mut self);

    /// Display a one-shot notification with the given message.
    fn show(&mut self, message: &str);
}

/// Production notifier: emits uncorrelated event lines on stdout, next to
/// the regular response stream. Event lines carry an `event` key and no
/// `id`, so the UI can tell them apart.
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn request_permission(&mut self) {
        emit(json!({ "event": "notify.requestPermission" }));
    }

    fn show(&mut self, message: &str) {
        emit(json!({ "event": "notify.show", "message": message }));
    }
}

fn emit(value: serde_json::Value) {
    let mut stdout = std::io::stdout();
    let _ = writeln!(stdout, "{value}");
    let _ = stdout.flush();
}
