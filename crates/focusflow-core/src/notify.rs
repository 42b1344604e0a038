//! Session-ended notifications.

use std::sync::{Arc, Mutex};

use crate::timer::TimerMode;

/// Sink for the audible cue and transient message shown when a segment ends.
///
/// Implementations are best-effort and must not panic.
pub trait Notifier {
    fn notify(&self, title: &str, message: &str, play_sound: bool);
}

/// Title and body for the notification fired when `mode` ends.
pub fn session_ended_message(mode: TimerMode) -> (String, &'static str) {
    let title = format!("{} Session Ended!", mode.label());
    let message = if mode == TimerMode::Study {
        "Time for a break!"
    } else {
        "Time to get back to work!"
    };
    (title, message)
}

/// Emits notifications as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, title: &str, message: &str, play_sound: bool) {
        tracing::info!(title, message, play_sound, "notification");
    }
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _title: &str, _message: &str, _play_sound: bool) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub play_sound: bool,
}

/// Keeps every notification; clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str, play_sound: bool) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(Notification {
                title: title.to_string(),
                message: message.to_string(),
                play_sound,
            });
        }
    }
}
