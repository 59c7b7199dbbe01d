use std::sync::Mutex;

use tracing::{info, warn};

/// The one channel through which service outcomes reach the end user.
/// Every service operation emits exactly one success or one-or-more
/// failure notices as a side effect of running.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn failure(&self, message: &str);
}

/// Server-side notifier: notices land in the log stream.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        info!(notice = message, "notify");
    }

    fn failure(&self, message: &str) {
        warn!(notice = message, "notify");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Collects notices instead of emitting them; lets tests assert on the
/// exact notification traffic an operation produced.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut self.notices.lock().unwrap())
    }

    pub fn failure_count(&self) -> usize {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.kind == NoticeKind::Failure)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.notices.lock().unwrap().push(Notice {
            kind: NoticeKind::Success,
            message: message.to_string(),
        });
    }

    fn failure(&self, message: &str) {
        self.notices.lock().unwrap().push(Notice {
            kind: NoticeKind::Failure,
            message: message.to_string(),
        });
    }
}
