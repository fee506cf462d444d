use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

/// Short-lived message for the user, a toast in the browser client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

pub trait Notifier: Send {
    fn notify(&mut self, notice: Notice);
}

/// Writes notices to the log.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, notice: Notice) {
        match notice.level {
            Level::Success => info!("{}", notice.message),
            Level::Error => error!("{}", notice.message),
        }
    }
}

/// Keeps every notice, newest last.
#[derive(Debug, Default)]
pub struct NoticeLog {
    pub notices: Vec<Notice>,
}

impl NoticeLog {
    pub fn last(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl Notifier for NoticeLog {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::{Level, Notice, NoticeLog, Notifier, TracingNotifier};

    #[test]
    fn test_log_drains_in_order() {
        let mut log = NoticeLog::default();
        log.notify(Notice::success("Data botol ditemukan"));
        log.notify(Notice::error("Terjadi kesalahan"));

        assert_eq!(log.last().unwrap().level, Level::Error);

        let drained = log.drain();
        assert_eq!(drained[0], Notice::success("Data botol ditemukan"));
        assert_eq!(drained.len(), 2);
        assert!(log.last().is_none());
    }

    #[test]
    fn test_tracing_notifier_accepts_both_levels() {
        let mut notifier = TracingNotifier;
        notifier.notify(Notice::success("saved"));
        notifier.notify(Notice::error("failed"));
    }
}
