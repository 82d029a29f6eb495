use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;
use std::{collections::VecDeque, sync::Mutex};

const DEFAULT_CAPACITY: usize = 50;

/// Transient user-facing notification sink.
pub trait Notifier: Send + Sync {
    fn notice(&self, message: &str);
}

#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Logs every notice and keeps the most recent ones for the status API.
#[derive(Debug)]
pub struct NoticeBoard {
    capacity: usize,
    recent: Mutex<VecDeque<Notice>>,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl NoticeBoard {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            recent: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Oldest first.
    pub fn recent(&self) -> Vec<Notice> {
        self.lock().iter().cloned().collect()
    }

    #[cfg(test)]
    pub fn last_message(&self) -> Option<String> {
        self.lock().back().map(|n| n.message.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Notice>> {
        // 通知只是展示用途，锁中毒时继续使用内部数据
        self.recent.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Notifier for NoticeBoard {
    fn notice(&self, message: &str) {
        info!("{message}");
        if self.capacity == 0 {
            return;
        }
        let mut recent = self.lock();
        while recent.len() >= self.capacity {
            recent.pop_front();
        }
        recent.push_back(Notice {
            message: message.to_string(),
            at: Utc::now(),
        });
    }
}
