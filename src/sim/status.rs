use std::sync::{Arc, Mutex};

use super::lock;
use crate::core::status::StatusSink;

/// 表示したステータスを記録するだけの表示器
#[derive(Debug, Clone, Default)]
pub struct RecordingStatus {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        lock(&self.messages).clone()
    }

    pub fn last(&self) -> Option<String> {
        lock(&self.messages).last().cloned()
    }
}

impl StatusSink for RecordingStatus {
    fn show_status(&mut self, message: &str) {
        log::debug!("LCD: {}", message);
        lock(&self.messages).push(message.to_string());
    }
}
