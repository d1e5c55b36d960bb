use crate::domain::model::DisplayMessage;
use crate::domain::ports::TranscriptSink;
use std::sync::{Arc, Mutex, MutexGuard};

/// Ordered, append-only list of display messages, shared by every component
/// that writes to the chat.
#[derive(Clone, Default)]
pub struct Transcript {
    entries: Arc<Mutex<Vec<DisplayMessage>>>,
    sinks: Arc<Vec<Arc<dyn TranscriptSink>>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(sink: Arc<dyn TranscriptSink>) -> Self {
        Self {
            entries: Arc::default(),
            sinks: Arc::new(vec![sink]),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<DisplayMessage>> {
        // entries are only ever pushed, so a poisoned guard still holds a valid list
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn append(&self, message: DisplayMessage) {
        for sink in self.sinks.iter() {
            sink.present(&message);
        }
        self.lock().push(message);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<DisplayMessage> {
        self.lock().clone()
    }

    pub fn last(&self) -> Option<DisplayMessage> {
        self.lock().last().cloned()
    }
}
