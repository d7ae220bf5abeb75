use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mass_format_core::{HighlightConfig, HighlightError, Notifier, YrsDocument};
use tokio::sync::broadcast;

use crate::model::{ClientEvent, SelectionRange};

/// Two lanes over one WebSocket.
#[derive(Debug, Clone)]
pub enum MessageStructure {
    /// Lane A: binary yjs update.
    YjsUpdate(Vec<u8>),
    /// Lane B: JSON text frame.
    Event(String),
}

#[derive(Clone)]
pub struct AppState {
    editor: Arc<Mutex<YrsDocument>>,
    pub config: Arc<HighlightConfig>,
    pub editor_broadcast_tx: broadcast::Sender<MessageStructure>,
}

impl AppState {
    pub fn new(
        editor: YrsDocument,
        config: HighlightConfig,
        editor_broadcast_tx: broadcast::Sender<MessageStructure>,
    ) -> Self {
        Self {
            editor: Arc::new(Mutex::new(editor)),
            config: Arc::new(config),
            editor_broadcast_tx,
        }
    }

    /// Exclusive access to the shared document for the length of one action.
    pub fn editor(&self) -> MutexGuard<'_, YrsDocument> {
        self.editor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Selects `ranges` and runs `action` under one lease of the document.
    ///
    /// Element indices shift when collaborators add or remove paragraphs, so the
    /// selection only lives for the duration of the call.
    pub fn with_selection<R>(
        &self,
        ranges: &[SelectionRange],
        action: impl FnOnce(&mut YrsDocument) -> R,
    ) -> Result<R, HighlightError> {
        let mut editor = self.editor();
        editor.select(ranges.iter().map(SelectionRange::as_pair))?;
        let out = action(&mut *editor);
        editor.set_selection(None);
        Ok(out)
    }

    pub fn notifier(&self) -> BroadcastNotifier {
        BroadcastNotifier {
            tx: self.editor_broadcast_tx.clone(),
        }
    }
}

/// Delivers notices to connected editors on lane B.
pub struct BroadcastNotifier {
    tx: broadcast::Sender<MessageStructure>,
}

impl Notifier for BroadcastNotifier {
    fn alert(&self, message: &str) {
        let event = ClientEvent::Notice {
            message: message.to_string(),
        };
        match serde_json::to_string(&event) {
            // No subscribers is fine; the HTTP response carries the notice too.
            Ok(json) => {
                let _ = self.tx.send(MessageStructure::Event(json));
            }
            Err(e) => tracing::warn!("failed to encode notice: {:?}", e),
        }
    }
}
