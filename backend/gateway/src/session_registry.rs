//! Active Claim Form Registry.
//!
//! Tracks the in-memory forms and the OCR session attached to each.

use std::collections::HashMap;
use std::sync::Arc;

use forestclaim_autofill::{ClaimForm, OcrSession};
use forestclaim_understanding::RecognitionAdapter;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

pub type FormId = String;

/// One claim form and its recognition session.
#[derive(Debug)]
pub struct FormEntry {
    pub form: Mutex<ClaimForm>,
    pub session: OcrSession,
}

/// Manages the forms currently being filled.
#[derive(Clone)]
pub struct SessionRegistry {
    adapter: Arc<RecognitionAdapter>,
    forms: Arc<RwLock<HashMap<FormId, Arc<FormEntry>>>>,
}

impl SessionRegistry {
    pub fn new(adapter: Arc<RecognitionAdapter>) -> Self {
        Self {
            adapter,
            forms: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn adapter(&self) -> &RecognitionAdapter {
        &self.adapter
    }

    /// Open a blank form and return its ID.
    pub async fn create(&self) -> FormId {
        let id = uuid::Uuid::new_v4().to_string();
        let entry = Arc::new(FormEntry {
            form: Mutex::new(ClaimForm::new()),
            session: OcrSession::new(self.adapter.clone()),
        });
        self.forms.write().await.insert(id.clone(), entry);
        debug!(form_id = %id, "form created");
        id
    }

    pub async fn get(&self, id: &str) -> Option<Arc<FormEntry>> {
        self.forms.read().await.get(id).cloned()
    }

    /// Drop a form. Any run still in flight is reset so its result is
    /// discarded.
    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.forms.write().await.remove(id);
        match removed {
            Some(entry) => {
                entry.session.reset();
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.forms.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.forms.read().await.is_empty()
    }
}
