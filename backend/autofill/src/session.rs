//! OCR orchestration session.
//!
//! One recognition run at a time per session. State is published on a
//! `watch` channel so a UI (or SSE stream) can follow progress. A reset
//! bumps the generation counter; results of runs started before the reset
//! are dropped on arrival.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use forestclaim_understanding::{
    extract_fields, ImagePayload, ProgressSink, RecognitionAdapter, RecognitionError,
    RecognitionResult,
};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::form::ClaimForm;
use crate::merge::MergeReport;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SessionState {
    Idle,
    Recognizing { progress: u8 },
    Succeeded(RecognitionResult),
    Failed { message: String },
}

impl SessionState {
    pub fn is_recognizing(&self) -> bool {
        matches!(self, Self::Recognizing { .. })
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a recognition run is already in progress")]
    Busy,

    #[error("recognition result discarded after reset")]
    Discarded,

    #[error(transparent)]
    Recognition(#[from] RecognitionError),
}

/// Proof that [`OcrSession::start`] moved the session into `Recognizing`.
#[derive(Debug)]
#[must_use]
pub struct RunTicket {
    generation: u64,
}

#[derive(Clone)]
pub struct OcrSession {
    adapter: Arc<RecognitionAdapter>,
    state: Arc<watch::Sender<SessionState>>,
    generation: Arc<AtomicU64>,
}

impl OcrSession {
    pub fn new(adapter: Arc<RecognitionAdapter>) -> Self {
        let (tx, _rx) = watch::channel(SessionState::Idle);
        Self {
            adapter,
            state: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state.borrow().is_recognizing()
    }

    /// Back to `Idle` from any state. An in-flight call keeps running but
    /// its result will be discarded.
    pub fn reset(&self) {
        self.state.send_modify(|state| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            *state = SessionState::Idle;
        });
        debug!("ocr session reset");
    }

    /// Run recognition, moving through `Recognizing` to `Succeeded` or
    /// `Failed`. Fails fast with [`SessionError::Busy`] if a run is already
    /// in flight.
    pub async fn run(
        &self,
        image: &ImagePayload,
        language: Option<&str>,
    ) -> Result<RecognitionResult, SessionError> {
        let ticket = self.start()?;
        self.complete(ticket, image, language).await
    }

    /// Claim the session for a run without doing any work yet. Lets a caller
    /// report `Busy` synchronously and finish the run on another task.
    pub fn start(&self) -> Result<RunTicket, SessionError> {
        let mut generation = None;
        self.state.send_if_modified(|s| {
            if s.is_recognizing() {
                return false;
            }
            *s = SessionState::Recognizing { progress: 0 };
            generation = Some(self.generation.load(Ordering::SeqCst));
            true
        });
        let generation = generation.ok_or(SessionError::Busy)?;
        info!(engine = self.adapter.engine(), generation, "ocr session started");
        Ok(RunTicket { generation })
    }

    /// Drive a run claimed with [`OcrSession::start`] to completion.
    pub async fn complete(
        &self,
        ticket: RunTicket,
        image: &ImagePayload,
        language: Option<&str>,
    ) -> Result<RecognitionResult, SessionError> {
        let generation = ticket.generation;
        let sink = {
            let state = self.state.clone();
            let current = self.generation.clone();
            ProgressSink::with_callback(move |percent| {
                state.send_if_modified(|s| match s {
                    SessionState::Recognizing { progress }
                        if current.load(Ordering::SeqCst) == generation && *progress < percent =>
                    {
                        *progress = percent;
                        true
                    }
                    _ => false,
                });
            })
        };

        let outcome = self.adapter.recognize(image, language, &sink).await;
        let next = match &outcome {
            Ok(result) => SessionState::Succeeded(result.clone()),
            Err(e) => SessionState::Failed {
                message: e.to_string(),
            },
        };

        let mut published = false;
        self.state.send_if_modified(|s| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *s = next;
            published = true;
            true
        });

        if !published {
            debug!(generation, "discarding recognition result from before reset");
            return Err(SessionError::Discarded);
        }
        if let Err(e) = &outcome {
            warn!(error = %e, "ocr session failed");
        }
        outcome.map_err(SessionError::from)
    }

    /// Run recognition and, on success, extract fields and merge them into
    /// `form`. On any failure the form is left untouched.
    pub async fn run_and_autofill(
        &self,
        form: &mut ClaimForm,
        image: &ImagePayload,
        language: Option<&str>,
    ) -> Result<(RecognitionResult, MergeReport), SessionError> {
        let result = self.run(image, language).await?;
        let extracted = extract_fields(&result.raw_text);
        let report = form.apply_extracted(&extracted);
        Ok((result, report))
    }
}

impl std::fmt::Debug for OcrSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OcrSession")
            .field("state", &*self.state.borrow())
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}
