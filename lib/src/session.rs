use crate::cancel::CancellationToken;
use crate::config::ConversionParams;
use crate::convert::convert;
use crate::error::ConvertError;
use crate::glyph::FontLibrary;
use log::debug;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Settlement of one non-cancelled conversion request
///
/// Exactly one message is delivered per request that runs to completion;
/// superseded (cancelled) requests deliver nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionMessage {
    /// The finished ASCII art
    Result { text: String },
    /// The conversion failed; `message` is display-ready
    Error { message: String },
}

/// Single-slot background conversion driver
///
/// Runs each request on its own worker thread so the submitting thread
/// stays responsive, and keeps at most one request live: submitting a new
/// request first cancels the previous in-flight one, so a superseded run
/// can never deliver a stale settlement over a newer one. This bounds
/// background work under rapid parameter changes (slider dragging).
pub struct ConversionSession {
    fonts: Arc<FontLibrary>,
    sender: Sender<ConversionMessage>,
    inflight: Option<(CancellationToken, JoinHandle<()>)>,
}

impl ConversionSession {
    /// Create a session delivering settlements over `sender`
    pub fn new(fonts: Arc<FontLibrary>, sender: Sender<ConversionMessage>) -> Self {
        Self {
            fonts,
            sender,
            inflight: None,
        }
    }

    /// Start a conversion, superseding any still-running one
    ///
    /// The previous request's token is cancelled before the new worker
    /// spawns; its eventual settlement is suppressed.
    pub fn submit(&mut self, params: ConversionParams) {
        self.cancel();

        let token = CancellationToken::new();
        let fonts = Arc::clone(&self.fonts);
        let sender = self.sender.clone();
        let worker_token = token.clone();

        let handle = thread::spawn(move || {
            let outcome = convert(&params, &fonts, &worker_token);

            // A run that was superseded after its last checkpoint still
            // stays silent; the caller only ever sees the newest request.
            if worker_token.is_cancelled() {
                debug!("dropping settlement of superseded conversion");
                return;
            }

            let message = match outcome {
                Ok(text) => ConversionMessage::Result { text },
                Err(ConvertError::Cancelled) => return,
                Err(err) => ConversionMessage::Error {
                    message: err.to_string(),
                },
            };
            // The receiver hanging up just means nobody is listening anymore
            let _ = sender.send(message);
        });

        self.inflight = Some((token, handle));
    }

    /// Cancel the in-flight request, if any
    pub fn cancel(&mut self) {
        if let Some((token, _handle)) = self.inflight.take() {
            token.cancel();
        }
    }

    /// Whether a submitted request is still running
    pub fn is_busy(&self) -> bool {
        self.inflight
            .as_ref()
            .is_some_and(|(_, handle)| !handle.is_finished())
    }
}

impl Drop for ConversionSession {
    fn drop(&mut self) {
        self.cancel();
    }
}
