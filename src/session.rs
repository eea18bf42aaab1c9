//! The user-facing action layer.
//!
//! A [`Session`] wires the canvas to the recognizer worker and owns the
//! display state: loading flag, last result, last error message. All
//! failures of the "recognize" action are converted to a single
//! user-visible message here; none propagate further.

use crate::canvas::Canvas;
use crate::error::{Error, Result};
use crate::recognize::{Digit, RecognizerConfig};
use crate::worker::RecognizerHandle;
use crate::PadConfig;

/// Whether a recognition request is outstanding. While `Waiting`, both
/// user controls are suppressed so a second request can never race the
/// first for the displayed result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Waiting,
}

pub struct Session {
    canvas: Canvas,
    worker: RecognizerHandle,
    status: Status,
    result: Option<Digit>,
    error: Option<String>,
}

impl Session {
    pub fn new(pad: &PadConfig, recognizer: RecognizerConfig) -> Result<Self> {
        Ok(Self {
            canvas: Canvas::new(pad)?,
            worker: RecognizerHandle::spawn(recognizer)?,
            status: Status::Idle,
            result: None,
            error: None,
        })
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_waiting(&self) -> bool {
        self.status == Status::Waiting
    }

    /// The last recognition outcome, if any. The `?` sentinel lands here
    /// like any digit; it is displayed, not treated as a failure.
    pub fn result(&self) -> Option<Digit> {
        self.result
    }

    /// The last user-visible failure message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The "recognize" control. A blank canvas or a failed export is
    /// reported inline with no model call; otherwise the snapshot goes to
    /// the worker and the session enters `Waiting`. Triggering again while
    /// `Waiting` is a no-op.
    pub fn recognize(&mut self) {
        if self.status == Status::Waiting {
            return;
        }

        if self.canvas.is_blank() {
            self.fail_inline(Error::EmptyCanvas.to_string());
            return;
        }

        let image = match self.canvas.export_image() {
            Ok(url) => url,
            Err(e) => {
                self.fail_inline(e.to_string());
                return;
            }
        };

        match self.worker.submit(image) {
            Ok(()) => {
                self.status = Status::Waiting;
                self.result = None;
                self.error = None;
            }
            Err(e) => {
                log::warn!("Could not submit recognition request: {}", e);
                self.fail_inline(Error::RecognitionFailed.to_string());
            }
        }
    }

    // An inline failure replaces the whole display: a result from an
    // earlier recognition must not survive next to a fresh error message.
    fn fail_inline(&mut self, message: String) {
        self.result = None;
        self.error = Some(message);
    }

    /// Drain the worker's reply if one has arrived. Call once per event
    /// loop tick; does nothing while no request is outstanding.
    pub fn poll(&mut self) {
        if self.status != Status::Waiting {
            return;
        }
        if let Some(outcome) = self.worker.try_recv() {
            self.status = Status::Idle;
            match outcome {
                Ok(digit) => {
                    self.result = Some(digit);
                    self.error = None;
                }
                Err(e) => {
                    // The cause was already logged where it occurred; the
                    // user sees only the generic message.
                    self.result = None;
                    self.error = Some(e.to_string());
                }
            }
        }
    }

    /// The "clear" control: resets the raster and the displayed
    /// result/error. There is no cancellation primitive; a request already
    /// in flight keeps running and its reply still lands on a later
    /// [`Session::poll`].
    pub fn clear(&mut self) {
        self.canvas.clear();
        self.result = None;
        self.error = None;
    }
}
