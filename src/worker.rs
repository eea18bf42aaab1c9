//! A worker thread that owns the blocking recognition client.
//!
//! The UI loop must never block on the network, so the [`Recognizer`] lives
//! on a dedicated thread and serves commands sent over an mpsc channel.
//! Replies come back on a second channel the caller polls without blocking.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use crate::error::{Error, Result};
use crate::recognize::{Digit, Recognizer, RecognizerConfig};

enum Command {
    Recognize(String),
    Close,
}

/// Handle to the recognizer worker. Dropping the handle shuts the worker
/// down after any in-flight request finishes; there is no cancellation.
pub struct RecognizerHandle {
    cmd_tx: Sender<Command>,
    reply_rx: Receiver<Result<Digit>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl RecognizerHandle {
    /// Spawn the worker. The client is built here, on the caller's thread,
    /// so configuration errors surface immediately instead of as a dead
    /// channel later.
    pub fn spawn(config: RecognizerConfig) -> Result<Self> {
        let recognizer = Recognizer::new(config)?;
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (reply_tx, reply_rx) = mpsc::channel::<Result<Digit>>();

        let worker = thread::spawn(move || {
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Recognize(data_url) => {
                        let res = recognizer.recognize(&data_url);
                        if reply_tx.send(res).is_err() {
                            break;
                        }
                    }
                    Command::Close => break,
                }
            }
        });

        Ok(Self {
            cmd_tx,
            reply_rx,
            worker: Some(worker),
        })
    }

    /// Submit one recognition request. The one-request-at-a-time policy is
    /// enforced by the caller; the worker just serves commands in order.
    pub fn submit(&self, data_url: String) -> Result<()> {
        self.cmd_tx
            .send(Command::Recognize(data_url))
            .map_err(|e| Error::WorkerGone(e.to_string()))
    }

    /// Non-blocking poll for a finished request.
    pub fn try_recv(&self) -> Option<Result<Digit>> {
        match self.reply_rx.try_recv() {
            Ok(res) => Some(res),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err(Error::WorkerGone("worker thread exited".into())))
            }
        }
    }
}

impl Drop for RecognizerHandle {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(Command::Close);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}
