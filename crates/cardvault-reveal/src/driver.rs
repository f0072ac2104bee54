//! Async reveal driver
//!
//! Runs a [`RevealSession`] inside a tokio task that owns both timers. The
//! task sleeps until the session's next deadline, takes commands from a
//! [`RevealHandle`] and publishes the read model on a `watch` channel. Host
//! callbacks arrive as [`RevealEvent`]s.
//!
//! The task ends when the session closes: after a cancel, a delete request,
//! an elapsed disclosure window or when every handle is gone. Nothing ticks
//! after that.

use cardvault_core::{Pin, RecordId};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::clock::TokioClock;
use crate::error::{Result, RevealError};
use crate::host::{ChannelHost, RevealEvent};
use crate::policy::RevealPolicy;
use crate::session::{PadResponse, RevealCommand, RevealSession, RevealView};

/// Commands buffered before senders wait
const COMMAND_BUFFER: usize = 32;

struct Envelope {
    command: RevealCommand,
    reply: oneshot::Sender<PadResponse>,
}

/// Spawns reveal sessions onto the current tokio runtime
pub struct RevealDriver;

impl RevealDriver {
    /// Start a session for `record_id` gated by `pin`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        record_id: RecordId,
        pin: Pin,
        policy: RevealPolicy,
    ) -> (RevealHandle, mpsc::UnboundedReceiver<RevealEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let session =
            RevealSession::with_clock(record_id, pin, policy, ChannelHost::new(event_tx), TokioClock);

        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (view_tx, view_rx) = watch::channel(session.view());
        let task = tokio::spawn(run(session, command_rx, view_tx));

        let handle = RevealHandle {
            record_id,
            commands: command_tx,
            view: view_rx,
            task: Some(task),
        };
        (handle, event_rx)
    }
}

async fn run(
    mut session: RevealSession<ChannelHost, TokioClock>,
    mut commands: mpsc::Receiver<Envelope>,
    view_tx: watch::Sender<RevealView>,
) {
    loop {
        let deadline = session.next_deadline();

        let pending_reply = tokio::select! {
            envelope = commands.recv() => match envelope {
                Some(Envelope { command, reply }) => Some((reply, session.handle(command))),
                None => {
                    debug!("Reveal handle dropped, cancelling session");
                    session.cancel();
                    None
                }
            },
            _ = sleep_until(deadline) => {
                session.poll();
                None
            }
        };

        // Publish before replying so callers never read a stale view
        view_tx.send_replace(session.view());
        if let Some((reply, response)) = pending_reply {
            let _ = reply.send(response);
        }
        if session.is_closed() {
            break;
        }
    }
    debug!("Reveal task for record {} finished", session.record_id().short());
}

async fn sleep_until(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

/// Handle to a running reveal session
pub struct RevealHandle {
    record_id: RecordId,
    commands: mpsc::Sender<Envelope>,
    view: watch::Receiver<RevealView>,
    task: Option<JoinHandle<()>>,
}

impl RevealHandle {
    pub fn record_id(&self) -> RecordId {
        self.record_id
    }

    /// Send a command and wait for the pad's response
    pub async fn send(&self, command: RevealCommand) -> Result<PadResponse> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Envelope { command, reply })
            .await
            .map_err(|_| RevealError::SessionClosed)?;
        response.await.map_err(|_| RevealError::SessionClosed)
    }

    pub async fn append_digit(&self, digit: u8) -> Result<PadResponse> {
        self.send(RevealCommand::Digit(digit)).await
    }

    /// Type every digit of `pin`, skipping anything that is not a digit.
    /// Returns the response to the last digit sent.
    pub async fn enter_pin(&self, pin: &str) -> Result<PadResponse> {
        let mut last = PadResponse::Ignored;
        for digit in pin.chars().filter_map(|c| c.to_digit(10)) {
            last = self.append_digit(digit as u8).await?;
        }
        Ok(last)
    }

    pub async fn backspace(&self) -> Result<PadResponse> {
        self.send(RevealCommand::Backspace).await
    }

    pub async fn clear(&self) -> Result<PadResponse> {
        self.send(RevealCommand::Clear).await
    }

    pub async fn submit(&self) -> Result<PadResponse> {
        self.send(RevealCommand::Submit).await
    }

    /// Request deletion of the record. Callers confirm with the user first.
    pub async fn forgot_pin(&self) -> Result<PadResponse> {
        self.send(RevealCommand::ForgotPin).await
    }

    pub async fn reopen_pad(&self) -> Result<PadResponse> {
        self.send(RevealCommand::ReopenPad).await
    }

    pub async fn cancel(&self) -> Result<PadResponse> {
        self.send(RevealCommand::Cancel).await
    }

    /// Latest read model
    pub fn view(&self) -> RevealView {
        self.view.borrow().clone()
    }

    /// Receiver notified on every read model change
    pub fn subscribe(&self) -> watch::Receiver<RevealView> {
        self.view.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    /// Cancel the session if still open and wait for its task to finish
    pub async fn shutdown(mut self) {
        let _ = self.cancel().await;
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for RevealHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
