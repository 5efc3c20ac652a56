//! Runs a [`Cascade`] on its own tokio task.
//!
//! The task owns the state machine and is the only thing that mutates it.
//! Handle calls arrive as commands; each fetch runs as a separate task and
//! reports back through a completion channel, so a slow request never
//! blocks selection changes.

use std::sync::Arc;

use lnf_client::RequestFailure;
use lnf_core::{LocationOption, LocationSelection};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::cascade::{Cascade, Fetch, Snapshot};
use crate::error::SelectorError;
use crate::level::{Choice, Level};
use crate::source::LocationSource;

const COMMAND_BUFFER: usize = 32;
const COMPLETION_BUFFER: usize = 32;

enum Command {
    Select {
        level: Level,
        choice: Choice,
        reply: oneshot::Sender<Result<(), SelectorError>>,
    },
    Retry {
        level: Level,
        reply: oneshot::Sender<Result<(), SelectorError>>,
    },
    Snapshot {
        reply: oneshot::Sender<Snapshot>,
    },
    Settled {
        reply: oneshot::Sender<Snapshot>,
    },
}

struct Completion {
    fetch: Fetch,
    result: Result<Vec<LocationOption>, RequestFailure>,
}

/// Handle to a running location selector.
///
/// `on_change` is called on the selector task with every distinct
/// selection, starting with the initial one. A `select_*` call returns after
/// the callback for its change has run.
pub struct LocationSelector {
    commands: mpsc::Sender<Command>,
    task: JoinHandle<()>,
}

impl LocationSelector {
    /// Starts the selector and its initial country load. Must be called
    /// from within a tokio runtime.
    pub fn spawn<S, F>(source: S, initial: &LocationSelection, on_change: F) -> Self
    where
        S: LocationSource,
        F: FnMut(&LocationSelection) + Send + 'static,
    {
        let (commands, rx) = mpsc::channel(COMMAND_BUFFER);
        let task = tokio::spawn(run(
            Arc::new(source),
            Cascade::new(initial),
            rx,
            on_change,
        ));
        Self { commands, task }
    }

    /// # Errors
    ///
    /// Returns the [`SelectorError`] the state machine rejected the choice
    /// with, or [`SelectorError::Closed`] if the task has stopped.
    pub async fn select_country(&self, choice: impl Into<Choice>) -> Result<(), SelectorError> {
        self.select(Level::Country, choice.into()).await
    }

    /// # Errors
    ///
    /// See [`LocationSelector::select_country`].
    pub async fn select_state(&self, choice: impl Into<Choice>) -> Result<(), SelectorError> {
        self.select(Level::State, choice.into()).await
    }

    /// # Errors
    ///
    /// See [`LocationSelector::select_country`].
    pub async fn select_city(&self, choice: impl Into<Choice>) -> Result<(), SelectorError> {
        self.select(Level::City, choice.into()).await
    }

    /// # Errors
    ///
    /// See [`LocationSelector::select_country`].
    pub async fn select(&self, level: Level, choice: Choice) -> Result<(), SelectorError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Select {
            level,
            choice,
            reply,
        })
        .await?;
        rx.await.map_err(|_| SelectorError::Closed)?
    }

    /// Re-runs the failed load of `level`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::NothingToRetry`] if the level has not
    /// failed, or [`SelectorError::Closed`] if the task has stopped.
    pub async fn retry(&self, level: Level) -> Result<(), SelectorError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Retry { level, reply }).await?;
        rx.await.map_err(|_| SelectorError::Closed)?
    }

    /// # Errors
    ///
    /// Returns [`SelectorError::Closed`] if the task has stopped.
    pub async fn snapshot(&self) -> Result<Snapshot, SelectorError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply }).await?;
        rx.await.map_err(|_| SelectorError::Closed)
    }

    /// Waits until no level is loading and returns the state at that point.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::Closed`] if the task has stopped.
    pub async fn settled(&self) -> Result<Snapshot, SelectorError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Settled { reply }).await?;
        rx.await.map_err(|_| SelectorError::Closed)
    }

    /// Stops the task. In-flight fetches finish on their own and their
    /// results are dropped.
    pub async fn shutdown(self) {
        drop(self.commands);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "location selector task ended abnormally");
        }
    }

    async fn send(&self, command: Command) -> Result<(), SelectorError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SelectorError::Closed)
    }
}

async fn run<S, F>(
    source: Arc<S>,
    mut cascade: Cascade,
    mut commands: mpsc::Receiver<Command>,
    mut on_change: F,
) where
    S: LocationSource,
    F: FnMut(&LocationSelection) + Send + 'static,
{
    let (done_tx, mut done_rx) = mpsc::channel::<Completion>(COMPLETION_BUFFER);
    let mut waiters: Vec<oneshot::Sender<Snapshot>> = Vec::new();

    dispatch(&source, &done_tx, cascade.mount());
    notify(&mut cascade, &mut on_change);

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                match command {
                    Command::Select { level, choice, reply } => {
                        let result = cascade
                            .select(level, &choice)
                            .map(|fetches| dispatch(&source, &done_tx, fetches));
                        notify(&mut cascade, &mut on_change);
                        let _ = reply.send(result);
                    }
                    Command::Retry { level, reply } => {
                        let result = cascade
                            .retry(level)
                            .map(|fetch| dispatch(&source, &done_tx, vec![fetch]));
                        notify(&mut cascade, &mut on_change);
                        let _ = reply.send(result);
                    }
                    Command::Snapshot { reply } => {
                        let _ = reply.send(cascade.snapshot());
                    }
                    Command::Settled { reply } => waiters.push(reply),
                }
            }
            Some(done) = done_rx.recv() => {
                cascade.complete(&done.fetch, done.result);
                notify(&mut cascade, &mut on_change);
            }
        }

        if cascade.is_settled() && !waiters.is_empty() {
            let snapshot = cascade.snapshot();
            for waiter in waiters.drain(..) {
                let _ = waiter.send(snapshot.clone());
            }
        }
    }

    tracing::debug!("location selector stopped");
}

fn dispatch<S: LocationSource>(
    source: &Arc<S>,
    done: &mpsc::Sender<Completion>,
    fetches: Vec<Fetch>,
) {
    for fetch in fetches {
        tracing::debug!(
            level = %fetch.level,
            seq = fetch.seq,
            query = ?fetch.query,
            "fetching location options"
        );
        let source = Arc::clone(source);
        let done = done.clone();
        tokio::spawn(async move {
            let result = source.fetch(&fetch.query).await;
            // Fails only once the selector has stopped.
            let _ = done.send(Completion { fetch, result }).await;
        });
    }
}

fn notify<F: FnMut(&LocationSelection)>(cascade: &mut Cascade, on_change: &mut F) {
    if let Some(selection) = cascade.take_change() {
        tracing::debug!(%selection, "location selection changed");
        on_change(&selection);
    }
}
