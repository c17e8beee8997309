//! Fan-out/fan-in polling of a batch of hosts.
//!
//! [`Poller::dispatch`] spawns one worker per host. Workers share the read-only [`Job`]
//! and a semaphore that caps how many of them talk to the network at once. Each worker
//! sends exactly one outcome; the collector stream pairs it with the caller's context and
//! ends once every host has been accounted for.

use std::{future::Future, pin::Pin, sync::Arc, task::Poll};

use futures_util::{Stream, StreamExt};
use log::{debug, warn};
use tokio::sync::{mpsc, Semaphore};

use crate::domain::{
    Address, Batch, CommandOutput, ExtractionPattern, Host, Id, Job, PollError, PollResult,
    RemoteShell, ShellChannel, ShellSession, Stage, Timestamp,
};

#[derive(Debug)]
pub struct Poller<Shell> {
    shell: Arc<Shell>,
    permits: Arc<Semaphore>,
}

impl<Shell> Poller<Shell>
where
    Shell: RemoteShell,
{
    /// `concurrency` is clamped to at least one.
    pub fn new(shell: Shell, concurrency: usize) -> Self {
        Self {
            shell: Arc::new(shell),
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Start one worker per host and return the stream of their results.
    pub fn dispatch<C>(&self, hosts: Vec<Host<C>>, job: Arc<Job>) -> Dispatch<C>
    where
        C: Send + 'static,
    {
        let id = Id::new();
        let started = Timestamp::now();
        let submitted = hosts.len();

        if submitted == 0 {
            return Dispatch {
                id,
                submitted,
                started,
                stream: Box::pin(futures_util::stream::empty()),
            };
        }

        debug!("[{}]: dispatching {submitted} workers", id.short());

        let (tx, mut rx) = mpsc::channel(submitted);
        let mut pending = Vec::with_capacity(submitted);

        for (index, Host { address, context }) in hosts.into_iter().enumerate() {
            let shell = self.shell.clone();
            let permits = self.permits.clone();
            let job = job.clone();
            let tx = tx.clone();
            let worker_address = address.clone();

            tokio::spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                let outcome = work(shell.as_ref(), &worker_address, &job).await;
                let _ = tx.send((index, outcome)).await;
            });

            pending.push(Some((address, context)));
        }
        drop(tx);

        let batch_id = id.short().to_owned();
        let stream = async_stream::stream! {
            while let Some((index, outcome)) = rx.recv().await {
                if let Some((address, context)) = pending.get_mut(index).and_then(Option::take) {
                    yield PollResult { index, address, context, outcome };
                }
            }

            // Every sender is gone. Anything still pending lost its worker.
            for (index, slot) in pending.iter_mut().enumerate() {
                if let Some((address, context)) = slot.take() {
                    warn!("[{batch_id}]: worker for {address} ended without a result");
                    yield PollResult { index, address, context, outcome: Err(PollError::Aborted) };
                }
            }
        };

        Dispatch {
            id,
            submitted,
            started,
            stream: Box::pin(stream),
        }
    }

    /// Poll every host and wait for all of them.
    pub async fn poll<C>(&self, hosts: Vec<Host<C>>, job: Arc<Job>) -> Batch<C>
    where
        C: Send + 'static,
    {
        self.dispatch(hosts, job).collect().await
    }
}

/// A running batch. Yields results in arrival order and ends when the batch is complete.
pub struct Dispatch<C> {
    id: Id,
    submitted: usize,
    started: Timestamp,
    stream: Pin<Box<dyn Stream<Item = PollResult<C>> + Send>>,
}

impl<C> Dispatch<C> {
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Drain the remaining results into a finished batch.
    pub async fn collect(mut self) -> Batch<C> {
        let mut results = Vec::with_capacity(self.submitted);
        while let Some(result) = self.stream.next().await {
            results.push(result);
        }
        self.finish(results)
    }

    /// Close the batch over results already taken from the stream.
    pub fn finish(self, results: Vec<PollResult<C>>) -> Batch<C> {
        Batch {
            id: self.id,
            submitted: self.submitted,
            started: self.started,
            finished: Timestamp::now(),
            results,
        }
    }
}

impl<C> Stream for Dispatch<C> {
    type Item = PollResult<C>;

    fn poll_next(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> Poll<Option<Self::Item>> {
        self.stream.as_mut().poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.submitted))
    }
}

impl<C> std::fmt::Debug for Dispatch<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatch")
            .field("id", &self.id)
            .field("submitted", &self.submitted)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

/// Turn one host into one outcome. Never panics on transport errors.
async fn work<Shell>(shell: &Shell, address: &Address, job: &Job) -> Result<String, PollError>
where
    Shell: RemoteShell,
{
    debug!("[{address}]: connecting");
    let connect = shell.connect(address, &job.credentials);
    let mut session = within(job.timeouts.connect, Stage::Connect, connect)
        .await?
        .map_err(|e| PollError::Connection(e.to_string()))?;

    let outcome = run_command(&mut session, job).await;
    session.close().await;
    debug!("[{address}]: disconnected");

    outcome
}

async fn run_command<Session>(session: &mut Session, job: &Job) -> Result<String, PollError>
where
    Session: ShellSession,
{
    let mut channel = within(job.timeouts.connect, Stage::Connect, session.open_channel())
        .await?
        .map_err(|e| PollError::Execution(format!("failed to open channel: {e}")))?;

    let output = within(job.timeouts.command, Stage::Command, channel.exec(&job.command)).await;
    channel.close().await;

    let output = output?.map_err(|e| PollError::Execution(e.to_string()))?;
    extract(&job.pattern, &output)
}

/// A match wins regardless of exit status.
fn extract(pattern: &ExtractionPattern, output: &CommandOutput) -> Result<String, PollError> {
    if let Some(value) = pattern.extract(&output.text()) {
        return Ok(value.to_owned());
    }

    match output.exit_status {
        Some(status) if status != 0 => Err(PollError::Execution(format!(
            "command exited with status {status}"
        ))),
        _ => Err(PollError::PatternNotFound),
    }
}

async fn within<F>(
    limit: Option<std::time::Duration>,
    stage: Stage,
    future: F,
) -> Result<F::Output, PollError>
where
    F: Future,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, future)
            .await
            .map_err(|_elapsed| PollError::Timeout(stage)),
        None => Ok(future.await),
    }
}
