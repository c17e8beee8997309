use std::{fmt::Display, sync::Arc};

use futures_util::StreamExt;
use log::{info, warn};

use crate::application::{GroupReport, Poller, Report, Skipped};
use crate::domain::{self, Job};

/// Walks every grouping of an inventory, polls it as one batch and records the values found.
pub struct App<Inventory, Shell> {
    inventory: Inventory,
    poller: Poller<Shell>,
    job: Arc<Job>,
}

impl<Inventory, Shell> App<Inventory, Shell>
where
    Inventory: domain::HostSource + domain::ResultSink<<Inventory as domain::HostSource>::Context>,
    <Inventory as domain::HostSource>::Context: Sync,
    Shell: domain::RemoteShell,
{
    pub fn new(inventory: Inventory, poller: Poller<Shell>, job: Job) -> Self {
        Self {
            inventory,
            poller,
            job: Arc::new(job),
        }
    }

    pub async fn run(
        self,
    ) -> Result<
        Report<<Inventory as domain::HostSource>::Context>,
        Error<
            <Inventory as domain::HostSource>::Error,
            <Inventory as domain::ResultSink<<Inventory as domain::HostSource>::Context>>::Error,
        >,
    > {
        let Self {
            mut inventory,
            poller,
            job,
        } = self;

        let groups = domain::HostSource::groups(&mut inventory)
            .await
            .map_err(Error::HostSourceError)?;

        let mut report = Report::default();

        for group in groups.into_iter() {
            info!("--- processing group: {group} ---");

            let hosts = match inventory.hosts(&group).await {
                Ok(x) => x,
                Err(why) => {
                    warn!("[{group}]: failed to read hosts: {why}. skipping.");
                    report.groups.push(GroupReport {
                        group,
                        outcome: Err(Skipped::Unreadable(why.to_string())),
                    });
                    continue;
                }
            };

            if hosts.is_empty() {
                warn!("[{group}]: no hosts found. skipping.");
                report.groups.push(GroupReport {
                    group,
                    outcome: Err(Skipped::NoHosts),
                });
                continue;
            }

            info!("[{group}]: connecting to {} hosts", hosts.len());
            let mut dispatch = poller.dispatch(hosts, job.clone());
            let mut results = Vec::with_capacity(dispatch.submitted());

            while let Some(result) = dispatch.next().await {
                match &result.outcome {
                    Ok(value) => {
                        info!(
                            "[{group}] {} - {}",
                            result.address,
                            ansi_term::Color::Fixed(15).bold().paint(value.as_str())
                        );
                        if let Err(why) = inventory.record(&result.context, value).await {
                            warn!("[{group}] {}: failed to record '{value}': {why}", result.address);
                        }
                    }
                    Err(why) => {
                        warn!("[{group}] {}: {why}", result.address);
                    }
                }
                results.push(result);
            }

            let batch = dispatch.finish(results);
            info!(
                "--- finished group: {group} ({} ok, {} failed, {:.1?}) ---",
                batch.successes().count(),
                batch.failures().count(),
                batch.finished.since(batch.started),
            );
            report.groups.push(GroupReport {
                group,
                outcome: Ok(batch),
            });
        }

        domain::ResultSink::save(&mut inventory)
            .await
            .map_err(Error::ResultSinkError)?;

        Ok(report)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Error<HostSourceError, ResultSinkError>
where
    HostSourceError: std::error::Error,
    ResultSinkError: std::error::Error,
{
    HostSourceError(HostSourceError),
    ResultSinkError(ResultSinkError),
}
impl<HostSourceError, ResultSinkError> Display for Error<HostSourceError, ResultSinkError>
where
    HostSourceError: std::error::Error,
    ResultSinkError: std::error::Error,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::HostSourceError(e) => f.write_fmt(format_args!("failed to read hosts: {e}")),
            Error::ResultSinkError(e) => f.write_fmt(format_args!("failed to save results: {e}")),
        }
    }
}
impl<HostSourceError, ResultSinkError> std::error::Error for Error<HostSourceError, ResultSinkError>
where
    HostSourceError: std::error::Error,
    ResultSinkError: std::error::Error,
{
}
