use std::fmt::Display;

use prettytable::{format, row, Table};
use serde_derive::Serialize;

use crate::domain::{Batch, PollResult};

/// What happened to every grouping of a run, in processing order.
#[derive(Debug)]
pub struct Report<C> {
    pub groups: Vec<GroupReport<C>>,
}
impl<C> Default for Report<C> {
    fn default() -> Self {
        Self { groups: Vec::new() }
    }
}

#[derive(Debug)]
pub struct GroupReport<C> {
    pub group: String,
    pub outcome: Result<Batch<C>, Skipped>,
}

/// Why a grouping was never polled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skipped {
    Unreadable(String),
    NoHosts,
}
impl Display for Skipped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Skipped::Unreadable(e) => f.write_fmt(format_args!("unreadable: {e}")),
            Skipped::NoHosts => f.write_str("no hosts"),
        }
    }
}

/// One line of the final report.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub group: String,
    pub entry: Option<String>,
    pub address: Option<String>,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Failed,
    Skipped,
}
impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Ok => f.write_str("ok"),
            Status::Failed => f.write_str("failed"),
            Status::Skipped => f.write_str("skipped"),
        }
    }
}

impl<C: Display> Report<C> {
    pub fn succeeded(&self) -> usize {
        self.batches().map(|x| x.successes().count()).sum()
    }

    pub fn failed(&self) -> usize {
        self.batches().map(|x| x.failures().count()).sum()
    }

    fn batches(&self) -> impl Iterator<Item = &Batch<C>> {
        self.groups.iter().filter_map(|x| x.outcome.as_ref().ok())
    }

    /// Flatten to records, hosts in submission order within each group.
    pub fn records(&self) -> Vec<Record> {
        let mut records = Vec::new();
        for GroupReport { group, outcome } in self.groups.iter() {
            match outcome {
                Ok(batch) => {
                    records.extend(batch.ordered().into_iter().map(|x| record(group, x)));
                }
                Err(skipped) => records.push(Record {
                    group: group.clone(),
                    entry: None,
                    address: None,
                    status: Status::Skipped,
                    value: None,
                    error_kind: None,
                    error: Some(skipped.to_string()),
                }),
            }
        }
        records
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
        table.set_titles(row!["GROUP", "ENTRY", "ADDRESS", "STATUS", "DETAIL"]);

        for x in self.records().into_iter() {
            let status = match x.status {
                Status::Ok => ansi_term::Color::Green.paint(x.status.to_string()),
                Status::Failed => ansi_term::Color::Red.paint(x.status.to_string()),
                Status::Skipped => ansi_term::Color::Fixed(8).paint(x.status.to_string()),
            };
            let detail = x.value.or(x.error).unwrap_or_default();
            table.add_row(row![
                x.group,
                x.entry.unwrap_or_default(),
                x.address.unwrap_or_default(),
                status,
                detail
            ]);
        }

        table
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.records())
    }
}

fn record<C: Display>(group: &str, result: &PollResult<C>) -> Record {
    let (status, value, error_kind, error) = match &result.outcome {
        Ok(value) => (Status::Ok, Some(value.clone()), None, None),
        Err(e) => (
            Status::Failed,
            None,
            Some(e.kind().to_string()),
            Some(e.to_string()),
        ),
    };

    Record {
        group: group.to_owned(),
        entry: Some(result.context.to_string()),
        address: Some(result.address.to_string()),
        status,
        value,
        error_kind,
        error,
    }
}
