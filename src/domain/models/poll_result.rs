use std::fmt::Display;

use super::Address;

/// Terminal outcome of one worker.
///
/// `outcome` holds either the extracted value or the cause of failure, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollResult<C> {
    /// Position of the host in the submitted list.
    pub index: usize,
    pub address: Address,
    pub context: C,
    pub outcome: Result<String, PollError>,
}
impl<C> PollResult<C> {
    pub fn data(&self) -> Option<&str> {
        self.outcome.as_ref().ok().map(|x| x.as_str())
    }

    pub fn error(&self) -> Option<&PollError> {
        self.outcome.as_ref().err()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollError {
    /// Connect, handshake or authentication failed.
    Connection(String),
    /// The command channel could not be opened or the command could not be run.
    Execution(String),
    /// The command ran but its output held no value for the pattern.
    PatternNotFound,
    Timeout(Stage),
    /// The worker ended without reporting.
    Aborted,
}
impl PollError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PollError::Connection(_) => ErrorKind::Connection,
            PollError::Execution(_) => ErrorKind::Execution,
            PollError::PatternNotFound => ErrorKind::PatternNotFound,
            PollError::Timeout(_) => ErrorKind::Timeout,
            PollError::Aborted => ErrorKind::Aborted,
        }
    }
}
impl Display for PollError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollError::Connection(e) => f.write_fmt(format_args!("connection failed: {e}")),
            PollError::Execution(e) => f.write_fmt(format_args!("failed to run command: {e}")),
            PollError::PatternNotFound => f.write_str("pattern not found"),
            PollError::Timeout(stage) => f.write_fmt(format_args!("timed out during {stage}")),
            PollError::Aborted => f.write_str("worker aborted before reporting"),
        }
    }
}
impl std::error::Error for PollError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Connection,
    Execution,
    PatternNotFound,
    Timeout,
    Aborted,
}
impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Connection => "connection",
            ErrorKind::Execution => "execution",
            ErrorKind::PatternNotFound => "pattern not found",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Aborted => "aborted",
        }
    }
}
impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Worker stage that a deadline applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// TCP connect, handshake, authentication and channel open.
    Connect,
    /// Command execution and output capture.
    Command,
}
impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Connect => f.write_str("connect"),
            Stage::Command => f.write_str("command"),
        }
    }
}
