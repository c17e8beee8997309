pub mod address;
pub mod batch;
pub mod credentials;
pub mod id;
pub mod pattern;
pub mod poll_result;
pub mod settings;
pub mod timestamp;

pub use self::address::Address;
pub use self::batch::Batch;
pub use self::credentials::Credentials;
pub use self::id::Id;
pub use self::pattern::ExtractionPattern;
pub use self::poll_result::{ErrorKind, PollError, PollResult, Stage};
pub use self::settings::Settings;
pub use self::timestamp::Timestamp;

pub const DEFAULT_COMMAND: &str = "show device info";

/// One host of a batch together with the caller's routing token.
///
/// The poller never looks inside `context`; it only hands it back with the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host<C> {
    pub address: Address,
    pub context: C,
}
impl<C> Host<C> {
    pub fn new(address: Address, context: C) -> Self {
        Self { address, context }
    }
}

/// Read-only inputs shared by every worker of a batch.
#[derive(Debug, Clone)]
pub struct Job {
    pub credentials: Credentials,
    pub command: String,
    pub pattern: ExtractionPattern,
    pub timeouts: Timeouts,
}

/// Per-stage deadlines. `None` leaves the stage to the transport's own limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timeouts {
    pub connect: Option<std::time::Duration>,
    pub command: Option<std::time::Duration>,
}
