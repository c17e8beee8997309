pub mod app;
pub mod poller;
pub mod report;

pub use app::App;
pub use poller::{Dispatch, Poller};
pub use report::{GroupReport, Record, Report, Skipped, Status};
