use serde_derive::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(chrono::NaiveDateTime);
impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::Utc::now().naive_utc())
    }

    /// Elapsed time since `earlier`, zero if the clock went backwards.
    pub fn since(&self, earlier: Timestamp) -> std::time::Duration {
        (self.0 - earlier.0).to_std().unwrap_or_default()
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}", self.0.format("%Y-%m-%d %H:%M:%S")))
    }
}
