use serde_derive::Serialize;
use std::fmt::Display;

/// Identifies one batch in logs and reports.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(String);
impl Id {
    pub fn new() -> Self {
        let mut buf = [0u8; 32];
        let s = uuid::Uuid::new_v4().simple().encode_lower(&mut buf);
        Self(s.to_owned())
    }

    /// First eight hex digits, enough to tell batches apart in a log line.
    pub fn short(&self) -> &str {
        &self.0[..8]
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}
impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
