use serde_derive::{Deserialize, Serialize};

use super::{ExtractionPattern, Timeouts, DEFAULT_COMMAND};

pub const DEFAULT_PORT: u16 = 22;
pub const DEFAULT_CONCURRENCY: usize = 64;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;

/// Run-wide settings. Missing keys take their defaults.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub command: String,
    pub pattern: ExtractionPattern,
    pub port: u16,
    /// Maximum number of hosts holding a connection at the same time.
    pub concurrency: usize,
    /// Zero disables the deadline.
    pub connect_timeout_secs: u64,
    /// Zero disables the deadline.
    pub command_timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}
impl Settings {
    pub fn timeouts(&self) -> Timeouts {
        fn secs(x: u64) -> Option<std::time::Duration> {
            (0 < x).then(|| std::time::Duration::from_secs(x))
        }

        Timeouts {
            connect: secs(self.connect_timeout_secs),
            command: secs(self.command_timeout_secs),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            command: DEFAULT_COMMAND.to_owned(),
            pattern: ExtractionPattern::default(),
            port: DEFAULT_PORT,
            concurrency: DEFAULT_CONCURRENCY,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
            username: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.command, "show device info");
        assert_eq!(settings.port, 22);
    }

    #[test]
    fn zero_timeout_disables_stage_deadline() {
        let settings: Settings = toml::from_str(
            r#"
            connect_timeout_secs = 0
            command_timeout_secs = 5
            concurrency = 0
            "#,
        )
        .unwrap();

        let timeouts = settings.timeouts();
        assert_eq!(timeouts.connect, None);
        assert_eq!(timeouts.command, Some(std::time::Duration::from_secs(5)));
        assert_eq!(settings.concurrency(), 1);
    }
}
