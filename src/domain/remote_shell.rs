use crate::domain::{Address, Credentials};

/// Opens authenticated remote-shell sessions.
///
/// Implementations must not verify host identity beyond what the transport itself requires.
#[async_trait::async_trait]
pub trait RemoteShell: Send + Sync + 'static {
    type Error: std::error::Error + Send + 'static;
    type Session: ShellSession<Error = Self::Error>;

    async fn connect(
        &self,
        address: &Address,
        credentials: &Credentials,
    ) -> Result<Self::Session, Self::Error>;
}

#[async_trait::async_trait]
pub trait ShellSession: Send + Sized + 'static {
    type Error: std::error::Error + Send + 'static;
    type Channel: ShellChannel<Error = Self::Error>;

    async fn open_channel(&mut self) -> Result<Self::Channel, Self::Error>;

    /// Tear the connection down. Errors are swallowed; there is nothing left to do with them.
    async fn close(self);
}

#[async_trait::async_trait]
pub trait ShellChannel: Send + Sized + 'static {
    type Error: std::error::Error + Send + 'static;

    /// Run `command` and capture stdout and stderr interleaved as received.
    ///
    /// A non-zero exit status is not an error at this level.
    async fn exec(&mut self, command: &str) -> Result<CommandOutput, Self::Error>;

    async fn close(self);
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub output: Vec<u8>,
    pub exit_status: Option<u32>,
}
impl CommandOutput {
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.output)
    }
}
