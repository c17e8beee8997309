//! SSH transport with password authentication.
//!
//! Host keys are accepted without any verification, not even trust on first use. This
//! suits lab and management networks only; anyone able to intercept the connection sees
//! the password.

use std::{fmt::Display, sync::Arc};

use log::debug;
use russh::{client, ChannelMsg, Disconnect};
use russh_keys::key;

use crate::domain::{
    Address, CommandOutput, Credentials, RemoteShell, ShellChannel, ShellSession,
};

#[derive(Clone)]
pub struct SshShell {
    config: Arc<client::Config>,
    port: u16,
}

impl SshShell {
    pub fn new(port: u16) -> Self {
        Self {
            config: Arc::new(client::Config::default()),
            port,
        }
    }
}

impl std::fmt::Debug for SshShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshShell").field("port", &self.port).finish()
    }
}

#[async_trait::async_trait]
impl RemoteShell for SshShell {
    type Error = Error;
    type Session = SshSession;

    async fn connect(
        &self,
        address: &Address,
        credentials: &Credentials,
    ) -> Result<Self::Session, Self::Error> {
        let mut handle = client::connect(
            self.config.clone(),
            (address.as_str(), self.port),
            AcceptAnyHostKey,
        )
        .await?;

        let accepted = handle
            .authenticate_password(credentials.username(), credentials.password())
            .await?;
        if !accepted {
            let _ = handle
                .disconnect(Disconnect::ByApplication, "", "English")
                .await;
            return Err(Error::AuthenticationRejected);
        }

        Ok(SshSession { handle })
    }
}

pub struct SshSession {
    handle: client::Handle<AcceptAnyHostKey>,
}

#[async_trait::async_trait]
impl ShellSession for SshSession {
    type Error = Error;
    type Channel = SshChannel;

    async fn open_channel(&mut self) -> Result<Self::Channel, Self::Error> {
        let channel = self.handle.channel_open_session().await?;
        Ok(SshChannel { channel })
    }

    async fn close(self) {
        if let Err(why) = self
            .handle
            .disconnect(Disconnect::ByApplication, "", "English")
            .await
        {
            debug!("disconnect failed: {why}");
        }
    }
}

pub struct SshChannel {
    channel: russh::Channel<client::Msg>,
}

#[async_trait::async_trait]
impl ShellChannel for SshChannel {
    type Error = Error;

    async fn exec(&mut self, command: &str) -> Result<CommandOutput, Self::Error> {
        self.channel.exec(true, command).await?;

        let mut output = CommandOutput::default();
        while let Some(msg) = self.channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => output.output.extend_from_slice(data),
                // stderr, interleaved with stdout as it arrives
                ChannelMsg::ExtendedData { ref data, .. } => output.output.extend_from_slice(data),
                ChannelMsg::ExitStatus { exit_status } => output.exit_status = Some(exit_status),
                ChannelMsg::Failure => return Err(Error::ExecRejected),
                ChannelMsg::Close => break,
                _ => (),
            }
        }

        Ok(output)
    }

    async fn close(self) {
        if let Err(why) = self.channel.close().await {
            debug!("channel close failed: {why}");
        }
    }
}

pub struct AcceptAnyHostKey;

#[async_trait::async_trait]
impl client::Handler for AcceptAnyHostKey {
    type Error = Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &key::PublicKey,
    ) -> Result<bool, Self::Error> {
        debug!(
            "accepting unverified host key {}",
            server_public_key.fingerprint()
        );
        Ok(true)
    }
}

#[derive(Debug)]
pub enum Error {
    SshError(russh::Error),
    AuthenticationRejected,
    ExecRejected,
}
impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::SshError(e) => f.write_fmt(format_args!("{e}")),
            Error::AuthenticationRejected => f.write_str("authentication rejected"),
            Error::ExecRejected => f.write_str("remote refused to run the command"),
        }
    }
}
impl std::error::Error for Error {}
impl From<russh::Error> for Error {
    fn from(e: russh::Error) -> Self {
        Error::SshError(e)
    }
}
