use std::fmt::Display;

use crate::domain::{Settings, SettingsRepository};
use crate::infrastructure::toml_file_proxy::{Error as TomlProxyError, TomlFileProxy};

/// Settings stored in a TOML file. The file is created empty if it does not exist.
pub struct TomlSettingsRepository {
    proxy: TomlFileProxy<Settings>,
}
impl TomlSettingsRepository {
    pub async fn new(path: &str) -> Result<Self, Error> {
        let mut proxy = TomlFileProxy::open_or_create(path).await?;
        proxy.load().await?;

        Ok(Self { proxy })
    }
}

#[async_trait::async_trait]
impl SettingsRepository for TomlSettingsRepository {
    type Error = Error;

    async fn get(&mut self) -> Result<Settings, Self::Error> {
        let settings = self.proxy.get_cache_or_load().await?;
        Ok(settings.clone())
    }
}

#[derive(Debug)]
pub enum Error {
    TomlProxyError(TomlProxyError),
}
impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::TomlProxyError(e) => f.write_fmt(format_args!("failed to load settings: {e}")),
        }
    }
}
impl std::error::Error for Error {}
impl From<TomlProxyError> for Error {
    fn from(e: TomlProxyError) -> Self {
        Error::TomlProxyError(e)
    }
}
