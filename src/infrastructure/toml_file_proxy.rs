use std::{fmt::Display, io::SeekFrom};

use tokio::{
    fs::{File, OpenOptions},
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
};

/// A TOML document on disk with an in-memory copy.
pub struct TomlFileProxy<T> {
    file: File,
    cache: Option<T>,
}

impl<T> TomlFileProxy<T>
where
    T: serde::de::DeserializeOwned + serde::Serialize,
{
    /// Open an existing file. A missing file is an error.
    pub async fn open(path: &str) -> Result<Self, Error> {
        let file = OpenOptions::new().read(true).write(true).open(path).await?;
        Ok(Self { file, cache: None })
    }

    /// Open the file, creating an empty one if it does not exist.
    pub async fn open_or_create(path: &str) -> Result<Self, Error> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)
            .await?;
        Ok(Self { file, cache: None })
    }

    /// Load data from the file to cache, and returns the cached data
    pub async fn load(&mut self) -> Result<&T, Error> {
        let mut toml = String::new();
        self.file.seek(SeekFrom::Start(0)).await?;
        self.file.read_to_string(&mut toml).await?;

        let data = toml::from_str::<T>(&toml)?;
        Ok(self.cache.insert(data))
    }

    /// Save the cached data to the file
    pub async fn save(&mut self) -> Result<(), Error> {
        let Self { file, cache } = self;
        let cache = match cache {
            Some(c) => c,
            None => return Err(Error::CacheEmpty),
        };

        let toml = toml::to_string_pretty(cache)?;

        file.seek(SeekFrom::Start(0)).await?;
        file.set_len(0).await?;
        file.write_all(toml.as_bytes()).await?;

        file.flush().await?;

        Ok(())
    }

    pub fn get_cache(&self) -> Option<&T> {
        self.cache.as_ref()
    }

    pub fn get_cache_mut(&mut self) -> Option<&mut T> {
        self.cache.as_mut()
    }

    pub async fn get_cache_or_load(&mut self) -> Result<&T, Error> {
        if self.cache.is_none() {
            self.load().await?;
        }
        self.cache.as_ref().ok_or(Error::CacheEmpty)
    }
}

#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    TomlError(toml::de::Error),
    TomlSerializeError(toml::ser::Error),
    CacheEmpty,
}
impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IoError(e) => f.write_fmt(format_args!("IO error: {e}")),
            Error::TomlError(e) => f.write_fmt(format_args!("Toml error: {e}")),
            Error::TomlSerializeError(e) => f.write_fmt(format_args!("Toml error: {e}")),
            Error::CacheEmpty => f.write_fmt(format_args!("Cache is empty.")),
        }
    }
}
impl std::error::Error for Error {}
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IoError(e)
    }
}
impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::TomlError(e)
    }
}
impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::TomlSerializeError(e)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[tokio::test]
    async fn open_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let result = TomlFileProxy::<BTreeMap<String, String>>::open(path.to_str().unwrap()).await;
        assert!(matches!(result, Err(Error::IoError(_))));
    }

    #[tokio::test]
    async fn save_then_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.toml");
        let path = path.to_str().unwrap();

        let mut proxy = TomlFileProxy::<BTreeMap<String, String>>::open_or_create(path)
            .await
            .unwrap();
        assert!(matches!(proxy.save().await, Err(Error::CacheEmpty)));
        assert!(proxy.load().await.unwrap().is_empty());

        proxy
            .get_cache_mut()
            .unwrap()
            .insert("key".to_owned(), "a much longer value".to_owned());
        proxy.save().await.unwrap();

        proxy
            .get_cache_mut()
            .unwrap()
            .insert("key".to_owned(), "short".to_owned());
        proxy.save().await.unwrap();

        let mut reopened = TomlFileProxy::<BTreeMap<String, String>>::open(path)
            .await
            .unwrap();
        let data = reopened.get_cache_or_load().await.unwrap();
        assert_eq!(data.get("key").map(|x| x.as_str()), Some("short"));
    }
}
