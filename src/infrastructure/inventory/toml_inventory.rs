use std::fmt::Display;

use log::debug;
use toml::{value::Table, Value};

use crate::domain::{Address, Host, HostSource, ResultSink, Timestamp};
use crate::infrastructure::toml_file_proxy::{Error as TomlProxyError, TomlFileProxy};

const ADDRESS_KEY: &str = "address";
const VALUE_KEY: &str = "value";
const UPDATED_AT_KEY: &str = "updated_at";

/// Inventory document where every top-level array of tables is a group of hosts.
///
/// ```toml
/// [[lab-a]]
/// address = "10.0.0.1"
///
/// [[lab-a]]
/// address = "10.0.0.2"
/// value = "SN0002"
/// ```
///
/// Values are written back into the row the host came from. Keys this type does not
/// know about are kept as they are.
pub struct TomlInventory {
    proxy: TomlFileProxy<Value>,
}
impl TomlInventory {
    pub async fn new(path: &str) -> Result<Self, Error> {
        let mut proxy = TomlFileProxy::<Value>::open(path).await?;
        if !proxy.load().await?.is_table() {
            return Err(Error::NotADocument);
        }

        Ok(Self { proxy })
    }

    fn table(&self) -> Result<&Table, Error> {
        self.proxy
            .get_cache()
            .ok_or(Error::TomlProxyError(TomlProxyError::CacheEmpty))?
            .as_table()
            .ok_or(Error::NotADocument)
    }

    fn row_mut(&mut self, row: &RowRef) -> Result<&mut Table, Error> {
        let table = self
            .proxy
            .get_cache_mut()
            .ok_or(Error::TomlProxyError(TomlProxyError::CacheEmpty))?
            .as_table_mut()
            .ok_or(Error::NotADocument)?;

        table
            .get_mut(&row.group)
            .and_then(|x| x.as_array_mut())
            .and_then(|x| x.get_mut(row.row))
            .and_then(|x| x.as_table_mut())
            .ok_or_else(|| Error::MissingRow(row.clone()))
    }
}

#[async_trait::async_trait]
impl HostSource for TomlInventory {
    type Error = Error;
    type Context = RowRef;

    /// Names of the top-level arrays, in lexical order. Other keys are document metadata.
    async fn groups(&mut self) -> Result<Vec<String>, Self::Error> {
        Ok(self
            .table()?
            .iter()
            .filter(|(_, x)| x.is_array())
            .map(|(k, _)| k.clone())
            .collect())
    }

    async fn hosts(&mut self, group: &str) -> Result<Vec<Host<RowRef>>, Self::Error> {
        let rows = self
            .table()?
            .get(group)
            .ok_or_else(|| Error::UnknownGroup(group.to_owned()))?
            .as_array()
            .ok_or_else(|| Error::NotAGroup(group.to_owned()))?;

        let mut hosts = Vec::with_capacity(rows.len());
        for (row, entry) in rows.iter().enumerate() {
            let address = entry
                .get(ADDRESS_KEY)
                .and_then(|x| x.as_str())
                .and_then(|x| Address::try_from(x).ok());

            match address {
                Some(address) => hosts.push(Host::new(
                    address,
                    RowRef {
                        group: group.to_owned(),
                        row,
                    },
                )),
                None => debug!("[{group}]: row {} has no address, skipped", row + 1),
            }
        }

        Ok(hosts)
    }
}

#[async_trait::async_trait]
impl ResultSink<RowRef> for TomlInventory {
    type Error = Error;

    async fn record(&mut self, context: &RowRef, value: &str) -> Result<(), Self::Error> {
        let row = self.row_mut(context)?;
        row.insert(VALUE_KEY.to_owned(), Value::String(value.to_owned()));
        row.insert(
            UPDATED_AT_KEY.to_owned(),
            Value::String(Timestamp::now().to_string()),
        );
        Ok(())
    }

    async fn save(&mut self) -> Result<(), Self::Error> {
        self.proxy.save().await?;
        Ok(())
    }
}

/// Position of a host in the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowRef {
    pub group: String,
    /// Zero-based index into the group's array.
    pub row: usize,
}
impl Display for RowRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.row + 1)
    }
}

#[derive(Debug)]
pub enum Error {
    TomlProxyError(TomlProxyError),
    NotADocument,
    UnknownGroup(String),
    NotAGroup(String),
    MissingRow(RowRef),
}
impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::TomlProxyError(e) => f.write_fmt(format_args!("inventory file error: {e}")),
            Error::NotADocument => f.write_str("inventory is not a TOML table."),
            Error::UnknownGroup(g) => f.write_fmt(format_args!("no group named '{g}'.")),
            Error::NotAGroup(g) => {
                f.write_fmt(format_args!("'{g}' is not an array of host tables."))
            }
            Error::MissingRow(r) => {
                f.write_fmt(format_args!("row {r} of group '{}' does not exist.", r.group))
            }
        }
    }
}
impl std::error::Error for Error {}
impl From<TomlProxyError> for Error {
    fn from(e: TomlProxyError) -> Self {
        Error::TomlProxyError(e)
    }
}
