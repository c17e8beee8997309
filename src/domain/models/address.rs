use serde::Deserialize;
use serde_derive::Serialize;
use std::fmt::Display;

/// Network address of a device, an IP or a hostname.
///
/// The poller never interprets it beyond handing it to the transport.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(String);
impl Address {
    pub fn new(address: String) -> Result<Self, AddressParseError> {
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(AddressParseError);
        }
        if trimmed.len() == address.len() {
            Ok(Self(address))
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
impl TryFrom<String> for Address {
    type Error = AddressParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
impl TryFrom<&str> for Address {
    type Error = AddressParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_owned())
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(AddressVisitor)
    }
}

struct AddressVisitor;
impl<'de> serde::de::Visitor<'de> for AddressVisitor {
    type Value = Address;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "a non-blank host address")
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        match Address::try_from(s) {
            Ok(x) => Ok(x),
            Err(_e) => Err(serde::de::Error::invalid_value(
                serde::de::Unexpected::Str(s),
                &self,
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressParseError;
impl Display for AddressParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("address must not be blank.")
    }
}

impl std::error::Error for AddressParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let address = Address::try_from(" 10.0.0.1 ").unwrap();
        assert_eq!(address.as_str(), "10.0.0.1");
    }

    #[test]
    fn rejects_blank() {
        assert_eq!(Address::try_from("   "), Err(AddressParseError));
        assert_eq!(Address::try_from(""), Err(AddressParseError));
    }
}
