use serde::{Deserialize, Serialize};

use std::fmt::Display;

pub const DEFAULT_PATTERN: &str = r"Serial Number\s*:\s*(\S+)";

/// Compiled pattern with exactly one capture group.
///
/// Validated when constructed, so a value of this type can always be applied.
#[derive(Debug, Clone)]
pub struct ExtractionPattern(regex::Regex);
impl ExtractionPattern {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex = regex::Regex::new(pattern).map_err(|e| PatternError::Invalid(e.to_string()))?;

        // Group 0 is the whole match.
        let groups = regex.captures_len() - 1;
        if groups != 1 {
            return Err(PatternError::CaptureGroups(groups));
        }

        Ok(Self(regex))
    }

    /// First capture group of the first match, if present and non-empty.
    pub fn extract<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.0
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
impl Default for ExtractionPattern {
    fn default() -> Self {
        Self(regex::Regex::new(DEFAULT_PATTERN).unwrap())
    }
}
impl PartialEq for ExtractionPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}
impl Eq for ExtractionPattern {}
impl AsRef<str> for ExtractionPattern {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for ExtractionPattern {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ExtractionPattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(PatternVisitor)
    }
}

struct PatternVisitor;
impl<'de> serde::de::Visitor<'de> for PatternVisitor {
    type Value = ExtractionPattern;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "a regular expression with exactly one capture group")
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        ExtractionPattern::new(s).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    Invalid(String),
    CaptureGroups(usize),
}
impl Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternError::Invalid(e) => f.write_fmt(format_args!("invalid pattern: {e}")),
            PatternError::CaptureGroups(n) => f.write_fmt(format_args!(
                "pattern must have exactly one capture group, found {n}."
            )),
        }
    }
}
impl std::error::Error for PatternError {}
