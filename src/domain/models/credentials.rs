use std::fmt::Display;

use secrecy::{ExposeSecret, SecretString};

/// Username and password shared by every worker of a batch.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password: SecretString,
}
impl Credentials {
    pub fn new(username: String, password: SecretString) -> Result<Self, CredentialsError> {
        if username.trim().is_empty() {
            return Err(CredentialsError::EmptyUsername);
        }
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsError {
    EmptyUsername,
}
impl Display for CredentialsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialsError::EmptyUsername => f.write_str("username must not be empty."),
        }
    }
}
impl std::error::Error for CredentialsError {}
