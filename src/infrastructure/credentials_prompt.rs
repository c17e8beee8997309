use std::{
    fmt::Display,
    io::{BufRead, Write},
};

use secrecy::SecretString;

use crate::domain::{credentials::CredentialsError, Credentials};

/// Ask the operator for credentials on the terminal.
///
/// `username` skips the username prompt. The password is always read without echo.
pub fn prompt_credentials(username: Option<String>) -> Result<Credentials, Error> {
    let username = match username {
        Some(x) => x,
        None => {
            let stdin = std::io::stdin();
            prompt_line(&mut stdin.lock(), &mut std::io::stderr(), "Username: ")?
        }
    };

    eprint!("Password: ");
    std::io::stderr().flush()?;
    let password = rpassword::read_password()?;

    Ok(Credentials::new(
        username.trim().to_owned(),
        SecretString::from(password),
    )?)
}

fn prompt_line<R, W>(input: &mut R, output: &mut W, prompt: &str) -> Result<String, Error>
where
    R: BufRead,
    W: Write,
{
    output.write_all(prompt.as_bytes())?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(Error::EndOfInput);
    }
    Ok(line.trim().to_owned())
}

#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    EndOfInput,
    CredentialsError(CredentialsError),
}
impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IoError(e) => f.write_fmt(format_args!("failed to read credentials: {e}")),
            Error::EndOfInput => f.write_str("failed to read credentials: input closed."),
            Error::CredentialsError(e) => f.write_fmt(format_args!("{e}")),
        }
    }
}
impl std::error::Error for Error {}
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IoError(e)
    }
}
impl From<CredentialsError> for Error {
    fn from(e: CredentialsError) -> Self {
        Error::CredentialsError(e)
    }
}
